//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::html;

use crate::catalog::{product_token, Catalog, Category, Product};

use super::navigator::CallbackAction;

/// Category buttons per keyboard row.
const CATEGORY_COLUMNS: usize = 2;

pub fn greeting_text(first_name: &str) -> String {
    format!("Привіт, {first_name}! Обери категорію:")
}

/// Menu greeting used when the header image could not be sent.
pub fn greeting_fallback_text(first_name: &str) -> String {
    format!("Привіт, {first_name}! Обери категорію (зображення недоступне через помилку):")
}

pub fn catalog_unavailable_text() -> &'static str {
    "⚠️ Помилка: товари не завантажено. Спробуйте пізніше або зв'яжіться з адміністратором."
}

pub fn category_empty_text() -> &'static str {
    "⚠️ Товари в цій категорії відсутні."
}

pub fn product_not_found_text() -> &'static str {
    "⚠️ Товар не знайдено. Оберіть категорію ще раз."
}

pub fn category_title_text(category: Category) -> String {
    format!("Товари в категорії {}:", category.title())
}

/// Ordering and selling instructions shown under the main menu.
pub fn instructions_text(manager_handle: &str) -> String {
    format!(
        "📦 Для замовлення товару:\n\
         Напишіть сюди: {manager_handle}\n\n\
         💡 Щоб виставити свій под на продаж:\n\
         Напишіть сюди: {manager_handle}\n\n\
         Наш менеджер допоможе вам з оформленням замовлення або розміщенням товару!"
    )
}

/// Fixed reply to the `/status` liveness probe.
pub fn status_text() -> &'static str {
    "Я активен! 🚀"
}

/// Product detail body. HTML parse mode with every field escaped, since
/// names and descriptions come from a hand-edited document.
pub fn product_details_text(product: &Product) -> String {
    format!(
        "<b>{}</b>\n\n{}\nЦіна: {}",
        html::escape(&product.name),
        html::escape(&product.description),
        html::escape(&product.price.to_string()),
    )
}

/// Category grid for the main menu: two columns, menu order, one button
/// per category present in the catalog.
pub fn category_keyboard(catalog: &Catalog) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = catalog
        .categories()
        .into_iter()
        .map(|category| {
            InlineKeyboardButton::callback(
                category.title(),
                CallbackAction::Category(category).as_data(),
            )
        })
        .collect();

    let rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .chunks(CATEGORY_COLUMNS)
        .map(|chunk| chunk.to_vec())
        .collect();

    InlineKeyboardMarkup::new(rows)
}

/// Product list keyboard: one product per row, labeled by name, then a
/// Back row. Every product button carries its stability token.
pub fn product_keyboard(category: Category, products: &[Product]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = products
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let action = CallbackAction::Product {
                index,
                token: Some(product_token(category, product)),
            };
            vec![InlineKeyboardButton::callback(
                product.name.clone(),
                action.as_data(),
            )]
        })
        .collect();
    rows.push(back_to_menu_row());
    InlineKeyboardMarkup::new(rows)
}

/// Detail screen keyboard: back to the product list, then back to the menu.
pub fn product_details_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "⬅ До товарів",
            CallbackAction::BackToProducts.as_data(),
        )],
        vec![InlineKeyboardButton::callback(
            "🏠 До меню",
            CallbackAction::BackToMenu.as_data(),
        )],
    ])
}

/// Single Back button, used by the empty-category and not-found screens so
/// no screen is a dead end.
pub fn back_to_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_to_menu_row()])
}

fn back_to_menu_row() -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback(
        "⬅ Назад",
        CallbackAction::BackToMenu.as_data(),
    )]
}
