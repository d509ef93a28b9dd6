//! Navigator module: pure callback-payload parsing and screen decisions

use crate::catalog::{product_token, Catalog, Category};

/// A parsed callback payload.
///
/// [`CallbackAction::as_data`] and [`CallbackAction::parse`] are the single
/// source of truth for the wire format: keyboards encode with the same
/// scheme the handler parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Open a category's product list (`category_<key>`)
    Category(Category),
    /// Open one product (`product_<index>` or `product_<index>_<token>`).
    /// Buttons rendered by this bot always carry the stability token; bare
    /// indices are accepted with positional semantics.
    Product { index: usize, token: Option<String> },
    /// Return to the main menu (`back_to_menu`)
    BackToMenu,
    /// Return to the product list of the current category
    /// (`back_to_products`)
    BackToProducts,
}

impl CallbackAction {
    /// Encode into callback data.
    pub fn as_data(&self) -> String {
        match self {
            CallbackAction::Category(category) => format!("category_{}", category.key()),
            CallbackAction::Product {
                index,
                token: Some(token),
            } => format!("product_{index}_{token}"),
            CallbackAction::Product { index, token: None } => format!("product_{index}"),
            CallbackAction::BackToMenu => "back_to_menu".to_string(),
            CallbackAction::BackToProducts => "back_to_products".to_string(),
        }
    }

    /// Parse callback data. `None` for payloads this bot never emitted.
    pub fn parse(data: &str) -> Option<CallbackAction> {
        if data == "back_to_menu" {
            return Some(CallbackAction::BackToMenu);
        }
        if data == "back_to_products" {
            return Some(CallbackAction::BackToProducts);
        }
        if let Some(key) = data.strip_prefix("category_") {
            return Category::from_key(key).map(CallbackAction::Category);
        }
        if let Some(rest) = data.strip_prefix("product_") {
            let (index, token) = match rest.split_once('_') {
                Some((index, token)) => (index, Some(token.to_string())),
                None => (rest, None),
            };
            return index
                .parse()
                .ok()
                .map(|index| CallbackAction::Product { index, token });
        }
        None
    }
}

/// The screen to render in response to a callback event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextScreen {
    /// Main menu: greeting plus the category grid
    Menu,
    /// Product list of a category
    Products(Category),
    /// Detail screen of the product at this position
    Detail(Category, usize),
    /// Stale or invalid product reference
    NotFound,
    /// Unrecognized payload: answer the query and do nothing
    Ignore,
}

/// Decide the next screen for a callback payload against one catalog
/// snapshot and the category the user currently has open.
pub fn next_screen(
    data: &str,
    catalog: &Catalog,
    current_category: Option<Category>,
) -> NextScreen {
    match CallbackAction::parse(data) {
        Some(CallbackAction::Category(category)) => NextScreen::Products(category),
        Some(CallbackAction::Product { index, token }) => {
            let Some(category) = current_category else {
                return NextScreen::NotFound;
            };
            let Some(product) = catalog.product(category, index) else {
                return NextScreen::NotFound;
            };
            match token {
                Some(token) if token != product_token(category, product) => NextScreen::NotFound,
                _ => NextScreen::Detail(category, index),
            }
        }
        Some(CallbackAction::BackToMenu) => NextScreen::Menu,
        Some(CallbackAction::BackToProducts) => match current_category {
            Some(category) => NextScreen::Products(category),
            None => NextScreen::Menu,
        },
        // A product payload that would not parse is a broken product
        // reference, not an unknown event.
        None if data.starts_with("product_") => NextScreen::NotFound,
        None => NextScreen::Ignore,
    }
}
