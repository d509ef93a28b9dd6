use dymok::bot::navigator::{next_screen, CallbackAction, NextScreen};
use dymok::bot::ui_builder;
use dymok::catalog::{product_token, Catalog, CatalogStore, Category, Price, Product};
use dymok::session::SessionTable;
use std::collections::HashMap;
use teloxide::types::{InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    const USER: UserId = UserId(1001);

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            description: format!("{name} опис"),
            price: Price::Text("200 грн".to_string()),
        }
    }

    fn catalog(categories: &[(&str, &[&str])]) -> Catalog {
        let mut document = HashMap::new();
        for (key, names) in categories {
            let products = names.iter().map(|name| product(name)).collect();
            document.insert(key.to_string(), products);
        }
        Catalog::from_document(document)
    }

    /// Drive one callback through the decision and apply the session
    /// mutations the handlers perform for it.
    fn step(data: &str, catalog: &Catalog, sessions: &SessionTable, user: UserId) -> NextScreen {
        let screen = next_screen(data, catalog, sessions.current_category(user));
        if let NextScreen::Products(category) = &screen {
            sessions.set_category(user, *category);
        }
        screen
    }

    /// Payload of the button at `row` in a rendered single-column keyboard.
    fn button_payload(keyboard: &InlineKeyboardMarkup, row: usize) -> String {
        match &keyboard.inline_keyboard[row][0].kind {
            InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
            other => panic!("Expected callback button, got {other:?}"),
        }
    }

    /// Test the category-then-product drill-down lands on the detail screen
    /// for the product that was listed
    #[test]
    fn test_drill_down_to_product_detail() {
        let catalog = catalog(&[("liquid", &["A"][..])]);
        let sessions = SessionTable::new();

        assert_eq!(
            step("category_liquid", &catalog, &sessions, USER),
            NextScreen::Products(Category::Liquid)
        );
        assert_eq!(
            step("product_0", &catalog, &sessions, USER),
            NextScreen::Detail(Category::Liquid, 0)
        );
        assert_eq!(catalog.product(Category::Liquid, 0).unwrap().name, "A");
    }

    /// Test an out-of-bounds index on the same category is the not-found
    /// screen, not an error
    #[test]
    fn test_out_of_bounds_index_is_not_found() {
        let catalog = catalog(&[("liquid", &["A"][..])]);
        let sessions = SessionTable::new();

        step("category_liquid", &catalog, &sessions, USER);
        assert_eq!(
            step("product_5", &catalog, &sessions, USER),
            NextScreen::NotFound
        );
        // The session still remembers the category for back_to_products
        assert_eq!(sessions.current_category(USER), Some(Category::Liquid));
    }

    /// Test back_to_products with no prior category falls back to the menu
    #[test]
    fn test_back_to_products_without_history_is_the_menu() {
        let catalog = catalog(&[("liquid", &["A"][..]), ("pod", &["B"][..])]);
        let sessions = SessionTable::new();

        assert_eq!(
            step("back_to_products", &catalog, &sessions, USER),
            NextScreen::Menu
        );
        assert!(sessions.current_category(USER).is_none());
    }

    /// Test the full round trip: list, detail, back to the list, back to
    /// the menu
    #[test]
    fn test_round_trip_through_back_buttons() {
        let catalog = catalog(&[("snus", &["Siberia", "Odens"][..])]);
        let sessions = SessionTable::new();

        step("category_snus", &catalog, &sessions, USER);
        assert_eq!(
            step("product_1", &catalog, &sessions, USER),
            NextScreen::Detail(Category::Snus, 1)
        );
        assert_eq!(
            step("back_to_products", &catalog, &sessions, USER),
            NextScreen::Products(Category::Snus)
        );
        assert_eq!(
            step("back_to_menu", &catalog, &sessions, USER),
            NextScreen::Menu
        );
    }

    /// Test clicking a button rendered before a refresh that changed the
    /// category resolves to not-found instead of the wrong product
    #[test]
    fn test_stale_button_after_refresh_is_not_found() {
        let before = catalog(&[("liquid", &["Old Flavour", "Kept"][..])]);
        let sessions = SessionTable::new();

        step("category_liquid", &before, &sessions, USER);
        let keyboard =
            ui_builder::product_keyboard(Category::Liquid, before.products(Category::Liquid));
        let stale_payload = button_payload(&keyboard, 0);

        // The refresher swapped the catalog; index 0 now names a different
        // product, so the old button's token no longer matches.
        let after = catalog(&[("liquid", &["New Flavour", "Kept"][..])]);
        assert_eq!(
            step(&stale_payload, &after, &sessions, USER),
            NextScreen::NotFound
        );

        // A button whose product survived the refresh keeps working
        let kept_payload = button_payload(&keyboard, 1);
        assert_eq!(
            step(&kept_payload, &after, &sessions, USER),
            NextScreen::Detail(Category::Liquid, 1)
        );
    }

    /// Test rendered product buttons resolve back through the navigator to
    /// the product they label
    #[test]
    fn test_rendered_buttons_resolve_to_their_products() {
        let catalog = catalog(&[("disposable", &["Elf Bar", "HQD"][..])]);
        let sessions = SessionTable::new();
        step("category_disposable", &catalog, &sessions, USER);

        let keyboard = ui_builder::product_keyboard(
            Category::Disposable,
            catalog.products(Category::Disposable),
        );
        for (index, name) in ["Elf Bar", "HQD"].iter().enumerate() {
            let payload = button_payload(&keyboard, index);
            assert_eq!(
                step(&payload, &catalog, &sessions, USER),
                NextScreen::Detail(Category::Disposable, index)
            );
            assert_eq!(
                catalog.product(Category::Disposable, index).unwrap().name,
                *name
            );
        }
    }

    /// Test a product click in a category the user never opened is
    /// not-found even when the index would be in bounds elsewhere
    #[test]
    fn test_product_click_without_open_category() {
        let catalog = catalog(&[("liquid", &["A"][..])]);
        let sessions = SessionTable::new();

        let token = product_token(
            Category::Liquid,
            catalog.product(Category::Liquid, 0).unwrap(),
        );
        assert_eq!(
            step(&format!("product_0_{token}"), &catalog, &sessions, USER),
            NextScreen::NotFound
        );
    }

    /// Test an empty catalog renders a menu with no category buttons
    #[test]
    fn test_empty_catalog_has_no_category_buttons() {
        let store = CatalogStore::new();
        let snapshot = store.snapshot();

        assert!(snapshot.is_empty());
        let InlineKeyboardMarkup { inline_keyboard } = ui_builder::category_keyboard(&snapshot);
        assert!(inline_keyboard.is_empty());
        assert!(ui_builder::catalog_unavailable_text().contains("товари не завантажено"));
    }

    /// Test two users navigate independent sessions
    #[test]
    fn test_sessions_are_independent_per_user() {
        let catalog = catalog(&[("liquid", &["A"][..]), ("pod", &["B"][..])]);
        let sessions = SessionTable::new();
        let other = UserId(2002);

        step("category_liquid", &catalog, &sessions, USER);
        step("category_pod", &catalog, &sessions, other);

        assert_eq!(
            step("product_0", &catalog, &sessions, USER),
            NextScreen::Detail(Category::Liquid, 0)
        );
        assert_eq!(
            step("product_0", &catalog, &sessions, other),
            NextScreen::Detail(Category::Pod, 0)
        );
    }

    /// Test the screen-replacement bookkeeping: the tracked id is consumed
    /// before the delete attempt and the new screen's id replaces it
    #[test]
    fn test_screen_replacement_tracks_one_message() {
        let sessions = SessionTable::new();

        sessions.set_last_message(USER, MessageId(100));
        // Navigation starts by taking the previous screen's id
        assert_eq!(sessions.take_last_message(USER), Some(MessageId(100)));
        // Whatever the delete outcome, nothing remains tracked
        assert_eq!(sessions.get_or_create(USER).last_message_id, None);

        // The freshly sent screen becomes the single tracked message
        sessions.set_last_message(USER, MessageId(101));
        assert_eq!(
            sessions.get_or_create(USER).last_message_id,
            Some(MessageId(101))
        );
    }

    /// Test the status reply is fixed and touches no session
    #[test]
    fn test_status_is_fixed_and_stateless() {
        let sessions = SessionTable::new();

        assert_eq!(ui_builder::status_text(), "Я активен! 🚀");
        // The status path never reads or writes the table
        assert!(sessions.is_empty());
    }

    /// Test every payload shape the keyboards emit parses back to an action
    #[test]
    fn test_emitted_payloads_all_parse() {
        let catalog = catalog(&[("liquid", &["A", "B"][..])]);

        let category_grid = ui_builder::category_keyboard(&catalog);
        let product_list =
            ui_builder::product_keyboard(Category::Liquid, catalog.products(Category::Liquid));
        let detail = ui_builder::product_details_keyboard();
        let back = ui_builder::back_to_menu_keyboard();

        for keyboard in [category_grid, product_list, detail, back] {
            for row in &keyboard.inline_keyboard {
                for button in row {
                    let InlineKeyboardButtonKind::CallbackData(data) = &button.kind else {
                        panic!("Expected callback button");
                    };
                    assert!(
                        CallbackAction::parse(data).is_some(),
                        "payload {data:?} should parse"
                    );
                }
            }
        }
    }
}
