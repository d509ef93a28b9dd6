//! # Catalog Data Model and Store
//!
//! This module defines the product catalog as decoded from the remote JSON
//! document, plus the shared in-memory store the rest of the bot reads from.
//!
//! ## Core Concepts
//!
//! - **Category**: one of the four fixed product groupings shown in the menu
//! - **Product**: a single catalog entry (name, description, price)
//! - **Catalog**: one decoded snapshot of the whole document
//! - **CatalogStore**: shared holder for the current catalog, replaced
//!   wholesale on every successful refresh
//!
//! Handlers never hold the store's lock across an await: they clone a
//! [`Catalog`] snapshot up front and render everything from that one view.

use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use tracing::debug;

/// Product categories offered in the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// E-liquids
    Liquid,
    /// Pod systems
    Pod,
    /// Disposable devices
    Disposable,
    /// Snus
    Snus,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 4] = [
        Category::Liquid,
        Category::Pod,
        Category::Disposable,
        Category::Snus,
    ];

    /// Stable key used in the remote document and in callback payloads.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Liquid => "liquid",
            Category::Pod => "pod",
            Category::Disposable => "disposable",
            Category::Snus => "snus",
        }
    }

    /// Parse a document/callback key back into a category.
    pub fn from_key(key: &str) -> Option<Category> {
        match key {
            "liquid" => Some(Category::Liquid),
            "pod" => Some(Category::Pod),
            "disposable" => Some(Category::Disposable),
            "snus" => Some(Category::Snus),
            _ => None,
        }
    }

    /// Title shown on the category's menu button.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Liquid => "Рідини",
            Category::Pod => "Поди",
            Category::Disposable => "Одноразки",
            Category::Snus => "Снюс",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Product price as it appears in the remote document.
///
/// The document is hand-edited and mixes bare numbers with strings such as
/// `"150 грн"`, so both forms decode and display verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// Free-form price text, shown as-is
    Text(String),
    /// Bare numeric price
    Number(f64),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Text(text) => write!(f, "{}", text),
            Price::Number(amount) => {
                if amount.fract() == 0.0 {
                    write!(f, "{}", *amount as i64)
                } else {
                    write!(f, "{}", amount)
                }
            }
        }
    }
}

/// One catalog entry. Immutable once decoded; addressed by its position
/// within the category's list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product name, also used as the button label
    pub name: String,
    /// Free-form description shown on the detail screen
    pub description: String,
    /// Price, string or number
    pub price: Price,
}

/// One decoded snapshot of the remote product document.
///
/// Snapshots are cheap to clone and compare; the store swaps them
/// wholesale so a reader never observes a mix of two fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: HashMap<Category, Vec<Product>>,
}

impl Catalog {
    /// Build a catalog from the raw document map. Keys that do not name a
    /// known category are dropped: they are unreachable from the fixed menu.
    pub fn from_document(document: HashMap<String, Vec<Product>>) -> Self {
        let mut products = HashMap::new();
        for (key, items) in document {
            match Category::from_key(&key) {
                Some(category) => {
                    products.insert(category, items);
                }
                None => {
                    debug!(key = %key, "Ignoring unknown category in catalog document");
                }
            }
        }
        Self { products }
    }

    /// Whether the document carried no usable categories at all.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Categories present in this snapshot, in menu order. A category with
    /// an empty product list is still present and still gets a menu button.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|category| self.products.contains_key(category))
            .collect()
    }

    /// Products of a category, empty for absent categories.
    pub fn products(&self, category: Category) -> &[Product] {
        self.products
            .get(&category)
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    /// Product at a position within a category.
    pub fn product(&self, category: Category, index: usize) -> Option<&Product> {
        self.products(category).get(index)
    }
}

/// Short stability token tying a product button to the product it was
/// rendered for.
///
/// Tokens are recomputed from the live catalog on every click, so a refresh
/// that reorders or replaces products invalidates stale buttons instead of
/// resolving them to whatever now sits at that index.
pub fn product_token(category: Category, product: &Product) -> String {
    let mut hasher = DefaultHasher::new();
    category.key().hash(&mut hasher);
    product.name.hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}

/// Shared holder for the current catalog.
///
/// The refresher is the only writer; handlers read cloned snapshots. Each
/// access takes the lock for a single short critical section.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Catalog>,
}

impl CatalogStore {
    /// Create an empty store. It stays empty until the first successful
    /// refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog with a freshly fetched snapshot.
    pub fn replace(&self, catalog: Catalog) {
        *self.current.write().unwrap() = catalog;
    }

    /// Clone of the current catalog.
    pub fn snapshot(&self) -> Catalog {
        self.current.read().unwrap().clone()
    }

    /// Whether no catalog has been loaded yet (or the document was empty).
    pub fn is_empty(&self) -> bool {
        self.current.read().unwrap().is_empty()
    }
}
