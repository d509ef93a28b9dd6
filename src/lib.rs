//! # Dymok Storefront Bot
//!
//! A Telegram storefront bot: a remote JSON catalog rendered as an inline
//! keyboard menu (categories, product lists, product details), refreshed
//! in the background and kept resident via a keep-alive HTTP endpoint.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod keepalive;
pub mod media;
pub mod periodic;
pub mod refresh;
pub mod session;
