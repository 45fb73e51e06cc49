//! Kitsu catalog client library.
//!
//! This library fetches anime records from the Kitsu JSON:API and
//! normalizes them into [`shared::CatalogRecord`] values.

pub mod api;
pub mod error;

pub use api::{CatalogSource, KitsuClient};
pub use error::FetchError;
