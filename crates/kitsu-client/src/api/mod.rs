//! Kitsu API client implementation.
//!
//! This module provides the catalog client for the Kitsu JSON:API and the
//! [`CatalogSource`] seam the browsing session fetches through.

pub mod client;
pub mod types;

use async_trait::async_trait;
use shared::CatalogRecord;

use crate::error::FetchError;

pub use client::{KitsuClient, JSON_API_MEDIA_TYPE};
pub use types::*;

/// Source of catalog records, one request per call
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the first page of records, matching `search_term` when it is non-empty
    async fn fetch_catalog(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<CatalogRecord>, FetchError>;
}
