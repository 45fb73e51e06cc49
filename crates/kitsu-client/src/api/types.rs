//! Kitsu JSON:API response types.
//!
//! These types mirror the wire format of `GET /anime` and convert into the
//! normalized [`CatalogRecord`].

use serde::Deserialize;
use shared::{AnimeAttributes, AnimeStatus, CatalogRecord, PosterImage, Titles};

/// Top-level JSON:API document
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResourceDocument<T> {
    /// Absent or null `data` is read as an empty list
    #[serde(default)]
    pub data: Option<Vec<T>>,
}

impl<T> ResourceDocument<T> {
    pub fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// One `anime` resource object
#[derive(Debug, Clone, Deserialize)]
pub struct AnimeResource {
    pub id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub attributes: AnimeResourceAttributes,
}

/// Attributes of an `anime` resource, as sent by Kitsu
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimeResourceAttributes {
    pub canonical_title: Option<String>,
    pub titles: Option<Titles>,
    pub poster_image: Option<PosterImage>,
    pub average_rating: Option<NumberOrString>,
    pub status: Option<AnimeStatus>,
    pub age_rating: Option<String>,
    pub episode_count: Option<u32>,
    pub episode_length: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub genres: Option<Vec<String>>,
    pub synopsis: Option<String>,
}

/// Kitsu sends `averageRating` as a decimal string; plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    /// Numeric value, or `None` when the text is not a finite number
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            NumberOrString::Number(n) => *n,
            NumberOrString::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<AnimeResource> for CatalogRecord {
    fn from(resource: AnimeResource) -> Self {
        let attrs = resource.attributes;
        CatalogRecord {
            id: resource.id,
            attributes: AnimeAttributes {
                canonical_title: attrs.canonical_title,
                titles: attrs.titles.unwrap_or_default(),
                poster_image: attrs.poster_image,
                average_rating: attrs.average_rating.as_ref().and_then(NumberOrString::as_f64),
                status: attrs.status,
                age_rating: attrs.age_rating,
                episode_count: attrs.episode_count,
                episode_length: attrs.episode_length,
                start_date: attrs.start_date,
                end_date: attrs.end_date,
                genres: attrs.genres.unwrap_or_default(),
                synopsis: attrs.synopsis,
            },
        }
    }
}
