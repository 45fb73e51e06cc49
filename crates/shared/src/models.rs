//! Data models for the catalog browser.
//!
//! This module defines the normalized catalog record shared by the HTTP
//! client and the browsing pipeline, plus the filter criteria applied to it.

use serde::{Deserialize, Serialize};

/// One catalog entry (an anime title) as loaded from the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Catalog identifier, unique within a loaded result set
    pub id: String,
    pub attributes: AnimeAttributes,
}

impl CatalogRecord {
    /// Create a record with the given id and no attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: AnimeAttributes::default(),
        }
    }
}

/// Attribute bag of a catalog record. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeAttributes {
    // Titles
    pub canonical_title: Option<String>,
    #[serde(default)]
    pub titles: Titles,

    // Images
    pub poster_image: Option<PosterImage>,

    // Classification
    pub average_rating: Option<f64>, // 0 to 100
    pub status: Option<AnimeStatus>,
    pub age_rating: Option<String>,

    // Episodes
    pub episode_count: Option<u32>,
    pub episode_length: Option<u32>, // minutes

    // Dates (ISO 8601, YYYY-MM-DD)
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    #[serde(default)]
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
}

/// Localized title variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Titles {
    pub en_jp: Option<String>,
    pub en: Option<String>,
    pub ja_jp: Option<String>,
}

/// Poster image URLs, smallest to largest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosterImage {
    pub tiny: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub original: Option<String>,
}

/// Airing status of an anime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnimeStatus {
    Current,
    Finished,
    Tba,
    Unreleased,
    Upcoming,
    /// Any status value outside the known set, kept verbatim
    Unknown(String),
}

impl AnimeStatus {
    /// All statuses a filter can ask for
    pub const KNOWN: [AnimeStatus; 5] = [
        AnimeStatus::Current,
        AnimeStatus::Finished,
        AnimeStatus::Tba,
        AnimeStatus::Unreleased,
        AnimeStatus::Upcoming,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AnimeStatus::Current => "current",
            AnimeStatus::Finished => "finished",
            AnimeStatus::Tba => "tba",
            AnimeStatus::Unreleased => "unreleased",
            AnimeStatus::Upcoming => "upcoming",
            AnimeStatus::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict, case-sensitive parse. Only known statuses are accepted.
impl std::str::FromStr for AnimeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(AnimeStatus::Current),
            "finished" => Ok(AnimeStatus::Finished),
            "tba" => Ok(AnimeStatus::Tba),
            "unreleased" => Ok(AnimeStatus::Unreleased),
            "upcoming" => Ok(AnimeStatus::Upcoming),
            _ => Err(anyhow::anyhow!("Invalid anime status: {}", s)),
        }
    }
}

impl From<String> for AnimeStatus {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or(AnimeStatus::Unknown(raw))
    }
}

impl From<AnimeStatus> for String {
    fn from(status: AnimeStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Active status/rating constraints. `None` leaves a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub status: Option<AnimeStatus>,
    pub rating: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from raw filter inputs.
    ///
    /// An empty input or `any` clears that dimension. A status must be one of
    /// the known values, matched case-sensitively.
    pub fn from_inputs(status: &str, rating: &str) -> anyhow::Result<Self> {
        let status = match unset_input(status) {
            Some(value) => Some(value.parse()?),
            None => None,
        };

        Ok(Self {
            status,
            rating: unset_input(rating).map(str::to_string),
        })
    }

    /// True when no dimension is constrained
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.rating.is_none()
    }
}

fn unset_input(input: &str) -> Option<&str> {
    let input = input.trim();
    if input.is_empty() || input == "any" {
        None
    } else {
        Some(input)
    }
}
