//! Display projections of catalog records.
//!
//! Every fallback chain for a displayed field lives here. The projections are
//! total: any record, however sparse, maps to fully populated, non-empty
//! strings.

use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use shared::CatalogRecord;
use std::fmt::Write;

pub const UNKNOWN_TITLE: &str = "Unknown";
pub const CARD_PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/200x280?text=No+Image";
pub const DETAIL_PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x400?text=No+Image";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_SYNOPSIS: &str = "No description available.";
pub const NOT_RATED: &str = "Not Rated";
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// What a list card shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProjection {
    pub id: String,
    pub title: String,
    pub poster_url: String,
    pub rating_display: String,
    pub status_display: String,
}

/// What the detail view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailProjection {
    pub id: String,
    pub title: String,
    pub poster_url: String,
    pub rating_display: String,
    pub status_display: String,
    pub synopsis: String,
    pub episode_count: String,
    pub episode_length: String,
    pub age_rating: String,
    pub start_date_display: String,
    pub end_date_display: String,
    pub genres_display: String,
}

/// Maps records to projections, rendering dates in the viewer's format
#[derive(Debug, Clone)]
pub struct Formatter {
    date_format: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Formatter {
    /// Create a formatter with a strftime date pattern
    pub fn new(date_format: impl Into<String>) -> Result<Self> {
        let date_format = date_format.into();
        if date_format.trim().is_empty() {
            bail!("Date format must not be empty");
        }
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            bail!("Invalid date format: {}", date_format);
        }
        Ok(Self { date_format })
    }

    pub fn card(&self, record: &CatalogRecord) -> CardProjection {
        let attrs = &record.attributes;
        CardProjection {
            id: record.id.clone(),
            title: title(record),
            poster_url: attrs
                .poster_image
                .as_ref()
                .and_then(|p| present(&p.medium))
                .unwrap_or(CARD_PLACEHOLDER_POSTER)
                .to_string(),
            rating_display: rounded_rating(attrs.average_rating)
                .map(|r| r.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status_display: attrs
                .status
                .as_ref()
                .map(|s| s.as_str().trim())
                .filter(|s| !s.is_empty())
                .unwrap_or("unknown")
                .to_string(),
        }
    }

    pub fn detail(&self, record: &CatalogRecord) -> DetailProjection {
        let attrs = &record.attributes;
        let poster = attrs.poster_image.as_ref();

        DetailProjection {
            id: record.id.clone(),
            title: title(record),
            poster_url: poster
                .and_then(|p| present(&p.large).or_else(|| present(&p.medium)))
                .unwrap_or(DETAIL_PLACEHOLDER_POSTER)
                .to_string(),
            rating_display: rounded_rating(attrs.average_rating)
                .map(|r| format!("{}%", r))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status_display: attrs
                .status
                .as_ref()
                .map(|s| s.as_str().trim())
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
                .to_string(),
            synopsis: present(&attrs.synopsis).unwrap_or(NO_SYNOPSIS).to_string(),
            episode_count: attrs
                .episode_count
                .filter(|&n| n > 0)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            episode_length: attrs
                .episode_length
                .filter(|&n| n > 0)
                .map(|n| format!("{} min", n))
                .unwrap_or_else(|| "Unknown".to_string()),
            age_rating: present(&attrs.age_rating).unwrap_or(NOT_RATED).to_string(),
            start_date_display: self.date(&attrs.start_date),
            end_date_display: self.date(&attrs.end_date),
            genres_display: genres(&attrs.genres),
        }
    }

    /// Format an ISO date; unparseable input is shown verbatim
    fn date(&self, value: &Option<String>) -> String {
        let Some(raw) = present(value) else {
            return NOT_AVAILABLE.to_string();
        };

        let parsed = raw
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok());

        if let Some(date) = parsed {
            let mut out = String::new();
            if write!(out, "{}", date.format(&self.date_format)).is_ok() && !out.trim().is_empty() {
                return out;
            }
        }
        raw.to_string()
    }
}

/// Canonical title, then the romanized Japanese title, then "Unknown"
fn title(record: &CatalogRecord) -> String {
    let attrs = &record.attributes;
    present(&attrs.canonical_title)
        .or_else(|| present(&attrs.titles.en_jp))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

/// Nearest integer, halves rounding up
fn rounded_rating(rating: Option<f64>) -> Option<i64> {
    rating
        .filter(|r| r.is_finite())
        .map(|r| (r + 0.5).floor() as i64)
}

fn genres(genres: &[String]) -> String {
    let names: Vec<&str> = genres
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(", ")
    }
}

/// Blank strings count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
