//! Client-side refinement of a fetched record set.

use shared::{CatalogRecord, FilterCriteria};
use tracing::trace;

/// Keep the records matching every active constraint in `criteria`.
///
/// Applied in sequence: status first, then age rating. Both are exact,
/// case-sensitive equality checks, and a record missing the field is dropped
/// while that constraint is active. Input order is preserved.
pub fn apply_filters(records: &[CatalogRecord], criteria: &FilterCriteria) -> Vec<CatalogRecord> {
    let mut filtered: Vec<CatalogRecord> = records.to_vec();

    if let Some(status) = &criteria.status {
        filtered.retain(|record| record.attributes.status.as_ref() == Some(status));
        trace!(status = %status, remaining = filtered.len(), "Applied status filter");
    }

    if let Some(rating) = &criteria.rating {
        filtered.retain(|record| record.attributes.age_rating.as_deref() == Some(rating.as_str()));
        trace!(rating = %rating, remaining = filtered.len(), "Applied rating filter");
    }

    filtered
}
