//! Customer interest rules.
//!
//! A user keeps one list of category ids they would like to be shown. The
//! list is an ordered set: no duplicates, first mention wins.

use crate::error::CoreError;
use crate::types::DbId;

/// Reject non-positive ids before they reach the database.
pub fn validate_ids(ids: &[DbId]) -> Result<(), CoreError> {
    let invalid: Vec<DbId> = ids.iter().copied().filter(|&id| id <= 0).collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Category ids must be positive, got {invalid:?}"
        )))
    }
}

/// Drop repeated ids, keeping the first occurrence.
pub fn normalize(ids: &[DbId]) -> Vec<DbId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Apply an add/remove edit to an existing interest list.
///
/// Added ids already present keep their position; removals win over
/// additions of the same id.
pub fn apply_changes(current: &[DbId], add: &[DbId], remove: &[DbId]) -> Vec<DbId> {
    let mut merged = normalize(current);
    for &id in add {
        if !merged.contains(&id) {
            merged.push(id);
        }
    }
    merged.retain(|id| !remove.contains(id));
    merged
}
