//! Exchange eligibility evaluation.
//!
//! Decides whether a requester can make a structurally valid offer for an
//! item, and which of the requester's own items qualify as that offer.
//! Donations (`is_exchangeable = false`) never need an offer. For barter
//! items, an offered item qualifies when its category is one of the
//! requested item's preferred categories.
//!
//! When `require_all_categories` is set, the requester's qualifying items
//! must together cover every preferred category; a single match is not
//! enough.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::DbId;

/// The category preferences attached to a requested item.
#[derive(Debug, Clone, Copy)]
pub struct CategoryPreference<'a> {
    pub preferred_category_ids: &'a [DbId],
    pub require_all_categories: bool,
}

/// One of the requester's items, considered as a possible offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateItem {
    pub id: DbId,
    pub title: String,
    pub category_id: DbId,
    pub category_name: String,
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityResult {
    pub can_exchange: bool,
    /// `false` for donations.
    pub offered_item_required: bool,
    /// Requester items whose category is accepted, in inventory order.
    pub matching_items: Vec<CandidateItem>,
    /// Preferred categories the requester has nothing to offer for.
    pub missing_category_ids: Vec<DbId>,
}

impl EligibilityResult {
    fn donation() -> Self {
        Self {
            can_exchange: true,
            offered_item_required: false,
            matching_items: Vec::new(),
            missing_category_ids: Vec::new(),
        }
    }
}

/// Whether an item in `category_id` is an acceptable offer.
pub fn qualifies(category_id: DbId, preferred_category_ids: &[DbId]) -> bool {
    preferred_category_ids.contains(&category_id)
}

/// Evaluate a requester's inventory against a requested item.
///
/// `requested_item_id` is excluded from the inventory so an item can never
/// qualify as an offer for itself.
pub fn evaluate(
    requested_item_id: DbId,
    is_exchangeable: bool,
    preference: CategoryPreference<'_>,
    inventory: Vec<CandidateItem>,
) -> EligibilityResult {
    if !is_exchangeable {
        return EligibilityResult::donation();
    }

    let preferred = preference.preferred_category_ids;
    let matching_items: Vec<CandidateItem> = inventory
        .into_iter()
        .filter(|item| item.id != requested_item_id && qualifies(item.category_id, preferred))
        .collect();

    let covered: BTreeSet<DbId> = matching_items.iter().map(|i| i.category_id).collect();
    let missing_category_ids: Vec<DbId> = preferred
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|c| !covered.contains(c))
        .collect();

    let can_exchange = if preference.require_all_categories {
        !matching_items.is_empty() && missing_category_ids.is_empty()
    } else {
        !matching_items.is_empty()
    };

    EligibilityResult {
        can_exchange,
        offered_item_required: true,
        matching_items,
        missing_category_ids,
    }
}
