//! # Lapis Index
//!
//! Flags a divine insight event when the virtue is in the lapis set.
//!
//! The amplified-context check is reported alongside the result but has no
//! effect on `triggered`: a lapis virtue triggers with or without it, and a
//! context tag alone never does.

use crate::primitives::{AMPLIFIED_CONTEXTS, LAPIS_VIRTUES, NO_MEMORY_REFERENCE};
use crate::LapisTrigger;

/// Check whether a virtue (optionally reinforced by a memory tag) triggers.
#[must_use]
pub fn trigger_lapis_event(virtue: &str, memory_tag: Option<&str>) -> LapisTrigger {
    let virtue_match = LAPIS_VIRTUES.contains(&virtue.to_lowercase().as_str());
    let amplified_context = memory_tag
        .is_some_and(|tag| AMPLIFIED_CONTEXTS.contains(&tag.to_lowercase().as_str()));

    LapisTrigger {
        triggered: virtue_match,
        virtue_match,
        amplified_context,
        virtue: virtue.to_string(),
        memory_tag: memory_tag.unwrap_or(NO_MEMORY_REFERENCE).to_string(),
    }
}
