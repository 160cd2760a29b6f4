//! # Hope-Chain Binder (Wheat Binder)
//!
//! Decides whether an emotion/virtue pair forms a hope thread and scores the
//! nourishment of the result inversely to fatigue.

use crate::primitives::{
    DEFAULT_HOPE_ANCHOR, HOPE_ANCHORS, HOPE_SYMBOL, HOPE_VIRTUES, NOURISHMENT_CEILING,
    REGENERATIVE_EMOTIONS,
};
use crate::{HopeAnchor, HopeBinding};

/// Bind a hope chain.
///
/// `nourishment_level = max(1, 10 - fatigue_level)`. Fatigue is expected in
/// 0..=10; negative fatigue is not clamped and yields more than 10.
#[must_use]
pub fn bind_hope_chain(emotion: &str, virtue: &str, fatigue_level: i64) -> HopeBinding {
    let chain_bound = HOPE_VIRTUES.contains(&virtue.to_lowercase().as_str())
        && REGENERATIVE_EMOTIONS.contains(&emotion.to_lowercase().as_str());

    let nourishment_level = NOURISHMENT_CEILING.saturating_sub(fatigue_level).max(1);

    HopeBinding {
        hope_thread: chain_bound,
        nourishment_level,
        symbol: chain_bound.then(|| HOPE_SYMBOL.to_string()),
        message: if chain_bound {
            "Guided thread bound to logic chain.".to_string()
        } else {
            "No divine thread formed.".to_string()
        },
    }
}

/// Fallback binding of hopeful meaning onto a memory tag.
#[must_use]
pub fn bind_hope_to_memory(memory_tag: &str) -> HopeAnchor {
    let key = memory_tag.to_lowercase();
    let message = HOPE_ANCHORS
        .iter()
        .find(|(tag, _)| *tag == key)
        .map(|(_, message)| *message)
        .unwrap_or(DEFAULT_HOPE_ANCHOR);

    HopeAnchor {
        binding: "hope".to_string(),
        message: message.to_string(),
        tag: memory_tag.to_string(),
    }
}
