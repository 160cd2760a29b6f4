//! # Paradox Resolution (Izanagi Gate)
//!
//! Two independent lookup tables, each checked case-insensitively in both
//! orderings, merged into one [`ParadoxResult`].

use crate::primitives::{DEFAULT_FLAME, FLAME_TABLE, PARADOX_DESCRIPTIONS};
use crate::ParadoxResult;

/// Whether `(a, b)` matches `(x, y)` in either order.
fn pair_matches(a: &str, b: &str, x: &str, y: &str) -> bool {
    (a == x && b == y) || (a == y && b == x)
}

/// Paradox level and flame name for an emotion/virtue pair.
#[must_use]
pub fn evaluate_paradox(emotion: &str, virtue: &str) -> (u8, &'static str) {
    let emotion = emotion.to_lowercase();
    let virtue = virtue.to_lowercase();

    FLAME_TABLE
        .iter()
        .find(|(e, v, _, _)| pair_matches(&emotion, &virtue, e, v))
        .map(|(_, _, level, flame)| (*level, *flame))
        .unwrap_or(DEFAULT_FLAME)
}

/// Resolve the paradox between a virtue and an emotion.
///
/// The default description keeps the caller's original casing.
#[must_use]
pub fn resolve_paradox_chain(virtue: &str, emotion: &str) -> ParadoxResult {
    let (level, flame) = evaluate_paradox(emotion, virtue);

    let virtue_key = virtue.to_lowercase();
    let emotion_key = emotion.to_lowercase();
    let description = PARADOX_DESCRIPTIONS
        .iter()
        .find(|(v, e, _)| pair_matches(&virtue_key, &emotion_key, v, e))
        .map(|(_, _, text)| (*text).to_string())
        .unwrap_or_else(|| format!("No paradox detected between {} and {}.", virtue, emotion));

    ParadoxResult {
        level,
        flame: flame.to_string(),
        paradox: level > 1,
        description,
    }
}
