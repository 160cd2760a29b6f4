//! # Mana Conversion
//!
//! Converts an emotion/virtue pair into symbolic mana units:
//!
//! ```text
//! mana = 3 * len(emotion) + 5 * len(virtue) + (10 if initials match)
//! ```
//!
//! Lengths are counted in characters. Initials are compared case-insensitively.

use crate::primitives::{EMOTION_WEIGHT, SYNERGY_BONUS, VIRTUE_WEIGHT};
use crate::AurathentError;

/// Convert an emotion and a virtue into a mana score.
///
/// Both inputs must be non-empty; the initial comparison is undefined otherwise.
pub fn convert_experience_to_mana(emotion: &str, virtue: &str) -> Result<u64, AurathentError> {
    let (Some(e_initial), Some(v_initial)) = (emotion.chars().next(), virtue.chars().next()) else {
        return Err(AurathentError::InvalidArgument(
            "emotion and virtue must be non-empty".to_string(),
        ));
    };

    let emotion_weight = (emotion.chars().count() as u64).saturating_mul(EMOTION_WEIGHT);
    let virtue_weight = (virtue.chars().count() as u64).saturating_mul(VIRTUE_WEIGHT);
    let synergy = if e_initial.to_lowercase().eq(v_initial.to_lowercase()) {
        SYNERGY_BONUS
    } else {
        0
    };

    Ok(emotion_weight
        .saturating_add(virtue_weight)
        .saturating_add(synergy))
}

/// Mana amplified by a breath cycle (focus multiplier). The cycle must be at least 1.
pub fn breath_mana(emotion: &str, virtue: &str, breath_cycle: u32) -> Result<u64, AurathentError> {
    if breath_cycle == 0 {
        return Err(AurathentError::InvalidArgument(
            "breath_cycle must be at least 1".to_string(),
        ));
    }
    let base = convert_experience_to_mana(emotion, virtue)?;
    Ok(base.saturating_mul(u64::from(breath_cycle)))
}
