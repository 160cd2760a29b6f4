//! # Aura Tiering (Phoenix Eye)
//!
//! Maps a mana value onto four half-open bands:
//!
//! | Mana            | Tier          | Score |
//! |-----------------|---------------|-------|
//! | `< 50`          | Dormant       | 0     |
//! | `[50, 100)`     | Kindled       | 1     |
//! | `[100, 150)`    | Ascending     | 2     |
//! | `>= 150`        | Phoenix Phase | 3     |
//!
//! Only the last band is `evolved`. The `phoenix_eye` log entry is written by
//! [`Engine`](crate::Engine), not here.

use crate::primitives::{
    ASCENDING_THRESHOLD, KINDLED_THRESHOLD, NO_MEMORY_REFERENCE, PHOENIX_THRESHOLD,
};
use crate::{AuraResult, AuraTier};

/// Band a mana value falls into.
#[must_use]
pub fn tier_for(mana: f64) -> AuraTier {
    if mana >= PHOENIX_THRESHOLD {
        AuraTier::PhoenixPhase
    } else if mana >= ASCENDING_THRESHOLD {
        AuraTier::Ascending
    } else if mana >= KINDLED_THRESHOLD {
        AuraTier::Kindled
    } else {
        AuraTier::Dormant
    }
}

/// Classify mana into an aura tier, passing the memory tag through.
#[must_use]
pub fn detect_aura_shift(mana: f64, memory_tag: Option<&str>) -> AuraResult {
    let aura_tier = tier_for(mana);
    AuraResult {
        aura_tier,
        tier_score: aura_tier.score(),
        evolved: aura_tier == AuraTier::PhoenixPhase,
        memory_reference: memory_tag.unwrap_or(NO_MEMORY_REFERENCE).to_string(),
    }
}
