//! # Property-Based Tests
//!
//! Invariants of the derivation functions, checked with proptest.

use aurathent_core::aura::tier_for;
use aurathent_core::humor::validate_humor_paradox;
use aurathent_core::paradox::evaluate_paradox;
use aurathent_core::primitives::{DUALITY_INDEX_RANGE, PLAIN_INDEX_RANGE};
use aurathent_core::{
    AuraTier, bind_hope_chain, convert_experience_to_mana, detect_aura_shift, trigger_lapis_event,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Reference formula, written out longhand.
fn expected_mana(emotion: &str, virtue: &str) -> u64 {
    let e_first = emotion.chars().next().map(|c| c.to_lowercase().to_string());
    let v_first = virtue.chars().next().map(|c| c.to_lowercase().to_string());
    let bonus = if e_first == v_first { 10 } else { 0 };
    3 * emotion.chars().count() as u64 + 5 * virtue.chars().count() as u64 + bonus
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Mana follows the weighted length formula for any non-empty pair.
    #[test]
    fn mana_matches_formula(emotion in "[a-zA-Z]{1,24}", virtue in "[a-zA-Z]{1,24}") {
        let mana = convert_experience_to_mana(&emotion, &virtue).expect("non-empty");
        prop_assert_eq!(mana, expected_mana(&emotion, &virtue));
    }

    /// Tier score never decreases as mana grows.
    #[test]
    fn aura_is_monotonic(a in 0.0f64..400.0, b in 0.0f64..400.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_result = detect_aura_shift(low, None);
        let high_result = detect_aura_shift(high, None);
        prop_assert!(low_result.tier_score <= high_result.tier_score);
    }

    /// Evolved iff score 3 iff mana >= 150.
    #[test]
    fn evolved_iff_phoenix(mana in 0.0f64..400.0) {
        let result = detect_aura_shift(mana, Some("tag"));
        prop_assert_eq!(result.evolved, result.tier_score == 3);
        prop_assert_eq!(result.evolved, mana >= 150.0);
        prop_assert_eq!(result.aura_tier == AuraTier::PhoenixPhase, result.evolved);
        prop_assert_eq!(tier_for(mana), result.aura_tier);
    }

    /// Swapping emotion and virtue does not change the paradox level.
    #[test]
    fn paradox_is_symmetric(
        a in prop::sample::select(vec!["fear", "courage", "anger", "forgiveness", "pride", "humility", "joy"]),
        b in prop::sample::select(vec!["fear", "courage", "anger", "forgiveness", "pride", "humility", "joy"]),
    ) {
        prop_assert_eq!(evaluate_paradox(a, b), evaluate_paradox(b, a));
    }

    /// Lapis fires exactly when the virtue is in the lapis set.
    #[test]
    fn lapis_ignores_context(virtue in "[a-z]{1,12}", tag in prop::option::of("[a-z]{1,12}")) {
        let trigger = trigger_lapis_event(&virtue, tag.as_deref());
        prop_assert_eq!(trigger.triggered, trigger.virtue_match);
    }

    /// Nourishment never drops below 1.
    #[test]
    fn nourishment_floor(fatigue in -20i64..40) {
        let binding = bind_hope_chain("grief", "faith", fatigue);
        prop_assert!(binding.nourishment_level >= 1);
        prop_assert_eq!(binding.nourishment_level, (10 - fatigue).max(1));
    }

    /// The humor index always lands in the band picked by keyword detection.
    #[test]
    fn humor_index_in_range(content in ".{0,40}", seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let reading = validate_humor_paradox(&content, &mut rng);
        let (low, high) = if reading.paradox_resolved {
            DUALITY_INDEX_RANGE
        } else {
            PLAIN_INDEX_RANGE
        };
        prop_assert!(reading.humor_index >= low && reading.humor_index <= high);
    }
}
