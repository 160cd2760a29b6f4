//! # Laughter Filter
//!
//! Humor analysis in two layers:
//! - [`validate_humor_paradox`]: keyword duality detection with a randomized index
//! - [`validate_humor_signal`]: deterministic authenticity scoring
//!
//! The humor index is the only non-deterministic output in the crate. Callers
//! inject the RNG so tests can seed it; assert on the range, never the value.

use crate::primitives::{
    ALIGNED_HUMOR_EMOTIONS, DEFAULT_HUMOR_MEANING, DUALITY_INDEX_RANGE, HUMOR_KEYWORDS,
    HUMOR_MEANINGS, PLAIN_INDEX_RANGE,
};
use crate::{HumorReading, HumorSignal};
use rand::Rng;

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Detect paradox and duality layers in a humor input.
pub fn validate_humor_paradox<R: Rng + ?Sized>(content: &str, rng: &mut R) -> HumorReading {
    let lowered = content.to_lowercase();
    let duality_found = HUMOR_KEYWORDS.iter().any(|k| lowered.contains(k));

    let meaning = HUMOR_MEANINGS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, meaning)| *meaning)
        .unwrap_or(DEFAULT_HUMOR_MEANING);

    let (low, high) = if duality_found {
        DUALITY_INDEX_RANGE
    } else {
        PLAIN_INDEX_RANGE
    };

    HumorReading {
        humor_index: round2(rng.gen_range(low..=high)),
        meaning: meaning.to_string(),
        paradox_resolved: duality_found,
    }
}

/// Score whether a humor input reads as authentic or as a coping mask.
#[must_use]
pub fn validate_humor_signal(joke_text: &str, emotion_context: &str) -> HumorSignal {
    let lowered = joke_text.to_lowercase();
    let has_irony = lowered.contains("not") || lowered.contains("unless");
    let emotional_alignment =
        ALIGNED_HUMOR_EMOTIONS.contains(&emotion_context.to_lowercase().as_str());

    let mut score = 0u8;
    if joke_text.trim().chars().count() > 20 {
        score += 1;
    }
    if has_irony {
        score += 1;
    }
    if emotional_alignment {
        score += 2;
    }

    let (quality, essence) = if score >= 3 {
        ("authentic", "clarity-signal")
    } else {
        ("hollow", "masking-echo")
    };

    HumorSignal {
        humor_quality: quality.to_string(),
        symbolic_essence: essence.to_string(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn because_has_priority_meaning() {
        let mut rng = StdRng::seed_from_u64(7);
        let reading = validate_humor_paradox("A loop exists because it does", &mut rng);
        assert_eq!(
            reading.meaning,
            "The logic explains itself\u{2014}mirroring causality."
        );
        assert!(reading.paradox_resolved);
        assert!((0.5..=0.95).contains(&reading.humor_index));
    }

    #[test]
    fn why_resolves_with_default_meaning() {
        let mut rng = StdRng::seed_from_u64(1);
        let reading = validate_humor_paradox("Why though", &mut rng);
        assert!(reading.paradox_resolved);
        assert_eq!(reading.meaning, DEFAULT_HUMOR_MEANING);
    }

    #[test]
    fn plain_content_low_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let reading = validate_humor_paradox("a pun about bread", &mut rng);
            assert!(!reading.paradox_resolved);
            assert!((0.1..=0.4).contains(&reading.humor_index));
        }
    }

    #[test]
    fn index_has_two_decimals() {
        let mut rng = StdRng::seed_from_u64(3);
        let reading = validate_humor_paradox("knock knock", &mut rng);
        assert_eq!(round2(reading.humor_index), reading.humor_index);
    }

    #[test]
    fn authentic_signal() {
        let signal = validate_humor_signal("I am not late unless the clock is early", "joy");
        assert_eq!(signal.score, 4);
        assert_eq!(signal.humor_quality, "authentic");
        assert_eq!(signal.symbolic_essence, "clarity-signal");
    }

    #[test]
    fn hollow_signal() {
        let signal = validate_humor_signal("ha", "grief");
        assert_eq!(signal.score, 0);
        assert_eq!(signal.humor_quality, "hollow");
    }
}
