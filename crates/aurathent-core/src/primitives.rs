//! # Innate Primitives
//!
//! Fixed tables and thresholds for the Aurathent derivations.
//!
//! Every engine in this crate is a pure function over one of these tables or
//! a linear formula. They are compiled into the binary and immutable at runtime.

// =============================================================================
// MANA WEIGHTS
// =============================================================================

/// Weight applied per character of the emotion.
pub const EMOTION_WEIGHT: u64 = 3;

/// Weight applied per character of the virtue.
pub const VIRTUE_WEIGHT: u64 = 5;

/// Bonus when emotion and virtue share a first letter (case-insensitive).
pub const SYNERGY_BONUS: u64 = 10;

// =============================================================================
// AURA BANDS (lower bound inclusive)
// =============================================================================

pub const KINDLED_THRESHOLD: f64 = 50.0;
pub const ASCENDING_THRESHOLD: f64 = 100.0;
pub const PHOENIX_THRESHOLD: f64 = 150.0;

/// Memory reference used when no tag is supplied.
pub const NO_MEMORY_REFERENCE: &str = "none";

// =============================================================================
// LAPIS
// =============================================================================

pub const LAPIS_VIRTUES: [&str; 5] = ["truth", "sacrifice", "wisdom", "insight", "reverence"];

pub const AMPLIFIED_CONTEXTS: [&str; 5] = ["death", "destiny", "origin", "betrayal", "childhood"];

// =============================================================================
// PARADOX
// =============================================================================

/// (emotion, virtue) -> (level, flame). Checked in both orderings.
pub const FLAME_TABLE: [(&str, &str, u8, &str); 5] = [
    ("fear", "courage", 5, "Black Flame of Insight"),
    ("anger", "forgiveness", 4, "Crimson Wreath"),
    ("grief", "joy", 3, "Ashen Blossom"),
    ("envy", "gratitude", 4, "Emerald Flicker"),
    ("pride", "humility", 5, "Ivory Fire"),
];

pub const DEFAULT_FLAME: (u8, &str) = (1, "Dim Spark");

/// (virtue, emotion) -> description. Checked in both orderings.
pub const PARADOX_DESCRIPTIONS: [(&str, &str, &str); 7] = [
    ("compassion", "anger", "Forgiveness inside rage births growth."),
    ("truth", "fear", "Courage to reveal what is hidden."),
    ("wisdom", "grief", "Loss is the tutor of insight."),
    ("honor", "shame", "Integrity tested by failure yields purity."),
    ("fear", "courage", "Fear faced with courage creates transformation."),
    ("pride", "humility", "Pride restrained by humility reveals divinity."),
    ("envy", "gratitude", "Gratitude dissolves the green fog of envy."),
];

// =============================================================================
// HOPE CHAIN (wheat binder)
// =============================================================================

pub const HOPE_VIRTUES: [&str; 5] = ["faith", "perseverance", "humility", "renewal", "compassion"];

pub const REGENERATIVE_EMOTIONS: [&str; 4] = ["grief", "patience", "yearning", "loneliness"];

/// Ceiling the fatigue level is subtracted from.
pub const NOURISHMENT_CEILING: i64 = 10;

/// Fatigue assumed by the logic router when the caller gives none.
pub const DEFAULT_FATIGUE: i64 = 3;

pub const HOPE_SYMBOL: &str = "\u{1F33E}";

pub const HOPE_ANCHORS: [(&str, &str); 4] = [
    ("trial", "Hope sealed in hardship."),
    ("reflection", "A seed of light remains."),
    ("loss", "Hope hidden in ashes."),
    ("joy", "Golden wheat bound to aura."),
];

pub const DEFAULT_HOPE_ANCHOR: &str = "Hope layered over shadow.";

// =============================================================================
// HUMOR
// =============================================================================

pub const HUMOR_KEYWORDS: [&str; 7] = [
    "why",
    "because",
    "walks into",
    "knock",
    "loop",
    "absurd",
    "existential",
];

/// Meaning by keyword, in priority order.
pub const HUMOR_MEANINGS: [(&str, &str); 5] = [
    ("because", "The logic explains itself\u{2014}mirroring causality."),
    ("walks into", "Physical meets symbolic; humor from displacement."),
    ("knock", "Threshold logic\u{2014}question becomes door."),
    ("loop", "Circular paradox\u{2014}humor from self-reference."),
    ("existential", "The joke probes the void with a grin."),
];

pub const DEFAULT_HUMOR_MEANING: &str = "This joke dances at the edge of contradiction.";

pub const DUALITY_INDEX_RANGE: (f64, f64) = (0.5, 0.95);
pub const PLAIN_INDEX_RANGE: (f64, f64) = (0.1, 0.4);

pub const ALIGNED_HUMOR_EMOTIONS: [&str; 3] = ["joy", "surprise", "relief"];

// =============================================================================
// STORES
// =============================================================================

/// Default bound for recent-memory queries.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Owner used by the HTTP boundary when a request carries no user id.
pub const ANONYMOUS_OWNER: &str = "default_user";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length in bytes of a name-like field (ids, emotions, virtues, tags).
pub const MAX_FIELD_LENGTH: usize = 256;

/// Maximum length in bytes of a free-text field (humor content, notes, insights).
pub const MAX_TEXT_LENGTH: usize = 16 * 1024;

/// Maximum number of tags on one memory event.
pub const MAX_TAGS: usize = 32;
