//! # Core Type Definitions
//!
//! This module contains the typed records produced by the derivation
//! functions and held by the symbolic stores:
//! - Derivation results (`AuraResult`, `LapisTrigger`, `ParadoxResult`, `HopeBinding`, ...)
//! - Store records (`LogEntry`, `VirtueProfile`, `MemoryRecord`, `TransmutationRecord`, `ChronoEvent`)
//! - Error types (`AurathentError`)
//!
//! ## Persistence Note
//!
//! Records that land in the redb tables are encoded with postcard, which does
//! not support self-describing formats. Keep these types free of
//! `skip_serializing_if`, `flatten` and internally tagged enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// DERIVATION INPUT
// =============================================================================

/// Per-request input to the derivation pipeline. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DerivationInput {
    pub emotion: String,
    pub virtue: String,
    pub memory_tag: Option<String>,
    /// Focus multiplier, at least 1 when present.
    pub breath_cycle: Option<u32>,
    /// Expected in 0..=10.
    pub fatigue_level: Option<i64>,
}

impl DerivationInput {
    /// Input carrying just an emotion and a virtue.
    #[must_use]
    pub fn new(emotion: impl Into<String>, virtue: impl Into<String>) -> Self {
        Self {
            emotion: emotion.into(),
            virtue: virtue.into(),
            ..Self::default()
        }
    }

    /// Attach a memory tag.
    #[must_use]
    pub fn with_memory_tag(mut self, tag: impl Into<String>) -> Self {
        self.memory_tag = Some(tag.into());
        self
    }

    /// Attach a breath cycle.
    #[must_use]
    pub fn with_breath_cycle(mut self, cycle: u32) -> Self {
        self.breath_cycle = Some(cycle);
        self
    }
}

// =============================================================================
// AURA
// =============================================================================

/// One of the four ordered aura bands derived from mana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuraTier {
    Dormant,
    Kindled,
    Ascending,
    #[serde(rename = "Phoenix Phase")]
    PhoenixPhase,
}

impl AuraTier {
    /// Ordinal score of the tier, 0 through 3.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Dormant => 0,
            Self::Kindled => 1,
            Self::Ascending => 2,
            Self::PhoenixPhase => 3,
        }
    }

    /// Display name as it appears on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dormant => "Dormant",
            Self::Kindled => "Kindled",
            Self::Ascending => "Ascending",
            Self::PhoenixPhase => "Phoenix Phase",
        }
    }
}

impl fmt::Display for AuraTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of mapping a mana value onto the aura bands.
///
/// `evolved` is true exactly when `tier_score == 3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraResult {
    pub aura_tier: AuraTier,
    pub tier_score: u8,
    pub evolved: bool,
    /// The caller's memory tag, or the literal `"none"`.
    pub memory_reference: String,
}

// =============================================================================
// LAPIS / PARADOX / HOPE
// =============================================================================

/// Outcome of the lapis (divine) trigger check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapisTrigger {
    pub triggered: bool,
    pub virtue_match: bool,
    /// Reported only. It never changes `triggered` on its own.
    pub amplified_context: bool,
    pub virtue: String,
    pub memory_tag: String,
}

/// Merged output of the flame and description paradox tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParadoxResult {
    pub level: u8,
    pub flame: String,
    pub paradox: bool,
    pub description: String,
}

/// Hope-chain (wheat binder) result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopeBinding {
    pub hope_thread: bool,
    pub nourishment_level: i64,
    pub symbol: Option<String>,
    pub message: String,
}

/// Fallback hope binding keyed by a memory tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopeAnchor {
    pub binding: String,
    pub message: String,
    pub tag: String,
}

// =============================================================================
// HUMOR
// =============================================================================

/// Paradox reading of a humor input. `humor_index` is randomized per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumorReading {
    pub humor_index: f64,
    pub meaning: String,
    pub paradox_resolved: bool,
}

/// Authenticity classification of a humor input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumorSignal {
    pub humor_quality: String,
    pub symbolic_essence: String,
    pub score: u8,
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Typed payload of a log entry, one variant per emitting operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDetails {
    PhoenixEye {
        mana: f64,
        aura: AuraResult,
    },
    LapisIndex(LapisTrigger),
    CoreSanctifier {
        user: String,
        emotion: String,
        virtue: String,
        mana: u64,
        aura: AuraResult,
        lapis: bool,
    },
    LogicProcess {
        virtue: String,
        emotion: String,
        memory_tag: String,
        aura: AuraResult,
    },
    VirtueUpdate {
        user: String,
        virtue: String,
        new_level: u64,
    },
    ChronoSynth {
        emotion: String,
        intensity: f64,
    },
    MemoryAnchor {
        event_type: String,
        tags: Vec<String>,
    },
    LaughterFilter {
        humor_index: f64,
        paradox_resolved: bool,
    },
}

impl fmt::Display for EventDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhoenixEye { mana, aura } => {
                write!(f, "mana={} tier={}", mana, aura.aura_tier)
            }
            Self::LapisIndex(trigger) => write!(
                f,
                "virtue={} triggered={} amplified={}",
                trigger.virtue, trigger.triggered, trigger.amplified_context
            ),
            Self::CoreSanctifier {
                user,
                emotion,
                virtue,
                mana,
                aura,
                lapis,
            } => write!(
                f,
                "user={} emotion={} virtue={} mana={} tier={} lapis={}",
                user, emotion, virtue, mana, aura.aura_tier, lapis
            ),
            Self::LogicProcess {
                virtue,
                emotion,
                memory_tag,
                aura,
            } => write!(
                f,
                "virtue={} emotion={} memory={} tier={}",
                virtue, emotion, memory_tag, aura.aura_tier
            ),
            Self::VirtueUpdate {
                user,
                virtue,
                new_level,
            } => write!(f, "user={} virtue={} new_level={}", user, virtue, new_level),
            Self::ChronoSynth { emotion, intensity } => {
                write!(f, "emotion={} intensity={}", emotion, intensity)
            }
            Self::MemoryAnchor { event_type, tags } => {
                write!(f, "event_type={} tags={:?}", event_type, tags)
            }
            Self::LaughterFilter {
                humor_index,
                paradox_resolved,
            } => write!(f, "humor_index={} resolved={}", humor_index, paradox_resolved),
        }
    }
}

/// One append-only event log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub details: EventDetails,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn now(event: impl Into<String>, details: EventDetails) -> Self {
        Self {
            event: event.into(),
            timestamp: Utc::now(),
            details,
        }
    }
}

// =============================================================================
// VIRTUE PROFILE
// =============================================================================

/// Per-user accumulating virtue counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtueProfile {
    pub user_id: String,
    pub virtues: BTreeMap<String, u64>,
    pub last_updated: DateTime<Utc>,
}

impl VirtueProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            virtues: BTreeMap::new(),
            last_updated: now,
        }
    }

    /// Increment one virtue by exactly 1 and return its new count.
    pub fn increment(&mut self, virtue: &str, now: DateTime<Utc>) -> u64 {
        let count = self.virtues.entry(virtue.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        self.last_updated = now;
        *count
    }

    /// Sum of all virtue counts.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.virtues
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// Snapshot including the derived score.
    #[must_use]
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            user_id: self.user_id.clone(),
            virtues: self.virtues.clone(),
            score: self.score(),
            last_updated: self.last_updated,
        }
    }
}

/// Virtue profile plus its aggregate score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub user_id: String,
    pub virtues: BTreeMap<String, u64>,
    pub score: u64,
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// MEMORY / TRANSMUTATION / TIMELINE
// =============================================================================

/// Free-form annotated memory fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub emotion: String,
    pub virtue: String,
    pub note: String,
    pub timestamp: DateTime<Utc>,
    pub intensity: Option<f64>,
    pub event_type: Option<String>,
}

/// Finalized transmutation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmutationRecord {
    pub timestamp: DateTime<Utc>,
    pub emotion: String,
    pub virtue: String,
    /// Rounded to 2 decimal places.
    pub mana: f64,
    pub aura_tier: AuraTier,
    pub class_shift: bool,
    pub memory_reference: String,
    pub lapis_triggered: bool,
}

/// What happened at a point on the chrono timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChronoKind {
    Emotion {
        emotion: String,
        intensity: f64,
    },
    Memory {
        event_type: String,
        tags: Vec<String>,
        emotion: String,
        intensity: f64,
        insight: Option<String>,
    },
}

/// Timestamped timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronoEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: ChronoKind,
}

/// Timeline reference returned when a memory is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronoSync {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub tags: Vec<String>,
    pub insight: Option<String>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Aurathent engine.
///
/// The core never panics; every failure is a value the app maps to a status.
#[derive(Debug, Error)]
pub enum AurathentError {
    /// A derivation received input it cannot operate on.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A record that must be attributed was given no owner.
    #[error("User ID must be provided for transmutation logging")]
    MissingOwner,

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_scores_are_ordered() {
        let tiers = [
            AuraTier::Dormant,
            AuraTier::Kindled,
            AuraTier::Ascending,
            AuraTier::PhoenixPhase,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].score() < pair[1].score());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn phoenix_phase_display_name() {
        assert_eq!(AuraTier::PhoenixPhase.to_string(), "Phoenix Phase");
    }

    #[test]
    fn profile_increment_and_score() {
        let now = Utc::now();
        let mut profile = VirtueProfile::new("alpha01", now);

        assert_eq!(profile.increment("honor", now), 1);
        assert_eq!(profile.increment("honor", now), 2);
        assert_eq!(profile.increment("truth", now), 1);

        let snapshot = profile.snapshot();
        assert_eq!(snapshot.score, 3);
        assert_eq!(snapshot.virtues.get("honor"), Some(&2));
    }

    #[test]
    fn empty_profile_scores_zero() {
        let profile = VirtueProfile::new("nobody", Utc::now());
        assert_eq!(profile.score(), 0);
    }

    #[test]
    fn records_round_trip_through_postcard() {
        let entry = LogEntry::now(
            "virtue_update",
            EventDetails::VirtueUpdate {
                user: "alpha01".to_string(),
                virtue: "honor".to_string(),
                new_level: 4,
            },
        );
        let bytes = postcard::to_allocvec(&entry).expect("encode");
        let decoded: LogEntry = postcard::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded, entry);
    }
}
