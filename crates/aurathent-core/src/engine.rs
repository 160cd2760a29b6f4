//! # Engine Module
//!
//! The composition layer: each public operation runs a fixed sequence of
//! derivations and records its outcome in the symbolic stores.
//!
//! ## Storage Backends
//!
//! Engine supports two storage backends:
//! - `InMemory`: Uses [`InMemoryStore`] (fast, volatile)
//! - `Persistent`: Uses [`RedbStore`] for disk-backed ACID storage
//!
//! Every operation takes an explicit owner key. Resolving an absent user id
//! to [`ANONYMOUS_OWNER`](crate::primitives::ANONYMOUS_OWNER) is the caller's job.
//!
//! Log appends are not transactional with the rest of a flow: if a later
//! step fails, entries written by earlier steps stay in place.

use crate::aura::detect_aura_shift;
use crate::hope::{bind_hope_chain, bind_hope_to_memory};
use crate::humor::{round2, validate_humor_paradox, validate_humor_signal};
use crate::lapis::trigger_lapis_event;
use crate::mana::{breath_mana, convert_experience_to_mana};
use crate::paradox::resolve_paradox_chain;
use crate::store::{self, InMemoryStore, RedbStore, SymbolicStore};
use crate::{
    AuraResult, AurathentError, ChronoEvent, ChronoKind, ChronoSync, DerivationInput,
    EventDetails, HopeAnchor, HopeBinding, HumorReading, HumorSignal, LogEntry, MemoryRecord,
    ParadoxResult, ProfileSnapshot, TransmutationRecord,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Storage backend for an Engine.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory maps (fast, volatile).
    InMemory(InMemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(InMemoryStore::new())
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Result of the breath-log (sanctify) flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sanctified {
    pub timestamp: DateTime<Utc>,
    pub mana: u64,
    pub aura_result: AuraResult,
    pub lapis_triggered: bool,
}

/// Result of the plain transmute flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmutation {
    pub mana: u64,
    pub aura_result: AuraResult,
    pub lapis_triggered: bool,
}

/// Result of the logic-process flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicOutcome {
    pub mana: u64,
    pub aura_result: AuraResult,
    pub insight: ParadoxResult,
    pub memory_binding: HopeBinding,
    pub hope_anchor: HopeAnchor,
}

/// Result of anchoring a memory event on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryAnchor {
    pub chrono_sync: ChronoSync,
    pub record: MemoryRecord,
}

/// Result of a virtue affinity update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtueOutcome {
    pub new_level: u64,
    pub updated_profile: ProfileSnapshot,
    pub aura: AuraResult,
}

/// Fields of a memory event before it is anchored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryEvent {
    pub event_type: String,
    pub tags: Vec<String>,
    pub emotion: String,
    pub intensity: f64,
    pub insight: Option<String>,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Runs composed flows against one storage backend.
///
/// Engine does not implement Clone; the redb handle cannot be shared that way.
/// The app wraps it in `Arc<RwLock<_>>`, which serializes mutations.
#[derive(Debug, Default)]
pub struct Engine {
    backend: StorageBackend,
}

impl Engine {
    /// Create an engine with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with persistent redb storage at `path`.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, AurathentError> {
        let redb = RedbStore::open(path)?;
        Ok(Self {
            backend: StorageBackend::Persistent(redb),
        })
    }

    /// Check if this engine is backed by persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    fn store(&self) -> &dyn SymbolicStore {
        match &self.backend {
            StorageBackend::InMemory(mem) => mem,
            StorageBackend::Persistent(redb) => redb,
        }
    }

    fn store_mut(&mut self) -> &mut dyn SymbolicStore {
        match &mut self.backend {
            StorageBackend::InMemory(mem) => mem,
            StorageBackend::Persistent(redb) => redb,
        }
    }

    fn log(&mut self, owner: &str, event: &str, details: EventDetails) -> Result<(), AurathentError> {
        self.store_mut()
            .append_event(owner, LogEntry::now(event, details))
    }

    /// Aura detection with its `phoenix_eye` side effect.
    fn observe_aura(
        &mut self,
        owner: &str,
        mana: f64,
        memory_tag: Option<&str>,
    ) -> Result<AuraResult, AurathentError> {
        let aura = detect_aura_shift(mana, memory_tag);
        self.log(
            owner,
            "phoenix_eye",
            EventDetails::PhoenixEye {
                mana,
                aura: aura.clone(),
            },
        )?;
        Ok(aura)
    }

    /// Lapis check with its `lapis_index` side effect.
    fn observe_lapis(
        &mut self,
        owner: &str,
        virtue: &str,
        memory_tag: Option<&str>,
    ) -> Result<bool, AurathentError> {
        let trigger = trigger_lapis_event(virtue, memory_tag);
        let triggered = trigger.triggered;
        self.log(owner, "lapis_index", EventDetails::LapisIndex(trigger))?;
        Ok(triggered)
    }

    // =========================================================================
    // WRITE FLOWS
    // =========================================================================

    /// Breath-log flow: breath mana, aura, lapis, then a transmutation record.
    ///
    /// `breath_cycle` defaults to 1. An owner is required for the record.
    pub fn sanctify(
        &mut self,
        owner: &str,
        input: &DerivationInput,
    ) -> Result<Sanctified, AurathentError> {
        if owner.is_empty() {
            return Err(AurathentError::MissingOwner);
        }
        let memory_tag = input.memory_tag.as_deref();
        let mana = breath_mana(&input.emotion, &input.virtue, input.breath_cycle.unwrap_or(1))?;
        let aura_result = self.observe_aura(owner, mana as f64, memory_tag)?;
        let lapis_triggered = self.observe_lapis(owner, &input.virtue, memory_tag)?;

        let record = TransmutationRecord {
            timestamp: Utc::now(),
            emotion: input.emotion.clone(),
            virtue: input.virtue.clone(),
            mana: round2(mana as f64),
            aura_tier: aura_result.aura_tier,
            class_shift: aura_result.evolved,
            memory_reference: aura_result.memory_reference.clone(),
            lapis_triggered,
        };
        let timestamp = record.timestamp;
        self.store_mut().append_transmutation(owner, record)?;

        self.log(
            owner,
            "core_sanctifier",
            EventDetails::CoreSanctifier {
                user: owner.to_string(),
                emotion: input.emotion.clone(),
                virtue: input.virtue.clone(),
                mana,
                aura: aura_result.clone(),
                lapis: lapis_triggered,
            },
        )?;

        Ok(Sanctified {
            timestamp,
            mana,
            aura_result,
            lapis_triggered,
        })
    }

    /// Plain transmutation: mana, aura and lapis. Nothing is recorded beyond logs.
    pub fn transmute(
        &mut self,
        owner: &str,
        emotion: &str,
        virtue: &str,
        memory: Option<&str>,
    ) -> Result<Transmutation, AurathentError> {
        let mana = convert_experience_to_mana(emotion, virtue)?;
        let aura_result = self.observe_aura(owner, mana as f64, memory)?;
        let lapis_triggered = self.observe_lapis(owner, virtue, memory)?;
        Ok(Transmutation {
            mana,
            aura_result,
            lapis_triggered,
        })
    }

    /// Logic router: mana, aura, paradox insight and the hope bindings.
    pub fn process_logic(
        &mut self,
        owner: &str,
        virtue: &str,
        emotion: &str,
        memory: &str,
        fatigue_level: i64,
    ) -> Result<LogicOutcome, AurathentError> {
        let mana = convert_experience_to_mana(emotion, virtue)?;
        let aura_result = self.observe_aura(owner, mana as f64, Some(memory))?;
        let insight = resolve_paradox_chain(virtue, emotion);
        let memory_binding = bind_hope_chain(emotion, virtue, fatigue_level);
        let hope_anchor = bind_hope_to_memory(memory);

        self.log(
            owner,
            "logic_process",
            EventDetails::LogicProcess {
                virtue: virtue.to_string(),
                emotion: emotion.to_string(),
                memory_tag: memory.to_string(),
                aura: aura_result.clone(),
            },
        )?;

        Ok(LogicOutcome {
            mana,
            aura_result,
            insight,
            memory_binding,
            hope_anchor,
        })
    }

    /// Append an emotion pulse to the timeline.
    pub fn log_emotion(
        &mut self,
        owner: &str,
        emotion: &str,
        intensity: f64,
    ) -> Result<ChronoEvent, AurathentError> {
        let event = ChronoEvent {
            timestamp: Utc::now(),
            kind: ChronoKind::Emotion {
                emotion: emotion.to_string(),
                intensity,
            },
        };
        self.store_mut().append_timeline(owner, event.clone())?;
        self.log(
            owner,
            "chrono_synth",
            EventDetails::ChronoSynth {
                emotion: emotion.to_string(),
                intensity,
            },
        )?;
        Ok(event)
    }

    /// Anchor a memory event on the timeline and store it as a memory record.
    ///
    /// The first tag becomes the record's virtue. The insight, when absent,
    /// is replaced by a generated note.
    pub fn log_memory(
        &mut self,
        owner: &str,
        event: MemoryEvent,
    ) -> Result<MemoryAnchor, AurathentError> {
        let Some(first_tag) = event.tags.first().cloned() else {
            return Err(AurathentError::InvalidArgument(
                "memory events need at least one tag".to_string(),
            ));
        };
        let timestamp = Utc::now();

        self.store_mut().append_timeline(
            owner,
            ChronoEvent {
                timestamp,
                kind: ChronoKind::Memory {
                    event_type: event.event_type.clone(),
                    tags: event.tags.clone(),
                    emotion: event.emotion.clone(),
                    intensity: event.intensity,
                    insight: event.insight.clone(),
                },
            },
        )?;

        let note = event.insight.clone().unwrap_or_else(|| {
            format!(
                "{} with emotion {} and tags {:?}",
                event.event_type, event.emotion, event.tags
            )
        });
        let record = MemoryRecord {
            emotion: event.emotion.clone(),
            virtue: first_tag,
            note,
            timestamp,
            intensity: Some(event.intensity),
            event_type: Some(event.event_type.clone()),
        };
        self.store_mut().append_memory(owner, record.clone())?;

        self.log(
            owner,
            "memory_anchor",
            EventDetails::MemoryAnchor {
                event_type: event.event_type,
                tags: event.tags.clone(),
            },
        )?;

        Ok(MemoryAnchor {
            chrono_sync: ChronoSync {
                status: "anchored".to_string(),
                timestamp,
                tags: event.tags,
                insight: event.insight,
            },
            record,
        })
    }

    /// Store a free-form memory record.
    pub fn store_memory(
        &mut self,
        owner: &str,
        emotion: &str,
        virtue: &str,
        note: &str,
    ) -> Result<MemoryRecord, AurathentError> {
        let record = MemoryRecord {
            emotion: emotion.to_string(),
            virtue: virtue.to_string(),
            note: note.to_string(),
            timestamp: Utc::now(),
            intensity: None,
            event_type: None,
        };
        self.store_mut().append_memory(owner, record.clone())?;
        Ok(record)
    }

    /// Increment one virtue counter and log `virtue_update`. Returns the new count.
    pub fn update_virtue(&mut self, owner: &str, virtue: &str) -> Result<u64, AurathentError> {
        let new_level = self.store_mut().increment_virtue(owner, virtue, Utc::now())?;
        self.log(
            owner,
            "virtue_update",
            EventDetails::VirtueUpdate {
                user: owner.to_string(),
                virtue: virtue.to_string(),
                new_level,
            },
        )?;
        Ok(new_level)
    }

    /// Virtue update followed by an aura reading of the profile score.
    pub fn update_virtue_affinity(
        &mut self,
        owner: &str,
        virtue: &str,
    ) -> Result<VirtueOutcome, AurathentError> {
        let new_level = self.update_virtue(owner, virtue)?;
        let updated_profile = self.profile_snapshot(owner)?.ok_or_else(|| {
            AurathentError::IoError(format!("profile for {owner} vanished after update"))
        })?;
        let aura = self.observe_aura(owner, updated_profile.score as f64, Some(virtue))?;
        Ok(VirtueOutcome {
            new_level,
            updated_profile,
            aura,
        })
    }

    /// Humor paradox reading, logged as `laughter_filter`.
    pub fn analyze_humor(
        &mut self,
        owner: &str,
        content: &str,
    ) -> Result<HumorReading, AurathentError> {
        let reading = validate_humor_paradox(content, &mut rand::thread_rng());
        self.log(
            owner,
            "laughter_filter",
            EventDetails::LaughterFilter {
                humor_index: reading.humor_index,
                paradox_resolved: reading.paradox_resolved,
            },
        )?;
        Ok(reading)
    }

    /// Authenticity signal for a humor input. Writes nothing.
    #[must_use]
    pub fn humor_signal(&self, content: &str, emotion_context: &str) -> HumorSignal {
        validate_humor_signal(content, emotion_context)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// All log entries for an owner, in append order.
    pub fn events(&self, owner: &str) -> Result<Vec<LogEntry>, AurathentError> {
        self.store().events(owner)
    }

    /// Human-readable log lines for an owner.
    pub fn export_logs(&self, owner: &str) -> Result<Vec<String>, AurathentError> {
        Ok(store::export_logs(&self.events(owner)?))
    }

    /// Profile counts and score, or `None` if the owner never updated a virtue.
    pub fn profile_snapshot(&self, owner: &str) -> Result<Option<ProfileSnapshot>, AurathentError> {
        Ok(self.store().profile(owner)?.map(|p| p.snapshot()))
    }

    pub fn recent_memories(
        &self,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, AurathentError> {
        Ok(store::fetch_recent(self.store().memories(owner)?, limit))
    }

    pub fn memories_matching(
        &self,
        owner: &str,
        emotion: Option<&str>,
        virtue: Option<&str>,
    ) -> Result<Vec<MemoryRecord>, AurathentError> {
        Ok(store::fetch_by_emotion_virtue(
            self.store().memories(owner)?,
            emotion,
            virtue,
        ))
    }

    pub fn transmutation_history(
        &self,
        owner: &str,
    ) -> Result<Vec<TransmutationRecord>, AurathentError> {
        self.store().transmutations(owner)
    }

    pub fn transmutation_summary(&self, owner: &str) -> Result<Vec<String>, AurathentError> {
        Ok(store::summarize_transmutations(
            &self.transmutation_history(owner)?,
        ))
    }

    /// Seconds between the owner's last two timeline entries.
    pub fn loop_interval(&self, owner: &str) -> Result<Option<f64>, AurathentError> {
        Ok(store::loop_interval(&self.store().timeline(owner)?))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuraTier;

    fn event_names(engine: &Engine, owner: &str) -> Vec<String> {
        engine
            .events(owner)
            .expect("events")
            .into_iter()
            .map(|e| e.event)
            .collect()
    }

    #[test]
    fn new_engine_is_in_memory() {
        let engine = Engine::new();
        assert!(!engine.is_persistent());
        assert!(matches!(engine.backend(), StorageBackend::InMemory(_)));
    }

    #[test]
    fn sanctify_records_and_logs() {
        let mut engine = Engine::new();
        let input = DerivationInput::new("awe", "truth").with_breath_cycle(2);

        let outcome = engine.sanctify("alpha01", &input).expect("sanctify");
        assert_eq!(outcome.mana, 68);
        assert_eq!(outcome.aura_result.aura_tier, AuraTier::Kindled);
        assert!(outcome.lapis_triggered);

        assert_eq!(
            event_names(&engine, "alpha01"),
            ["phoenix_eye", "lapis_index", "core_sanctifier"]
        );
        let history = engine.transmutation_history("alpha01").expect("history");
        assert_eq!(history.len(), 1);
        assert!((history[0].mana - 68.0).abs() < f64::EPSILON);
        assert_eq!(history[0].timestamp, outcome.timestamp);
    }

    #[test]
    fn sanctify_without_owner_fails() {
        let mut engine = Engine::new();
        let input = DerivationInput::new("awe", "truth");
        assert!(matches!(
            engine.sanctify("", &input),
            Err(AurathentError::MissingOwner)
        ));
    }

    #[test]
    fn sanctify_rejects_zero_breath() {
        let mut engine = Engine::new();
        let input = DerivationInput::new("awe", "truth").with_breath_cycle(0);
        assert!(engine.sanctify("alpha01", &input).is_err());
        assert!(engine.events("alpha01").expect("events").is_empty());
    }

    #[test]
    fn transmute_logs_aura_and_lapis() {
        let mut engine = Engine::new();
        let outcome = engine
            .transmute("alpha01", "joy", "wisdom", Some("origin"))
            .expect("transmute");
        assert_eq!(outcome.mana, 39);
        assert_eq!(outcome.aura_result.memory_reference, "origin");
        assert!(outcome.lapis_triggered);
        assert_eq!(event_names(&engine, "alpha01"), ["phoenix_eye", "lapis_index"]);
        assert!(engine.transmutation_history("alpha01").expect("history").is_empty());
    }

    #[test]
    fn transmute_empty_emotion_is_error() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.transmute("alpha01", "", "truth", None),
            Err(AurathentError::InvalidArgument(_))
        ));
    }

    #[test]
    fn logic_process_merges_insight_and_hope() {
        let mut engine = Engine::new();
        let outcome = engine
            .process_logic("alpha01", "courage", "fear", "trial", 3)
            .expect("logic");
        assert_eq!(outcome.insight.level, 5);
        assert!(outcome.insight.paradox);
        assert!(!outcome.memory_binding.hope_thread);
        assert_eq!(outcome.hope_anchor.message, "Hope sealed in hardship.");
        assert_eq!(event_names(&engine, "alpha01"), ["phoenix_eye", "logic_process"]);
    }

    #[test]
    fn virtue_updates_count_by_one() {
        let mut engine = Engine::new();
        let first = engine.update_virtue_affinity("alpha01", "honor").expect("first");
        let second = engine.update_virtue_affinity("alpha01", "honor").expect("second");
        engine.update_virtue_affinity("alpha01", "truth").expect("third");

        assert_eq!(first.new_level, 1);
        assert_eq!(second.new_level, 2);
        let snapshot = engine
            .profile_snapshot("alpha01")
            .expect("snapshot")
            .expect("profile exists");
        assert_eq!(snapshot.score, 3);
        assert_eq!(second.aura.memory_reference, "honor");
        assert_eq!(
            event_names(&engine, "alpha01")[..2],
            ["virtue_update", "phoenix_eye"]
        );
    }

    #[test]
    fn unknown_profile_is_none() {
        let engine = Engine::new();
        assert!(engine.profile_snapshot("ghost").expect("snapshot").is_none());
    }

    #[test]
    fn memory_log_derives_record() {
        let mut engine = Engine::new();
        let anchor = engine
            .log_memory(
                "alpha01",
                MemoryEvent {
                    event_type: "dream".to_string(),
                    tags: vec!["hope".to_string(), "river".to_string()],
                    emotion: "awe".to_string(),
                    intensity: 2.0,
                    insight: None,
                },
            )
            .expect("memory");

        assert_eq!(anchor.record.virtue, "hope");
        assert_eq!(
            anchor.record.note,
            "dream with emotion awe and tags [\"hope\", \"river\"]"
        );
        assert_eq!(anchor.chrono_sync.tags.len(), 2);
        assert_eq!(event_names(&engine, "alpha01"), ["memory_anchor"]);
        assert_eq!(engine.memories_matching("alpha01", None, None).expect("all").len(), 1);
    }

    #[test]
    fn memory_log_without_tags_is_rejected() {
        let mut engine = Engine::new();
        let result = engine.log_memory(
            "alpha01",
            MemoryEvent {
                event_type: "dream".to_string(),
                ..MemoryEvent::default()
            },
        );
        assert!(result.is_err());
        assert!(engine.events("alpha01").expect("events").is_empty());
    }

    #[test]
    fn emotion_interval_needs_two_pulses() {
        let mut engine = Engine::new();
        engine.log_emotion("alpha01", "joy", 1.0).expect("first");
        assert_eq!(engine.loop_interval("alpha01").expect("interval"), None);
        engine.log_emotion("alpha01", "awe", 1.5).expect("second");
        let interval = engine
            .loop_interval("alpha01")
            .expect("interval")
            .expect("two pulses");
        assert!(interval >= 0.0);
    }

    #[test]
    fn humor_reading_is_logged() {
        let mut engine = Engine::new();
        let reading = engine
            .analyze_humor("alpha01", "Why did the loop walk into a bar?")
            .expect("humor");
        assert!(reading.paradox_resolved);
        assert!((0.5..=0.95).contains(&reading.humor_index));
        assert_eq!(event_names(&engine, "alpha01"), ["laughter_filter"]);
    }

    #[test]
    fn owners_are_isolated() {
        let mut engine = Engine::new();
        engine.store_memory("alpha01", "joy", "honor", "a").expect("store");
        assert!(engine.recent_memories("beta02", 5).expect("recent").is_empty());
        assert_eq!(engine.recent_memories("alpha01", 5).expect("recent").len(), 1);
    }

    #[test]
    fn export_and_summary_lines() {
        let mut engine = Engine::new();
        engine
            .sanctify("alpha01", &DerivationInput::new("awe", "truth"))
            .expect("sanctify");
        let lines = engine.export_logs("alpha01").expect("export");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("[core_sanctifier]"));
        let summary = engine.transmutation_summary("alpha01").expect("summary");
        assert!(summary[0].ends_with("Dormant (truth + awe)"));
    }
}
