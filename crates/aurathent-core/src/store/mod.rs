//! # Symbolic Stores
//!
//! Keyed, log-structured storage for everything the engine records.
//!
//! Every store is a map from an owner key to an ordered sequence of records.
//! Records are appended and never updated or removed, with one exception:
//! virtue profile counters mutate in place.
//!
//! ## Backends
//!
//! - [`InMemoryStore`]: `BTreeMap`-backed, volatile
//! - [`RedbStore`]: disk-backed ACID storage using redb

mod memory;
mod redb_store;

pub use memory::InMemoryStore;
pub use redb_store::RedbStore;

use crate::{
    AurathentError, ChronoEvent, LogEntry, MemoryRecord, TransmutationRecord, VirtueProfile,
};
use chrono::{DateTime, Utc};

/// Capability set shared by every backend.
///
/// Owners are always supplied by the caller. A store never substitutes a
/// default key.
pub trait SymbolicStore {
    /// Append an entry to the owner's event log.
    fn append_event(&mut self, owner: &str, entry: LogEntry) -> Result<(), AurathentError>;

    /// All log entries for an owner, in append order.
    fn events(&self, owner: &str) -> Result<Vec<LogEntry>, AurathentError>;

    /// Increment one virtue counter, creating the profile on first use.
    /// Returns the new count.
    fn increment_virtue(
        &mut self,
        owner: &str,
        virtue: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AurathentError>;

    /// The owner's virtue profile, if one was ever created.
    fn profile(&self, owner: &str) -> Result<Option<VirtueProfile>, AurathentError>;

    /// Append a memory record.
    fn append_memory(&mut self, owner: &str, record: MemoryRecord) -> Result<(), AurathentError>;

    /// All memory records for an owner, in append order.
    fn memories(&self, owner: &str) -> Result<Vec<MemoryRecord>, AurathentError>;

    /// Append a transmutation record.
    fn append_transmutation(
        &mut self,
        owner: &str,
        record: TransmutationRecord,
    ) -> Result<(), AurathentError>;

    /// All transmutation records for an owner, in append order.
    fn transmutations(&self, owner: &str) -> Result<Vec<TransmutationRecord>, AurathentError>;

    /// Append a timeline event.
    fn append_timeline(&mut self, owner: &str, event: ChronoEvent) -> Result<(), AurathentError>;

    /// All timeline events for an owner, in append order.
    fn timeline(&self, owner: &str) -> Result<Vec<ChronoEvent>, AurathentError>;
}

// =============================================================================
// QUERIES (backend independent)
// =============================================================================

/// Most recent memories first, bounded by `limit`.
///
/// Records sharing a timestamp are returned latest-appended first.
#[must_use]
pub fn fetch_recent(records: Vec<MemoryRecord>, limit: usize) -> Vec<MemoryRecord> {
    let mut newest_first: Vec<MemoryRecord> = records.into_iter().rev().collect();
    // Stable sort keeps reverse-append order among equal timestamps.
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    newest_first.truncate(limit);
    newest_first
}

/// Exact-match filter on emotion and/or virtue, preserving append order.
///
/// With no filters every record is returned.
#[must_use]
pub fn fetch_by_emotion_virtue(
    records: Vec<MemoryRecord>,
    emotion: Option<&str>,
    virtue: Option<&str>,
) -> Vec<MemoryRecord> {
    records
        .into_iter()
        .filter(|m| emotion.is_none_or(|e| m.emotion == e))
        .filter(|m| virtue.is_none_or(|v| m.virtue == v))
        .collect()
}

/// Human-readable rendering of a log.
#[must_use]
pub fn export_logs(entries: &[LogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|log| {
            format!(
                "{} - [{}] \u{2192} {}",
                log.timestamp.to_rfc3339(),
                log.event,
                log.details
            )
        })
        .collect()
}

/// Readable timeline of aura shifts.
#[must_use]
pub fn summarize_transmutations(history: &[TransmutationRecord]) -> Vec<String> {
    history
        .iter()
        .map(|record| {
            format!(
                "{} \u{2192} {} ({} + {})",
                record.timestamp.to_rfc3339(),
                record.aura_tier,
                record.virtue,
                record.emotion
            )
        })
        .collect()
}

/// Seconds between the last two timeline entries.
#[must_use]
pub fn loop_interval(timeline: &[ChronoEvent]) -> Option<f64> {
    match timeline {
        [.., previous, last] => {
            let delta = last.timestamp - previous.timestamp;
            Some(delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0)
        }
        _ => None,
    }
}
