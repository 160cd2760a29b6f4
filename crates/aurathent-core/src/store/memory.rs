//! In-memory symbolic store.

use super::SymbolicStore;
use crate::{
    AurathentError, ChronoEvent, LogEntry, MemoryRecord, TransmutationRecord, VirtueProfile,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Volatile store backed by ordered maps keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    events: BTreeMap<String, Vec<LogEntry>>,
    profiles: BTreeMap<String, VirtueProfile>,
    memories: BTreeMap<String, Vec<MemoryRecord>>,
    transmutations: BTreeMap<String, Vec<TransmutationRecord>>,
    timeline: BTreeMap<String, Vec<ChronoEvent>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Clone out an owner's sequence, empty when absent.
fn sequence<T: Clone>(map: &BTreeMap<String, Vec<T>>, owner: &str) -> Vec<T> {
    map.get(owner).cloned().unwrap_or_default()
}

impl SymbolicStore for InMemoryStore {
    fn append_event(&mut self, owner: &str, entry: LogEntry) -> Result<(), AurathentError> {
        self.events.entry(owner.to_string()).or_default().push(entry);
        Ok(())
    }

    fn events(&self, owner: &str) -> Result<Vec<LogEntry>, AurathentError> {
        Ok(sequence(&self.events, owner))
    }

    fn increment_virtue(
        &mut self,
        owner: &str,
        virtue: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AurathentError> {
        let profile = self
            .profiles
            .entry(owner.to_string())
            .or_insert_with(|| VirtueProfile::new(owner, now));
        Ok(profile.increment(virtue, now))
    }

    fn profile(&self, owner: &str) -> Result<Option<VirtueProfile>, AurathentError> {
        Ok(self.profiles.get(owner).cloned())
    }

    fn append_memory(&mut self, owner: &str, record: MemoryRecord) -> Result<(), AurathentError> {
        self.memories
            .entry(owner.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn memories(&self, owner: &str) -> Result<Vec<MemoryRecord>, AurathentError> {
        Ok(sequence(&self.memories, owner))
    }

    fn append_transmutation(
        &mut self,
        owner: &str,
        record: TransmutationRecord,
    ) -> Result<(), AurathentError> {
        if owner.is_empty() {
            return Err(AurathentError::MissingOwner);
        }
        self.transmutations
            .entry(owner.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn transmutations(&self, owner: &str) -> Result<Vec<TransmutationRecord>, AurathentError> {
        Ok(sequence(&self.transmutations, owner))
    }

    fn append_timeline(&mut self, owner: &str, event: ChronoEvent) -> Result<(), AurathentError> {
        self.timeline
            .entry(owner.to_string())
            .or_default()
            .push(event);
        Ok(())
    }

    fn timeline(&self, owner: &str) -> Result<Vec<ChronoEvent>, AurathentError> {
        Ok(sequence(&self.timeline, owner))
    }
}
