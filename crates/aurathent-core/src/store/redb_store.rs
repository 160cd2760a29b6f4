//! # redb-backed Symbolic Store
//!
//! A disk-backed store using the redb embedded database, providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! ## Layout
//!
//! Append-only sequences share one key scheme: the tuple `(owner, seq)`, where
//! `seq` is a per-owner counter held in the `sequences` table. Tuple keys
//! compare element by element, so the range `(owner, 0)..=(owner, u64::MAX)`
//! holds exactly that owner's records, in append order, whatever characters
//! the owner id contains. Values are postcard-encoded records.
//!
//! Every operation opens exactly one transaction. A write transaction that
//! fails before `commit()` is dropped, which aborts it.

use super::SymbolicStore;
use crate::{
    AurathentError, ChronoEvent, LogEntry, MemoryRecord, TransmutationRecord, VirtueProfile,
};
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableHandle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

type RecordTable = TableDefinition<'static, (&'static str, u64), &'static [u8]>;

/// Event log: (owner, seq) -> LogEntry
const EVENTS: RecordTable = TableDefinition::new("events");

/// Memory records: (owner, seq) -> MemoryRecord
const MEMORIES: RecordTable = TableDefinition::new("memories");

/// Transmutations: (owner, seq) -> TransmutationRecord
const TRANSMUTATIONS: RecordTable = TableDefinition::new("transmutations");

/// Chrono timeline: (owner, seq) -> ChronoEvent
const TIMELINE: RecordTable = TableDefinition::new("timeline");

/// Virtue profiles: owner -> VirtueProfile (mutated in place)
const PROFILES: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Next sequence number: (table, owner) -> u64
const SEQUENCES: TableDefinition<(&str, &str), u64> = TableDefinition::new("sequences");

fn io_err(e: impl std::fmt::Display) -> AurathentError {
    AurathentError::IoError(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, AurathentError> {
    postcard::to_allocvec(value).map_err(|e| AurathentError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AurathentError> {
    postcard::from_bytes(bytes).map_err(|e| AurathentError::SerializationError(e.to_string()))
}

/// A disk-backed symbolic store.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AurathentError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            for table in [EVENTS, MEMORIES, TRANSMUTATIONS, TIMELINE] {
                let _ = write_txn.open_table(table).map_err(io_err)?;
            }
            let _ = write_txn.open_table(PROFILES).map_err(io_err)?;
            let _ = write_txn.open_table(SEQUENCES).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), AurathentError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }

    /// Append one record to an owner's sequence in a single transaction.
    fn append<T: Serialize>(
        &self,
        table: RecordTable,
        owner: &str,
        record: &T,
    ) -> Result<(), AurathentError> {
        let bytes = encode(record)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut sequences = write_txn.open_table(SEQUENCES).map_err(io_err)?;
            let seq = sequences
                .get((table.name(), owner))
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(0);

            let mut records = write_txn.open_table(table).map_err(io_err)?;
            records
                .insert((owner, seq), bytes.as_slice())
                .map_err(io_err)?;
            sequences
                .insert((table.name(), owner), seq.saturating_add(1))
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    /// Read an owner's full sequence in append order.
    fn scan<T: DeserializeOwned>(
        &self,
        table: RecordTable,
        owner: &str,
    ) -> Result<Vec<T>, AurathentError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let records = read_txn.open_table(table).map_err(io_err)?;

        let mut out = Vec::new();
        for entry in records.range((owner, 0u64)..=(owner, u64::MAX)).map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }
}

impl SymbolicStore for RedbStore {
    fn append_event(&mut self, owner: &str, entry: LogEntry) -> Result<(), AurathentError> {
        self.append(EVENTS, owner, &entry)
    }

    fn events(&self, owner: &str) -> Result<Vec<LogEntry>, AurathentError> {
        self.scan(EVENTS, owner)
    }

    fn increment_virtue(
        &mut self,
        owner: &str,
        virtue: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AurathentError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let count = {
            let mut profiles = write_txn.open_table(PROFILES).map_err(io_err)?;
            let existing = profiles
                .get(owner)
                .map_err(io_err)?
                .map(|data| decode::<VirtueProfile>(data.value()))
                .transpose()?;

            let mut profile = existing.unwrap_or_else(|| VirtueProfile::new(owner, now));
            let count = profile.increment(virtue, now);
            let bytes = encode(&profile)?;
            profiles.insert(owner, bytes.as_slice()).map_err(io_err)?;
            count
        };
        write_txn.commit().map_err(io_err)?;
        Ok(count)
    }

    fn profile(&self, owner: &str) -> Result<Option<VirtueProfile>, AurathentError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let profiles = read_txn.open_table(PROFILES).map_err(io_err)?;
        let profile = profiles
            .get(owner)
            .map_err(io_err)?
            .map(|data| decode(data.value()))
            .transpose()?;
        Ok(profile)
    }

    fn append_memory(&mut self, owner: &str, record: MemoryRecord) -> Result<(), AurathentError> {
        self.append(MEMORIES, owner, &record)
    }

    fn memories(&self, owner: &str) -> Result<Vec<MemoryRecord>, AurathentError> {
        self.scan(MEMORIES, owner)
    }

    fn append_transmutation(
        &mut self,
        owner: &str,
        record: TransmutationRecord,
    ) -> Result<(), AurathentError> {
        if owner.is_empty() {
            return Err(AurathentError::MissingOwner);
        }
        self.append(TRANSMUTATIONS, owner, &record)
    }

    fn transmutations(&self, owner: &str) -> Result<Vec<TransmutationRecord>, AurathentError> {
        self.scan(TRANSMUTATIONS, owner)
    }

    fn append_timeline(&mut self, owner: &str, event: ChronoEvent) -> Result<(), AurathentError> {
        self.append(TIMELINE, owner, &event)
    }

    fn timeline(&self, owner: &str) -> Result<Vec<ChronoEvent>, AurathentError> {
        self.scan(TIMELINE, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventDetails;
    use tempfile::tempdir;

    fn pulse(emotion: &str) -> LogEntry {
        LogEntry::now(
            "chrono_synth",
            EventDetails::ChronoSynth {
                emotion: emotion.to_string(),
                intensity: 1.0,
            },
        )
    }

    #[test]
    fn events_keep_append_order() {
        let dir = tempdir().expect("tempdir");
        let mut store = RedbStore::open(dir.path().join("a.db")).expect("open");

        for emotion in ["awe", "joy", "fear"] {
            store.append_event("alpha", pulse(emotion)).expect("append");
        }
        store.append_event("alphabet", pulse("grief")).expect("append");

        let events = store.events("alpha").expect("events");
        let emotions: Vec<String> = events
            .iter()
            .filter_map(|e| match &e.details {
                EventDetails::ChronoSynth { emotion, .. } => Some(emotion.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(emotions, vec!["awe", "joy", "fear"]);
        assert_eq!(store.events("alphabet").expect("events").len(), 1);
    }

    #[test]
    fn nul_in_owner_does_not_leak_into_prefix_owner() {
        let dir = tempdir().expect("tempdir");
        let mut store = RedbStore::open(dir.path().join("d.db")).expect("open");

        store.append_event("a\0b", pulse("awe")).expect("append");
        store.append_event("a", pulse("joy")).expect("append");

        assert_eq!(store.events("a").expect("events").len(), 1);
        assert_eq!(store.events("a\0b").expect("events").len(), 1);
    }

    #[test]
    fn sequence_survives_ten_appends() {
        let dir = tempdir().expect("tempdir");
        let mut store = RedbStore::open(dir.path().join("b.db")).expect("open");
        for i in 0..12 {
            store
                .append_event("alpha", pulse(&format!("e{i}")))
                .expect("append");
        }
        let events = store.events("alpha").expect("events");
        assert_eq!(events.len(), 12);
        assert!(matches!(
            &events[11].details,
            EventDetails::ChronoSynth { emotion, .. } if emotion == "e11"
        ));
    }

    #[test]
    fn data_persists_across_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("c.db");
        {
            let mut store = RedbStore::open(&path).expect("open");
            store.append_event("alpha", pulse("awe")).expect("append");
            store
                .increment_virtue("alpha", "honor", Utc::now())
                .expect("inc");
        }
        let mut store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.events("alpha").expect("events").len(), 1);
        assert_eq!(
            store
                .increment_virtue("alpha", "honor", Utc::now())
                .expect("inc"),
            2
        );
    }
}
