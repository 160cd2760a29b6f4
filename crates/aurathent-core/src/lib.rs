//! # aurathent-core
//!
//! The derivation engine for Aurathent - THE LOGIC.
//!
//! This crate turns emotion and virtue inputs into symbolic scores (mana,
//! aura tiers, paradox flames, hope bindings, humor readings) and records the
//! outcomes in append-only, owner-keyed stores.
//!
//! ## Layers
//!
//! - Derivations (`mana`, `aura`, `paradox`, `lapis`, `hope`, `humor`): pure functions over fixed tables
//! - `store`: the [`SymbolicStore`] trait with in-memory and redb backends
//! - `engine`: composed flows that chain derivations and write log entries
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (pure Rust)
//! - Every store access names its owner explicitly
//! - Failures are [`AurathentError`] values, never panics

// =============================================================================
// MODULES
// =============================================================================

pub mod aura;
pub mod engine;
pub mod hope;
pub mod humor;
pub mod lapis;
pub mod mana;
pub mod paradox;
pub mod primitives;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AuraResult, AuraTier, AurathentError, ChronoEvent, ChronoKind, ChronoSync, DerivationInput,
    EventDetails, HopeAnchor, HopeBinding, HumorReading, HumorSignal, LapisTrigger, LogEntry,
    MemoryRecord, ParadoxResult, ProfileSnapshot, TransmutationRecord, VirtueProfile,
};

// =============================================================================
// RE-EXPORTS: Engine and Stores
// =============================================================================

pub use engine::{
    Engine, LogicOutcome, MemoryAnchor, MemoryEvent, Sanctified, StorageBackend, Transmutation,
    VirtueOutcome,
};
pub use store::{InMemoryStore, RedbStore, SymbolicStore};

// =============================================================================
// RE-EXPORTS: Derivations
// =============================================================================

pub use aura::detect_aura_shift;
pub use hope::{bind_hope_chain, bind_hope_to_memory};
pub use humor::{validate_humor_paradox, validate_humor_signal};
pub use lapis::trigger_lapis_event;
pub use mana::{breath_mana, convert_experience_to_mana};
pub use paradox::resolve_paradox_chain;
