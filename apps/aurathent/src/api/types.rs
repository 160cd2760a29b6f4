//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Request fields are all `Option` so that a missing field is reported by
//! validation as a 400 with the error envelope, never by the extractor.

use aurathent_core::{
    AuraResult, ChronoSync, DerivationInput, HopeAnchor, HopeBinding, LogEntry, MemoryEvent,
    MemoryRecord, ParadoxResult, ProfileSnapshot, TransmutationRecord,
    primitives::{DEFAULT_FATIGUE, MAX_FIELD_LENGTH, MAX_TAGS, MAX_TEXT_LENGTH},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default logic-router memory tag.
pub const DEFAULT_LOGIC_MEMORY: &str = "default";

/// Default emotion/memory intensity.
pub const DEFAULT_INTENSITY: f64 = 1.0;

// =============================================================================
// VALIDATION HELPERS
// =============================================================================

/// Reject a field longer than `max` bytes.
fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.len() > max {
        return Err(format!(
            "Field '{}' length {} exceeds maximum {} bytes",
            field,
            value.len(),
            max
        ));
    }
    Ok(())
}

/// Owner ids key every store: bounded length, no control characters.
pub fn validate_owner(user_id: &str) -> Result<(), String> {
    check_length("user_id", user_id, MAX_FIELD_LENGTH)?;
    if user_id.chars().any(char::is_control) {
        return Err("Field 'user_id' must not contain control characters".to_string());
    }
    Ok(())
}

fn required_within(field: &str, value: Option<&str>, max: usize) -> Result<String, String> {
    match value {
        Some(v) if !v.is_empty() => {
            check_length(field, v, max)?;
            Ok(v.to_string())
        }
        _ => Err(format!("Missing required field '{}'", field)),
    }
}

fn optional_within(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    match value {
        Some(v) if !v.is_empty() => {
            check_length(field, v, max)?;
            Ok(Some(v.to_string()))
        }
        _ => Ok(None),
    }
}

/// A required, non-empty name field.
fn required(field: &str, value: Option<&str>) -> Result<String, String> {
    required_within(field, value, MAX_FIELD_LENGTH)
}

/// An optional name field. Empty strings count as absent.
fn optional(field: &str, value: Option<&str>) -> Result<Option<String>, String> {
    optional_within(field, value, MAX_FIELD_LENGTH)
}

/// A required free-text field.
fn required_text(field: &str, value: Option<&str>) -> Result<String, String> {
    required_within(field, value, MAX_TEXT_LENGTH)
}

/// An optional free-text field.
fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>, String> {
    optional_within(field, value, MAX_TEXT_LENGTH)
}

// =============================================================================
// ERROR / HEALTH
// =============================================================================

/// Error envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: msg.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "online".to_string(),
            message: "AURATHENT Transmutation Engine Active".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// BREATH LOG
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreathLogRequest {
    pub user_id: Option<String>,
    pub emotion: Option<String>,
    pub virtue: Option<String>,
    pub breath_cycle: Option<u32>,
    pub memory_tag: Option<String>,
}

impl BreathLogRequest {
    /// Validate into a derivation input. `breath_cycle` must be at least 1.
    pub fn to_input(&self) -> Result<DerivationInput, String> {
        let emotion = required("emotion", self.emotion.as_deref())?;
        let virtue = required("virtue", self.virtue.as_deref())?;
        if self.breath_cycle == Some(0) {
            return Err("Field 'breath_cycle' must be at least 1".to_string());
        }
        Ok(DerivationInput {
            emotion,
            virtue,
            memory_tag: optional("memory_tag", self.memory_tag.as_deref())?,
            breath_cycle: self.breath_cycle,
            fatigue_level: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathLogResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub mana: u64,
    pub aura_result: AuraResult,
    pub lapis_triggered: bool,
}

// =============================================================================
// EMOTION LOG
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionLogRequest {
    pub user_id: Option<String>,
    pub emotion: Option<String>,
    pub intensity: Option<f64>,
}

impl EmotionLogRequest {
    /// Validate into `(emotion, intensity)`.
    pub fn validate(&self) -> Result<(String, f64), String> {
        let emotion = required("emotion", self.emotion.as_deref())?;
        Ok((emotion, self.intensity.unwrap_or(DEFAULT_INTENSITY)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionLogResponse {
    pub status: String,
    pub emotion: String,
    pub intensity: f64,
    pub chrono_reference: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalResponse {
    pub status: String,
    pub user_id: String,
    /// Seconds between the last two timeline entries; null with fewer than two.
    pub interval_seconds: Option<f64>,
}

// =============================================================================
// HUMOR
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumorAnalyzeRequest {
    pub user_id: Option<String>,
    pub content: Option<String>,
}

impl HumorAnalyzeRequest {
    pub fn validate(&self) -> Result<String, String> {
        required_text("content", self.content.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumorAnalyzeResponse {
    pub status: String,
    pub original: String,
    pub humor_index: f64,
    pub decoded_meaning: String,
    pub paradox_resolved: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumorSignalRequest {
    pub content: Option<String>,
    pub emotion_context: Option<String>,
}

impl HumorSignalRequest {
    /// Validate into `(content, emotion_context)`; the context may be empty.
    pub fn validate(&self) -> Result<(String, String), String> {
        let content = required_text("content", self.content.as_deref())?;
        let context = optional("emotion_context", self.emotion_context.as_deref())?;
        Ok((content, context.unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumorSignalResponse {
    pub status: String,
    pub humor_quality: String,
    pub symbolic_essence: String,
    pub score: u8,
}

// =============================================================================
// LOGIC PROCESS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogicProcessRequest {
    pub user_id: Option<String>,
    pub virtue: Option<String>,
    pub emotion: Option<String>,
    pub memory: Option<String>,
    pub fatigue_level: Option<i64>,
}

/// A validated logic-process request.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicInput {
    pub virtue: String,
    pub emotion: String,
    pub memory: String,
    pub fatigue_level: i64,
}

impl LogicProcessRequest {
    pub fn validate(&self) -> Result<LogicInput, String> {
        Ok(LogicInput {
            virtue: required("virtue", self.virtue.as_deref())?,
            emotion: required("emotion", self.emotion.as_deref())?,
            memory: optional("memory", self.memory.as_deref())?
                .unwrap_or_else(|| DEFAULT_LOGIC_MEMORY.to_string()),
            fatigue_level: self.fatigue_level.unwrap_or(DEFAULT_FATIGUE),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicProcessResponse {
    pub status: String,
    pub mana: u64,
    pub aura_result: AuraResult,
    pub insight: ParadoxResult,
    pub memory_binding: HopeBinding,
    pub hope_anchor: HopeAnchor,
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLogRequest {
    pub user_id: Option<String>,
    pub event_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub emotion: Option<String>,
    pub intensity: Option<f64>,
    pub insight: Option<String>,
}

impl MemoryLogRequest {
    /// Validate into a memory event. `tags` must be a non-empty list.
    pub fn to_event(&self) -> Result<MemoryEvent, String> {
        let event_type = required("event_type", self.event_type.as_deref())?;
        let tags = match self.tags.as_deref() {
            Some(tags) if !tags.is_empty() => tags,
            _ => return Err("Field 'tags' must be a non-empty list".to_string()),
        };
        if tags.len() > MAX_TAGS {
            return Err(format!("At most {} tags are allowed", MAX_TAGS));
        }
        for tag in tags {
            check_length("tags", tag, MAX_FIELD_LENGTH)?;
        }
        Ok(MemoryEvent {
            event_type,
            tags: tags.to_vec(),
            emotion: optional("emotion", self.emotion.as_deref())?.unwrap_or_default(),
            intensity: self.intensity.unwrap_or(DEFAULT_INTENSITY),
            insight: optional_text("insight", self.insight.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLogResponse {
    pub status: String,
    pub memory_event: String,
    pub chrono_sync: ChronoSync,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreMemoryRequest {
    pub user_id: Option<String>,
    pub emotion: Option<String>,
    pub virtue: Option<String>,
    pub note: Option<String>,
}

impl StoreMemoryRequest {
    /// Validate into `(emotion, virtue, note)`. The note may be empty.
    pub fn validate(&self) -> Result<(String, String, String), String> {
        let emotion = required("emotion", self.emotion.as_deref())?;
        let virtue = required("virtue", self.virtue.as_deref())?;
        let note = optional_text("note", self.note.as_deref())?.unwrap_or_default();
        Ok((emotion, virtue, note))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMemoryResponse {
    pub status: String,
    pub memory: MemoryRecord,
}

/// `?limit=` for the recent-memories route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// `?emotion=&virtue=` for the filtered-memories route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryFilterQuery {
    pub emotion: Option<String>,
    pub virtue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoriesResponse {
    pub status: String,
    pub user_id: String,
    pub memories: Vec<MemoryRecord>,
}

// =============================================================================
// TRANSMUTE
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransmuteRequest {
    pub user_id: Option<String>,
    pub emotion: Option<String>,
    pub virtue: Option<String>,
    pub memory: Option<String>,
}

impl TransmuteRequest {
    /// Validate into `(emotion, virtue, memory)`.
    pub fn validate(&self) -> Result<(String, String, Option<String>), String> {
        Ok((
            required("emotion", self.emotion.as_deref())?,
            required("virtue", self.virtue.as_deref())?,
            optional("memory", self.memory.as_deref())?,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmuteResponse {
    pub status: String,
    pub mana: u64,
    pub aura_result: AuraResult,
    pub lapis_triggered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub status: String,
    pub user_id: String,
    pub records: Vec<TransmutationRecord>,
    pub summary: Vec<String>,
}

// =============================================================================
// VIRTUE
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtueUpdateRequest {
    pub user_id: Option<String>,
    pub virtue: Option<String>,
}

impl VirtueUpdateRequest {
    /// Validate into `(user_id, virtue)`. Both are required here.
    pub fn validate(&self) -> Result<(String, String), String> {
        let user_id = required("user_id", self.user_id.as_deref())?;
        validate_owner(&user_id)?;
        Ok((user_id, required("virtue", self.virtue.as_deref())?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtueUpdateResponse {
    pub status: String,
    pub updated_profile: ProfileSnapshot,
    pub aura: AuraResult,
    pub scroll_path: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub status: String,
    pub profile: ProfileSnapshot,
}

// =============================================================================
// LOGS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub status: String,
    pub user_id: String,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportLogsResponse {
    pub status: String,
    pub user_id: String,
    pub lines: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breath_request_requires_emotion() {
        let request = BreathLogRequest {
            virtue: Some("truth".to_string()),
            ..BreathLogRequest::default()
        };
        let err = request.to_input().expect_err("missing emotion");
        assert!(err.contains("emotion"));
    }

    #[test]
    fn breath_request_rejects_zero_cycle() {
        let request = BreathLogRequest {
            emotion: Some("awe".to_string()),
            virtue: Some("truth".to_string()),
            breath_cycle: Some(0),
            ..BreathLogRequest::default()
        };
        assert!(request.to_input().is_err());
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let request = TransmuteRequest {
            emotion: Some(String::new()),
            virtue: Some("truth".to_string()),
            ..TransmuteRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_field_rejected() {
        let request = TransmuteRequest {
            emotion: Some("x".repeat(MAX_FIELD_LENGTH + 1)),
            virtue: Some("truth".to_string()),
            ..TransmuteRequest::default()
        };
        let err = request.validate().expect_err("too long");
        assert!(err.contains("exceeds maximum"));
    }

    #[test]
    fn long_joke_is_free_text() {
        let request = HumorAnalyzeRequest {
            content: Some("why ".repeat(MAX_FIELD_LENGTH)),
            ..HumorAnalyzeRequest::default()
        };
        assert!(request.validate().is_ok());

        let request = HumorAnalyzeRequest {
            content: Some("x".repeat(MAX_TEXT_LENGTH + 1)),
            ..HumorAnalyzeRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn owner_ids_at_the_limit() {
        assert!(validate_owner(&"u".repeat(MAX_FIELD_LENGTH)).is_ok());
        assert!(validate_owner(&"u".repeat(MAX_FIELD_LENGTH + 1)).is_err());
        assert!(validate_owner("a/b").is_ok());
        assert!(validate_owner("señor").is_ok());
    }

    #[test]
    fn owner_ids_reject_control_characters() {
        for owner in ["a\0b", "a\nb", "\u{1b}[31m", "tab\t"] {
            let err = validate_owner(owner).expect_err("control char");
            assert!(err.contains("control characters"));
        }

        let request = VirtueUpdateRequest {
            user_id: Some("a\0b".to_string()),
            virtue: Some("honor".to_string()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn logic_defaults() {
        let request = LogicProcessRequest {
            virtue: Some("faith".to_string()),
            emotion: Some("grief".to_string()),
            ..LogicProcessRequest::default()
        };
        let input = request.validate().expect("valid");
        assert_eq!(input.memory, DEFAULT_LOGIC_MEMORY);
        assert_eq!(input.fatigue_level, DEFAULT_FATIGUE);
    }

    #[test]
    fn memory_log_needs_tags() {
        let request = MemoryLogRequest {
            event_type: Some("dream".to_string()),
            tags: Some(vec![]),
            ..MemoryLogRequest::default()
        };
        assert!(request.to_event().is_err());

        let request = MemoryLogRequest {
            event_type: Some("dream".to_string()),
            tags: Some(vec!["hope".to_string()]),
            ..MemoryLogRequest::default()
        };
        let event = request.to_event().expect("valid");
        assert!((event.intensity - DEFAULT_INTENSITY).abs() < f64::EPSILON);
        assert!(event.emotion.is_empty());
    }
}
