//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use aurathent::api::{
    BreathLogRequest, ErrorResponse, HealthResponse, IntervalResponse, LogsResponse,
    MemoryLogRequest, TransmuteResponse, VirtueUpdateRequest,
};
use aurathent_core::{AuraResult, AuraTier, EventDetails, LogEntry};
use serde_json::{Value, json};

// =============================================================================
// HEALTH / ERROR
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "online");
    assert_eq!(health.message, "AURATHENT Transmutation Engine Active");
    assert!(!health.version.is_empty());
}

#[test]
fn test_error_response_shape() {
    let value = serde_json::to_value(ErrorResponse::new("Missing required field 'virtue'")).unwrap();
    assert_eq!(
        value,
        json!({ "status": "error", "error": "Missing required field 'virtue'" })
    );
}

// =============================================================================
// REQUESTS
// =============================================================================

#[test]
fn test_breath_request_all_fields_optional() {
    let request: BreathLogRequest = serde_json::from_str("{}").unwrap();
    assert!(request.emotion.is_none());
    assert!(request.breath_cycle.is_none());
    assert!(request.to_input().is_err());
}

#[test]
fn test_breath_request_to_input() {
    let request: BreathLogRequest = serde_json::from_value(json!({
        "user_id": "alpha01",
        "emotion": "awe",
        "virtue": "truth",
        "breath_cycle": 3,
        "memory_tag": ""
    }))
    .unwrap();

    let input = request.to_input().unwrap();
    assert_eq!(input.emotion, "awe");
    assert_eq!(input.breath_cycle, Some(3));
    assert!(input.memory_tag.is_none());
}

#[test]
fn test_breath_request_negative_cycle_fails_to_parse() {
    let parsed = serde_json::from_value::<BreathLogRequest>(json!({ "breath_cycle": -1 }));
    assert!(parsed.is_err());
}

#[test]
fn test_memory_request_null_tags() {
    let request: MemoryLogRequest =
        serde_json::from_value(json!({ "event_type": "dream", "tags": null })).unwrap();
    assert!(request.to_event().is_err());
}

#[test]
fn test_virtue_request_rejects_empty_user() {
    let request: VirtueUpdateRequest =
        serde_json::from_value(json!({ "user_id": "", "virtue": "honor" })).unwrap();
    let err = request.validate().unwrap_err();
    assert!(err.contains("user_id"));
}

// =============================================================================
// RESPONSES
// =============================================================================

#[test]
fn test_phoenix_phase_wire_name() {
    let response = TransmuteResponse {
        status: "success".to_string(),
        mana: 160,
        aura_result: AuraResult {
            aura_tier: AuraTier::PhoenixPhase,
            tier_score: 3,
            evolved: true,
            memory_reference: "none".to_string(),
        },
        lapis_triggered: false,
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["aura_result"]["aura_tier"], "Phoenix Phase");
    assert_eq!(value["aura_result"]["tier_score"], 3);
    assert_eq!(value["aura_result"]["evolved"], true);
    assert_eq!(value["mana"], 160);
}

#[test]
fn test_event_details_snake_case() {
    let entry = LogEntry::now(
        "virtue_update",
        EventDetails::VirtueUpdate {
            user: "alpha01".to_string(),
            virtue: "honor".to_string(),
            new_level: 2,
        },
    );
    let response = LogsResponse {
        status: "ok".to_string(),
        user_id: "alpha01".to_string(),
        entries: vec![entry.clone()],
    };

    let value = serde_json::to_value(&response).unwrap();
    let details = &value["entries"][0]["details"];
    assert_eq!(details["virtue_update"]["new_level"], 2);
    assert_eq!(value["entries"][0]["event"], "virtue_update");

    let back: LogsResponse = serde_json::from_value(value).unwrap();
    assert_eq!(back.entries, vec![entry]);
}

#[test]
fn test_interval_serializes_null() {
    let response = IntervalResponse {
        status: "ok".to_string(),
        user_id: "alpha01".to_string(),
        interval_seconds: None,
    };
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["interval_seconds"], Value::Null);
}
