//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every write handler validates its request before taking the engine lock,
//! so a rejected request never touches the stores.

use super::{
    AppState,
    types::{
        BreathLogRequest, BreathLogResponse, EmotionLogRequest, EmotionLogResponse, ErrorResponse,
        ExportLogsResponse, HealthResponse, HistoryResponse, HumorAnalyzeRequest,
        HumorAnalyzeResponse, HumorSignalRequest, HumorSignalResponse, IntervalResponse,
        LogicProcessRequest, LogicProcessResponse, LogsResponse, MemoriesResponse,
        MemoryFilterQuery, MemoryLogRequest, MemoryLogResponse, ProfileResponse, RecentQuery,
        StoreMemoryRequest, StoreMemoryResponse, TransmuteRequest, TransmuteResponse,
        VirtueUpdateRequest, VirtueUpdateResponse, validate_owner,
    },
};
use aurathent_core::{
    AurathentError,
    primitives::{ANONYMOUS_OWNER, DEFAULT_RECENT_LIMIT},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Failure of a single request.
#[derive(Debug)]
pub enum ApiError {
    /// Validation failure (400). No side effects were performed.
    BadRequest(String),
    /// The requested record does not exist (404).
    NotFound(String),
    /// Missing or wrong API key (401).
    Unauthorized,
    /// Global request quota spent (429).
    RateLimited,
    /// The engine raised an error (500).
    Engine(AurathentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too Many Requests".to_string(),
            ),
            Self::Engine(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Log and wrap a validation failure.
fn rejected(route: &'static str, msg: String) -> ApiError {
    tracing::warn!(event = "validation_rejected", route, reason = %msg);
    ApiError::BadRequest(msg)
}

/// Log and wrap an engine failure.
fn engine_failure(route: &'static str, owner: &str, err: AurathentError) -> ApiError {
    tracing::error!(event = "engine_failure", route, owner, error = %err);
    ApiError::Engine(err)
}

/// Unwrap a JSON body, mapping extractor rejections to 400.
fn body<T>(route: &'static str, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| rejected(route, rejection.body_text()))
}

/// Unwrap query parameters, mapping extractor rejections to 400.
fn query<T>(
    route: &'static str,
    params: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| rejected(route, rejection.body_text()))
}

/// The `{user_id}` path segment, validated like a body owner.
fn path_owner(
    route: &'static str,
    segment: Result<Path<String>, PathRejection>,
) -> Result<String, ApiError> {
    let Path(user_id) = segment.map_err(|rejection| rejected(route, rejection.body_text()))?;
    validate_owner(&user_id).map_err(|msg| rejected(route, msg))?;
    Ok(user_id)
}

/// Resolve an optional user id to an owner key.
fn resolve_owner(route: &'static str, user_id: Option<&str>) -> Result<String, ApiError> {
    match user_id {
        Some(id) if !id.is_empty() => {
            validate_owner(id).map_err(|msg| rejected(route, msg))?;
            Ok(id.to_string())
        }
        _ => {
            tracing::debug!(event = "anonymous_owner", route, owner = ANONYMOUS_OWNER);
            Ok(ANONYMOUS_OWNER.to_string())
        }
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// TRANSMUTATION HANDLERS
// =============================================================================

/// `POST /api/breath/log`: breath-weighted transmutation, recorded.
pub async fn breath_log_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreathLogRequest>, JsonRejection>,
) -> Result<Json<BreathLogResponse>, ApiError> {
    const ROUTE: &str = "breath_log";
    let request = body(ROUTE, payload)?;
    let input = request.to_input().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let outcome = engine
        .sanctify(&owner, &input)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(BreathLogResponse {
        status: "sanctified".to_string(),
        timestamp: outcome.timestamp,
        mana: outcome.mana,
        aura_result: outcome.aura_result,
        lapis_triggered: outcome.lapis_triggered,
    }))
}

/// `POST /api/transmute`: mana, aura and lapis without a record.
pub async fn transmute_handler(
    State(state): State<AppState>,
    payload: Result<Json<TransmuteRequest>, JsonRejection>,
) -> Result<Json<TransmuteResponse>, ApiError> {
    const ROUTE: &str = "transmute";
    let request = body(ROUTE, payload)?;
    let (emotion, virtue, memory) = request.validate().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let outcome = engine
        .transmute(&owner, &emotion, &virtue, memory.as_deref())
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(TransmuteResponse {
        status: "success".to_string(),
        mana: outcome.mana,
        aura_result: outcome.aura_result,
        lapis_triggered: outcome.lapis_triggered,
    }))
}

/// `GET /api/transmute/history/{user_id}`
pub async fn history_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    const ROUTE: &str = "transmute_history";
    let user_id = path_owner(ROUTE, segment)?;
    let engine = state.engine.read().await;
    let records = engine
        .transmutation_history(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;
    let summary = engine
        .transmutation_summary(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(HistoryResponse {
        status: "ok".to_string(),
        user_id,
        records,
        summary,
    }))
}

/// `POST /api/logic/process`: the logic router.
pub async fn logic_process_handler(
    State(state): State<AppState>,
    payload: Result<Json<LogicProcessRequest>, JsonRejection>,
) -> Result<Json<LogicProcessResponse>, ApiError> {
    const ROUTE: &str = "logic_process";
    let request = body(ROUTE, payload)?;
    let input = request.validate().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let outcome = engine
        .process_logic(
            &owner,
            &input.virtue,
            &input.emotion,
            &input.memory,
            input.fatigue_level,
        )
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(LogicProcessResponse {
        status: "symbolic_processing_complete".to_string(),
        mana: outcome.mana,
        aura_result: outcome.aura_result,
        insight: outcome.insight,
        memory_binding: outcome.memory_binding,
        hope_anchor: outcome.hope_anchor,
    }))
}

// =============================================================================
// EMOTION HANDLERS
// =============================================================================

/// `POST /api/emotion/log`
pub async fn emotion_log_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmotionLogRequest>, JsonRejection>,
) -> Result<Json<EmotionLogResponse>, ApiError> {
    const ROUTE: &str = "emotion_log";
    let request = body(ROUTE, payload)?;
    let (emotion, intensity) = request.validate().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let pulse = engine
        .log_emotion(&owner, &emotion, intensity)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(EmotionLogResponse {
        status: "logged".to_string(),
        emotion,
        intensity,
        chrono_reference: pulse.timestamp,
    }))
}

/// `GET /api/emotion/interval/{user_id}`
pub async fn interval_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
) -> Result<Json<IntervalResponse>, ApiError> {
    const ROUTE: &str = "emotion_interval";
    let user_id = path_owner(ROUTE, segment)?;
    let engine = state.engine.read().await;
    let interval_seconds = engine
        .loop_interval(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(IntervalResponse {
        status: "ok".to_string(),
        user_id,
        interval_seconds,
    }))
}

// =============================================================================
// HUMOR HANDLERS
// =============================================================================

/// `POST /api/humor/analyze`
pub async fn humor_analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<HumorAnalyzeRequest>, JsonRejection>,
) -> Result<Json<HumorAnalyzeResponse>, ApiError> {
    const ROUTE: &str = "humor_analyze";
    let request = body(ROUTE, payload)?;
    let content = request.validate().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let reading = engine
        .analyze_humor(&owner, &content)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(HumorAnalyzeResponse {
        status: "analyzed".to_string(),
        original: content,
        humor_index: reading.humor_index,
        decoded_meaning: reading.meaning,
        paradox_resolved: reading.paradox_resolved,
    }))
}

/// `POST /api/humor/signal`: authenticity scoring, no side effects.
pub async fn humor_signal_handler(
    State(state): State<AppState>,
    payload: Result<Json<HumorSignalRequest>, JsonRejection>,
) -> Result<Json<HumorSignalResponse>, ApiError> {
    const ROUTE: &str = "humor_signal";
    let request = body(ROUTE, payload)?;
    let (content, context) = request.validate().map_err(|msg| rejected(ROUTE, msg))?;

    let engine = state.engine.read().await;
    let signal = engine.humor_signal(&content, &context);

    Ok(Json(HumorSignalResponse {
        status: "analyzed".to_string(),
        humor_quality: signal.humor_quality,
        symbolic_essence: signal.symbolic_essence,
        score: signal.score,
    }))
}

// =============================================================================
// MEMORY HANDLERS
// =============================================================================

/// `POST /api/memory/log`: timeline anchor plus memory record.
pub async fn memory_log_handler(
    State(state): State<AppState>,
    payload: Result<Json<MemoryLogRequest>, JsonRejection>,
) -> Result<Json<MemoryLogResponse>, ApiError> {
    const ROUTE: &str = "memory_log";
    let request = body(ROUTE, payload)?;
    let event = request.to_event().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;
    let memory_event = event.event_type.clone();

    let mut engine = state.engine.write().await;
    let anchor = engine
        .log_memory(&owner, event)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(MemoryLogResponse {
        status: "success".to_string(),
        memory_event,
        chrono_sync: anchor.chrono_sync,
    }))
}

/// `POST /api/memory/store`
pub async fn memory_store_handler(
    State(state): State<AppState>,
    payload: Result<Json<StoreMemoryRequest>, JsonRejection>,
) -> Result<Json<StoreMemoryResponse>, ApiError> {
    const ROUTE: &str = "memory_store";
    let request = body(ROUTE, payload)?;
    let (emotion, virtue, note) = request.validate().map_err(|msg| rejected(ROUTE, msg))?;
    let owner = resolve_owner(ROUTE, request.user_id.as_deref())?;

    let mut engine = state.engine.write().await;
    let memory = engine
        .store_memory(&owner, &emotion, &virtue, &note)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;

    Ok(Json(StoreMemoryResponse {
        status: "stored".to_string(),
        memory,
    }))
}

/// `GET /api/memory/{user_id}/recent?limit=`
pub async fn recent_memories_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
    params: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<MemoriesResponse>, ApiError> {
    const ROUTE: &str = "memory_recent";
    let user_id = path_owner(ROUTE, segment)?;
    let limit = query(ROUTE, params)?
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT);
    let engine = state.engine.read().await;
    let memories = engine
        .recent_memories(&user_id, limit)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(MemoriesResponse {
        status: "ok".to_string(),
        user_id,
        memories,
    }))
}

/// `GET /api/memory/{user_id}?emotion=&virtue=`
pub async fn filter_memories_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
    params: Result<Query<MemoryFilterQuery>, QueryRejection>,
) -> Result<Json<MemoriesResponse>, ApiError> {
    const ROUTE: &str = "memory_filter";
    let user_id = path_owner(ROUTE, segment)?;
    let filter = query(ROUTE, params)?;
    let engine = state.engine.read().await;
    let memories = engine
        .memories_matching(&user_id, filter.emotion.as_deref(), filter.virtue.as_deref())
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(MemoriesResponse {
        status: "ok".to_string(),
        user_id,
        memories,
    }))
}

// =============================================================================
// VIRTUE HANDLERS
// =============================================================================

/// `POST /api/virtue/update`: increment, aura, scroll path.
pub async fn virtue_update_handler(
    State(state): State<AppState>,
    payload: Result<Json<VirtueUpdateRequest>, JsonRejection>,
) -> Result<Json<VirtueUpdateResponse>, ApiError> {
    const ROUTE: &str = "virtue_update";
    let request = body(ROUTE, payload)?;
    let (owner, virtue) = request.validate().map_err(|msg| rejected(ROUTE, msg))?;

    let mut engine = state.engine.write().await;
    let outcome = engine
        .update_virtue_affinity(&owner, &virtue)
        .map_err(|e| engine_failure(ROUTE, &owner, e))?;
    let scroll_path = state.scrolls.path_for(&owner, &virtue);

    Ok(Json(VirtueUpdateResponse {
        status: "vessel_updated".to_string(),
        updated_profile: outcome.updated_profile,
        aura: outcome.aura,
        scroll_path,
    }))
}

/// `GET /api/virtue/{user_id}`: 404 if the user never updated a virtue.
pub async fn profile_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    const ROUTE: &str = "virtue_profile";
    let user_id = path_owner(ROUTE, segment)?;
    let engine = state.engine.read().await;
    let profile = engine
        .profile_snapshot(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?
        .ok_or_else(|| ApiError::NotFound(format!("No virtue profile for '{}'", user_id)))?;

    Ok(Json(ProfileResponse {
        status: "ok".to_string(),
        profile,
    }))
}

// =============================================================================
// LOG HANDLERS
// =============================================================================

/// `GET /api/logs/{user_id}`
pub async fn logs_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
) -> Result<Json<LogsResponse>, ApiError> {
    const ROUTE: &str = "logs";
    let user_id = path_owner(ROUTE, segment)?;
    let engine = state.engine.read().await;
    let entries = engine
        .events(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(LogsResponse {
        status: "ok".to_string(),
        user_id,
        entries,
    }))
}

/// `GET /api/logs/{user_id}/export`
pub async fn export_logs_handler(
    State(state): State<AppState>,
    segment: Result<Path<String>, PathRejection>,
) -> Result<Json<ExportLogsResponse>, ApiError> {
    const ROUTE: &str = "logs_export";
    let user_id = path_owner(ROUTE, segment)?;
    let engine = state.engine.read().await;
    let lines = engine
        .export_logs(&user_id)
        .map_err(|e| engine_failure(ROUTE, &user_id, e))?;

    Ok(Json(ExportLogsResponse {
        status: "ok".to_string(),
        user_id,
        lines,
    }))
}
