use super::dto::*;
use super::error::{ApiError, ApiResult};
use super::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use clipboardai_detect::ClassificationResult;
use clipboardai_prompts::Action;
use clipboardai_storage::{HistoryItem, HistoryRepository, NewHistoryEntry};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_enabled = state.engine.is_some();
    Json(HealthResponse {
        status: "healthy".to_string(),
        ai_enabled,
        provider: ai_enabled.then(|| state.provider.to_string()),
        model: ai_enabled.then(|| state.model.clone()),
    })
}

pub async fn detect(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> ApiResult<Json<ClassificationResult>> {
    if req.content.is_empty() {
        return Err(ApiError::bad_request("No content provided"));
    }
    Ok(Json(state.detector.detect(&req.content)))
}

/// Run an action. AI failures come back as `success: false` with status 200;
/// only successful results are written to history.
pub async fn process(
    State(state): State<AppState>,
    Json(req): Json<ProcessRequest>,
) -> ApiResult<Json<ProcessResponse>> {
    let engine = state
        .engine
        .as_ref()
        .ok_or_else(ApiError::engine_unconfigured)?;

    if req.action.is_empty() || req.content.is_empty() {
        return Err(ApiError::bad_request("Missing action or content"));
    }
    if Action::from_name(&req.action).is_none() {
        return Err(ApiError::not_found(format!("Unknown action: {}", req.action)));
    }

    let outcome = engine
        .execute_action(&req.action, &req.content, &req.vars())
        .await;

    let history_id = match (&outcome.content, outcome.success) {
        (Some(output), true) => Some(state.db.add_history(&NewHistoryEntry {
            action: req.action.clone(),
            input_text: req.content.clone(),
            output_text: output.clone(),
            tokens_used: outcome.tokens_used,
            model: Some(outcome.model.clone()),
        })?),
        _ => None,
    };

    Ok(Json(ProcessResponse {
        success: outcome.success,
        result: outcome.content,
        tokens_used: outcome.tokens_used,
        action: req.action,
        history_id,
        error: if outcome.success {
            None
        } else {
            Some(outcome.error.unwrap_or_else(|| "Unknown error".to_string()))
        },
    }))
}

pub async fn list_actions() -> Json<ActionsResponse> {
    let actions = Action::ALL
        .iter()
        .map(|a| ActionInfo {
            name: a.name().to_string(),
            description: a.description().to_string(),
            category: a.category().as_str().to_string(),
        })
        .collect();
    Json(ActionsResponse { actions })
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let history = state.db.get_history(q.limit, q.action.as_deref())?;
    Ok(Json(HistoryResponse { history }))
}

pub async fn clear_history(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let removed = state.db.clear_history()?;
    tracing::info!(removed, "history cleared");
    Ok(Json(json!({ "success": true, "removed": removed })))
}

pub async fn get_history_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<HistoryItem>> {
    Ok(Json(state.db.get_history_item(id)?))
}

pub async fn delete_history_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.delete_history_item(id)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let engine = state
        .engine
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("AI engine not initialized"))?;
    let ai = engine.stats();
    let db = state.db.get_stats()?;
    Ok(Json(StatsResponse {
        total_requests: ai.ai.total_requests,
        total_tokens: ai.ai.total_tokens,
        estimated_cost: ai.estimated_cost,
        actions_by_type: db.actions_by_type,
        history_count: db.total_count,
    }))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> ApiResult<Json<PromptResponse>> {
    let system_prompt = state
        .prompts
        .read()
        .expect("prompt store lock poisoned")
        .system_prompt(&action)?;
    Ok(Json(PromptResponse {
        action,
        system_prompt,
    }))
}

/// Replace an action's system prompt and persist it so it survives restarts.
pub async fn update_prompt(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(req): Json<UpdatePromptRequest>,
) -> ApiResult<Json<Value>> {
    if req.system_prompt.trim().is_empty() {
        return Err(ApiError::bad_request("No prompt provided"));
    }
    if Action::from_name(&action).is_none() {
        return Err(ApiError::not_found(format!("Unknown action: {action}")));
    }
    // Persist before applying in memory.
    state.db.save_prompt_override(&action, &req.system_prompt)?;
    state
        .prompts
        .write()
        .expect("prompt store lock poisoned")
        .set_system_prompt(&action, req.system_prompt.as_str())?;
    tracing::info!(action = %action, "system prompt updated");
    Ok(Json(json!({ "success": true })))
}
