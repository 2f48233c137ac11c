use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use designer_lib::export::{export_file_name, export_stl};
use designer_lib::{share, DesignError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{AiChatRequest, AiChatResponse, Scene};

use crate::ai;
use crate::AppState;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, msg: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": msg.to_string() })))
}

/// Share token body
#[derive(Debug, Serialize, Deserialize)]
pub struct ShareToken {
    pub token: String,
}

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// AI chat endpoint
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<AiChatRequest>,
) -> Result<Json<AiChatResponse>, ApiError> {
    let response = ai::process_chat(&state, &request).await.map_err(|e| {
        tracing::error!("AI error: {}", e);
        api_error(StatusCode::BAD_GATEWAY, e)
    })?;
    Ok(Json(response))
}

/// Scene → ASCII STL download
pub async fn export(Json(scene): Json<Scene>) -> Result<Response, ApiError> {
    let stl = tokio::task::spawn_blocking(move || export_stl(&scene))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
        .map_err(|e| match e {
            DesignError::EmptyExport => api_error(StatusCode::UNPROCESSABLE_ENTITY, e),
            DesignError::SceneFull { .. } => api_error(StatusCode::PAYLOAD_TOO_LARGE, e),
            other => {
                tracing::error!("Export error: {}", other);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, other)
            }
        })?;

    let disposition = format!("attachment; filename=\"{}\"", export_file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "model/stl".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        stl,
    )
        .into_response())
}

/// Scene → share token
pub async fn share_encode(Json(scene): Json<Scene>) -> Result<Json<ShareToken>, ApiError> {
    let token = share::encode(&scene).map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    Ok(Json(ShareToken { token }))
}

/// Share token → scene
pub async fn share_decode(Json(body): Json<ShareToken>) -> Result<Json<Scene>, ApiError> {
    let scene = share::decode(&body.token).map_err(|e| match e {
        DesignError::SceneFull { .. } => api_error(StatusCode::PAYLOAD_TOO_LARGE, e),
        other => api_error(StatusCode::BAD_REQUEST, other),
    })?;
    Ok(Json(scene))
}
