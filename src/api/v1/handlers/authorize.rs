/*
 * Responsibility
 * - POST /api/v1/authorize
 * - event DTO を検証し Authorizer に委譲、失敗は一律 401 (Unauthorized)
 */
use axum::{Json, extract::State};

use crate::api::v1::dto::authorize::AuthorizeRequest;
use crate::error::AppError;
use crate::services::auth::policy::AuthorizerResponse;
use crate::state::AppState;

pub async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizerResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::InvalidRequest(msg.to_string()))?;

    let response = state
        .authorizer
        .authorize(req.bearer_token(), &req.method_arn, state.extractor.as_ref())
        .await?;

    Ok(Json(response))
}
