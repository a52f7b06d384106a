use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserInfoData;
use crate::inbound::http::router::AppState;

/// Always answers 200 for a well-formed body; an unusable token is reported
/// through `is_valid`.
pub async fn validate_token(
    State(state): State<AppState>,
    Json(body): Json<ValidateTokenRequestBody>,
) -> Result<ApiSuccess<ValidateTokenResponseData>, ApiError> {
    let validation = state.auth_service.validate_token(&body.token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ValidateTokenResponseData {
            is_valid: validation.is_valid,
            user_info: validation.user.map(Into::into),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateTokenRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateTokenResponseData {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfoData>,
}
