use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::identity::models::AuthProvider;
use crate::inbound::http::router::AppState;

pub async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequestBody>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let result = state
        .auth_service
        .federated_login(AuthProvider::Google, &body.auth_code)
        .await?;

    Ok(ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleLoginRequestBody {
    auth_code: String,
}
