use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::UserInfoData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Identity behind the bearer token of the current request.
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<UserInfoData> {
    ApiSuccess::new(StatusCode::OK, user.0.into())
}
