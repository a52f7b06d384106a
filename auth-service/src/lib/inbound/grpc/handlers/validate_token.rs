use std::sync::Arc;

use tonic::Status;

use crate::domain::identity::ports::AuthServicePort;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;

/// Malformed or expired tokens answer `is_valid: false`, never an error status.
pub async fn validate_token<S: AuthServicePort + ?Sized>(
    service: Arc<S>,
    request: ValidateTokenRequest,
) -> Result<ValidateTokenResponse, Status> {
    let validation = service.validate_token(&request.token).await?;

    Ok(ValidateTokenResponse {
        is_valid: validation.is_valid,
        user_info: validation.user.map(Into::into),
    })
}
