use std::sync::Arc;

use tonic::Status;

use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::ports::AuthServicePort;
use crate::proto::AuthResponse;
use crate::proto::GoogleLoginRequest;

pub async fn google_login<S: AuthServicePort + ?Sized>(
    service: Arc<S>,
    request: GoogleLoginRequest,
) -> Result<AuthResponse, Status> {
    let result = service
        .federated_login(AuthProvider::Google, &request.auth_code)
        .await?;

    Ok(result.into())
}
