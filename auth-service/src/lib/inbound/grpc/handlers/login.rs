use std::sync::Arc;

use tonic::Status;

use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::proto::AuthResponse;
use crate::proto::LoginRequest;

pub async fn login<S: AuthServicePort + ?Sized>(
    service: Arc<S>,
    request: LoginRequest,
) -> Result<AuthResponse, Status> {
    let result = service
        .login(LoginCommand {
            username: request.username,
            password: request.password,
        })
        .await?;

    Ok(result.into())
}
