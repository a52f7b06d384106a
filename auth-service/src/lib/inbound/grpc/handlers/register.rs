use std::sync::Arc;

use tonic::Status;

use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::ports::AuthServicePort;
use crate::proto::AuthResponse;
use crate::proto::RegisterRequest;

pub async fn register<S: AuthServicePort + ?Sized>(
    service: Arc<S>,
    request: RegisterRequest,
) -> Result<AuthResponse, Status> {
    let command = RegisterCommand::new(
        request.username,
        request.password,
        i64::from(request.age),
        request.profession,
        request.education,
    )?;

    let result = service.register(command).await?;
    Ok(result.into())
}
