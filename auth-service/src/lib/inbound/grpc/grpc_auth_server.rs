use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::google_login;
use super::handlers::login;
use super::handlers::register;
use super::handlers::validate_token;
use crate::domain::identity::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::AuthResponse;
use crate::proto::GoogleLoginRequest;
use crate::proto::LoginRequest;
use crate::proto::RegisterRequest;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;

pub struct AuthGrpcService<S: AuthServicePort + ?Sized> {
    service: Arc<S>,
}

impl<S: AuthServicePort + ?Sized> AuthGrpcService<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S: AuthServicePort + ?Sized> AuthServiceProto for AuthGrpcService<S> {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<AuthResponse>, Status> {
        let response = register::register(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<AuthResponse>, Status> {
        let response = login::login(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn google_login(
        &self,
        request: Request<GoogleLoginRequest>,
    ) -> Result<Response<AuthResponse>, Status> {
        let response =
            google_login::google_login(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn validate_token(
        &self,
        request: Request<ValidateTokenRequest>,
    ) -> Result<Response<ValidateTokenResponse>, Status> {
        let response =
            validate_token::validate_token(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }
}
