use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenVerification;

use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::AuthResult;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::MissingIdentityPolicy;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::TokenValidation;
use crate::identity::errors::AuthError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::FederatedIdentityProvider;
use crate::identity::ports::IdentityRepository;

/// Domain service implementing registration, login and token validation.
///
/// Stateless between calls: every request reads the store, runs the password
/// check and mints tokens on its own.
pub struct AuthService<IR, FP>
where
    IR: IdentityRepository,
    FP: FederatedIdentityProvider,
{
    repository: Arc<IR>,
    federated_provider: Arc<FP>,
    authenticator: Arc<Authenticator>,
    missing_identity_policy: MissingIdentityPolicy,
}

impl<IR, FP> AuthService<IR, FP>
where
    IR: IdentityRepository,
    FP: FederatedIdentityProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `federated_provider` - External provider used by federated login
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<IR>,
        federated_provider: Arc<FP>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            federated_provider,
            authenticator,
            missing_identity_policy: MissingIdentityPolicy::default(),
        }
    }

    /// Set how a valid token pointing at a deleted identity is reported.
    pub fn with_missing_identity_policy(mut self, policy: MissingIdentityPolicy) -> Self {
        self.missing_identity_policy = policy;
        self
    }

    fn issue_tokens(&self, identity: &Identity) -> Result<AuthResult, AuthError> {
        let tokens = self.authenticator.issue_token_pair(
            identity.username.as_str(),
            &identity.id.to_string(),
            identity.provider.as_str(),
        )?;

        Ok(AuthResult::new(tokens, identity))
    }
}

#[async_trait]
impl<IR, FP> AuthServicePort for AuthService<IR, FP>
where
    IR: IdentityRepository,
    FP: FederatedIdentityProvider,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthResult, AuthError> {
        if self
            .repository
            .exists_by_username(command.username.as_str())
            .await?
        {
            tracing::info!(username = %command.username, "Registration rejected: username taken");
            return Err(AuthError::DuplicateUsername(
                command.username.as_str().to_string(),
            ));
        }

        let password_hash = self.authenticator.hash_password(&command.password)?;
        let identity = Identity::new_custom(command, password_hash);

        let saved = self.repository.save(identity).await?;
        tracing::info!(
            user_id = %saved.id,
            username = %saved.username,
            provider = %saved.provider,
            "Identity registered"
        );

        self.issue_tokens(&saved)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthResult, AuthError> {
        let identity = self.repository.find_by_username(&command.username).await?;
        let digest = identity
            .as_ref()
            .and_then(|identity| identity.password_hash.as_deref());

        if let Err(e) = self.authenticator.verify_password(&command.password, digest) {
            tracing::info!("Login rejected");
            return Err(e.into());
        }

        // A matching digest implies the identity was found
        let identity = identity.ok_or(AuthError::InvalidCredentials)?;
        tracing::info!(user_id = %identity.id, "Login succeeded");

        self.issue_tokens(&identity)
    }

    async fn federated_login(
        &self,
        provider: AuthProvider,
        auth_code: &str,
    ) -> Result<AuthResult, AuthError> {
        match provider {
            AuthProvider::Custom => Err(AuthError::InvalidArgument(
                "CUSTOM is not a federated provider".to_string(),
            )),
            AuthProvider::Google => {
                if self.federated_provider.provider() != provider {
                    return Err(AuthError::NotImplemented(format!("{} login", provider)));
                }

                let external = self.federated_provider.exchange(auth_code).await?;

                let identity = self
                    .repository
                    .find_by_provider_and_provider_id(external.provider, &external.provider_id)
                    .await?
                    .ok_or_else(|| AuthError::FederatedIdentityNotRegistered {
                        provider: external.provider.to_string(),
                        provider_id: external.provider_id.clone(),
                    })?;

                tracing::info!(
                    user_id = %identity.id,
                    provider = %identity.provider,
                    "Federated login succeeded"
                );
                self.issue_tokens(&identity)
            }
        }
    }

    async fn validate_token(&self, token: &str) -> Result<TokenValidation, AuthError> {
        let claims = match self.authenticator.validate_token(token) {
            TokenVerification::Valid(claims) => claims,
            TokenVerification::Invalid(_) => return Ok(TokenValidation::invalid()),
        };

        match self.repository.find_by_username(&claims.sub).await? {
            Some(identity) => Ok(TokenValidation::valid((&identity).into())),
            None => match self.missing_identity_policy {
                MissingIdentityPolicy::FailClosed => {
                    tracing::warn!(
                        subject = %claims.sub,
                        "Valid token references a missing identity"
                    );
                    Ok(TokenValidation::invalid())
                }
                MissingIdentityPolicy::Error => {
                    tracing::error!(
                        subject = %claims.sub,
                        "Valid token references a missing identity"
                    );
                    Err(AuthError::IdentityNotFoundAfterTokenValid(claims.sub))
                }
            },
        }
    }
}
