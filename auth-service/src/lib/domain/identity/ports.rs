use async_trait::async_trait;

use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::AuthResult;
use crate::domain::identity::models::FederatedIdentity;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::TokenValidation;
use crate::identity::errors::AuthError;

/// Port for the authentication flows exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new local identity and issue its tokens.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthResult, AuthError>;

    /// Authenticate with username and password and issue tokens.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthResult, AuthError>;

    /// Authenticate through an external provider.
    ///
    /// # Arguments
    /// * `provider` - Federated provider to exchange the code with
    /// * `auth_code` - Authorization code returned by the provider
    ///
    /// # Errors
    /// * `InvalidArgument` - `provider` is not a federated provider
    /// * `NotImplemented` - Provider exchange is not available
    /// * `FederatedIdentityNotRegistered` - No identity linked to the account
    async fn federated_login(
        &self,
        provider: AuthProvider,
        auth_code: &str,
    ) -> Result<AuthResult, AuthError>;

    /// Check a bearer token and resolve its identity.
    ///
    /// Malformed, tampered or expired tokens produce `is_valid == false`.
    ///
    /// # Errors
    /// * `IdentityNotFoundAfterTokenValid` - Subject vanished and the policy is `Error`
    /// * `DatabaseError` - Store operation failed
    async fn validate_token(&self, token: &str) -> Result<TokenValidation, AuthError>;
}

/// Persistence operations for the identity aggregate.
///
/// Implementations own uniqueness of usernames and of (provider, provider_id).
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Check whether a username is taken.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError>;

    /// Retrieve identity by username.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AuthError>;

    /// Retrieve identity by federated account.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_provider_and_provider_id(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<Identity>, AuthError>;

    /// Insert a new identity or update an existing one.
    ///
    /// Inserting stamps `created_at` and `updated_at`; updating refreshes
    /// `updated_at` only.
    ///
    /// # Returns
    /// The identity as stored
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DuplicateProviderIdentity` - Federated account is already linked
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, identity: Identity) -> Result<Identity, AuthError>;
}

/// Exchange of an authorization code with an external identity provider.
#[async_trait]
pub trait FederatedIdentityProvider: Send + Sync + 'static {
    /// Provider this adapter speaks to.
    fn provider(&self) -> AuthProvider;

    /// Exchange an authorization code for a verified external identity.
    ///
    /// # Errors
    /// * `NotImplemented` - Exchange is not available
    /// * `InvalidCredentials` - Code was rejected by the provider
    async fn exchange(&self, auth_code: &str) -> Result<FederatedIdentity, AuthError>;
}
