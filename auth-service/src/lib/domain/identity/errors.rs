use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Age validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("Age must be a positive integer, got {0}")]
    NotPositive(i64),
}

/// Error for required profile text fields
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Error for provider names that are not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown authentication provider: {0}")]
pub struct AuthProviderError(pub String);

/// Closed set of failures surfaced by the authentication flows.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Argument validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid age: {0}")]
    InvalidAge(#[from] AgeError),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Invalid provider: {0}")]
    InvalidProvider(#[from] AuthProviderError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Domain-level errors
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Identity already linked for provider {provider}: {provider_id}")]
    DuplicateProviderIdentity {
        provider: String,
        provider_id: String,
    },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("No identity registered for {provider} account {provider_id}")]
    FederatedIdentityNotRegistered {
        provider: String,
        provider_id: String,
    },

    #[error("Identity not found for valid token subject: {0}")]
    IdentityNotFoundAfterTokenValid(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => AuthError::Password(e),
            auth::AuthenticationError::JwtError(e) => AuthError::Token(e),
        }
    }
}
