use std::fmt;
use std::str::FromStr;

use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::identity::errors::AgeError;
use crate::identity::errors::AuthError;
use crate::identity::errors::AuthProviderError;
use crate::identity::errors::ProfileError;
use crate::identity::errors::UsernameError;

/// Identity aggregate entity.
///
/// `password_hash` is authoritative for CUSTOM identities, `provider_id` for
/// federated ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub password_hash: Option<String>,
    pub age: Age,
    pub profession: ProfileText,
    pub education: ProfileText,
    pub provider: AuthProvider,
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Build a new locally-registered identity with a fresh ID.
    ///
    /// # Arguments
    /// * `command` - Validated registration fields
    /// * `password_hash` - Digest of the registration password
    pub fn new_custom(command: RegisterCommand, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            id: IdentityId::new(),
            username: command.username,
            password_hash: Some(password_hash),
            age: command.age,
            profession: command.profession,
            education: command.education,
            provider: AuthProvider::Custom,
            provider_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Case-sensitive, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 255 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Age in years, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(i32);

impl Age {
    /// # Errors
    /// * `NotPositive` - Age is zero, negative or does not fit in an i32
    pub fn new(age: i64) -> Result<Self, AgeError> {
        i32::try_from(age)
            .ok()
            .filter(|a| *a > 0)
            .map(Age)
            .ok_or(AgeError::NotPositive(age))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Required, non-empty free text (profession, education).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileText(String);

impl ProfileText {
    /// # Arguments
    /// * `field` - Field name reported on failure
    /// * `value` - Raw text
    ///
    /// # Errors
    /// * `Empty` - Value is empty or whitespace only
    pub fn new(field: &'static str, value: String) -> Result<Self, ProfileError> {
        if value.trim().is_empty() {
            Err(ProfileError::Empty(field))
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authority that vouches for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    /// Local username and password
    Custom,
    /// Google OAuth
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Custom => "CUSTOM",
            AuthProvider::Google => "GOOGLE",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = AuthProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOM" => Ok(AuthProvider::Custom),
            "GOOGLE" => Ok(AuthProvider::Google),
            other => Err(AuthProviderError(other.to_string())),
        }
    }
}

/// Command to register a new local identity with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: String,
    pub age: Age,
    pub profession: ProfileText,
    pub education: ProfileText,
}

impl RegisterCommand {
    /// Validate raw registration fields into a command.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username is empty or too long
    /// * `InvalidAge` - Age is not positive
    /// * `InvalidProfile` - Profession or education is blank
    pub fn new(
        username: String,
        password: String,
        age: i64,
        profession: String,
        education: String,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            username: Username::new(username)?,
            password,
            age: Age::new(age)?,
            profession: ProfileText::new("profession", profession)?,
            education: ProfileText::new("education", education)?,
        })
    }
}

/// Login attempt with a username and password.
///
/// The username is kept raw: a malformed username must fail exactly like an
/// unknown one.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Identity asserted by an external provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    pub provider: AuthProvider,
    pub provider_id: String,
    pub email: Option<String>,
}

/// Public attributes of an identity, safe to return to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityView {
    pub user_id: IdentityId,
    pub username: String,
    pub age: i32,
    pub profession: String,
    pub education: String,
    pub provider: AuthProvider,
}

impl From<&Identity> for IdentityView {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.id,
            username: identity.username.as_str().to_string(),
            age: identity.age.value(),
            profession: identity.profession.as_str().to_string(),
            education: identity.education.as_str().to_string(),
            provider: identity.provider,
        }
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token time-to-live in seconds
    pub expires_in: i64,
    pub user: IdentityView,
}

impl AuthResult {
    pub fn new(tokens: TokenPair, identity: &Identity) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type.to_string(),
            expires_in: tokens.expires_in,
            user: identity.into(),
        }
    }
}

/// Outcome of a token validation; `user` is present iff `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidation {
    pub is_valid: bool,
    pub user: Option<IdentityView>,
}

impl TokenValidation {
    pub fn valid(user: IdentityView) -> Self {
        Self {
            is_valid: true,
            user: Some(user),
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            user: None,
        }
    }
}

/// How ValidateToken treats a valid token whose subject no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIdentityPolicy {
    /// Report the token as invalid
    #[default]
    FailClosed,
    /// Fail the call with `IdentityNotFoundAfterTokenValid`
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice".to_string()).is_ok());
        assert_eq!(Username::new(String::new()), Err(UsernameError::Empty));
        assert!(matches!(
            Username::new("a".repeat(256)),
            Err(UsernameError::TooLong { max: 255, .. })
        ));
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::new("alice".to_string()).unwrap();
        let upper = Username::new("Alice".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_age_validation() {
        assert_eq!(Age::new(30).unwrap().value(), 30);
        assert_eq!(Age::new(0), Err(AgeError::NotPositive(0)));
        assert_eq!(Age::new(-4), Err(AgeError::NotPositive(-4)));
        assert!(Age::new(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_profile_text_rejects_blank() {
        assert!(ProfileText::new("profession", "Engineer".to_string()).is_ok());
        assert_eq!(
            ProfileText::new("education", "   ".to_string()),
            Err(ProfileError::Empty("education"))
        );
    }

    #[test]
    fn test_register_command_validation() {
        let command = RegisterCommand::new(
            "alice".to_string(),
            "Secret123".to_string(),
            30,
            "Engineer".to_string(),
            "BSc".to_string(),
        );
        assert!(command.is_ok());

        let bad_age = RegisterCommand::new(
            "alice".to_string(),
            "Secret123".to_string(),
            0,
            "Engineer".to_string(),
            "BSc".to_string(),
        );
        assert!(matches!(bad_age, Err(AuthError::InvalidAge(_))));

        let blank_education = RegisterCommand::new(
            "alice".to_string(),
            "Secret123".to_string(),
            30,
            "Engineer".to_string(),
            String::new(),
        );
        assert!(matches!(
            blank_education,
            Err(AuthError::InvalidProfile(ProfileError::Empty("education")))
        ));
    }

    #[test]
    fn test_auth_provider_names() {
        assert_eq!("CUSTOM".parse::<AuthProvider>(), Ok(AuthProvider::Custom));
        assert_eq!("GOOGLE".parse::<AuthProvider>(), Ok(AuthProvider::Google));
        assert!("google".parse::<AuthProvider>().is_err());
        assert_eq!(AuthProvider::Google.to_string(), "GOOGLE");
    }

    #[test]
    fn test_new_custom_identity() {
        let command = RegisterCommand {
            username: Username::new("alice".to_string()).unwrap(),
            password: "Secret123".to_string(),
            age: Age::new(30).unwrap(),
            profession: ProfileText::new("profession", "Engineer".to_string()).unwrap(),
            education: ProfileText::new("education", "BSc".to_string()).unwrap(),
        };

        let identity = Identity::new_custom(command, "$argon2id$digest".to_string());

        assert_eq!(identity.provider, AuthProvider::Custom);
        assert_eq!(identity.password_hash.as_deref(), Some("$argon2id$digest"));
        assert!(identity.provider_id.is_none());
        assert_eq!(identity.created_at, identity.updated_at);

        let view = IdentityView::from(&identity);
        assert_eq!(view.username, "alice");
        assert_eq!(view.age, 30);
    }
}
