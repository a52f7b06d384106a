use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenVerification;
use crate::password::Argon2Verifier;
use crate::password::CredentialVerifier;
use crate::password::PasswordError;

/// Token type reported alongside every issued token pair. Capitalised as in
/// the `Authorization: Bearer` scheme; clients should compare case-insensitively.
pub const BEARER: &str = "Bearer";

/// Plaintext hashed at construction and checked against when a login names an
/// unknown user, so both failure paths run one full verification.
const DUMMY_PASSWORD: &str = "unknown-user-placeholder";

/// Validity durations for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSettings {
    pub access_token_validity: Duration,
    pub refresh_token_validity: Duration,
}

impl TokenSettings {
    /// Build settings from seconds. Values beyond the `Duration` range
    /// saturate and are then refused by [`TokenSettings::validate`].
    pub fn from_secs(access_token_secs: i64, refresh_token_secs: i64) -> Self {
        let seconds = |secs: i64| {
            Duration::try_seconds(secs).unwrap_or(if secs < 0 {
                Duration::MIN
            } else {
                Duration::MAX
            })
        };

        Self {
            access_token_validity: seconds(access_token_secs),
            refresh_token_validity: seconds(refresh_token_secs),
        }
    }

    /// Check that both validities are positive and that a token issued now
    /// gets a representable expiration.
    ///
    /// # Errors
    /// * `InvalidValidity` - A validity is not positive or is out of range
    pub fn validate(&self) -> Result<(), JwtError> {
        let now = Utc::now();

        for (name, validity) in [
            ("access", self.access_token_validity),
            ("refresh", self.refresh_token_validity),
        ] {
            if validity <= Duration::zero() {
                return Err(JwtError::InvalidValidity(format!(
                    "{} token validity must be positive",
                    name
                )));
            }
            if now.checked_add_signed(validity).is_none() {
                return Err(JwtError::InvalidValidity(format!(
                    "{} token validity of {}s is out of range",
                    name,
                    validity.num_seconds()
                )));
            }
        }

        Ok(())
    }
}

/// Access and refresh token minted for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token time-to-live in seconds
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

/// Authentication coordinator combining password verification and token issuance.
///
/// Access and refresh tokens share one claim set and differ only in their
/// validity duration.
pub struct Authenticator {
    verifier: Box<dyn CredentialVerifier>,
    codec: TokenCodec,
    settings: TokenSettings,
    dummy_digest: String,
}

impl Authenticator {
    /// Create an authenticator using Argon2id for passwords.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `settings` - Access and refresh token validity
    ///
    /// # Errors
    /// * `JwtError::InvalidSecret` - Secret is missing or too short
    /// * `JwtError::InvalidValidity` - Token validity is not positive or out of range
    /// * `PasswordError` - Hashing the placeholder digest failed
    pub fn new(jwt_secret: &[u8], settings: TokenSettings) -> Result<Self, AuthenticationError> {
        Self::with_verifier(jwt_secret, settings, Box::new(Argon2Verifier::new()))
    }

    /// Create an authenticator with a custom credential verifier.
    pub fn with_verifier(
        jwt_secret: &[u8],
        settings: TokenSettings,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Result<Self, AuthenticationError> {
        let codec = TokenCodec::new(jwt_secret)?;
        settings.validate()?;
        let dummy_digest = verifier.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            verifier,
            codec,
            settings,
            dummy_digest,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.verifier.hash(password)
    }

    /// Check a password against a stored digest.
    ///
    /// A missing digest (unknown user, or an identity without a local password)
    /// is checked against a placeholder digest and always fails.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or no digest exists
    /// * `PasswordError` - Stored digest is malformed
    pub fn verify_password(
        &self,
        password: &str,
        stored_digest: Option<&str>,
    ) -> Result<(), AuthenticationError> {
        let Some(digest) = stored_digest else {
            let _ = self.verifier.verify(password, &self.dummy_digest);
            return Err(AuthenticationError::InvalidCredentials);
        };

        if self.verifier.verify(password, digest)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue an access and a refresh token for an identity.
    ///
    /// # Arguments
    /// * `username` - Token subject
    /// * `user_id` - Value of the `userId` claim
    /// * `provider` - Value of the `provider` claim
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed or expiration is out of range
    pub fn issue_token_pair(
        &self,
        username: &str,
        user_id: &str,
        provider: &str,
    ) -> Result<TokenPair, JwtError> {
        let access_claims = Claims::for_identity(
            username,
            user_id,
            provider,
            self.settings.access_token_validity,
        )?;
        let refresh_claims = Claims::for_identity(
            username,
            user_id,
            provider,
            self.settings.refresh_token_validity,
        )?;

        Ok(TokenPair {
            access_token: self.codec.issue(&access_claims)?,
            refresh_token: self.codec.issue(&refresh_claims)?,
            token_type: BEARER,
            expires_in: self.access_token_ttl_secs(),
        })
    }

    /// Verify a token and return its claims on success.
    pub fn validate_token(&self, token: &str) -> TokenVerification<Claims> {
        self.codec.verify(token)
    }

    /// Access token time-to-live in seconds.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.settings.access_token_validity.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Authenticator {
        Authenticator::new(SECRET, TokenSettings::from_secs(900, 86_400))
            .expect("Failed to build authenticator")
    }

    #[test]
    fn test_new_rejects_short_secret() {
        let result = Authenticator::new(b"short", TokenSettings::from_secs(900, 86_400));
        assert!(matches!(
            result,
            Err(AuthenticationError::JwtError(JwtError::InvalidSecret { .. }))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range_validity() {
        for settings in [
            TokenSettings::from_secs(900, 10_000_000_000_000),
            TokenSettings::from_secs(i64::MAX, 86_400),
            TokenSettings::from_secs(0, 86_400),
            TokenSettings::from_secs(900, -1),
        ] {
            let result = Authenticator::new(SECRET, settings);
            assert!(
                matches!(
                    result,
                    Err(AuthenticationError::JwtError(JwtError::InvalidValidity(_)))
                ),
                "accepted {:?}",
                settings
            );
        }
    }

    #[test]
    fn test_issue_token_pair_with_out_of_range_validity_is_an_error() {
        let authenticator = Authenticator {
            settings: TokenSettings::from_secs(900, 10_000_000_000_000),
            ..authenticator()
        };

        let result = authenticator.issue_token_pair("alice", "id-1", "CUSTOM");
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_verify_password_success() {
        let authenticator = authenticator();
        let digest = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        assert!(authenticator
            .verify_password("my_password", Some(&digest))
            .is_ok());
    }

    #[test]
    fn test_verify_password_mismatch_and_missing_digest_are_uniform() {
        let authenticator = authenticator();
        let digest = authenticator.hash_password("my_password").unwrap();

        let wrong = authenticator.verify_password("wrong_password", Some(&digest));
        let missing = authenticator.verify_password("my_password", None);

        assert!(matches!(wrong, Err(AuthenticationError::InvalidCredentials)));
        assert!(matches!(missing, Err(AuthenticationError::InvalidCredentials)));
        assert_eq!(
            wrong.unwrap_err().to_string(),
            missing.unwrap_err().to_string()
        );
    }

    #[test]
    fn test_issue_token_pair() {
        let authenticator = authenticator();

        let pair = authenticator
            .issue_token_pair("alice", "id-1", "CUSTOM")
            .expect("Failed to issue tokens");

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = authenticator
            .validate_token(&pair.access_token)
            .into_claims()
            .expect("Access token rejected");
        let refresh = authenticator
            .validate_token(&pair.refresh_token)
            .into_claims()
            .expect("Refresh token rejected");

        assert_eq!(access.sub, "alice");
        assert_eq!(access.provider(), Some("CUSTOM"));
        assert_eq!(refresh.user_id(), Some("id-1"));
        assert_eq!(access.exp - access.iat, 900);
        assert_eq!(refresh.exp - refresh.iat, 86_400);
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(!result.is_valid());
    }
}
