use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

/// Outcome of verifying a bearer token.
///
/// Verification failures are data: a malformed, tampered or expired token
/// yields `Invalid` with the rejection reason, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerification<T> {
    Valid(T),
    Invalid(JwtError),
}

impl<T> TokenVerification<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerification::Valid(_))
    }

    /// Decoded claims, if the token was valid.
    pub fn into_claims(self) -> Option<T> {
        match self {
            TokenVerification::Valid(claims) => Some(claims),
            TokenVerification::Invalid(_) => None,
        }
    }
}

/// Signs and verifies compact, time-bounded bearer tokens.
///
/// Generic over the claims type so callers can define their own payload.
/// Uses HS256 (HMAC with SHA-256) with a key derived from a shared secret.
/// Holds no mutable state and can be shared freely between requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Minimum secret length in bytes (256 bits, the HS256 key size).
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a new codec from a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Returns
    /// TokenCodec configured with HS256
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret is shorter than 32 bytes
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(JwtError::InvalidSecret {
                min: Self::MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Sign claims into a token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token, reporting why it was rejected.
    ///
    /// Requires `sub` and `exp`. Expiry is checked without leeway.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim lies in the past
    /// * `MissingClaim` - A required claim is absent
    /// * `DecodingFailed` - Signature mismatch or malformed token
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Verify a token and return its claims on success.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> TokenVerification<T> {
        match self.decode(token) {
            Ok(claims) => TokenVerification::Valid(claims),
            Err(e) => {
                tracing::debug!(reason = %e, "Token rejected");
                TokenVerification::Invalid(e)
            }
        }
    }
}
