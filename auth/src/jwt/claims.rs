use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::jwt::JwtError;

/// Claim key carrying the identity's unique identifier.
pub const USER_ID_CLAIM: &str = "userId";

/// Claim key carrying the identity's authentication provider.
pub const PROVIDER_CLAIM: &str = "provider";

/// Claims carried by every bearer token.
///
/// `sub`, `iat` and `exp` are the registered RFC 7519 claims. Identity
/// attributes (`userId`, `provider`) travel in the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims issued now and expiring after `validity`.
    ///
    /// # Arguments
    /// * `subject` - Token subject (username)
    /// * `validity` - Time until the token expires
    ///
    /// # Returns
    /// Claims with sub, iat and exp set, no custom fields
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration falls outside the representable range
    pub fn issued_now(subject: impl ToString, validity: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expiration = now.checked_add_signed(validity).ok_or_else(|| {
            JwtError::EncodingFailed(format!(
                "expiration out of range for validity of {}s",
                validity.num_seconds()
            ))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            extra: HashMap::new(),
        })
    }

    /// Create claims for an identity with `userId` and `provider` set.
    ///
    /// # Arguments
    /// * `username` - Subject of the token
    /// * `user_id` - Identity identifier
    /// * `provider` - Authentication provider name (e.g. "CUSTOM")
    /// * `validity` - Time until the token expires
    pub fn for_identity(
        username: impl ToString,
        user_id: impl ToString,
        provider: impl ToString,
        validity: Duration,
    ) -> Result<Self, JwtError> {
        Ok(Self::issued_now(username, validity)?
            .with_extra(USER_ID_CLAIM, user_id.to_string())
            .with_extra(PROVIDER_CLAIM, provider.to_string()))
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Identity identifier from the `userId` claim.
    pub fn user_id(&self) -> Option<&str> {
        self.extra_str(USER_ID_CLAIM)
    }

    /// Provider name from the `provider` claim.
    pub fn provider(&self) -> Option<&str> {
        self.extra_str(PROVIDER_CLAIM)
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_now() {
        let claims = Claims::issued_now("alice", Duration::seconds(900)).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_for_identity() {
        let claims = Claims::for_identity("alice", "id-1", "CUSTOM", Duration::hours(1)).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id(), Some("id-1"));
        assert_eq!(claims.provider(), Some("CUSTOM"));
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_shorter_validity_never_expires_later() {
        let short = Claims::issued_now("alice", Duration::seconds(60)).unwrap();
        let long = Claims::issued_now("alice", Duration::seconds(3600)).unwrap();

        assert!(short.exp <= long.exp);
    }

    #[test]
    fn test_serialized_claim_names() {
        let claims = Claims::for_identity("alice", "id-1", "GOOGLE", Duration::seconds(10)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "alice");
        assert_eq!(json["userId"], "id-1");
        assert_eq!(json["provider"], "GOOGLE");
        assert!(json["exp"].is_i64());
        assert!(json["iat"].is_i64());
    }

    #[test]
    fn test_out_of_range_validity_is_an_error() {
        let result = Claims::issued_now("alice", Duration::MAX);

        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }
}
