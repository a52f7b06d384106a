//! Token and credential library
//!
//! Provides the stateless building blocks of the authentication service:
//! - Password hashing and verification (Argon2id)
//! - Signed, expiring bearer tokens (HS256 JWT)
//! - Access/refresh token pair issuance
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2Verifier, CredentialVerifier};
//!
//! let verifier = Argon2Verifier::new();
//! let digest = verifier.hash("my_password").unwrap();
//! assert!(verifier.verify("my_password", &digest).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenCodec, TokenVerification};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let claims = Claims::issued_now("alice", Duration::minutes(15)).unwrap();
//! let token = codec.issue(&claims).unwrap();
//!
//! match codec.verify::<Claims>(&token) {
//!     TokenVerification::Valid(claims) => assert_eq!(claims.sub, "alice"),
//!     TokenVerification::Invalid(reason) => panic!("rejected: {}", reason),
//! }
//! ```
//!
//! ## Complete Flow
//! ```
//! use auth::{Authenticator, TokenSettings};
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     TokenSettings::from_secs(900, 604_800),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let digest = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint tokens
//! auth.verify_password("password123", Some(&digest)).unwrap();
//! let pair = auth.issue_token_pair("alice", "user-id", "CUSTOM").unwrap();
//!
//! // Validate token
//! assert!(auth.validate_token(&pair.access_token).is_valid());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use authenticator::TokenSettings;
pub use authenticator::BEARER;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use jwt::TokenVerification;
pub use password::Argon2Verifier;
pub use password::CredentialVerifier;
pub use password::PasswordError;
