pub mod argon2_verifier;
pub mod errors;

pub use argon2_verifier::Argon2Verifier;
pub use errors::PasswordError;

/// One-way, salted, verifiable password hashing.
pub trait CredentialVerifier: Send + Sync {
    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored digest is malformed
    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
}
