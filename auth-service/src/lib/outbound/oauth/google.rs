use async_trait::async_trait;

use crate::config::GoogleConfig;
use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::FederatedIdentity;
use crate::domain::identity::ports::FederatedIdentityProvider;
use crate::identity::errors::AuthError;

/// Google OAuth adapter.
///
/// The authorization-code exchange is not available yet; every call reports
/// `NotImplemented` so the gRPC layer answers with UNIMPLEMENTED.
pub struct GoogleOAuthProvider {
    client_id: String,
    redirect_uri: String,
}

impl GoogleOAuthProvider {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }
}

#[async_trait]
impl FederatedIdentityProvider for GoogleOAuthProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    async fn exchange(&self, auth_code: &str) -> Result<FederatedIdentity, AuthError> {
        tracing::warn!(
            client_id = %self.client_id,
            redirect_uri = %self.redirect_uri,
            code_length = auth_code.len(),
            "Google login requested but the code exchange is not implemented"
        );

        Err(AuthError::NotImplemented("Google login".to_string()))
    }
}
