use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::AuthError;

/// Identity store kept in process memory.
///
/// Enforces the same uniqueness rules as the database schema. Contents are lost
/// on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityRepository {
    /// Map of identity_id -> Identity
    identities: Arc<RwLock<HashMap<IdentityId, Identity>>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an identity, returning it if it was stored.
    pub async fn remove(&self, id: &IdentityId) -> Option<Identity> {
        self.identities.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .any(|identity| identity.username.as_str() == username))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| identity.username.as_str() == username)
            .cloned())
    }

    async fn find_by_provider_and_provider_id(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| {
                identity.provider == provider && identity.provider_id.as_deref() == Some(provider_id)
            })
            .cloned())
    }

    async fn save(&self, mut identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;

        for other in identities.values().filter(|other| other.id != identity.id) {
            if other.username == identity.username {
                return Err(AuthError::DuplicateUsername(
                    identity.username.as_str().to_string(),
                ));
            }
            if identity.provider_id.is_some()
                && other.provider == identity.provider
                && other.provider_id == identity.provider_id
            {
                return Err(AuthError::DuplicateProviderIdentity {
                    provider: identity.provider.to_string(),
                    provider_id: identity.provider_id.clone().unwrap_or_default(),
                });
            }
        }

        let now = Utc::now();
        identity.created_at = identities
            .get(&identity.id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        identity.updated_at = now;

        identities.insert(identity.id, identity.clone());
        tracing::debug!(user_id = %identity.id, "Identity stored in memory");

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::models::Age;
    use crate::domain::identity::models::ProfileText;
    use crate::domain::identity::models::RegisterCommand;
    use crate::domain::identity::models::Username;

    fn identity(username: &str) -> Identity {
        Identity::new_custom(
            RegisterCommand {
                username: Username::new(username.to_string()).unwrap(),
                password: "Secret123".to_string(),
                age: Age::new(30).unwrap(),
                profession: ProfileText::new("profession", "Engineer".to_string()).unwrap(),
                education: ProfileText::new("education", "BSc".to_string()).unwrap(),
            },
            "$argon2id$digest".to_string(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repository = InMemoryIdentityRepository::new();

        let saved = repository.save(identity("alice")).await.unwrap();

        assert!(repository.exists_by_username("alice").await.unwrap());
        assert!(!repository.exists_by_username("Alice").await.unwrap());

        let found = repository.find_by_username("alice").await.unwrap();
        assert_eq!(found, Some(saved));
        assert!(repository.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_username() {
        let repository = InMemoryIdentityRepository::new();

        repository.save(identity("alice")).await.unwrap();
        let result = repository.save(identity("alice")).await;

        assert!(matches!(
            result.unwrap_err(),
            AuthError::DuplicateUsername(_)
        ));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_existing_keeps_created_at() {
        let repository = InMemoryIdentityRepository::new();

        let saved = repository.save(identity("alice")).await.unwrap();
        let mut changed = saved.clone();
        changed.profession = ProfileText::new("profession", "Architect".to_string()).unwrap();

        let updated = repository.save(changed).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
        assert_eq!(updated.profession.as_str(), "Architect");
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_provider_and_provider_id() {
        let repository = InMemoryIdentityRepository::new();

        let mut google = identity("gwen");
        google.password_hash = None;
        google.provider = AuthProvider::Google;
        google.provider_id = Some("google-123".to_string());
        repository.save(google.clone()).await.unwrap();

        let found = repository
            .find_by_provider_and_provider_id(AuthProvider::Google, "google-123")
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.id), Some(google.id));

        let missing = repository
            .find_by_provider_and_provider_id(AuthProvider::Custom, "google-123")
            .await
            .unwrap();
        assert!(missing.is_none());

        let mut duplicate = identity("gwen2");
        duplicate.provider = AuthProvider::Google;
        duplicate.provider_id = Some("google-123".to_string());
        assert!(matches!(
            repository.save(duplicate).await.unwrap_err(),
            AuthError::DuplicateProviderIdentity { .. }
        ));
    }

    #[tokio::test]
    async fn test_remove() {
        let repository = InMemoryIdentityRepository::new();
        let saved = repository.save(identity("alice")).await.unwrap();

        assert!(repository.remove(&saved.id).await.is_some());
        assert!(repository.is_empty().await);
        assert!(!repository.exists_by_username("alice").await.unwrap());
    }
}
