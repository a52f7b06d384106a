use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::Age;
use crate::domain::identity::models::AuthProvider;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::ProfileText;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::AuthError;

const IDENTITY_COLUMNS: &str = "id, username, password_hash, age, profession, education, \
                                provider, provider_id, created_at, updated_at";

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    password_hash: Option<String>,
    age: i32,
    profession: String,
    education: String,
    provider: String,
    provider_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(r: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(r.id),
            username: Username::new(r.username)?,
            password_hash: r.password_hash,
            age: Age::new(i64::from(r.age))?,
            profession: ProfileText::new("profession", r.profession)?,
            education: ProfileText::new("education", r.education)?,
            provider: r.provider.parse()?,
            provider_id: r.provider_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, identity: &Identity) -> AuthError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("identities_username_key") {
                return AuthError::DuplicateUsername(identity.username.as_str().to_string());
            }
            if db_err.constraint() == Some("identities_provider_provider_id_key") {
                return AuthError::DuplicateProviderIdentity {
                    provider: identity.provider.to_string(),
                    provider_id: identity.provider_id.clone().unwrap_or_default(),
                };
            }
        }
    }
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM identities WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {} FROM identities WHERE username = $1",
            IDENTITY_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_provider_and_provider_id(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {} FROM identities WHERE provider = $1 AND provider_id = $2",
            IDENTITY_COLUMNS
        ))
        .bind(provider.as_str())
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        // created_at is only written on insert
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            INSERT INTO identities ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                password_hash = EXCLUDED.password_hash,
                age = EXCLUDED.age,
                profession = EXCLUDED.profession,
                education = EXCLUDED.education,
                provider = EXCLUDED.provider,
                provider_id = EXCLUDED.provider_id,
                updated_at = EXCLUDED.updated_at
            RETURNING {columns}
            "#,
            columns = IDENTITY_COLUMNS
        ))
        .bind(identity.id.0)
        .bind(identity.username.as_str())
        .bind(identity.password_hash.as_deref())
        .bind(identity.age.value())
        .bind(identity.profession.as_str())
        .bind(identity.education.as_str())
        .bind(identity.provider.as_str())
        .bind(identity.provider_id.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &identity))?;

        Identity::try_from(row)
    }
}
