//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential,
    profile::{ClientProfile, MasterProfile, Profile, ProfileUpdate},
};
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, phone::Phone, role::Role, subject_id::SubjectId,
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// Partial unique index over active credential emails
const EMAIL_UNIQUE_INDEX: &str = "credentials_email_active_key";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_profile(
        tx: &mut Transaction<'_, Postgres>,
        profile: &Profile,
    ) -> Result<(), sqlx::Error> {
        match profile {
            Profile::Client(p) => {
                sqlx::query(
                    r#"
                    INSERT INTO client_profiles (subject_id, name, phone, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(p.subject_id.as_uuid())
                .bind(p.name.as_str())
                .bind(p.phone.as_ref().map(Phone::as_str))
                .bind(p.created_at)
                .bind(p.updated_at)
                .execute(&mut **tx)
                .await?;
            }
            Profile::Master(p) => {
                sqlx::query(
                    r#"
                    INSERT INTO master_profiles (
                        subject_id,
                        name,
                        phone,
                        description,
                        city,
                        specializations,
                        price_from,
                        rating,
                        created_at,
                        updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(p.subject_id.as_uuid())
                .bind(p.name.as_str())
                .bind(p.phone.as_ref().map(Phone::as_str))
                .bind(&p.description)
                .bind(&p.city)
                .bind(p.specializations.as_slice())
                .bind(p.price_from)
                .bind(p.rating)
                .bind(p.created_at)
                .bind(p.updated_at)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }
}

/// A unique violation on the active-email index means another registration
/// won the race.
fn map_credential_insert_error(err: sqlx::Error) -> AuthError {
    let duplicate_email = is_unique_violation(&err)
        && err
            .as_database_error()
            .and_then(|db_err| db_err.constraint())
            == Some(EMAIL_UNIQUE_INDEX);

    if duplicate_email {
        AuthError::DuplicateEmail
    } else {
        AuthError::from(err)
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn create(&self, credential: &Credential, profile: &Profile) -> AuthResult<()> {
        // Dropping the transaction without commit rolls back both inserts
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO credentials (
                subject_id,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(credential.subject_id.as_uuid())
        .bind(credential.email.as_str())
        .bind(credential.password.as_phc_string())
        .bind(credential.role.code())
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_credential_insert_error)?;

        Self::insert_profile(&mut tx, profile).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                subject_id,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            FROM credentials
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn find_by_id(&self, subject_id: &SubjectId) -> AuthResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                subject_id,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            FROM credentials
            WHERE subject_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(subject_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM credentials WHERE email = $1 AND deleted_at IS NULL)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgAuthRepository {
    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        role: Role,
    ) -> AuthResult<Option<Profile>> {
        let profile = match role {
            Role::Client => sqlx::query_as::<_, ClientProfileRow>(
                r#"
                SELECT p.subject_id, p.name, p.phone, p.created_at, p.updated_at
                FROM client_profiles p
                JOIN credentials c ON c.subject_id = p.subject_id
                WHERE p.subject_id = $1 AND c.deleted_at IS NULL
                "#,
            )
            .bind(subject_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(|row| Profile::Client(row.into_profile())),

            Role::Master => sqlx::query_as::<_, MasterProfileRow>(
                r#"
                SELECT
                    p.subject_id,
                    p.name,
                    p.phone,
                    p.description,
                    p.city,
                    p.specializations,
                    p.price_from,
                    p.rating,
                    p.created_at,
                    p.updated_at
                FROM master_profiles p
                JOIN credentials c ON c.subject_id = p.subject_id
                WHERE p.subject_id = $1 AND c.deleted_at IS NULL
                "#,
            )
            .bind(subject_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .map(|row| Profile::Master(row.into_profile())),
        };

        Ok(profile)
    }

    async fn update_profile(
        &self,
        subject_id: &SubjectId,
        update: ProfileUpdate,
    ) -> AuthResult<Option<Profile>> {
        let profile = match update {
            ProfileUpdate::Client { name, phone } => sqlx::query_as::<_, ClientProfileRow>(
                r#"
                UPDATE client_profiles p
                SET name = $2, phone = $3, updated_at = now()
                FROM credentials c
                WHERE p.subject_id = $1
                  AND c.subject_id = p.subject_id
                  AND c.deleted_at IS NULL
                RETURNING p.subject_id, p.name, p.phone, p.created_at, p.updated_at
                "#,
            )
            .bind(subject_id.as_uuid())
            .bind(name.as_str())
            .bind(phone.as_ref().map(Phone::as_str))
            .fetch_optional(&self.pool)
            .await?
            .map(|row| Profile::Client(row.into_profile())),

            ProfileUpdate::Master {
                name,
                description,
                city,
                specializations,
                price_from,
            } => sqlx::query_as::<_, MasterProfileRow>(
                r#"
                UPDATE master_profiles p
                SET name = $2,
                    description = $3,
                    city = $4,
                    specializations = $5,
                    price_from = $6,
                    updated_at = now()
                FROM credentials c
                WHERE p.subject_id = $1
                  AND c.subject_id = p.subject_id
                  AND c.deleted_at IS NULL
                RETURNING
                    p.subject_id,
                    p.name,
                    p.phone,
                    p.description,
                    p.city,
                    p.specializations,
                    p.price_from,
                    p.rating,
                    p.created_at,
                    p.updated_at
                "#,
            )
            .bind(subject_id.as_uuid())
            .bind(name.as_str())
            .bind(&description)
            .bind(&city)
            .bind(specializations.as_slice())
            .bind(price_from)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| Profile::Master(row.into_profile())),
        };

        Ok(profile)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    subject_id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<Credential> {
        let role = Role::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role in database: {}", self.role)))?;

        Ok(Credential {
            subject_id: SubjectId::from_uuid(self.subject_id),
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ClientProfileRow {
    subject_id: Uuid,
    name: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientProfileRow {
    fn into_profile(self) -> ClientProfile {
        ClientProfile {
            subject_id: SubjectId::from_uuid(self.subject_id),
            name: DisplayName::from_db(self.name),
            phone: self.phone.map(Phone::from_db),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MasterProfileRow {
    subject_id: Uuid,
    name: String,
    phone: Option<String>,
    description: String,
    city: String,
    specializations: Vec<String>,
    price_from: i32,
    rating: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MasterProfileRow {
    fn into_profile(self) -> MasterProfile {
        MasterProfile {
            subject_id: SubjectId::from_uuid(self.subject_id),
            name: DisplayName::from_db(self.name),
            phone: self.phone.map(Phone::from_db),
            description: self.description,
            city: self.city,
            specializations: self.specializations,
            price_from: self.price_from,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
