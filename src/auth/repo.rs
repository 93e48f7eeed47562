use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Registered account. The phone number is the login key and is unique;
/// the display name is not.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum InsertError {
    #[error("phone number already registered")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>>;

    /// Persists a new record. Uniqueness of the phone number is enforced
    /// here, atomically, so two concurrent registrations of the same number
    /// cannot both succeed even if both passed the service-level pre-check.
    async fn insert(&self, name: &str, phone: &str, password_hash: &str)
        -> Result<User, InsertError>;
}

/// Map-backed repository for development and tests.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(phone).cloned())
    }

    async fn insert(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<User, InsertError> {
        let mut users = self.users.write().await;
        if users.contains_key(phone) {
            return Err(InsertError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(phone.to_string(), user.clone());
        Ok(user)
    }
}

/// Postgres repository; the unique index on `phone` backs conflict detection.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, phone, password_hash, created_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<User, InsertError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, phone, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => InsertError::Conflict,
            _ => InsertError::Other(e.into()),
        })?;
        Ok(user)
    }
}
