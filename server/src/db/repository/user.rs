//! User Repository
//!
//! Shoppers live in the `user` table, admins in a separate `admin` table
//! (admin registration is gated by a shared secret at the API layer).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";
const ADMIN_TABLE: &str = "admin";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_by_email(USER_TABLE, email).await
    }

    pub async fn find_admin_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_by_email(ADMIN_TABLE, email).await
    }

    pub async fn create_user(&self, data: UserCreate) -> RepoResult<User> {
        self.create_in(USER_TABLE, data).await
    }

    pub async fn create_admin(&self, data: UserCreate) -> RepoResult<User> {
        self.create_in(ADMIN_TABLE, data).await
    }

    /// Count registered shoppers (admin dashboard)
    pub async fn count_users(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: i64,
        }

        let result: Option<Count> = self
            .base
            .db()
            .query("SELECT count() AS count FROM user GROUP ALL")
            .await?
            .take(0)?;
        Ok(result.map(|c| c.count).unwrap_or(0))
    }

    async fn find_by_email(&self, table: &str, email: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {} WHERE email = $email LIMIT 1",
                table
            ))
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(user)
    }

    async fn create_in(&self, table: &'static str, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(table, &data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Account with email {} already exists",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {e}")))?;

        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            hash_pass,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created: Option<User> = self.base.db().create(table).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }
}
