use sqlx::SqlitePool;

use crate::models::user::{Role, User};
use crate::utils::auth::AuthSettings;
use crate::utils::error::ApiError;

pub struct UserService<'a> {
    db_pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(db_pool: &'a SqlitePool) -> UserService<'a> {
        UserService { db_pool }
    }

    /// Hashes the password and stores a new account. Usernames are unique.
    pub async fn create(
        &self,
        settings: &AuthSettings,
        username: &str,
        password: &str,
        role: Role,
        full_name: &str,
    ) -> Result<User, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(ApiError::validation("password must not be empty"));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(ApiError::Conflict(format!("username '{}' is already taken", username)));
        }

        let hashed_password = settings.hash_password(password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, hashed_password, role, full_name)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(&hashed_password)
        .bind(role)
        .bind(full_name.trim())
        .execute(self.db_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict(format!("username '{}' is already taken", username))
            }
            other => ApiError::from(other),
        })?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password, role, full_name FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db_pool)
        .await?
        .ok_or(ApiError::NotFound("User"))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password, role, full_name FROM users WHERE username = ?",
        )
        .bind(username.trim())
        .fetch_optional(self.db_pool)
        .await?)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, ApiError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, hashed_password, role, full_name FROM users WHERE role = ? ORDER BY full_name, id",
        )
        .bind(role)
        .fetch_all(self.db_pool)
        .await?)
    }

    /// Looks up a user and checks the password. Unknown users and wrong passwords
    /// produce the same error.
    pub async fn authenticate(
        &self,
        settings: &AuthSettings,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(ApiError::Unauthorized("Invalid username or password"))?;

        if settings.verify_password(password, &user.hashed_password)? {
            Ok(user)
        } else {
            Err(ApiError::Unauthorized("Invalid username or password"))
        }
    }

    pub async fn update_password(
        &self,
        settings: &AuthSettings,
        id: i64,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if new_password.is_empty() {
            return Err(ApiError::validation("newPassword must not be empty"));
        }
        let hashed_new_password = settings.hash_password(new_password)?;

        sqlx::query(
            r#"
            UPDATE users
            SET hashed_password = ?
            WHERE id = ?
            "#,
        )
        .bind(&hashed_new_password)
        .bind(id)
        .execute(self.db_pool)
        .await?;
        Ok(())
    }

    /// Creates the configured admin account unless the username already exists.
    pub async fn ensure_admin(
        &self,
        settings: &AuthSettings,
        username: &str,
        password: &str,
    ) -> Result<bool, ApiError> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(false);
        }
        self.create(settings, username, password, Role::Admin, "Administrator")
            .await?;
        Ok(true)
    }
}
