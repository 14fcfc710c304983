use actix_web::http::header;
use chrono::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::models::user::{Role, User};
use crate::services::user_service::UserService;
use crate::utils::auth::AuthSettings;
use crate::utils::database;

/// Builds the full application around a pool, without CORS and access logs.
macro_rules! test_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(crate::handlers::json_config(1024 * 1024))
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new(crate::tests::test_settings()))
                .configure(crate::handlers::configure),
        )
        .await
    };
}

mod records_handler_test;

pub async fn setup_db() -> SqlitePool {
    // One connection, so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    database::init_schema(&pool)
        .await
        .expect("Could not execute SQL commands");

    pool
}

pub fn test_settings() -> AuthSettings {
    AuthSettings::new("test-secret", Duration::hours(1), 4)
}

/// Creates a user with password "password" and returns it with a valid token.
pub async fn seed_user(pool: &SqlitePool, username: &str, role: Role) -> (User, String) {
    let settings = test_settings();
    let user = UserService::new(pool)
        .create(&settings, username, "password", role, &format!("{} Fullname", username))
        .await
        .expect("Failed to seed user.");
    let token = settings.issue_token(&user).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
