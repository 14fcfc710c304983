use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::models::credentials::Credentials;
use crate::models::identity::CallerIdentity;
use crate::models::reset_password_credentials::ResetPasswordCredentials;
use crate::models::token_response::TokenResponse;
use crate::models::user::{NewUser, PublicUser, Role};
use crate::services::user_service::UserService;
use crate::utils::auth::AuthSettings;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

pub async fn register(
    db_pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    new_user: web::Json<NewUser>,
) -> Result<HttpResponse, ApiError> {
    let role: Role = new_user.role.parse().map_err(ApiError::Validation)?;
    if role == Role::Admin {
        return Err(ApiError::validation("admin accounts cannot be self-registered"));
    }

    let user = UserService::new(&db_pool)
        .create(&settings, &new_user.username, &new_user.password, role, &new_user.full_name)
        .await?;

    log::info!("registered {} {}", user.role, user.username);
    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

pub async fn login(
    db_pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    credentials: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let user = UserService::new(&db_pool)
        .authenticate(&settings, &credentials.username, &credentials.password)
        .await?;

    let token = settings.issue_token(&user)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        user: user.into(),
    }))
}

pub async fn reset_password(
    db_pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    reset_password_credentials: web::Json<ResetPasswordCredentials>,
) -> Result<HttpResponse, ApiError> {
    let users = UserService::new(&db_pool);
    let user = users
        .authenticate(
            &settings,
            &reset_password_credentials.username,
            &reset_password_credentials.password,
        )
        .await?;

    users
        .update_password(&settings, user.id, &reset_password_credentials.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated" })))
}

pub async fn me(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
) -> Result<HttpResponse, ApiError> {
    let user = UserService::new(&db_pool).get(caller.id).await?;
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/reset-password", web::post().to(reset_password))
            .service(
                web::resource("/me")
                    .wrap(JwtMiddleware)
                    .route(web::get().to(me)),
            ),
    );
}
