use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::models::identity::CallerIdentity;
use crate::models::user::{NewUser, PublicUser, Role};
use crate::services::user_service::UserService;
use crate::utils::auth::AuthSettings;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

pub async fn list_supervisors(
    db_pool: web::Data<SqlitePool>,
    _caller: CallerIdentity,
) -> Result<HttpResponse, ApiError> {
    let supervisors: Vec<PublicUser> = UserService::new(&db_pool)
        .list_by_role(Role::Supervisor)
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();
    Ok(HttpResponse::Ok().json(supervisors))
}

pub async fn get_supervisor(
    db_pool: web::Data<SqlitePool>,
    _caller: CallerIdentity,
    supervisor_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = UserService::new(&db_pool)
        .get(supervisor_id.into_inner())
        .await
        .map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound("Supervisor"),
            other => other,
        })?;

    if user.role != Role::Supervisor {
        return Err(ApiError::NotFound("Supervisor"));
    }
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}

/// Admins create supervisor accounts; the `role` field of the body is ignored.
pub async fn add_supervisor(
    db_pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    caller: CallerIdentity,
    new_user: web::Json<NewUser>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Admin])?;

    let user = UserService::new(&db_pool)
        .create(
            &settings,
            &new_user.username,
            &new_user.password,
            Role::Supervisor,
            &new_user.full_name,
        )
        .await?;
    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/supervisors")
            .wrap(JwtMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(list_supervisors))
                    .route(web::post().to(add_supervisor)),
            )
            .route("/{id}", web::get().to(get_supervisor)),
    );
}
