use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::dto::project_dto::{ProjectListQuery, UpdateProjectRequest};
use crate::models::identity::CallerIdentity;
use crate::models::project::ProjectStatus;
use crate::models::user::Role;
use crate::services::project_service::ProjectService;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

pub async fn list_projects(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    query: web::Query<ProjectListQuery>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Admin])?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ProjectStatus>)
        .transpose()?;

    let projects = ProjectService::new(&db_pool).list_all(status).await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub async fn get_project(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Admin])?;
    let project = ProjectService::new(&db_pool)
        .get(project_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn update_project(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
    changes: web::Json<UpdateProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Admin])?;
    let project = ProjectService::new(&db_pool)
        .update(project_id.into_inner(), changes.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(JwtMiddleware)
            .route("/projects", web::get().to(list_projects))
            .service(
                web::resource("/projects/{id}")
                    .route(web::get().to(get_project))
                    .route(web::put().to(update_project)),
            ),
    );
}
