use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::dto::project_dto::{NewProjectRequest, StatusUpdateRequest};
use crate::models::identity::CallerIdentity;
use crate::models::project::ProjectStatus;
use crate::models::user::Role;
use crate::services::project_service::ProjectService;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

pub async fn add_project(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    new_project: web::Json<NewProjectRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = ProjectService::new(&db_pool)
        .create(&caller, new_project.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(project))
}

pub async fn my_projects(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
) -> Result<HttpResponse, ApiError> {
    let projects = ProjectService::new(&db_pool).list_for_caller(&caller).await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub async fn get_project_by_id(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let project = ProjectService::new(&db_pool)
        .get_view(&caller, project_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn set_project_status(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let status: ProjectStatus = body.status.parse()?;
    let project = ProjectService::new(&db_pool)
        .set_status(&caller, project_id.into_inner(), status)
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

pub async fn delete_project(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Admin])?;
    ProjectService::new(&db_pool)
        .delete(project_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/projects")
            .wrap(JwtMiddleware)
            .route("", web::post().to(add_project))
            .route("/myprojects", web::get().to(my_projects))
            .route("/{id}/status", web::put().to(set_project_status))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_project_by_id))
                    .route(web::delete().to(delete_project)),
            ),
    );
}
