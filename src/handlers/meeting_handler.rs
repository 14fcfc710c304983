use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::models::identity::CallerIdentity;
use crate::models::meeting::{Meeting, NewMeeting};
use crate::models::user::Role;
use crate::services::project_service::ProjectService;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

pub async fn add_meeting(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    new_meeting: web::Json<NewMeeting>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Supervisor, Role::Admin])?;
    ProjectService::new(&db_pool)
        .get_visible(&caller, new_meeting.project)
        .await?;

    let result = sqlx::query(
        r#"
        INSERT INTO meetings (project_id, scheduled_by, scheduled_at, agenda)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(new_meeting.project)
    .bind(caller.id)
    .bind(new_meeting.scheduled_at)
    .bind(new_meeting.agenda.trim())
    .execute(db_pool.get_ref())
    .await?;

    let meeting = Meeting {
        id: result.last_insert_rowid(),
        project_id: new_meeting.project,
        scheduled_by: caller.id,
        scheduled_at: new_meeting.scheduled_at,
        agenda: new_meeting.agenda.trim().to_string(),
    };
    Ok(HttpResponse::Created().json(meeting))
}

pub async fn get_project_meetings(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let project = ProjectService::new(&db_pool)
        .get_visible(&caller, project_id.into_inner())
        .await?;

    let meetings: Vec<Meeting> = sqlx::query_as(
        r#"
        SELECT id, project_id, scheduled_by, scheduled_at, agenda
        FROM meetings
        WHERE project_id = ?
        ORDER BY scheduled_at
        "#,
    )
    .bind(project.id)
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(meetings))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/meetings")
            .wrap(JwtMiddleware)
            .route("", web::post().to(add_meeting))
            .route("/project/{id}", web::get().to(get_project_meetings)),
    );
}
