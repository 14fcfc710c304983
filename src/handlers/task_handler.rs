use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::models::identity::CallerIdentity;
use crate::models::task::{NewTask, Task};
use crate::models::user::Role;
use crate::services::project_service::ProjectService;
use crate::utils::error::ApiError;
use crate::utils::middleware::JwtMiddleware;

const TASK_COLUMNS: &str = "id, project_id, created_by, title, description, completed";

pub async fn add_task(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    new_task: web::Json<NewTask>,
) -> Result<HttpResponse, ApiError> {
    caller.require_role(&[Role::Supervisor, Role::Admin])?;
    let title = new_task.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("title must not be empty"));
    }
    ProjectService::new(&db_pool)
        .get_visible(&caller, new_task.project)
        .await?;

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (project_id, created_by, title, description, completed)
        VALUES (?, ?, ?, ?, 0)
        "#,
    )
    .bind(new_task.project)
    .bind(caller.id)
    .bind(title)
    .bind(new_task.description.trim())
    .execute(db_pool.get_ref())
    .await?;

    let task = Task {
        id: result.last_insert_rowid(),
        project_id: new_task.project,
        created_by: caller.id,
        title: title.to_string(),
        description: new_task.description.trim().to_string(),
        completed: false,
    };
    Ok(HttpResponse::Created().json(task))
}

pub async fn get_project_tasks(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    project_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let project = ProjectService::new(&db_pool)
        .get_visible(&caller, project_id.into_inner())
        .await?;

    let tasks: Vec<Task> = sqlx::query_as(&format!(
        "SELECT {} FROM tasks WHERE project_id = ? ORDER BY id",
        TASK_COLUMNS
    ))
    .bind(project.id)
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn complete_task(
    db_pool: web::Data<SqlitePool>,
    caller: CallerIdentity,
    task_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let mut task: Task = sqlx::query_as(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
        .bind(task_id.into_inner())
        .fetch_optional(db_pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Task"))?;

    ProjectService::new(&db_pool)
        .get_visible(&caller, task.project_id)
        .await?;

    sqlx::query("UPDATE tasks SET completed = 1 WHERE id = ?")
        .bind(task.id)
        .execute(db_pool.get_ref())
        .await?;

    task.completed = true;
    Ok(HttpResponse::Ok().json(task))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .wrap(JwtMiddleware)
            .route("", web::post().to(add_task))
            .route("/project/{id}", web::get().to(get_project_tasks))
            .route("/{id}/complete", web::put().to(complete_task)),
    );
}
