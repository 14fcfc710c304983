use sqlx::SqlitePool;

use crate::dto::project_dto::{NewProjectRequest, UpdateProjectRequest};
use crate::models::identity::CallerIdentity;
use crate::models::project::{
    sort_accepted_first, GroupMembers, Program, Project, ProjectRow, ProjectStatus, ProjectType,
    ProjectView, ProjectViewRow,
};
use crate::models::user::Role;
use crate::utils::error::ApiError;

const PROJECT_COLUMNS: &str = r#"
    p.id, p.title, p.description, p.proposal, p.project_type, p.program,
    p.group_members, p.status, p.student_id, p.supervisor_id, p.created_at
"#;

/// Which projects a view query returns.
#[derive(Clone, Copy)]
enum Scope {
    Owner(i64),
    Supervisor(i64),
    Status(ProjectStatus),
    All,
}

impl Scope {
    fn for_caller(caller: &CallerIdentity) -> Scope {
        match caller.role {
            Role::Student => Scope::Owner(caller.id),
            Role::Supervisor => Scope::Supervisor(caller.id),
            Role::Admin => Scope::All,
        }
    }
}

pub struct ProjectService<'a> {
    db_pool: &'a SqlitePool,
}

impl<'a> ProjectService<'a> {
    pub fn new(db_pool: &'a SqlitePool) -> ProjectService<'a> {
        ProjectService { db_pool }
    }

    pub async fn create(
        &self,
        caller: &CallerIdentity,
        request: NewProjectRequest,
    ) -> Result<Project, ApiError> {
        caller.require_role(&[Role::Student])?;

        let title = required_text("projectTitle", &request.project_title)?;
        let project_type: ProjectType = request.project_type.parse()?;
        let program: Program = request.program.parse()?;
        let supervisor = request.supervisor.resolve("supervisor")?;
        self.ensure_supervisor(supervisor).await?;
        let group_members: GroupMembers = request.group_members.map(Into::into).unwrap_or_default();

        let result = sqlx::query(
            r#"
            INSERT INTO projects
                (title, description, proposal, project_type, program, group_members, status, student_id, supervisor_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(request.description.trim())
        .bind(request.proposal.trim())
        .bind(project_type)
        .bind(program)
        .bind(serde_json::to_string(&group_members)?)
        .bind(ProjectStatus::Pending)
        .bind(caller.id)
        .bind(supervisor)
        .execute(self.db_pool)
        .await?;

        let project = self.get(result.last_insert_rowid()).await?;
        log::info!("student {} submitted project {}", caller.id, project.id);
        Ok(project)
    }

    /// Projects visible to the caller, accepted ones first.
    pub async fn list_for_caller(&self, caller: &CallerIdentity) -> Result<Vec<ProjectView>, ApiError> {
        self.fetch_views(Scope::for_caller(caller)).await
    }

    pub async fn list_all(&self, status: Option<ProjectStatus>) -> Result<Vec<ProjectView>, ApiError> {
        let scope = match status {
            Some(status) => Scope::Status(status),
            None => Scope::All,
        };
        self.fetch_views(scope).await
    }

    /// The raw record, unscoped. Callers check visibility themselves.
    pub async fn get(&self, id: i64) -> Result<Project, ApiError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects p WHERE p.id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.db_pool)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

        Project::try_from(row)
    }

    pub async fn get_view(&self, caller: &CallerIdentity, id: i64) -> Result<ProjectView, ApiError> {
        let row = sqlx::query_as::<_, ProjectViewRow>(&format!(
            "{} WHERE p.id = ?",
            view_select()
        ))
        .bind(id)
        .fetch_optional(self.db_pool)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

        let view = ProjectView::try_from(row)?;
        ensure_visible(caller, view.student.id, view.supervisor.id)?;
        Ok(view)
    }

    /// Fetches a project and checks the caller may see it.
    pub async fn get_visible(&self, caller: &CallerIdentity, id: i64) -> Result<Project, ApiError> {
        let project = self.get(id).await?;
        ensure_visible(caller, project.student, project.supervisor)?;
        Ok(project)
    }

    /// Admin edit. Absent fields keep their value. The status column is only
    /// written when the request changes it.
    pub async fn update(&self, id: i64, changes: UpdateProjectRequest) -> Result<Project, ApiError> {
        let mut project = self.get(id).await?;
        let mut status_change = None;

        if let Some(title) = changes.project_title {
            project.title = required_text("projectTitle", &title)?.to_string();
        }
        if let Some(description) = changes.description {
            project.description = description.trim().to_string();
        }
        if let Some(proposal) = changes.proposal {
            project.proposal = proposal.trim().to_string();
        }
        if let Some(project_type) = changes.project_type {
            project.project_type = project_type.parse()?;
        }
        if let Some(program) = changes.program {
            project.program = program.parse()?;
        }
        if let Some(supervisor) = changes.supervisor {
            let supervisor = supervisor.resolve("supervisor")?;
            if supervisor != project.supervisor {
                self.ensure_supervisor(supervisor).await?;
                project.supervisor = supervisor;
            }
        }
        if let Some(group_members) = changes.group_members {
            project.group_members = group_members.into();
        }
        if let Some(status) = changes.status {
            let status: ProjectStatus = status.parse()?;
            if status != project.status {
                project.status.check_transition(status, Role::Admin)?;
                status_change = Some(status);
            }
        }

        self.write_changes(&project, status_change).await?;
        log::info!("project {} updated by admin", project.id);
        self.get(id).await
    }

    /// Writes the editable columns; `status` stays as stored when `None`.
    async fn write_changes(&self, project: &Project, status: Option<ProjectStatus>) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, description = ?, proposal = ?, project_type = ?, program = ?,
                group_members = ?, status = COALESCE(?, status), supervisor_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.proposal)
        .bind(project.project_type)
        .bind(project.program)
        .bind(serde_json::to_string(&project.group_members)?)
        .bind(status)
        .bind(project.supervisor)
        .bind(project.id)
        .execute(self.db_pool)
        .await?;

        Ok(())
    }

    pub async fn set_status(
        &self,
        caller: &CallerIdentity,
        id: i64,
        next: ProjectStatus,
    ) -> Result<Project, ApiError> {
        caller.require_role(&[Role::Supervisor, Role::Admin])?;

        let mut project = self.get(id).await?;
        if caller.role == Role::Supervisor && project.supervisor != caller.id {
            return Err(ApiError::Forbidden);
        }
        project.status.check_transition(next, caller.role)?;

        // No-op when the status changed since it was read.
        let result = sqlx::query("UPDATE projects SET status = ? WHERE id = ? AND status = ?")
            .bind(next)
            .bind(id)
            .bind(project.status)
            .execute(self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            let current = self.get(id).await?;
            return Err(ApiError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        log::info!(
            "project {} moved from {} to {} by {} {}",
            id,
            project.status,
            next,
            caller.role,
            caller.id
        );
        project.status = next;
        Ok(project)
    }

    /// Deletes a project with its meetings and tasks.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let mut transaction = self.db_pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = ?")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        sqlx::query("DELETE FROM meetings WHERE project_id = ?")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *transaction)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Project"));
        }

        transaction.commit().await?;
        log::info!("project {} deleted", id);
        Ok(())
    }

    async fn ensure_supervisor(&self, id: i64) -> Result<(), ApiError> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db_pool)
            .await?;

        match role {
            Some(Role::Supervisor) => Ok(()),
            _ => Err(ApiError::validation(format!("supervisor {} does not exist", id))),
        }
    }

    async fn fetch_views(&self, scope: Scope) -> Result<Vec<ProjectView>, ApiError> {
        let filter = match scope {
            Scope::Owner(_) => "WHERE p.student_id = ?",
            Scope::Supervisor(_) => "WHERE p.supervisor_id = ?",
            Scope::Status(_) => "WHERE p.status = ?",
            Scope::All => "",
        };
        let sql = format!("{} {} ORDER BY p.id", view_select(), filter);

        let query = sqlx::query_as::<_, ProjectViewRow>(&sql);
        let query = match scope {
            Scope::Owner(id) | Scope::Supervisor(id) => query.bind(id),
            Scope::Status(status) => query.bind(status),
            Scope::All => query,
        };

        let mut views = query
            .fetch_all(self.db_pool)
            .await?
            .into_iter()
            .map(ProjectView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        sort_accepted_first(&mut views, |view| view.status);
        Ok(views)
    }
}

fn view_select() -> String {
    format!(
        r#"
        SELECT {},
            s.full_name AS supervisor_full_name,
            u.username AS student_username
        FROM projects p
        JOIN users s ON s.id = p.supervisor_id
        JOIN users u ON u.id = p.student_id
        "#,
        PROJECT_COLUMNS
    )
}

/// Students see what they own, supervisors what they supervise, admins everything.
pub fn ensure_visible(caller: &CallerIdentity, student: i64, supervisor: i64) -> Result<(), ApiError> {
    let visible = match caller.role {
        Role::Student => student == caller.id,
        Role::Supervisor => supervisor == caller.id,
        Role::Admin => true,
    };
    if visible {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

fn required_text<'s>(field: &str, value: &'s str) -> Result<&'s str, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::validation(format!("{} must not be empty", field)))
    } else {
        Ok(value)
    }
}
