use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::user::Role;
use crate::utils::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ProjectType {
    #[serde(rename = "AI")]
    #[sqlx(rename = "AI")]
    Ai,
    Frontend,
    Backend,
    Flutter,
}

impl FromStr for ProjectType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AI" => Ok(ProjectType::Ai),
            "Frontend" => Ok(ProjectType::Frontend),
            "Backend" => Ok(ProjectType::Backend),
            "Flutter" => Ok(ProjectType::Flutter),
            other => Err(ApiError::validation(format!(
                "projectType must be one of AI, Frontend, Backend, Flutter (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Program {
    #[serde(rename = "BSSE")]
    #[sqlx(rename = "BSSE")]
    Bsse,
    #[serde(rename = "BSCS")]
    #[sqlx(rename = "BSCS")]
    Bscs,
    #[serde(rename = "BSAI")]
    #[sqlx(rename = "BSAI")]
    Bsai,
    #[serde(rename = "BS Networking")]
    #[sqlx(rename = "BS Networking")]
    BsNetworking,
}

impl FromStr for Program {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BSSE" => Ok(Program::Bsse),
            "BSCS" => Ok(Program::Bscs),
            "BSAI" => Ok(Program::Bsai),
            "BS Networking" => Ok(Program::BsNetworking),
            other => Err(ApiError::validation(format!(
                "program must be one of BSSE, BSCS, BSAI, BS Networking (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Accepted => "accepted",
            ProjectStatus::Rejected => "rejected",
        }
    }

    /// Supervisors decide pending projects once; admins may move a project
    /// to any other state, which is how a decision gets reopened.
    pub fn check_transition(self, next: ProjectStatus, role: Role) -> Result<(), ApiError> {
        let allowed = match role {
            Role::Student => return Err(ApiError::Forbidden),
            Role::Supervisor => {
                self == ProjectStatus::Pending && next != ProjectStatus::Pending
            }
            Role::Admin => self != next,
        };

        if allowed {
            Ok(())
        } else {
            Err(ApiError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(ProjectStatus::Pending),
            "accepted" => Ok(ProjectStatus::Accepted),
            "rejected" => Ok(ProjectStatus::Rejected),
            other => Err(ApiError::validation(format!(
                "status must be one of pending, accepted, rejected (got '{}')",
                other
            ))),
        }
    }
}

/// Stable sort putting accepted entries first; everything else keeps its order.
pub fn sort_accepted_first<T>(items: &mut [T], status: impl Fn(&T) -> ProjectStatus) {
    items.sort_by_key(|item| status(item) != ProjectStatus::Accepted);
}

/// Ordered list of group member names, each trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMembers(Vec<String>);

impl GroupMembers {
    /// Splits the comma-delimited value of the edit form.
    pub fn parse(raw: &str) -> GroupMembers {
        GroupMembers::from_list(raw.split(','))
    }

    pub fn from_list<I, S>(members: I) -> GroupMembers
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GroupMembers(
            members
                .into_iter()
                .map(|member| member.as_ref().trim().to_string())
                .filter(|member| !member.is_empty())
                .collect(),
        )
    }

    /// Inverse of [`GroupMembers::parse`], used to populate the edit form.
    pub fn to_form_value(&self) -> String {
        self.0.join(", ")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Group members as clients send them: a JSON array or one delimited string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMembersInput {
    List(Vec<String>),
    Delimited(String),
}

impl From<GroupMembersInput> for GroupMembers {
    fn from(input: GroupMembersInput) -> Self {
        match input {
            GroupMembersInput::List(list) => GroupMembers::from_list(list),
            GroupMembersInput::Delimited(raw) => GroupMembers::parse(&raw),
        }
    }
}

/// A row of the `projects` table; group members are stored as a JSON array.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub proposal: String,
    pub project_type: ProjectType,
    pub program: Program,
    pub group_members: String,
    pub status: ProjectStatus,
    pub student_id: i64,
    pub supervisor_id: i64,
    pub created_at: NaiveDateTime,
}

/// The project record as the admin edit form reads and writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "projectTitle")]
    pub title: String,
    pub description: String,
    pub proposal: String,
    pub project_type: ProjectType,
    pub program: Program,
    pub group_members: GroupMembers,
    pub status: ProjectStatus,
    pub student: i64,
    pub supervisor: i64,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ProjectRow> for Project {
    type Error = ApiError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            title: row.title,
            description: row.description,
            proposal: row.proposal,
            project_type: row.project_type,
            program: row.program,
            group_members: serde_json::from_str(&row.group_members)?,
            status: row.status,
            student: row.student_id,
            supervisor: row.supervisor_id,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ProjectViewRow {
    #[sqlx(flatten)]
    pub project: ProjectRow,
    pub supervisor_full_name: String,
    pub student_username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorProfile {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorRef {
    #[serde(rename = "_id")]
    pub id: i64,
    pub profile: SupervisorProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRef {
    #[serde(rename = "_id")]
    pub id: i64,
    pub username: String,
}

/// Project with its supervisor and student resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "projectTitle")]
    pub title: String,
    pub description: String,
    pub proposal: String,
    pub project_type: ProjectType,
    pub program: Program,
    pub group_members: GroupMembers,
    pub status: ProjectStatus,
    pub student: StudentRef,
    pub supervisor: SupervisorRef,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ProjectViewRow> for ProjectView {
    type Error = ApiError;

    fn try_from(row: ProjectViewRow) -> Result<Self, Self::Error> {
        let project = Project::try_from(row.project)?;
        Ok(ProjectView {
            id: project.id,
            title: project.title,
            description: project.description,
            proposal: project.proposal,
            project_type: project.project_type,
            program: project.program,
            group_members: project.group_members,
            status: project.status,
            student: StudentRef {
                id: project.student,
                username: row.student_username,
            },
            supervisor: SupervisorRef {
                id: project.supervisor,
                profile: SupervisorProfile {
                    full_name: row.supervisor_full_name,
                },
            },
            created_at: project.created_at,
        })
    }
}
