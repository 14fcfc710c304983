use serde::{Deserialize, Serialize};

use crate::models::project::GroupMembersInput;
use crate::utils::error::ApiError;

/// A user reference as forms send it: a number or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Id(i64),
    Text(String),
}

impl IdInput {
    pub fn resolve(&self, field: &str) -> Result<i64, ApiError> {
        match self {
            IdInput::Id(id) => Ok(*id),
            IdInput::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ApiError::validation(format!("{} must be a user id (got '{}')", field, raw))),
        }
    }
}

/// Student submission. Enumerations arrive as strings and are checked by the service.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    pub project_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub proposal: String,
    pub project_type: String,
    pub program: String,
    pub supervisor: IdInput,
    #[serde(default)]
    pub group_members: Option<GroupMembersInput>,
}

/// Admin edit; absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_title: Option<String>,
    pub description: Option<String>,
    pub proposal: Option<String>,
    pub project_type: Option<String>,
    pub program: Option<String>,
    pub supervisor: Option<IdInput>,
    pub group_members: Option<GroupMembersInput>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<String>,
}
