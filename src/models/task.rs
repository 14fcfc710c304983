use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "project")]
    pub project_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewTask {
    pub project: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}
