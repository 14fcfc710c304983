use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "project")]
    pub project_id: i64,
    pub scheduled_by: i64,
    pub scheduled_at: DateTime<Utc>,
    pub agenda: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub project: i64,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub agenda: String,
}
