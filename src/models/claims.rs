use serde::{Serialize, Deserialize};

use crate::models::user::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}
