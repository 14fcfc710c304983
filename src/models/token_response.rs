use serde::{Serialize, Deserialize};

use crate::models::user::PublicUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: PublicUser,
}
