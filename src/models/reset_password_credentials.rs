use serde::{Serialize, Deserialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordCredentials {
    pub username: String,
    pub password: String,
    pub new_password: String,
}
