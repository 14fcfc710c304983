pub mod claims;
pub mod credentials;
pub mod identity;
pub mod meeting;
pub mod project;
pub mod reset_password_credentials;
pub mod task;
pub mod token_response;
pub mod user;
