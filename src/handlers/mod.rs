use actix_web::web;

use crate::utils::error::ApiError;

pub mod admin_handler;
pub mod auth_handler;
pub mod meeting_handler;
pub mod project_handler;
pub mod supervisor_handler;
pub mod task_handler;

/// JSON body config; malformed bodies become validation errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::validation(err.to_string()).into())
}

/// Registers every route scope together with the path and query extractor configs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    );

    auth_handler::init_routes(cfg);
    project_handler::init_routes(cfg);
    admin_handler::init_routes(cfg);
    supervisor_handler::init_routes(cfg);
    meeting_handler::init_routes(cfg);
    task_handler::init_routes(cfg);
}
