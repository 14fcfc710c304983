mod dto;
mod handlers;
mod models;
mod services;
mod utils;

#[cfg(test)]
mod tests;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::io;

use crate::services::user_service::UserService;
use crate::utils::auth::AuthSettings;
use crate::utils::config::Config;
use crate::utils::database;

fn cors(origin: Option<&str>) -> Cors {
    let cors = match origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = database::connect(&config).await.map_err(|e| {
        log::error!("Database connection error: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    log::info!("Database ready at {}", config.database_url);

    let settings = AuthSettings::from_config(&config);

    if let Some((username, password)) = &config.admin_credentials {
        match UserService::new(&pool).ensure_admin(&settings, username, password).await {
            Ok(true) => log::info!("Created admin account {}", username),
            Ok(false) => log::debug!("Admin account {} already exists", username),
            Err(e) => log::error!("Could not create admin account {}: {}", username, e),
        }
    }

    let bind_address = config.bind_address.clone();
    log::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(config.cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(handlers::json_config(config.json_limit_bytes))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(settings.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
