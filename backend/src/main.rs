mod config;
mod error;
mod proxy;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::ServerConfig;
use proxy::Upstream;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::other(e)
    })?;
    let upstream = Upstream::new(&config).map_err(std::io::Error::other)?;

    if !config.frontend_dir.join("index.html").exists() {
        log::warn!(
            "No built frontend at {}. Run `trunk build` in frontend/ first.",
            config.frontend_dir.display()
        );
    }

    let frontend_dir = config.frontend_dir.clone();
    let payload_limit = config.payload_limit();
    let bind_address = config.bind_address();

    log::info!("Forwarding /api to {}", upstream.base());
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::PayloadConfig::new(payload_limit))
            .app_data(web::Data::new(upstream.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
