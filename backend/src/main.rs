mod analysis;
mod config;
mod error;
mod gemini;
mod routes;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use analysis::Analyzer;
use config::AppConfig;
use gemini::{GeminiClient, VisionModel};
use routes::configure_routes;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let model: Option<Arc<dyn VisionModel>> = match &config.api_key {
        Some(api_key) => {
            let client = GeminiClient::new(
                api_key,
                &config.api_base,
                &config.model,
                Duration::from_secs(config.analyzer.request_timeout_secs),
            )
            .map_err(|e| {
                log::error!("Failed to build Gemini client: {}", e);
                std::io::Error::other(e)
            })?;
            log::info!("Using model {} ({} mode)", config.model, config.mode);
            Some(Arc::new(client) as Arc<dyn VisionModel>)
        }
        None => {
            log::warn!(
                "GEMINI_API_KEY is not set. /api/analyze will answer every request with a configuration error."
            );
            None
        }
    };

    let analyzer = Analyzer::new(model, config.mode, config.analyzer.clone());
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);

    log::info!("Serving frontend from {}", frontend_dir);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
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
            .app_data(web::Data::new(analyzer.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
