use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;
use log::{error, info, warn};
use shared::{AnalysisResult, HealthResponse};

use crate::analysis::Analyzer;
use crate::analysis::upload::UploadedImage;
use crate::error::AnalyzeError;

const IMAGE_FIELD: &str = "image";

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/analyze").route(web::post().to(analyze_image)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn analyze_image(
    analyzer: web::Data<Analyzer>,
    payload: Multipart,
) -> Result<HttpResponse, AnalyzeError> {
    match run_analysis(&analyzer, payload).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            match &e {
                AnalyzeError::MissingApiKey | AnalyzeError::Upstream(_) => {
                    error!("Analyze request failed: {}", e)
                }
                _ => warn!("Analyze request rejected: {}", e),
            }
            Err(e)
        }
    }
}

async fn run_analysis(
    analyzer: &Analyzer,
    mut payload: Multipart,
) -> Result<AnalysisResult, AnalyzeError> {
    // Credentials are checked before the body is touched.
    analyzer.ensure_configured()?;
    let image = read_image_field(&mut payload, analyzer.settings().max_image_bytes).await?;
    analyzer.analyze(&image).await
}

/// Returns the first non-empty `image` field. Other fields are drained.
async fn read_image_field(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedImage, AnalyzeError> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some(IMAGE_FIELD) {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let declared_type = field.content_type().map(|m| m.essence_str().to_string());
        let mut image_data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if image_data.len() + chunk.len() > max_bytes {
                return Err(AnalyzeError::ImageTooLarge {
                    size: image_data.len() + chunk.len(),
                    limit: max_bytes,
                });
            }
            image_data.extend_from_slice(&chunk);
        }

        if image_data.is_empty() {
            continue;
        }

        info!("Received image field ({} bytes)", image_data.len());
        return UploadedImage::new(image_data, declared_type.as_deref(), max_bytes);
    }

    Err(AnalyzeError::MissingImage)
}

async fn health(analyzer: web::Data<Analyzer>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        api_key_configured: analyzer.is_configured(),
        mode: analyzer.mode(),
    })
}
