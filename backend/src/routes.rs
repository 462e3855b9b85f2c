use std::path::PathBuf;
use std::str::FromStr;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;
use shared::{FeedbackRecord, MediaType};

use crate::error::ProxyError;
use crate::proxy::Upstream;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);

    // Client-side pages (/check/audio, ...) all boot from index.html.
    let index = frontend_dir.join("index.html");
    cfg.service(
        Files::new("/", frontend_dir)
            .index_file("index.html")
            .default_handler(fn_service(move |req: ServiceRequest| {
                let index = index.clone();
                async move {
                    let (req, _) = req.into_parts();
                    let file = NamedFile::open_async(index).await?;
                    let res = file.into_response(&req);
                    Ok(ServiceResponse::new(req, res))
                }
            })),
    );
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/check/{media}").route(web::post().to(forward_check)))
        .service(web::resource("/api/feedback/{media}").route(web::post().to(forward_feedback)));
}

fn parse_media(raw: &str) -> Result<MediaType, ProxyError> {
    MediaType::from_str(raw).map_err(|_| ProxyError::UnknownMedia(raw.to_string()))
}

async fn health(upstream: web::Data<Upstream>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upstream": upstream.base().as_str(),
    }))
}

async fn forward_check(
    upstream: web::Data<Upstream>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let media = parse_media(&path)?;
    upstream.forward(&media.check_path(), &req, body).await
}

async fn forward_feedback(
    upstream: web::Data<Upstream>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let media = parse_media(&path)?;
    let record: FeedbackRecord = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::BadRequest(format!("Invalid feedback: {}", e)))?;
    if !media.feedback_votes().contains(&record.feedback) {
        return Err(ProxyError::BadRequest(format!(
            "Feedback {} is not accepted for {}",
            record.feedback, media
        )));
    }
    info!("Feedback for {} {}: {}", media, record.media_id, record.feedback);
    upstream.forward(&media.feedback_path(), &req, body).await
}
