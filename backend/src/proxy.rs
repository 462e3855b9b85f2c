use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse};
use url::Url;

use crate::config::{ConfigError, ServerConfig};
use crate::error::ProxyError;

/// Forwards API calls to the detection service.
#[derive(Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base: Url,
}

impl Upstream {
    pub fn new(config: &ServerConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ConfigError::Upstream {
            url: config.upstream_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base: config.upstream()?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Relays `body` to `path` on the upstream, keeping the content type,
    /// and mirrors the upstream status, content type and body back.
    pub async fn forward(
        &self,
        path: &str,
        req: &HttpRequest,
        body: web::Bytes,
    ) -> Result<HttpResponse, ProxyError> {
        let url = self.base.join(path.trim_start_matches('/'))?;
        log::info!("Forwarding {} ({} bytes) to {}", req.path(), body.len(), url);

        let mut request = self.client.post(url.clone()).body(body.to_vec());
        if let Some(content_type) = req.headers().get(header::CONTENT_TYPE) {
            request = request.header("content-type", content_type.as_bytes());
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Upstream request to {} failed: {}", url, e);
            ProxyError::Upstream(e)
        })?;

        let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            log::warn!("Upstream {} answered {}", url, status);
        }

        let mut reply = HttpResponse::build(status);
        if let Some(content_type) = content_type {
            reply.insert_header((header::CONTENT_TYPE, content_type));
        }
        Ok(reply.body(bytes.to_vec()))
    }
}
