use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{ApiConfig, HttpReply, RequestBody, Transport, TransportError};
use web_sys::FormData;

/// `fetch`-backed transport used by every analyzer.
#[derive(Clone, Copy, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    type File = GlooFile;

    async fn post(&self, url: &str, body: RequestBody<GlooFile>) -> Result<HttpReply, TransportError> {
        let request = match body {
            RequestBody::Multipart { field, file } => {
                let form_data = FormData::new()
                    .map_err(|e| TransportError::Build(format!("{:?}", e)))?;
                form_data
                    .append_with_blob_and_filename(field, file.as_ref(), &file.name())
                    .map_err(|e| TransportError::Build(format!("{:?}", e)))?;
                Request::post(url).body(form_data)
            }
            RequestBody::Json(value) => Request::post(url).json(&value),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}

/// API origin baked in at build time, e.g.
/// `DETECTOR_API_BASE=http://localhost:8081 trunk build`.
/// Unset means the site and the API share an origin.
pub fn api_config() -> ApiConfig {
    ApiConfig::new(option_env!("DETECTOR_API_BASE").unwrap_or_default())
}
