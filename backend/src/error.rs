use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Unknown media type: {0}")]
    UnknownMedia(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Detection service is unavailable.")]
    Upstream(#[from] reqwest::Error),
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UnknownMedia(_) => StatusCode::NOT_FOUND,
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
