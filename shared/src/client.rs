use serde::{Deserialize, Serialize};

use crate::error::{FEEDBACK_FALLBACK, SERVER_FALLBACK, TransportError, WorkflowError};
use crate::model::{AnalysisRequest, AnalysisResult, ErrorBody, FeedbackRequest, RequestBody};
use crate::response::{UNEXPECTED_RESPONSE, normalize};

/// Raw HTTP reply as seen by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Sends one POST. Implemented over `fetch` in the browser and by
/// in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type File;

    async fn post(&self, url: &str, body: RequestBody<Self::File>) -> Result<HttpReply, TransportError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the detection API. Empty means same origin.
    #[serde(default)]
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub struct ApiClient<T> {
    config: ApiConfig,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn analyze(&self, request: AnalysisRequest<T::File>) -> Result<AnalysisResult, WorkflowError> {
        let url = self.config.endpoint(&request.path);
        log::debug!("POST {}", url);
        let reply = self.transport.post(&url, request.body).await?;

        if !reply.ok() {
            let message = reply
                .error_message()
                .unwrap_or_else(|| fallback_for_status(reply.status));
            log::warn!("{} answered {}: {}", url, reply.status, message);
            return Err(WorkflowError::Server {
                status: Some(reply.status),
                message,
            });
        }

        let body: serde_json::Value = serde_json::from_str(&reply.body).map_err(|err| {
            log::warn!("{} returned a non-JSON body: {}", url, err);
            WorkflowError::Server {
                status: Some(reply.status),
                message: UNEXPECTED_RESPONSE.to_string(),
            }
        })?;
        normalize(request.media, &body)
    }

    pub async fn send_feedback(&self, request: FeedbackRequest) -> Result<(), WorkflowError> {
        let url = self.config.endpoint(&request.path);
        let body = serde_json::to_value(&request.record)
            .map_err(|err| WorkflowError::Feedback(err.to_string()))?;

        let reply = self
            .transport
            .post(&url, RequestBody::Json(body))
            .await
            .map_err(|err| {
                log::warn!("feedback transport failure: {}", err);
                WorkflowError::Feedback(FEEDBACK_FALLBACK.to_string())
            })?;

        if reply.ok() {
            Ok(())
        } else {
            let message = reply
                .error_message()
                .unwrap_or_else(|| FEEDBACK_FALLBACK.to_string());
            Err(WorkflowError::Feedback(message))
        }
    }
}

fn fallback_for_status(status: u16) -> String {
    if status == 0 {
        SERVER_FALLBACK.to_string()
    } else {
        format!("Server responded with status {}.", status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use crate::model::{FeedbackRequest, Input, MediaId, Vote};
    use crate::workflow::{Phase, Workflow};
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeTransport {
        reply: Option<Result<HttpReply, TransportError>>,
        calls: RefCell<Vec<(String, RequestBody<Vec<u8>>)>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Some(Ok(HttpReply {
                    status,
                    body: body.to_string(),
                })),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                reply: Some(Err(TransportError::Send("connection refused".into()))),
                ..Default::default()
            }
        }
    }

    impl Transport for FakeTransport {
        type File = Vec<u8>;

        async fn post(&self, url: &str, body: RequestBody<Vec<u8>>) -> Result<HttpReply, TransportError> {
            self.calls.borrow_mut().push((url.to_string(), body));
            self.reply.clone().expect("unexpected request")
        }
    }

    fn client(transport: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::new(ApiConfig::new("http://localhost:8081/"), transport)
    }

    fn url_request(media: MediaType) -> AnalysisRequest<Vec<u8>> {
        AnalysisRequest::new(media, Input::Url("https://example.com/x".into()))
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        assert_eq!(ApiConfig::default().endpoint("/api/check/text"), "/api/check/text");
        assert_eq!(
            ApiConfig::new("http://localhost:5000/").endpoint("/api/check/text"),
            "http://localhost:5000/api/check/text"
        );
    }

    #[test]
    fn success_is_normalized() {
        let api = client(FakeTransport::replying(200, r#"{"label":"deepfake","score":0.87}"#));
        let result = block_on(api.analyze(url_request(MediaType::Video))).unwrap();
        assert_eq!(result.confidence_text(), "87.00%");

        let calls = api.transport().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://localhost:8081/api/check/video");
        assert_eq!(
            calls[0].1,
            RequestBody::Json(serde_json::json!({ "url": "https://example.com/x" }))
        );
    }

    #[test]
    fn error_field_is_surfaced() {
        let api = client(FakeTransport::replying(400, r#"{"error":"bad file"}"#));
        let err = block_on(api.analyze(url_request(MediaType::File))).unwrap_err();
        assert_eq!(err.user_message(), "bad file");
    }

    #[test]
    fn status_is_the_fallback_without_an_error_field() {
        let api = client(FakeTransport::replying(503, "<html>down</html>"));
        let err = block_on(api.analyze(url_request(MediaType::Audio))).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Server {
                status: Some(503),
                message: "Server responded with status 503.".into()
            }
        );
    }

    #[test]
    fn transport_failure_has_a_message() {
        let api = client(FakeTransport::failing());
        let err = block_on(api.analyze(url_request(MediaType::Image))).unwrap_err();
        assert!(matches!(err, WorkflowError::Network(_)));
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn garbage_success_body_is_a_server_error() {
        let api = client(FakeTransport::replying(200, "not json"));
        let err = block_on(api.analyze(url_request(MediaType::Image))).unwrap_err();
        assert_eq!(err.user_message(), UNEXPECTED_RESPONSE);
    }

    #[test]
    fn feedback_posts_the_record() {
        let api = client(FakeTransport::replying(200, "{}"));
        let request = FeedbackRequest::new(MediaType::Audio, MediaId::from("audio-7"), Vote::Like);
        block_on(api.send_feedback(request)).unwrap();

        let calls = api.transport().calls.borrow();
        assert_eq!(calls[0].0, "http://localhost:8081/api/feedback/audio");
        assert_eq!(
            calls[0].1,
            RequestBody::Json(serde_json::json!({ "mediaId": "audio-7", "feedback": "like" }))
        );
    }

    #[test]
    fn feedback_failures_are_feedback_errors() {
        let api = client(FakeTransport::replying(500, ""));
        let request = FeedbackRequest::new(MediaType::Text, MediaId::from("text-1"), Vote::Dislike);
        let err = block_on(api.send_feedback(request)).unwrap_err();
        assert_eq!(err, WorkflowError::Feedback(FEEDBACK_FALLBACK.into()));

        let api = client(FakeTransport::failing());
        let request = FeedbackRequest::new(MediaType::Text, MediaId::from("text-1"), Vote::Dislike);
        assert!(matches!(block_on(api.send_feedback(request)), Err(WorkflowError::Feedback(_))));
    }

    #[test]
    fn workflow_round_trip_over_a_fake_backend() {
        let api = client(FakeTransport::replying(
            200,
            r#"{"label":"deepfake","score":0.87,"media_id":"m-1"}"#,
        ));
        let mut flow: Workflow<Vec<u8>> = Workflow::new(MediaType::Image);
        flow.set_file(vec![0xff, 0xd8]);

        let (ticket, request) = flow.begin_submit().unwrap();
        let outcome = block_on(api.analyze(request));
        assert!(flow.finish_submit(ticket, outcome));
        assert_eq!(flow.phase(), Phase::Resulted);
        assert_eq!(flow.result().unwrap().media_id, MediaId::from("m-1"));

        let calls = api.transport().calls.borrow();
        assert!(matches!(calls[0].1, RequestBody::Multipart { field: "file", .. }));
    }

    #[test]
    fn validation_failure_never_reaches_the_transport() {
        let api = client(FakeTransport::default());
        let mut flow: Workflow<Vec<u8>> = Workflow::new(MediaType::Video);
        assert!(flow.begin_submit().is_err());
        assert!(flow.begin_feedback(Vote::Like).is_err());
        assert!(api.transport().calls.borrow().is_empty());
    }
}
