use crate::media::MediaType;

pub const MISSING_INPUT: &str = "missing input";
pub const NO_RESULT: &str = "no result to rate";
pub const UNSUPPORTED_INPUT: &str = "unsupported input";
pub const ALREADY_RATED: &str = "feedback already recorded";

pub(crate) const NETWORK_FALLBACK: &str = "Failed to reach the detection service.";
pub(crate) const SERVER_FALLBACK: &str = "Failed to fetch from server.";
pub(crate) const FEEDBACK_FALLBACK: &str = "Error submitting feedback. Please try again later.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("A request is already in progress")]
    Busy,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {message}")]
    Server { status: Option<u16>, message: String },
    #[error("Feedback error: {0}")]
    Feedback(String),
}

impl WorkflowError {
    pub fn validation(reason: &str) -> Self {
        WorkflowError::Validation(reason.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }

    /// Inline text for an analyzer of `media`. Only the empty-input
    /// prompt differs between media types.
    pub fn user_message_for(&self, media: MediaType) -> String {
        match self {
            WorkflowError::Validation(reason) if reason == MISSING_INPUT && media == MediaType::Text => {
                "Please enter text to analyze.".to_string()
            }
            _ => self.user_message(),
        }
    }

    /// Text shown inline under the form.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(reason) => match reason.as_str() {
                MISSING_INPUT => "Please upload a file or enter a valid URL.".to_string(),
                NO_RESULT => "No analysis result to provide feedback on.".to_string(),
                UNSUPPORTED_INPUT => "This input is not supported for this media type.".to_string(),
                ALREADY_RATED => "You already sent this feedback.".to_string(),
                other => other.to_string(),
            },
            WorkflowError::Busy => "Please wait for the current request to finish.".to_string(),
            WorkflowError::Network(message)
            | WorkflowError::Server { message, .. }
            | WorkflowError::Feedback(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request could not be built: {0}")]
    Build(String),
    #[error("Request failed: {0}")]
    Send(String),
    #[error("Response body unreadable: {0}")]
    Body(String),
}

impl From<TransportError> for WorkflowError {
    fn from(err: TransportError) -> Self {
        log::warn!("transport failure: {}", err);
        WorkflowError::Network(NETWORK_FALLBACK.to_string())
    }
}
