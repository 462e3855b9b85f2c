pub mod client;
pub mod error;
pub mod media;
pub mod model;
pub mod response;
pub mod workflow;

pub use client::{ApiClient, ApiConfig, HttpReply, Transport};
pub use error::{TransportError, WorkflowError};
pub use media::MediaType;
pub use model::{
    format_confidence, AnalysisRequest, AnalysisResult, ClassScore, ErrorBody, FeedbackRecord, FeedbackRequest,
    Input, InputKind, MediaId, RequestBody, SentenceVerdict, SuspiciousSpan, Vote,
};
pub use workflow::{Phase, Ticket, Workflow};
