use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};

use crate::media::MediaType;

/// Labels the detector uses for untouched content.
const PRISTINE_LABELS: [&str; 5] = ["original", "real", "authentic", "human", "genuine"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Url,
    Text,
}

/// The single active input of an analyzer. Selecting one kind replaces
/// any other, so a file and a URL can never be set at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<F> {
    File(F),
    Url(String),
    Text(String),
}

impl<F> Input<F> {
    pub fn kind(&self) -> InputKind {
        match self {
            Input::File(_) => InputKind::File,
            Input::Url(_) => InputKind::Url,
            Input::Text(_) => InputKind::Text,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Input::File(_) => false,
            Input::Url(s) | Input::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn file(&self) -> Option<&F> {
        match self {
            Input::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Input::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Multipart field name used for uploads on every endpoint.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody<F> {
    Multipart { field: &'static str, file: F },
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest<F> {
    pub media: MediaType,
    pub path: String,
    pub body: RequestBody<F>,
}

impl<F> AnalysisRequest<F> {
    /// Builds the request for `input`. URLs are sent trimmed, text as typed.
    pub fn new(media: MediaType, input: Input<F>) -> Self {
        let body = match input {
            Input::File(file) => RequestBody::Multipart {
                field: UPLOAD_FIELD,
                file,
            },
            Input::Url(url) => RequestBody::Json(serde_json::json!({ "url": url.trim() })),
            Input::Text(text) => RequestBody::Json(serde_json::json!({ "text": text })),
        };
        Self {
            media,
            path: media.check_path(),
            body,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fallback id for results the backend returned without one.
    pub fn generate(media: MediaType) -> Self {
        MediaId(format!("{}-{}", media, uuid::Uuid::new_v4()))
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        MediaId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceVerdict {
    #[serde(rename = "sentence_idx")]
    pub index: usize,
    pub text: String,
    #[serde(rename = "probabilities", default)]
    pub scores: std::collections::BTreeMap<String, f32>,
}

/// A stretch of a video or audio clip the detector flagged, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousSpan {
    pub start: f64,
    pub end: f64,
}

impl SuspiciousSpan {
    pub fn describe(&self) -> String {
        if self.start == self.end {
            format!("{:.1}s", self.start)
        } else {
            format!("{:.1}s to {:.1}s", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: String,
    pub score: f32,
    pub heatmap_url: Option<String>,
    pub media_id: MediaId,
    #[serde(default)]
    pub breakdown: Vec<ClassScore>,
    #[serde(default)]
    pub suspicious: Vec<SentenceVerdict>,
    #[serde(default)]
    pub suspicious_spans: Vec<SuspiciousSpan>,
}

impl AnalysisResult {
    /// The score as a percentage with two decimals, e.g. `87.00%`.
    pub fn confidence_text(&self) -> String {
        format_confidence(self.score)
    }

    pub fn display_label(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_manipulated(&self) -> bool {
        let label = self.label.to_lowercase();
        !PRISTINE_LABELS.contains(&label.as_str())
    }
}

pub fn format_confidence(score: f32) -> String {
    format!("{:.2}%", f64::from(score) * 100.0)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Vote {
    Like,
    Dislike,
    Correct,
    Incorrect,
}

impl Vote {
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Vote::Like => "👍 Yes",
            Vote::Dislike => "👎 No",
            Vote::Correct => "Yes",
            Vote::Incorrect => "No",
        }
    }
}

/// Body of `POST /api/feedback/{type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub media_id: MediaId,
    pub feedback: Vote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub media: MediaType,
    pub path: String,
    pub record: FeedbackRecord,
}

impl FeedbackRequest {
    pub fn new(media: MediaType, media_id: MediaId, vote: Vote) -> Self {
        Self {
            media,
            path: media.feedback_path(),
            record: FeedbackRecord {
                media_id,
                feedback: vote,
            },
        }
    }
}

/// Error payload returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
