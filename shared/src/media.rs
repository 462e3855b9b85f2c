use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::model::{InputKind, Vote};

/// The kinds of content the detection service can check.
///
/// The lowercase name doubles as the path segment of every endpoint,
/// e.g. `/api/check/audio`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Text,
    File,
}

impl MediaType {
    pub fn check_path(&self) -> String {
        format!("/api/check/{}", self)
    }

    pub fn feedback_path(&self) -> String {
        format!("/api/feedback/{}", self)
    }

    pub fn accepts(&self, kind: InputKind) -> bool {
        match self {
            MediaType::Text => kind == InputKind::Text,
            _ => matches!(kind, InputKind::File | InputKind::Url),
        }
    }

    /// The two verdicts offered after a result. Image results are rated
    /// as right or wrong, everything else as helpful or not.
    pub fn feedback_votes(&self) -> [Vote; 2] {
        match self {
            MediaType::Image => [Vote::Correct, Vote::Incorrect],
            _ => [Vote::Like, Vote::Dislike],
        }
    }

    /// MIME filter for the file picker. `None` lets any file through;
    /// text has no picker at all.
    pub fn accept_filter(&self) -> Option<&'static str> {
        match self {
            MediaType::Image => Some("image/*"),
            MediaType::Video => Some("video/*"),
            MediaType::Audio => Some("audio/*"),
            MediaType::Text | MediaType::File => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "Check Image",
            MediaType::Video => "Check Video",
            MediaType::Audio => "Check Audio",
            MediaType::Text => "Check Text",
            MediaType::File => "Check File",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MediaType::Image => "Upload or link an image for a deepfake check",
            MediaType::Video => "Upload or link a video file",
            MediaType::Audio => "Upload or link audio clips",
            MediaType::Text => "Submit suspicious text for analysis",
            MediaType::File => "Upload any file type for inspection",
        }
    }

    pub fn url_placeholder(&self) -> &'static str {
        match self {
            MediaType::Image => "https://example.com/image.jpg",
            MediaType::Video => "https://example.com/video.mp4",
            MediaType::Audio => "https://example.com/clip.mp3",
            MediaType::Text | MediaType::File => "https://example.com/document",
        }
    }
}
