//! Upload, analyze and feedback state machine for a single media type.
//!
//! The workflow performs no I/O. `begin_*` validates and hands back the
//! one request to send together with a [`Ticket`]; the caller performs the
//! request and reports the outcome through `finish_*`. Any input change or
//! reset bumps the generation, so outcomes of requests started before it
//! are dropped instead of leaking into the new state.

use crate::error::{
    ALREADY_RATED, FEEDBACK_FALLBACK, MISSING_INPUT, NO_RESULT, UNSUPPORTED_INPUT, WorkflowError,
};
use crate::media::MediaType;
use crate::model::{AnalysisRequest, AnalysisResult, FeedbackRequest, Input, Vote};

pub const FEEDBACK_THANKS: &str = "Feedback submitted successfully. Thank you!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InputReady,
    Submitting,
    Resulted,
    Failed,
    FeedbackPending,
    FeedbackSent,
}

/// Identifies one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
struct FeedbackState {
    pending: Option<(Ticket, Vote)>,
    sent: Option<Vote>,
    notice: Option<String>,
}

#[derive(Debug, Clone)]
enum Status {
    Waiting,
    Submitting(Ticket),
    Resulted(AnalysisResult, FeedbackState),
    Failed(WorkflowError),
}

#[derive(Debug, Clone)]
pub struct Workflow<F> {
    media: MediaType,
    input: Option<Input<F>>,
    status: Status,
    // Inline error that does not replace the status (validation, busy).
    notice: Option<WorkflowError>,
    generation: u64,
    seq: u64,
}

impl<F: Clone> Workflow<F> {
    pub fn new(media: MediaType) -> Self {
        Self {
            media,
            input: None,
            status: Status::Waiting,
            notice: None,
            generation: 0,
            seq: 0,
        }
    }

    pub fn media(&self) -> MediaType {
        self.media
    }

    pub fn phase(&self) -> Phase {
        match &self.status {
            Status::Waiting => match &self.input {
                Some(input) if !input.is_blank() => Phase::InputReady,
                _ => Phase::Idle,
            },
            Status::Submitting(_) => Phase::Submitting,
            Status::Failed(_) => Phase::Failed,
            Status::Resulted(_, feedback) => {
                if feedback.pending.is_some() {
                    Phase::FeedbackPending
                } else if feedback.sent.is_some() {
                    Phase::FeedbackSent
                } else {
                    Phase::Resulted
                }
            }
        }
    }

    pub fn input(&self) -> Option<&Input<F>> {
        self.input.as_ref()
    }

    pub fn set_file(&mut self, file: F) {
        self.replace_input(Input::File(file));
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.replace_input(Input::Url(url.into()));
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.replace_input(Input::Text(text.into()));
    }

    fn replace_input(&mut self, input: Input<F>) {
        log::debug!("{} input set ({:?})", self.media, input.kind());
        self.clear_outcome();
        self.input = Some(input);
    }

    pub fn reset(&mut self) {
        log::debug!("{} workflow reset", self.media);
        self.clear_outcome();
        self.input = None;
    }

    fn clear_outcome(&mut self) {
        self.generation += 1;
        self.status = Status::Waiting;
        self.notice = None;
    }

    fn next_ticket(&mut self) -> Ticket {
        self.seq += 1;
        Ticket {
            generation: self.generation,
            seq: self.seq,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.status, Status::Submitting(_))
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.input.as_ref().is_some_and(|input| !input.is_blank())
    }

    /// Validates the input and moves to `Submitting`.
    ///
    /// On a validation failure no request is produced and the error is
    /// kept as the inline notice.
    pub fn begin_submit(&mut self) -> Result<(Ticket, AnalysisRequest<F>), WorkflowError> {
        if self.is_submitting() {
            return Err(WorkflowError::Busy);
        }
        let input = match &self.input {
            Some(input) if !input.is_blank() => input.clone(),
            _ => return Err(self.reject(WorkflowError::validation(MISSING_INPUT))),
        };
        if !self.media.accepts(input.kind()) {
            return Err(self.reject(WorkflowError::validation(UNSUPPORTED_INPUT)));
        }

        let ticket = self.next_ticket();
        self.notice = None;
        self.status = Status::Submitting(ticket);
        log::debug!("{} submit started", self.media);
        Ok((ticket, AnalysisRequest::new(self.media, input)))
    }

    fn reject(&mut self, err: WorkflowError) -> WorkflowError {
        log::debug!("{} rejected: {}", self.media, err);
        self.notice = Some(err.clone());
        err
    }

    /// Applies the outcome of an analyze request. Returns `false` when
    /// the ticket is stale and nothing changed.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, WorkflowError>,
    ) -> bool {
        match self.status {
            Status::Submitting(current) if current == ticket => {}
            _ => {
                log::debug!("{} dropping stale analysis outcome", self.media);
                return false;
            }
        }
        self.status = match outcome {
            Ok(result) => {
                log::info!("{} analyzed: {} ({})", self.media, result.label, result.confidence_text());
                Status::Resulted(result, FeedbackState::default())
            }
            Err(err) => {
                log::warn!("{} analysis failed: {}", self.media, err);
                Status::Failed(err)
            }
        };
        true
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.status {
            Status::Resulted(result, _) => Some(result),
            _ => None,
        }
    }

    /// The inline error, if any: a failed analysis, a rejected action,
    /// or a failed feedback submission.
    pub fn error(&self) -> Option<String> {
        if let Some(notice) = &self.notice {
            return Some(notice.user_message_for(self.media));
        }
        match &self.status {
            Status::Failed(err) => Some(err.user_message_for(self.media)),
            _ => None,
        }
    }

    pub fn dismiss_error(&mut self) {
        self.notice = None;
        if matches!(self.status, Status::Failed(_)) {
            self.status = Status::Waiting;
        }
    }

    pub fn sent_vote(&self) -> Option<Vote> {
        match &self.status {
            Status::Resulted(_, feedback) => feedback.sent,
            _ => None,
        }
    }

    pub fn pending_vote(&self) -> Option<Vote> {
        match &self.status {
            Status::Resulted(_, feedback) => feedback.pending.map(|(_, vote)| vote),
            _ => None,
        }
    }

    pub fn feedback_notice(&self) -> Option<&str> {
        match &self.status {
            Status::Resulted(_, feedback) => feedback.notice.as_deref(),
            _ => None,
        }
    }

    pub fn begin_feedback(&mut self, vote: Vote) -> Result<(Ticket, FeedbackRequest), WorkflowError> {
        if self.result().is_none() {
            return Err(self.reject(WorkflowError::validation(NO_RESULT)));
        }
        let ticket = self.next_ticket();
        let media = self.media;
        let Status::Resulted(result, feedback) = &mut self.status else {
            return Err(WorkflowError::validation(NO_RESULT));
        };
        if feedback.pending.is_some() {
            return Err(WorkflowError::Busy);
        }
        if feedback.sent == Some(vote) {
            return Err(WorkflowError::validation(ALREADY_RATED));
        }

        feedback.pending = Some((ticket, vote));
        feedback.notice = Some("Submitting feedback...".to_string());
        let request = FeedbackRequest::new(media, result.media_id.clone(), vote);
        self.notice = None;
        log::debug!("{} feedback {} started", media, vote);
        Ok((ticket, request))
    }

    pub fn finish_feedback(&mut self, ticket: Ticket, outcome: Result<(), WorkflowError>) -> bool {
        let media = self.media;
        let Status::Resulted(_, feedback) = &mut self.status else {
            return false;
        };
        let vote = match feedback.pending {
            Some((pending, vote)) if pending == ticket => vote,
            _ => return false,
        };
        feedback.pending = None;
        match outcome {
            Ok(()) => {
                log::info!("{} feedback recorded: {}", media, vote);
                feedback.sent = Some(vote);
                feedback.notice = Some(FEEDBACK_THANKS.to_string());
            }
            Err(err) => {
                log::warn!("{} feedback failed: {}", media, err);
                feedback.notice = Some(FEEDBACK_FALLBACK.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaId, RequestBody};

    type Bytes = Vec<u8>;

    fn verdict() -> AnalysisResult {
        AnalysisResult {
            label: "deepfake".into(),
            score: 0.87,
            heatmap_url: None,
            media_id: MediaId::from("video-1"),
            breakdown: Vec::new(),
            suspicious: Vec::new(),
            suspicious_spans: Vec::new(),
        }
    }

    fn resulted(media: MediaType) -> Workflow<Bytes> {
        let mut flow = Workflow::new(media);
        flow.set_url("https://example.com/a");
        let (ticket, _) = flow.begin_submit().unwrap();
        assert!(flow.finish_submit(ticket, Ok(verdict())));
        flow
    }

    #[test]
    fn empty_inputs_are_rejected_without_a_request() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Video);
        assert_eq!(flow.begin_submit().unwrap_err(), WorkflowError::validation(MISSING_INPUT));
        flow.set_url("   ");
        assert_eq!(flow.begin_submit().unwrap_err(), WorkflowError::validation(MISSING_INPUT));
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.error().is_some());

        let mut text: Workflow<Bytes> = Workflow::new(MediaType::Text);
        text.set_text("\n\t ");
        assert!(text.begin_submit().unwrap_err().is_validation());
        assert!(!text.is_submitting());
        assert_eq!(text.error().as_deref(), Some("Please enter text to analyze."));
    }

    #[test]
    fn file_and_url_are_mutually_exclusive() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Audio);
        flow.set_file(vec![1, 2]);
        flow.set_url("https://example.com/clip.mp3");
        assert_eq!(flow.input(), Some(&Input::Url("https://example.com/clip.mp3".into())));
        flow.set_file(vec![3]);
        assert_eq!(flow.input().and_then(Input::url), None);
        assert_eq!(flow.input().and_then(Input::file), Some(&vec![3]));
    }

    #[test]
    fn submit_produces_one_request_and_blocks_a_second() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Image);
        flow.set_file(vec![9, 9]);
        assert_eq!(flow.phase(), Phase::InputReady);

        let (_, request) = flow.begin_submit().unwrap();
        assert_eq!(request.path, "/api/check/image");
        assert!(matches!(request.body, RequestBody::Multipart { field: "file", .. }));
        assert_eq!(flow.phase(), Phase::Submitting);
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_submit().unwrap_err(), WorkflowError::Busy);
    }

    #[test]
    fn text_media_rejects_urls() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Text);
        flow.set_url("https://example.com/post");
        assert_eq!(
            flow.begin_submit().unwrap_err(),
            WorkflowError::validation(UNSUPPORTED_INPUT)
        );
    }

    #[test]
    fn failure_is_recoverable_by_resubmitting() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::File);
        flow.set_url("https://example.com/a.pdf");
        let (ticket, _) = flow.begin_submit().unwrap();
        let err = WorkflowError::Server {
            status: Some(400),
            message: "bad file".into(),
        };
        assert!(flow.finish_submit(ticket, Err(err)));
        assert_eq!(flow.phase(), Phase::Failed);
        assert_eq!(flow.error().as_deref(), Some("bad file"));

        let (ticket, _) = flow.begin_submit().unwrap();
        assert!(flow.finish_submit(ticket, Ok(verdict())));
        assert_eq!(flow.phase(), Phase::Resulted);
        assert_eq!(flow.error(), None);
    }

    #[test]
    fn dismissing_a_failure_keeps_the_input() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Video);
        flow.set_url("https://example.com/v.mp4");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.finish_submit(ticket, Err(WorkflowError::Network("offline".into())));
        flow.dismiss_error();
        assert_eq!(flow.error(), None);
        assert_eq!(flow.phase(), Phase::InputReady);
    }

    #[test]
    fn reset_discards_late_responses() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Video);
        flow.set_url("https://example.com/v.mp4");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.reset();
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(!flow.finish_submit(ticket, Ok(verdict())));
        assert_eq!(flow.phase(), Phase::Idle);
        assert!(flow.result().is_none());
        assert!(flow.input().is_none());
    }

    #[test]
    fn new_input_orphans_the_running_request() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Audio);
        flow.set_url("https://example.com/one.mp3");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.set_url("https://example.com/two.mp3");
        assert!(!flow.finish_submit(ticket, Ok(verdict())));
        assert_eq!(flow.phase(), Phase::InputReady);
    }

    #[test]
    fn setting_input_clears_the_previous_result() {
        let mut flow = resulted(MediaType::Video);
        assert!(flow.result().is_some());
        flow.set_file(vec![1]);
        assert!(flow.result().is_none());
        assert_eq!(flow.sent_vote(), None);
    }

    #[test]
    fn feedback_requires_a_result() {
        let mut flow: Workflow<Bytes> = Workflow::new(MediaType::Text);
        let err = flow.begin_feedback(Vote::Like).unwrap_err();
        assert_eq!(err, WorkflowError::validation(NO_RESULT));
        assert_eq!(flow.error().as_deref(), Some("No analysis result to provide feedback on."));
    }

    #[test]
    fn feedback_lifecycle() {
        let mut flow = resulted(MediaType::Video);
        let (ticket, request) = flow.begin_feedback(Vote::Like).unwrap();
        assert_eq!(request.path, "/api/feedback/video");
        assert_eq!(request.record.media_id, MediaId::from("video-1"));
        assert_eq!(flow.phase(), Phase::FeedbackPending);
        assert_eq!(flow.begin_feedback(Vote::Dislike).unwrap_err(), WorkflowError::Busy);

        assert!(flow.finish_feedback(ticket, Ok(())));
        assert_eq!(flow.phase(), Phase::FeedbackSent);
        assert_eq!(flow.sent_vote(), Some(Vote::Like));
        assert_eq!(flow.feedback_notice(), Some(FEEDBACK_THANKS));

        // The same verdict twice is refused, switching is not.
        assert_eq!(
            flow.begin_feedback(Vote::Like).unwrap_err(),
            WorkflowError::validation(ALREADY_RATED)
        );
        let (ticket, _) = flow.begin_feedback(Vote::Dislike).unwrap();
        assert!(flow.finish_feedback(ticket, Ok(())));
        assert_eq!(flow.sent_vote(), Some(Vote::Dislike));
    }

    #[test]
    fn failed_feedback_keeps_the_result() {
        let mut flow = resulted(MediaType::Image);
        let (ticket, _) = flow.begin_feedback(Vote::Correct).unwrap();
        assert!(flow.finish_feedback(ticket, Err(WorkflowError::Feedback("down".into()))));
        assert_eq!(flow.phase(), Phase::Resulted);
        assert_eq!(flow.result().map(|r| r.label.as_str()), Some("deepfake"));
        assert_eq!(flow.feedback_notice(), Some(FEEDBACK_FALLBACK));
        assert_eq!(flow.sent_vote(), None);

        // Retry is allowed.
        assert!(flow.begin_feedback(Vote::Correct).is_ok());
    }

    #[test]
    fn feedback_outcome_after_reset_is_ignored() {
        let mut flow = resulted(MediaType::Audio);
        let (ticket, _) = flow.begin_feedback(Vote::Like).unwrap();
        flow.reset();
        assert!(!flow.finish_feedback(ticket, Ok(())));
        assert_eq!(flow.phase(), Phase::Idle);
    }
}
