use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{AnalysisRequest, ApiClient, FeedbackRequest, MediaType, Ticket, Vote, WorkflowError};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

use super::analyzer::{Analyzer, Msg};
use super::upload_section::FILE_INPUT_ID;
use super::utils::{clear_input_value, first_matching_file, matches_filter};
use crate::api::BrowserTransport;

pub fn handle_file_chosen(model: &mut Analyzer, file: GlooFile) -> bool {
    let media = model.workflow.media();
    model.preview_url = match media {
        MediaType::Image | MediaType::Video | MediaType::Audio => Some(ObjectUrl::from(file.clone())),
        MediaType::Text | MediaType::File => None,
    };
    model.workflow.set_file(file);
    true
}

pub fn handle_url_changed(model: &mut Analyzer, url: String) -> bool {
    model.preview_url = None;
    clear_input_value(FILE_INPUT_ID);
    model.workflow.set_url(url);
    true
}

pub fn handle_reset(model: &mut Analyzer) -> bool {
    model.workflow.reset();
    model.preview_url = None;
    model.is_dragging = false;
    clear_input_value(FILE_INPUT_ID);
    true
}

pub fn handle_drop(model: &mut Analyzer, ctx: &Context<Analyzer>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let media = model.workflow.media();
    let files = event.data_transfer().and_then(|dt| dt.files());
    match files.as_ref().and_then(|list| first_matching_file(list, media)) {
        Some(file) => ctx.link().send_message(Msg::FileChosen(file)),
        None => log::warn!("Dropped content has no {} file", media),
    }

    true
}

pub fn handle_paste(_model: &mut Analyzer, ctx: &Context<Analyzer>, event: ClipboardEvent) -> bool {
    let media = ctx.props().media;
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        if let Some(file) = file_list.item(0).filter(|f| matches_filter(media, &f.type_())) {
            event.prevent_default();
            ctx.link().send_message(Msg::FileChosen(GlooFile::from(file)));
            return true;
        }
    }
    false
}

pub fn handle_submit(model: &mut Analyzer, ctx: &Context<Analyzer>) -> bool {
    match model.workflow.begin_submit() {
        Ok((ticket, request)) => {
            send_analysis_request(ctx, ticket, request);
            true
        }
        // The button is disabled while a request runs.
        Err(WorkflowError::Busy) => false,
        Err(_) => true,
    }
}

pub fn handle_vote(model: &mut Analyzer, ctx: &Context<Analyzer>, vote: Vote) -> bool {
    match model.workflow.begin_feedback(vote) {
        Ok((ticket, request)) => {
            send_feedback(ctx, ticket, request);
            true
        }
        Err(WorkflowError::Busy) => false,
        Err(err) => {
            log::debug!("Feedback not sent: {}", err);
            true
        }
    }
}

fn send_analysis_request(ctx: &Context<Analyzer>, ticket: Ticket, request: AnalysisRequest<GlooFile>) {
    let link = ctx.link().clone();
    let client = ApiClient::new(ctx.props().api.clone(), BrowserTransport);

    spawn_local(async move {
        let outcome = client.analyze(request).await;
        link.send_message(Msg::Analyzed(ticket, outcome));
    });
}

fn send_feedback(ctx: &Context<Analyzer>, ticket: Ticket, request: FeedbackRequest) {
    let link = ctx.link().clone();
    let client = ApiClient::new(ctx.props().api.clone(), BrowserTransport);

    spawn_local(async move {
        let outcome = client.send_feedback(request).await;
        link.send_message(Msg::FeedbackSent(ticket, outcome));
    });
}
