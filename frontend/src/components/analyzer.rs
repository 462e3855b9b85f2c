use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{AnalysisResult, ApiConfig, MediaType, Ticket, Vote, Workflow, WorkflowError};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

use super::handlers;
use super::results::render_results;
use super::upload_section::render_upload_section;
use super::utils::render_error_message;

#[derive(Properties, PartialEq)]
pub struct AnalyzerProps {
    pub media: MediaType,
    pub api: ApiConfig,
}

pub enum Msg {
    // Input
    FileChosen(GlooFile),
    UrlChanged(String),
    TextChanged(String),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SetDragging(bool),

    // Analysis
    Submit,
    Analyzed(Ticket, Result<AnalysisResult, WorkflowError>),
    Reset,
    DismissError,

    // Feedback
    Vote(Vote),
    FeedbackSent(Ticket, Result<(), WorkflowError>),
}

/// Upload form, result card and feedback buttons for one media type.
pub struct Analyzer {
    pub workflow: Workflow<GlooFile>,
    pub preview_url: Option<ObjectUrl>,
    pub is_dragging: bool,
    paste_listener: Option<EventListener>,
}

impl Component for Analyzer {
    type Message = Msg;
    type Properties = AnalyzerProps;

    fn create(ctx: &Context<Self>) -> Self {
        let media = ctx.props().media;
        let mut analyzer = Self {
            workflow: Workflow::new(media),
            preview_url: None,
            is_dragging: false,
            paste_listener: None,
        };

        // Pasting screenshots is only useful for images.
        if media == MediaType::Image {
            if let Some(window) = web_sys::window() {
                let link = ctx.link().clone();
                let listener = EventListener::new(&window, "paste", move |event| {
                    if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                        link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                    }
                });
                analyzer.paste_listener = Some(listener);
            }
        }

        log::debug!("{} analyzer mounted", media);
        analyzer
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, file),
            Msg::UrlChanged(url) => handlers::handle_url_changed(self, url),
            Msg::TextChanged(text) => {
                self.workflow.set_text(text);
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::Submit => handlers::handle_submit(self, ctx),
            Msg::Analyzed(ticket, outcome) => self.workflow.finish_submit(ticket, outcome),
            Msg::Reset => handlers::handle_reset(self),
            Msg::DismissError => {
                self.workflow.dismiss_error();
                true
            }

            Msg::Vote(vote) => handlers::handle_vote(self, ctx, vote),
            Msg::FeedbackSent(ticket, outcome) => self.workflow.finish_feedback(ticket, outcome),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let media = ctx.props().media;
        let link = ctx.link();

        html! {
            <section class="analyzer">
                <h2 class="analyzer-title">{ format!("Analyze {}", media.as_ref()) }</h2>
                { render_upload_section(self, ctx) }
                { render_error_message(self.workflow.error(), link.callback(|_| Msg::DismissError)) }
                { render_results(self, ctx) }
            </section>
        }
    }

    fn destroy(&mut self, ctx: &Context<Self>) {
        log::debug!("{} analyzer unmounted", ctx.props().media);
        self.workflow.reset();
    }
}
