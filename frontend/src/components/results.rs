use super::analyzer::{Analyzer, Msg};
use shared::{format_confidence, AnalysisResult, SentenceVerdict, SuspiciousSpan};
use yew::prelude::*;

pub fn render_results(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let Some(result) = model.workflow.result() else {
        return html! {};
    };
    let manipulated = result.is_manipulated();
    let confidence = result.score * 100.0;

    html! {
        <div class={classes!("results-container", if manipulated { "ai-detected" } else { "not-ai" })} role="region" aria-live="polite">
            <div class="result-header">
                <h2>
                    {
                        if manipulated {
                            html! { <><i class="fa-solid fa-robot"></i>{ format!(" {}", result.display_label()) }</> }
                        } else {
                            html! { <><i class="fa-solid fa-camera"></i>{ format!(" {}", result.display_label()) }</> }
                        }
                    }
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                    </div>
                    <div class="meter-value">{ result.confidence_text() }</div>
                </div>
            </div>
            { render_heatmap(result) }
            { render_breakdown(result) }
            { render_suspicious(&result.suspicious) }
            { render_spans(&result.suspicious_spans) }
            { render_feedback(model, ctx) }
        </div>
    }
}

fn render_heatmap(result: &AnalysisResult) -> Html {
    match &result.heatmap_url {
        Some(url) => html! {
            <div class="heatmap">
                <span class="heatmap-label">{"Heatmap Visualization:"}</span>
                <img src={url.clone()} alt="Heatmap" />
            </div>
        },
        None => html! {},
    }
}

fn render_breakdown(result: &AnalysisResult) -> Html {
    if result.breakdown.len() < 2 {
        return html! {};
    }
    html! {
        <div class="detailed-results">
            <h3>{"Detailed Analysis"}</h3>
            <div class="result-bars">
                { for result.breakdown.iter().map(|class| {
                    let percentage = class.score * 100.0;
                    html! {
                        <div class="result-item">
                            <div class="result-label">{ class.label.replace('_', " ") }</div>
                            <div class="result-bar-container">
                                <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                            </div>
                            <div class="result-value">{ format_confidence(class.score) }</div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

fn render_suspicious(sentences: &[SentenceVerdict]) -> Html {
    if sentences.is_empty() {
        return html! {};
    }
    html! {
        <div class="suspicious-sentences">
            <h3>{"Suspicious Sentences"}</h3>
            <ol>
                { for sentences.iter().map(|sentence| html! {
                    <li key={sentence.index.to_string()}>{ sentence.text.clone() }</li>
                })}
            </ol>
        </div>
    }
}

fn render_spans(spans: &[SuspiciousSpan]) -> Html {
    if spans.is_empty() {
        return html! {};
    }
    html! {
        <div class="suspicious-spans">
            <h3>{"Suspicious Segments"}</h3>
            <ul>
                { for spans.iter().map(|span| html! { <li>{ span.describe() }</li> }) }
            </ul>
        </div>
    }
}

fn render_feedback(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let media = ctx.props().media;
    let sent = model.workflow.sent_vote();
    let pending = model.workflow.pending_vote().is_some();

    html! {
        <div class="feedback">
            <p class="feedback-prompt">{"Is the result correct?"}</p>
            <div class="button-container">
                { for media.feedback_votes().into_iter().map(|vote| {
                    let chosen = sent == Some(vote);
                    html! {
                        <button
                            type="button"
                            class={classes!("feedback-btn", vote.as_ref().to_string(), chosen.then_some("chosen"))}
                            disabled={chosen || pending}
                            aria-pressed={chosen.to_string()}
                            onclick={ctx.link().callback(move |_| Msg::Vote(vote))}
                        >
                            { vote.prompt_label() }
                        </button>
                    }
                })}
            </div>
            {
                match model.workflow.feedback_notice() {
                    Some(notice) => html! { <p class="feedback-notice">{ notice.to_string() }</p> },
                    None => html! {},
                }
            }
        </div>
    }
}
