use super::analyzer::{Analyzer, Msg};
use super::utils::{debounce, first_matching_file};
use shared::{InputKind, MediaType};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

pub const FILE_INPUT_ID: &str = "file-input";

pub fn render_upload_section(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let media = ctx.props().media;
    let link = ctx.link();
    let onsubmit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Submit
    });

    html! {
        <form class="upload-section" {onsubmit} novalidate=true>
            {
                if media.accepts(InputKind::Text) {
                    render_text_area(model, ctx)
                } else {
                    html! {
                        <>
                            { render_file_input_area(model, ctx) }
                            { render_url_input(model, ctx) }
                        </>
                    }
                }
            }
            { render_buttons(model, ctx) }
        </form>
    }
}

fn render_file_input_area(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let media = ctx.props().media;
    let link = ctx.link();

    let handle_change = link.batch_callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input
            .files()
            .and_then(|files| first_matching_file(&files, media))
            .map(Msg::FileChosen)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(FILE_INPUT_ID))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    let selected = model.workflow.input().and_then(|input| input.file()).map(|file| file.name());

    html! {
        <>
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept={media.accept_filter()}
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                {
                    match selected {
                        Some(name) => html! {
                            <div class="upload-placeholder">
                                <i class="fa-solid fa-file-circle-check"></i>
                                <p class="selected-file">{ name }</p>
                            </div>
                        },
                        None => html! {
                            <div class="upload-placeholder">
                                <i class="fa-solid fa-cloud-arrow-up"></i>
                                <p>{ format!("Drag & drop a {} file here, or click to browse", media) }</p>
                                {
                                    if media == MediaType::Image {
                                        html! { <p class="file-types">{"You can also paste an image"}</p> }
                                    } else {
                                        html! {}
                                    }
                                }
                            </div>
                        },
                    }
                }
            </div>
            { render_preview(model, media) }
        </>
    }
}

fn render_preview(model: &Analyzer, media: MediaType) -> Html {
    let Some(url) = model.preview_url.as_ref().map(|u| u.to_string()) else {
        return html! {};
    };
    match media {
        MediaType::Image => html! { <img class="media-preview" src={url} alt="Selected image" /> },
        MediaType::Video => html! { <video class="media-preview" src={url} controls=true /> },
        MediaType::Audio => html! { <audio class="media-preview" src={url} controls=true /> },
        MediaType::Text | MediaType::File => html! {},
    }
}

fn render_url_input(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let media = ctx.props().media;
    let oninput = ctx.link().callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UrlChanged(input.value())
    });
    let value = model.workflow.input().and_then(|input| input.url()).unwrap_or_default().to_string();

    html! {
        <div class="url-input">
            <label for="url-input">{ format!("Or enter a {} URL", media) }</label>
            <input
                type="url"
                id="url-input"
                placeholder={media.url_placeholder()}
                {value}
                {oninput}
            />
        </div>
    }
}

fn render_text_area(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let oninput = ctx.link().callback(|e: InputEvent| {
        let area: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::TextChanged(area.value())
    });
    let value = model.workflow.input().and_then(|input| input.text()).unwrap_or_default().to_string();

    html! {
        <textarea
            class="text-input"
            placeholder="Paste suspicious text here..."
            spellcheck="false"
            aria-label="Input text to analyze"
            {value}
            {oninput}
        />
    }
}

fn render_buttons(model: &Analyzer, ctx: &Context<Analyzer>) -> Html {
    let link = ctx.link().clone();
    let submitting = model.workflow.is_submitting();

    html! {
        <div class="button-container">
            <button type="submit" class="analyze-btn" disabled={submitting}>
                {
                    if submitting {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze {}", ctx.props().media) }</> }
                    }
                }
            </button>
            <button
                type="button"
                class="analyze-btn clear-btn"
                onclick={debounce(300, move || link.send_message(Msg::Reset))}
            >
                <i class="fa-solid fa-trash"></i>{" Reset"}
            </button>
        </div>
    }
}
