use super::super::{Model, Msg, Page};
use shared::MediaType;
use strum::IntoEnumIterator;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_check_options(link: &Scope<Model>) -> Html {
    html! {
        <section class="check-options">
            <h2>{"Choose what you want to check"}</h2>
            <div class="option-grid">
                { for MediaType::iter().map(|media| html! {
                    <button
                        type="button"
                        class="option-card"
                        key={media.to_string()}
                        aria-label={format!("Select option to {}", media.label().to_lowercase())}
                        onclick={link.callback(move |_| Msg::Navigate(Page::Analyze(media)))}
                    >
                        <i class={classes!("fa-solid", option_icon(media))}></i>
                        <span class="option-label">{ media.label() }</span>
                        <p class="option-description">{ media.description() }</p>
                    </button>
                })}
            </div>
        </section>
    }
}

fn option_icon(media: MediaType) -> &'static str {
    match media {
        MediaType::Image => "fa-image",
        MediaType::Video => "fa-film",
        MediaType::Audio => "fa-microphone",
        MediaType::Text => "fa-align-left",
        MediaType::File => "fa-file",
    }
}
