use super::super::{Model, Msg, Page};
use yew::html::Scope;
use yew::prelude::*;

/// Renders the application header and navigation
pub fn render_header(current: Page, link: &Scope<Model>) -> Html {
    let nav_item = |label: &'static str, page: Page| {
        let active = current == page
            || matches!((current, page), (Page::Analyze(_), Page::Check));
        html! {
            <button
                class={classes!("nav-link", active.then_some("active"))}
                onclick={link.callback(move |_| Msg::Navigate(page))}
            >
                { label }
            </button>
        }
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-shield-halved"></i> {" Deepfake Detector"}</h1>
            <p class="subtitle">{"Check images, video, audio, text and files for manipulation"}</p>
            <nav class="app-nav">
                { nav_item("Home", Page::Home) }
                { nav_item("Check", Page::Check) }
            </nav>
        </header>
    }
}
