use super::super::{Model, Msg, Page};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_home(link: &Scope<Model>) -> Html {
    html! {
        <section class="hero">
            <h2>{"Is it real?"}</h2>
            <p>
                {"Upload a file or paste a link and our detectors will estimate whether it was \
                  generated or manipulated. Every verdict comes with a confidence score and, \
                  for images, a heatmap of the regions that drove the decision."}
            </p>
            <button class="analyze-btn" onclick={link.callback(|_| Msg::Navigate(Page::Check))}>
                <i class="fa-solid fa-magnifying-glass"></i>{" Start a check"}
            </button>
        </section>
    }
}
