mod api;
mod components;

use gloo_events::EventListener;
use gloo_storage::{LocalStorage, Storage};
use shared::{ApiConfig, MediaType};
use yew::prelude::*;

use components::analyzer::Analyzer;
use components::check_options::render_check_options;
use components::header::render_header;
use components::home::render_home;
use components::theme_toggle::render_theme_toggle;

const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    Check,
    Analyze(MediaType),
}

impl Page {
    /// Maps a location path onto a page. Unknown paths land on the home page.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["check"] => Page::Check,
            ["check", media] => media.parse().map(Page::Analyze).unwrap_or(Page::Check),
            _ => Page::Home,
        }
    }

    pub fn to_path(self) -> String {
        match self {
            Page::Home => "/".to_string(),
            Page::Check => "/check".to_string(),
            Page::Analyze(media) => format!("/check/{}", media),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn from_stored(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }
}

pub enum Msg {
    Navigate(Page),
    // Back/forward moved the location; the history entry already exists.
    LocationChanged(Page),
    ToggleTheme,
}

pub struct Model {
    page: Page,
    theme: Theme,
    api: ApiConfig,
    popstate_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let page = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|path| Page::from_path(&path))
            .unwrap_or(Page::Home);
        let theme = LocalStorage::get::<String>(THEME_KEY)
            .map(|value| Theme::from_stored(&value))
            .unwrap_or(Theme::Light);
        apply_theme(theme);

        let popstate_listener = web_sys::window().map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, "popstate", move |_| {
                if let Some(path) = web_sys::window().and_then(|w| w.location().pathname().ok()) {
                    link.send_message(Msg::LocationChanged(Page::from_path(&path)));
                }
            })
        });

        Self {
            page,
            theme,
            api: api::api_config(),
            popstate_listener,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(page) => self.handle_navigate(page),
            Msg::LocationChanged(page) => self.show_page(page),
            Msg::ToggleTheme => self.handle_toggle_theme(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="container">
                { render_header(self.page, link) }
                { render_theme_toggle(self.theme, link) }

                <main class="main-content">
                {
                    match self.page {
                        Page::Home => render_home(link),
                        Page::Check => render_check_options(link),
                        Page::Analyze(media) => html! {
                            <>
                                <button class="back-link" onclick={link.callback(|_| Msg::Navigate(Page::Check))}>
                                    <i class="fa-solid fa-arrow-left"></i>{" All checks"}
                                </button>
                                <Analyzer key={media.to_string()} {media} api={self.api.clone()} />
                            </>
                        },
                    }
                }
                </main>

                <footer class="app-footer">
                    <p>{"Deepfake Detector | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn handle_navigate(&mut self, page: Page) -> bool {
        if self.page == page {
            return false;
        }
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if let Err(err) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&page.to_path())) {
                log::warn!("Failed to update location: {:?}", err);
            }
        }
        log::debug!("Navigating to {}", page.to_path());
        self.show_page(page)
    }

    fn show_page(&mut self, page: Page) -> bool {
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }

    fn handle_toggle_theme(&mut self) -> bool {
        self.theme = self.theme.toggled();
        apply_theme(self.theme);
        if let Err(err) = LocalStorage::set(THEME_KEY, self.theme.as_str()) {
            log::warn!("Failed to persist theme: {}", err);
        }
        true
    }
}

fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let classes = body.class_list();
    let outcome = match theme {
        Theme::Dark => classes.add_1("dark-mode"),
        Theme::Light => classes.remove_1("dark-mode"),
    };
    if let Err(err) = outcome {
        log::warn!("Failed to apply theme: {:?}", err);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Starting deepfake detector frontend");
    yew::Renderer::<Model>::new().render();
}
