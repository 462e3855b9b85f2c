use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::MediaType;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

/// Whether a file with `mime` may be checked as `media`.
pub fn matches_filter(media: MediaType, mime: &str) -> bool {
    match media.accept_filter() {
        None => true,
        Some(filter) => filter.split(',').any(|pattern| {
            let pattern = pattern.trim();
            match pattern.strip_suffix("/*") {
                Some(family) => mime.starts_with(&format!("{}/", family)),
                None => pattern == mime,
            }
        }),
    }
}

/// First file in the list that `media` accepts.
pub fn first_matching_file(file_list: &FileList, media: MediaType) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| matches_filter(media, &file.type_()))
        .map(GlooFile::from)
}

pub fn clear_input_value(id: &str) {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok());
    if let Some(input) = input {
        input.set_value("");
    }
}

pub fn render_error_message(error: Option<String>, on_dismiss: Callback<MouseEvent>) -> Html {
    if let Some(error_msg) = error {
        html! {
            <div class="error-message" role="alert">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
                <button class="dismiss-btn" title="Dismiss" onclick={on_dismiss}>
                    <i class="fa-solid fa-times"></i>
                </button>
            </div>
        }
    } else {
        html! {}
    }
}
