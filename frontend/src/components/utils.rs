use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use shared::Route;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

const ACCEPTED_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || inner_callback()));
    })
}

/// PNG and JPEG files from a picker or drop, in list order.
pub fn extract_image_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .filter(|file| {
            let accepted = ACCEPTED_TYPES.contains(&file.type_().as_str());
            if !accepted {
                log::warn!("Skipping non-image file: {}", file.name());
            }
            accepted
        })
        .map(GlooFile::from)
        .collect()
}

/// Blocking notification, the way every submission or start failure is reported.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if window.alert_with_message(message).is_err() {
            log::error!("Could not show alert: {}", message);
        }
    }
}

/// An in-app link: a real href for middle-click, client-side navigation otherwise.
pub fn nav_link(route: Route, on_navigate: &Callback<Route>, class: &'static str, label: &str) -> Html {
    let href = route.href();
    let onclick = on_navigate.reform(move |e: MouseEvent| {
        e.prevent_default();
        route.clone()
    });

    html! {
        <a {href} {class} {onclick}>{ label }</a>
    }
}
