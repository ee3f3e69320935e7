mod api;
mod components;

use components::header::render_header;
use components::image_upload::ImageUpload;
use components::processing::Processing;
use components::select_model::SelectModel;
use components::utils::nav_link;
use gloo_events::EventListener;
use shared::{ClientConfig, HistorySink, Navigator, Route};
use std::rc::Rc;
use wasm_bindgen::JsValue;
use yew::prelude::*;

enum Msg {
    Navigate(Route),
    LocationChanged,
}

// Main component
struct App {
    navigator: Navigator,
    config: Rc<ClientConfig>,
    _popstate_listener: Option<EventListener>,
}

fn current_route() -> Route {
    let Some(location) = web_sys::window().map(|window| window.location()) else {
        return Route::Upload;
    };
    let path = location.pathname().unwrap_or_default();
    let query = location.search().unwrap_or_default();
    Route::parse(&path, &query)
}

struct BrowserHistory;

impl HistorySink for BrowserHistory {
    fn push(&mut self, href: &str) {
        let pushed = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no global `window` exists"))
            .and_then(|window| window.history())
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(href)));
        if let Err(e) = pushed {
            log::error!("Failed to push history entry: {:?}", e);
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = ClientConfig::default().with_api_base_url(option_env!("FACEBACK_API_URL"));
        log::info!("Using analysis backend at {}", config.api_base_url);

        let link = ctx.link().clone();
        let listener = web_sys::window().map(|window| {
            EventListener::new(&window, "popstate", move |_| link.send_message(Msg::LocationChanged))
        });

        Self {
            navigator: Navigator::new(current_route()),
            config: Rc::new(config),
            _popstate_listener: listener,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(route) => self.navigator.navigate(route, &mut BrowserHistory),
            Msg::LocationChanged => self.navigator.sync(current_route()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_navigate = ctx.link().callback(Msg::Navigate);

        html! {
            <div class="bg-gray-100 min-h-screen font-sans">
                { render_header(&on_navigate) }
                <main>
                    { self.render_route(on_navigate) }
                </main>
            </div>
        }
    }
}

impl App {
    fn render_route(&self, on_navigate: Callback<Route>) -> Html {
        let config = self.config.clone();
        let route = self.navigator.current();
        match route {
            Route::Upload => html! {
                <ImageUpload {config} {on_navigate} />
            },
            Route::SelectModel { job_id } => html! {
                <SelectModel key={route.href()} job_id={job_id.clone()} {config} {on_navigate} />
            },
            Route::Processing { job_id, mode } => html! {
                <Processing key={route.href()} job_id={job_id.clone()} mode={*mode} {config} {on_navigate} />
            },
            Route::NotFound => html! {
                <div class="max-w-4xl mx-auto p-8 text-center">
                    <p class="text-gray-600">{"ไม่พบหน้าที่ต้องการ"}</p>
                    { nav_link(Route::Upload, &on_navigate, "text-blue-600 underline", "กลับไปหน้าแรก") }
                </div>
            },
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
