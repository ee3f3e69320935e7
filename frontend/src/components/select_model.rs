use super::utils::alert;
use crate::api;
use shared::lifecycle::Liveness;
use shared::{ClientConfig, JobId, Mode, ModelCatalog, Route, StartAnalysisRequest};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

const CATALOG_FAILED_ALERT: &str = "ไม่สามารถโหลดรายการโมเดลได้";
const START_FAILED_ALERT: &str = "ไม่สามารถเริ่มการวิเคราะห์ได้";

#[derive(Properties, PartialEq)]
pub struct SelectModelProps {
    pub job_id: JobId,
    pub config: Rc<ClientConfig>,
    pub on_navigate: Callback<Route>,
}

#[function_component(SelectModel)]
pub fn select_model(props: &SelectModelProps) -> Html {
    let catalog = use_state(ModelCatalog::default);
    let face_model = use_state(|| None::<String>);
    let bg_model = use_state(|| None::<String>);
    let starting = use_state(|| false);
    let liveness = use_memo((), |_| Liveness::new());

    // Fetch the catalog once per mount; ending liveness on unmount stops
    // late responses from touching state or navigating.
    {
        let catalog = catalog.clone();
        let face_model = face_model.clone();
        let bg_model = bg_model.clone();
        let endpoints = props.config.endpoints();
        let liveness = (*liveness).clone();

        use_effect_with((), move |_| {
            let in_flight = liveness.clone();
            spawn_local(async move {
                let fetched = api::fetch_models(&endpoints).await;
                if !in_flight.is_live() {
                    log::debug!("Dropping model catalog response after unmount");
                    return;
                }
                match fetched {
                    Ok(fetched) => {
                        log::info!(
                            "Loaded {} face and {} background model(s)",
                            fetched.face_models.len(),
                            fetched.bg_models.len()
                        );
                        let (face, bg) = fetched.default_choice();
                        face_model.set(face);
                        bg_model.set(bg);
                        catalog.set(fetched);
                    }
                    Err(e) => {
                        log::error!("Failed to fetch models: {}", e);
                        alert(CATALOG_FAILED_ALERT);
                    }
                }
            });
            move || liveness.end()
        });
    }

    let on_face_change = {
        let face_model = face_model.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            face_model.set(Some(select.value()));
        })
    };

    let on_bg_change = {
        let bg_model = bg_model.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            bg_model.set(Some(select.value()));
        })
    };

    let on_start = {
        let starting = starting.clone();
        let face_model = face_model.clone();
        let bg_model = bg_model.clone();
        let job_id = props.job_id.clone();
        let endpoints = props.config.endpoints();
        let on_navigate = props.on_navigate.clone();
        let liveness = (*liveness).clone();

        Callback::from(move |_: MouseEvent| {
            if *starting {
                return;
            }
            let (Some(face), Some(bg)) = ((*face_model).clone(), (*bg_model).clone()) else {
                return;
            };

            starting.set(true);
            let starting = starting.clone();
            let job_id = job_id.clone();
            let endpoints = endpoints.clone();
            let on_navigate = on_navigate.clone();
            let liveness = liveness.clone();

            spawn_local(async move {
                let request = StartAnalysisRequest::quick_analysis(face, bg);
                let started = api::start_analysis(&endpoints, &job_id, &request).await;
                liveness.run_if_live("start analysis result", move || match started {
                    Ok(()) => on_navigate.emit(Route::Processing {
                        job_id,
                        mode: Some(Mode::QuickAnalysis),
                    }),
                    Err(e) => {
                        log::error!("Error starting analysis: {}", e);
                        alert(START_FAILED_ALERT);
                        starting.set(false);
                    }
                });
            });
        })
    };

    let ready = face_model.is_some() && bg_model.is_some();

    html! {
        <div class="max-w-4xl mx-auto p-8">
            <div class="bg-white p-8 rounded-xl shadow-lg text-center">
                <h1 class="text-3xl font-bold text-gray-800">{"โหมดเจาะจง"}</h1>
                <p class="text-gray-500 mt-2">{"เลือกโมเดลที่ต้องการใช้ในการวิเคราะห์"}</p>

                <div class="mt-8 grid md:grid-cols-2 gap-8 text-left">
                    { render_selector("face_model", "โมเดลวิเคราะห์ใบหน้า", &catalog.face_models, face_model.as_deref(), on_face_change) }
                    { render_selector("bg_model", "โมเดลวิเคราะห์ฉากหลัง", &catalog.bg_models, bg_model.as_deref(), on_bg_change) }
                </div>

                <div class="mt-8">
                    <button
                        onclick={on_start}
                        disabled={*starting || !ready}
                        class="w-full md:w-1/2 bg-blue-600 text-white font-bold py-4 px-12 rounded-lg hover:bg-blue-700 transition disabled:opacity-50"
                    >
                        { if *starting { "กำลังเริ่มต้น..." } else { "เริ่มการวิเคราะห์" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

fn render_selector(
    id: &'static str,
    label: &'static str,
    models: &[String],
    selected: Option<&str>,
    onchange: Callback<Event>,
) -> Html {
    html! {
        <div>
            <label for={id} class="block text-sm font-medium text-gray-700 mb-2">{ label }</label>
            <select {id} {onchange}
                class="mt-1 block w-full py-2 px-3 border border-gray-300 bg-white rounded-lg shadow-sm focus:outline-none focus:ring-indigo-500 focus:border-indigo-500 sm:text-sm">
                { for models.iter().map(|model| html! {
                    <option key={model.clone()} value={model.clone()} selected={selected == Some(model.as_str())}>
                        { model }
                    </option>
                }) }
            </select>
        </div>
    }
}
