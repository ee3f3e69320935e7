use super::results::{render_detail_table, render_summary_table, render_tabs};
use super::utils::nav_link;
use crate::api;
use gloo_timers::callback::Interval;
use shared::{
    Applied, ClientConfig, JobId, Mode, PollOutcome, PollTicket, ProcessingState, Route, StartAnalysisRequest,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::html::Scope;
use yew::prelude::*;

pub enum Msg {
    StartSucceeded,
    StartFailed(String),
    PollTick,
    Polled(PollTicket, PollOutcome),
    RotateTip,
    SelectTab(String),
}

#[derive(Properties, PartialEq)]
pub struct ProcessingProps {
    pub job_id: JobId,
    pub mode: Option<Mode>,
    pub config: Rc<ClientConfig>,
    pub on_navigate: Callback<Route>,
}

/// The two repeating timers of one processing page. Dropping an `Interval`
/// cancels it, so dropping this scope stops both.
#[derive(Default)]
struct ViewTimers {
    poll: Option<Interval>,
    tips: Option<Interval>,
}

impl ViewTimers {
    fn start_polling(&mut self, link: &Scope<Processing>, period_ms: u32) {
        let link = link.clone();
        self.poll = Some(Interval::new(period_ms, move || link.send_message(Msg::PollTick)));
    }

    fn start_tips(&mut self, link: &Scope<Processing>, period_ms: u32) {
        let link = link.clone();
        self.tips = Some(Interval::new(period_ms, move || link.send_message(Msg::RotateTip)));
    }

    fn stop(&mut self) {
        self.poll = None;
        self.tips = None;
    }
}

pub struct Processing {
    state: ProcessingState,
    timers: ViewTimers,
}

impl Component for Processing {
    type Message = Msg;
    type Properties = ProcessingProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let state = ProcessingState::new(props.mode);
        let mut timers = ViewTimers::default();
        timers.start_tips(ctx.link(), props.config.tip_interval_ms);

        if state.owes_start_call() {
            let link = ctx.link().clone();
            let endpoints = props.config.endpoints();
            let job_id = props.job_id.clone();
            spawn_local(async move {
                match api::start_analysis(&endpoints, &job_id, &StartAnalysisRequest::comparison()).await {
                    Ok(()) => link.send_message(Msg::StartSucceeded),
                    Err(e) => link.send_message(Msg::StartFailed(e.to_string())),
                }
            });
        } else {
            Self::begin_polling(&mut timers, ctx);
        }

        Self { state, timers }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let applied = match msg {
            Msg::StartSucceeded => {
                let applied = self.state.start_succeeded();
                if applied == Applied::Updated {
                    Self::begin_polling(&mut self.timers, ctx);
                }
                applied
            }
            Msg::StartFailed(reason) => self.state.start_failed(&reason),
            Msg::PollTick => {
                self.send_poll(ctx);
                Applied::Ignored
            }
            Msg::Polled(ticket, outcome) => self.state.apply_poll(ticket, outcome),
            Msg::RotateTip => self.state.rotate_tip(),
            Msg::SelectTab(model_name) => self.state.select_tab(&model_name),
        };

        match applied {
            Applied::Ignored => false,
            Applied::Updated => true,
            Applied::Finished => {
                self.timers.stop();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if let Some(error) = self.state.error() {
            return html! {
                <div class="max-w-7xl mx-auto p-8 text-center">
                    <div class="bg-white p-8 rounded-xl shadow-lg">
                        <h1 class="text-2xl font-bold text-red-600">{"เกิดข้อผิดพลาด"}</h1>
                        <p class="text-gray-600 mt-2">{ error }</p>
                        <div class="mt-6">
                            { nav_link(Route::Upload, &ctx.props().on_navigate, "text-blue-600 underline", "กลับไปหน้าแรก") }
                        </div>
                    </div>
                </div>
            };
        }

        html! {
            <div class="max-w-7xl mx-auto p-4 sm:p-6 lg:p-8">
                {
                    match self.state.results() {
                        None => self.render_waiting(),
                        Some(_) => self.render_results(ctx),
                    }
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.state.teardown();
        self.timers.stop();
    }
}

impl Processing {
    /// Starts the poll interval and fires one poll right away.
    fn begin_polling(timers: &mut ViewTimers, ctx: &Context<Self>) {
        timers.start_polling(ctx.link(), ctx.props().config.poll_interval_ms);
        ctx.link().send_message(Msg::PollTick);
    }

    fn send_poll(&mut self, ctx: &Context<Self>) {
        let Some(ticket) = self.state.issue_ticket() else {
            return;
        };
        let link = ctx.link().clone();
        let endpoints = ctx.props().config.endpoints();
        let job_id = ctx.props().job_id.clone();

        spawn_local(async move {
            let outcome = match api::fetch_status(&endpoints, &job_id).await {
                Ok(status) => PollOutcome::Status(status),
                Err(e) => PollOutcome::Unreachable(e.to_string()),
            };
            link.send_message(Msg::Polled(ticket, outcome));
        });
    }

    fn render_waiting(&self) -> Html {
        let status = self.state.status();
        html! {
            <>
                <div class="bg-white p-8 rounded-xl shadow-lg text-center mb-8">
                    <div class="flex justify-center items-center mb-4">
                        <div class="animate-spin rounded-full h-12 w-12 border-b-2 border-blue-600"></div>
                    </div>
                    <h1 class="text-2xl font-bold text-gray-800">{ &status.message }</h1>
                    <p class="text-gray-500 mt-2 font-medium">{ &status.detail }</p>
                </div>
                <p class="text-center text-gray-600 mt-8 px-4">{ self.state.tip() }</p>
            </>
        }
    }

    fn render_results(&self, ctx: &Context<Self>) -> Html {
        let Some(results) = self.state.results() else {
            return html! {};
        };
        let props = ctx.props();
        let on_select = ctx.link().callback(Msg::SelectTab);
        let active = self
            .state
            .active_tab()
            .and_then(|name| results.get(name));

        html! {
            <div id="results-area">
                { render_summary_table(results) }
                { render_tabs(results, self.state.active_tab(), &on_select) }
                { active.map(render_detail_table).unwrap_or_default() }
                <div class="text-center mt-12 space-x-4">
                    <a href={props.config.endpoints().download_report(&props.job_id)}
                        class="bg-purple-600 text-white font-bold py-3 px-8 rounded-lg hover:bg-purple-700">
                        {"ดาวน์โหลด PDF"}
                    </a>
                    { nav_link(
                        Route::Upload,
                        &props.on_navigate,
                        "bg-gray-500 text-white font-bold py-3 px-8 rounded-lg hover:bg-gray-600",
                        "วิเคราะห์ใหม่อีกครั้ง",
                    ) }
                </div>
            </div>
        }
    }
}
