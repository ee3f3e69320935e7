use super::utils::{alert, debounce, extract_image_files};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::upload::{CountHint, ImageSelection, NamedImage, SelectionError};
use shared::{ClientConfig, Mode, Route};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

const MISSING_MODE_ALERT: &str = "กรุณาเลือกโหมดการทำงาน";
const UPLOAD_FAILED_ALERT: &str = "เกิดข้อผิดพลาดในการอัปโหลดไฟล์";

/// A picked file and its preview. The object URL is revoked when the entry
/// is dropped: on removal or when the page goes away, and only then.
pub struct SelectedImage {
    file: GlooFile,
    preview: ObjectUrl,
}

impl SelectedImage {
    fn new(file: GlooFile) -> Self {
        let preview = ObjectUrl::from(file.clone());
        Self { file, preview }
    }
}

impl NamedImage for SelectedImage {
    fn file_name(&self) -> String {
        self.file.name()
    }
}

pub enum Msg {
    FilesPicked(Vec<GlooFile>),
    RemoveImage(usize),
    SetMode(Mode),
    SetDragging(bool),
    HandleDrop(DragEvent),
    Submit,
    Submitted(Route),
    SubmitFailed(String),
}

#[derive(Properties, PartialEq)]
pub struct ImageUploadProps {
    pub config: Rc<ClientConfig>,
    pub on_navigate: Callback<Route>,
}

pub struct ImageUpload {
    selection: ImageSelection<SelectedImage>,
    mode: Option<Mode>,
    submitting: bool,
    is_dragging: bool,
}

impl Component for ImageUpload {
    type Message = Msg;
    type Properties = ImageUploadProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            selection: ImageSelection::new(),
            mode: None,
            submitting: false,
            is_dragging: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FilesPicked(files) => {
                let added = self.selection.extend(files.into_iter().map(SelectedImage::new));
                log::debug!("Added {} image(s), {} selected", added, self.selection.len());
                added > 0
            }
            Msg::RemoveImage(index) => self.selection.remove(index).is_some(),
            Msg::SetMode(mode) => {
                let changed = self.mode != Some(mode);
                self.mode = Some(mode);
                changed
            }
            Msg::SetDragging(is_dragging) => {
                let changed = self.is_dragging != is_dragging;
                self.is_dragging = is_dragging;
                changed
            }
            Msg::HandleDrop(event) => {
                event.prevent_default();
                self.is_dragging = false;
                let files = event
                    .data_transfer()
                    .and_then(|transfer| transfer.files())
                    .map(|list| extract_image_files(&list))
                    .unwrap_or_default();
                if !files.is_empty() {
                    ctx.link().send_message(Msg::FilesPicked(files));
                }
                true
            }
            Msg::Submit => self.handle_submit(ctx),
            Msg::Submitted(route) => {
                log::info!("Upload accepted, continuing to {}", route.href());
                ctx.props().on_navigate.emit(route);
                false
            }
            Msg::SubmitFailed(reason) => {
                log::error!("Upload Error: {}", reason);
                alert(UPLOAD_FAILED_ALERT);
                self.submitting = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let limits = ctx.props().config.image_limits;
        let hint = CountHint::for_count(self.selection.len(), limits);
        let disabled = self.submitting || !self.selection.can_submit(self.mode, limits);
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="max-w-4xl mx-auto p-8">
                <div class="bg-white p-8 rounded-xl shadow-lg text-center">
                    <div class="flex justify-center">
                        <img src="/cover.png" alt="Cover" class="h-24" />
                    </div>
                    <h1 class="text-3xl font-bold text-gray-800 mt-4">{"กรุณาอัปโหลดรูปภาพ"}</h1>
                    <p class="text-gray-500 mt-2">
                        { format!("เพื่อเปรียบเทียบประสิทธิภาพโมเดล (อย่างน้อย {} ถึง {} ภาพ)", limits.min, limits.max) }
                    </p>

                    <form {onsubmit}>
                        { self.render_file_input_area(ctx, &hint) }
                        { self.render_previews(ctx) }
                        { self.render_mode_buttons(ctx) }
                        <button type="submit" {disabled}
                            class="w-full md:w-1/2 bg-green-600 text-white font-bold py-4 px-12 rounded-lg hover:bg-green-700 disabled:opacity-50 disabled:cursor-not-allowed transition">
                            { if self.submitting { "กำลังอัปโหลด..." } else { "เริ่มการวิเคราะห์" } }
                        </button>
                    </form>
                </div>
            </div>
        }
    }
}

impl ImageUpload {
    fn handle_submit(&mut self, ctx: &Context<Self>) -> bool {
        if self.submitting {
            return false;
        }

        let mode = match self.selection.validate(self.mode, ctx.props().config.image_limits) {
            Ok(mode) => mode,
            Err(SelectionError::MissingMode) => {
                alert(MISSING_MODE_ALERT);
                return false;
            }
            Err(err) => {
                log::warn!("Submit blocked: {}", err);
                return false;
            }
        };

        self.submitting = true;
        let files: Vec<GlooFile> = self.selection.iter().map(|image| image.file.clone()).collect();
        let endpoints = ctx.props().config.endpoints();
        let link = ctx.link().clone();

        spawn_local(async move {
            match api::submit_images(&endpoints, &files, mode).await {
                Ok(route) => link.send_message(Msg::Submitted(route)),
                Err(err) => link.send_message(Msg::SubmitFailed(err.to_string())),
            }
        });

        true
    }

    fn render_file_input_area(&self, ctx: &Context<Self>, hint: &CountHint) -> Html {
        let link = ctx.link();
        let handle_change = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let files = input.files().map(|list| extract_image_files(&list)).unwrap_or_default();
            input.set_value("");
            (!files.is_empty()).then_some(Msg::FilesPicked(files))
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

        let trigger_file_input = debounce(300, || {
            let input = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("image-input"))
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
            if let Some(input) = input {
                input.click();
            }
        });

        html! {
            <div class="mt-8">
                <div
                    class={classes!(
                        "bg-white", "border-2", "border-dashed", "text-gray-600", "font-bold", "py-12", "px-6",
                        "rounded-lg", "cursor-pointer", "transition", "block", "w-full",
                        if self.is_dragging { "border-blue-500" } else { "border-gray-400" }
                    )}
                    ondragover={handle_drag_over}
                    ondragleave={handle_drag_leave}
                    ondrop={handle_drop}
                    onclick={trigger_file_input}
                >
                    {"คลิกเพื่ออัปโหลดรูปภาพ"}
                </div>
                <input
                    id="image-input"
                    type="file"
                    class="sr-only"
                    accept="image/png, image/jpeg"
                    multiple=true
                    onchange={handle_change}
                />
                <p class={classes!("mt-4", if hint.is_warning() { "text-red-500 font-bold" } else { "text-gray-500" })}>
                    { hint.text() }
                </p>
                <p class="text-xs text-gray-400 mt-2">{"รองรับไฟล์ JPG, PNG"}</p>
            </div>
        }
    }

    fn render_previews(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="mt-6 grid grid-cols-3 sm:grid-cols-4 md:grid-cols-6 lg:grid-cols-8 gap-4">
                { for self.selection.iter().enumerate().map(|(index, image)| html! {
                    <div key={image.file.name()} class="relative group" title={image.file.name()}>
                        <img src={image.preview.to_string()} alt={format!("preview {}", index)}
                            class="w-full h-24 object-cover rounded-md shadow-md" />
                        <button
                            type="button"
                            title="Remove this image"
                            onclick={link.callback(move |e: MouseEvent| {
                                e.stop_propagation();
                                Msg::RemoveImage(index)
                            })}
                            class="absolute top-0 right-0 bg-red-500 text-white rounded-full h-6 w-6 flex items-center justify-center font-bold opacity-0 group-hover:opacity-100 transition"
                        >
                            {"×"}
                        </button>
                    </div>
                }) }
            </div>
        }
    }

    fn render_mode_buttons(&self, ctx: &Context<Self>) -> Html {
        let button = |mode: Mode, label: &'static str| {
            let selected = self.mode == Some(mode);
            html! {
                <button
                    type="button"
                    onclick={ctx.link().callback(move |_| Msg::SetMode(mode))}
                    class={classes!(
                        if selected { "bg-blue-600 text-white" } else { "bg-gray-200 text-gray-800" },
                        "font-bold", "py-2", "px-6", "rounded-lg", "transition"
                    )}
                >
                    { label }
                </button>
            }
        };

        html! {
            <div class="mt-8 flex justify-center space-x-4 mb-4">
                { button(Mode::Comparison, "โหมดเปรียบเทียบ (ทุกโมเดล)") }
                { button(Mode::QuickAnalysis, "โหมดเจาะจง (เลือกโมเดล)") }
            </div>
        }
    }
}
