use shared::results::{group_rows, summary_rows};
use shared::{ModelResult, ResultsBundle};
use yew::prelude::*;

pub fn render_summary_table(results: &ResultsBundle) -> Html {
    if results.is_empty() {
        return html! {};
    }

    html! {
        <div class="bg-white p-6 rounded-xl shadow-lg mb-8">
            <h2 class="text-2xl font-bold text-center mb-6">{"ตารางสรุปเปรียบเทียบประสิทธิภาพโมเดล"}</h2>
            <div class="overflow-x-auto">
                <table class="min-w-full">
                    <thead class="bg-gray-50">
                        <tr>
                            <th class="p-3 font-semibold text-left">{"ชื่อโมเดล"}</th>
                            <th class="p-3 font-semibold text-left">{"โมเดลเสริม"}</th>
                            <th class="p-3 font-semibold">{"ประเภท"}</th>
                            <th class="p-3 font-semibold">{"จำนวนภาพ"}</th>
                            <th class="p-3 font-semibold">{"เวลาประมวลผล (วินาที)"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for summary_rows(results).into_iter().map(|row| html! {
                            <tr key={row.model_name} class="border-t">
                                <td class="p-3 text-left font-semibold">{ row.model_name }</td>
                                <td class="p-3 text-left text-gray-600">{ row.kind.auxiliary_model() }</td>
                                <td class="p-3 text-center">{ row.kind.label() }</td>
                                <td class="p-3 text-center">{ row.image_count.to_string() }</td>
                                <td class="p-3 text-center">{ row.processing_time_label() }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

pub fn render_tabs(results: &ResultsBundle, active_tab: Option<&str>, on_select: &Callback<String>) -> Html {
    html! {
        <div class="mb-4 flex flex-wrap border-b border-gray-200">
            { for results.keys().map(|model_name| {
                let name = model_name.to_string();
                html! {
                    <button
                        key={model_name}
                        onclick={on_select.reform(move |_: MouseEvent| name.clone())}
                        class={classes!(
                            "tab-button", "text-lg", "py-2", "px-4", "-mb-px", "border-b-2", "font-medium",
                            "border-transparent", "transition-colors", "duration-300",
                            (active_tab == Some(model_name)).then_some("active")
                        )}
                    >
                        { model_name }
                    </button>
                }
            }) }
        </div>
    }
}

/// Grouping table for the active model; nothing for unrecognised records.
pub fn render_detail_table(result: &ModelResult) -> Html {
    if matches!(result, ModelResult::Unrecognized(_)) {
        return html! {};
    }
    let rows = group_rows(result);

    html! {
        <div class="bg-white p-4 rounded-xl shadow-md mb-8">
            <h3 class="text-xl font-bold text-center mb-4">{"สรุปผลการจัดกลุ่ม"}</h3>
            <div class="overflow-x-auto">
                <table class="min-w-full">
                    <thead class="bg-gray-50">
                        <tr>
                            <th class="p-2 text-left">{"ประเภทกลุ่มหลัก"}</th>
                            <th class="p-2">{"กลุ่มที่"}</th>
                            <th class="p-2">{"จำนวนภาพ"}</th>
                            <th class="p-2 text-left">{"รายชื่อไฟล์"}</th>
                            <th class="p-2">{"เฉลี่ย Cosine"}</th>
                            <th class="p-2">{"เฉลี่ย Pearson"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|row| html! {
                            <tr key={row.score_key.clone()} class="border-t">
                                <td class="p-2">{ row.label }</td>
                                <td class="p-2 text-center">{ row.position_label() }</td>
                                <td class="p-2 text-center">{ row.members.len().to_string() }</td>
                                <td class="p-2 text-xs">{ row.members_label() }</td>
                                <td class="p-2 text-center font-medium text-blue-600">{ row.cosine_label() }</td>
                                <td class="p-2 text-center font-medium text-green-600">{ row.pearson_label() }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        </div>
    }
}
