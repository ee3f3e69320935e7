use super::utils::nav_link;
use shared::Route;
use yew::prelude::*;

/// Renders the application header
pub fn render_header(on_navigate: &Callback<Route>) -> Html {
    html! {
        <nav class="bg-white text-gray-800 shadow-md">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex items-center justify-between h-16">
                    { nav_link(Route::Upload, on_navigate, "font-bold text-xl", "FaceBack SimSnap") }
                </div>
            </div>
        </nav>
    }
}
