use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-wand-magic-sparkles"></i> {" Image Analyzer"}</h1>
            <p class="subtitle">{"Choose a photo and let the model describe what it sees"}</p>
        </header>
    }
}
