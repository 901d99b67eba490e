use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = &model.image else {
        return html! {
            <div class="select-preview">
                <p>{"No image selected yet"}</p>
            </div>
        };
    };

    let link = ctx.link().clone();
    let loading = model.state.is_loading();

    html! {
        <div id="preview-container">
            <img id="actual-image-preview"
                src={image.preview_url.to_string()}
                alt={image.file.name()} />
            <div class="button-container">
                <button
                    id="retake-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={link.callback(|_| Msg::Retake)}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Retake"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={loading}
                >
                    { render_analyze_button_content(loading) }
                </button>
            </div>
        </div>
    }
}

fn render_analyze_button_content(loading: bool) -> Html {
    if loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Analyze Image"}</> }
    }
}
