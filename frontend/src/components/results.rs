use super::super::{Model, Msg};
use super::utils::{render_error_message, split_sections};
use shared::AnalysisResult;
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="results-container">
            <div class="result-header">
                <h2>{"Analysis Result"}</h2>
                { render_copy_button(model, ctx) }
            </div>
            { render_error_message(model) }
            {
                match model.state.result() {
                    Some(result) => render_result_body(result),
                    None if model.state.is_loading() => html! {
                        <p class="no-results-message">
                            <i class="fa-solid fa-spinner fa-spin"></i>{" Waiting for the model..."}
                        </p>
                    },
                    None => html! {
                        <p class="no-results-message">{"Analyze an image to see the result here."}</p>
                    },
                }
            }
        </div>
    }
}

fn render_result_body(result: &AnalysisResult) -> Html {
    match result {
        AnalysisResult::Structured { name, description } => html! {
            <div class="detailed-results">
                <p class="result-item"><span class="result-label">{"Name: "}</span>{ name }</p>
                <p class="result-item"><span class="result-label">{"Description: "}</span>{ description }</p>
            </div>
        },
        AnalysisResult::FreeText { analysis } => html! {
            <div class="detailed-results">
                { for split_sections(analysis).into_iter().map(|(title, paragraphs)| html! {
                    <div class="result-section">
                        <h3>{ title }</h3>
                        { for paragraphs.into_iter().map(|p| html! { <p>{ p }</p> }) }
                    </div>
                })}
            </div>
        },
    }
}

fn render_copy_button(model: &Model, ctx: &Context<Model>) -> Html {
    if model.state.result().is_none() {
        return html! {};
    }

    let (icon, label) = match model.copy_status {
        Some(true) => ("fa-solid fa-check", " Copied"),
        Some(false) => ("fa-solid fa-xmark", " Copy failed"),
        None => ("fa-solid fa-copy", " Copy"),
    };

    html! {
        <button
            class="copy-btn"
            title="Copy the result to the clipboard"
            onclick={ctx.link().callback(|_| Msg::CopyResult)}
        >
            <i class={icon}></i>{ label }
        </button>
    }
}
