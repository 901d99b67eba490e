use super::super::{FileData, Model, Msg};
use super::theme_toggle::{apply_theme, store_theme};
use crate::api;
use crate::components::utils::generate_id;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::AnalysisResult;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use yew::prelude::*;

const COPY_STATUS_MS: u32 = 2000;

pub fn handle_image_selected(model: &mut Model, file: GlooFile) -> bool {
    let id = generate_id();
    let preview_url = ObjectUrl::from(file.clone());

    // Dropping the previous FileData revokes its object URL.
    model.image = Some(FileData {
        id,
        file,
        preview_url,
    });
    model.state.select_image(id);
    model.copy_status = None;
    true
}

pub fn handle_retake(model: &mut Model) -> bool {
    model.image = None;
    model.state.retake();
    model.copy_status = None;
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(ticket) = model.state.begin_analysis() else {
        return true;
    };

    match model.image.as_ref().filter(|image| image.id == ticket) {
        Some(image) => send_analysis_request(ctx, ticket, image.file.clone()),
        None => {
            model.state.finish_analysis(ticket, Err(crate::state::NO_IMAGE_MESSAGE.into()));
        }
    }
    model.copy_status = None;
    true
}

pub fn handle_analysis_finished(
    model: &mut Model,
    ticket: u64,
    outcome: Result<AnalysisResult, String>,
) -> bool {
    if let Err(e) = &outcome {
        log::error!("Analysis failed: {}", e);
    }
    model.state.finish_analysis(ticket, outcome)
}

pub fn send_analysis_request(ctx: &Context<Model>, ticket: u64, file: GlooFile) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            let outcome = api::analyze_image(file).await;
            link.send_message(Msg::AnalysisFinished(ticket, outcome));
        }
    });
}

pub fn handle_copy_result(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(text) = model.state.result().map(AnalysisResult::to_plain_text) else {
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let copied = copy_to_clipboard(&text).await;
        link.send_message(Msg::Copied(copied));
    });
    false
}

pub fn handle_copied(model: &mut Model, ctx: &Context<Model>, copied: bool) -> bool {
    if !copied {
        log::warn!("Clipboard write was rejected");
    }
    model.copy_status = Some(copied);

    let link = ctx.link().clone();
    model.copy_reset = Some(Timeout::new(COPY_STATUS_MS, move || {
        link.send_message(Msg::ResetCopyStatus);
    }));
    true
}

async fn copy_to_clipboard(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.is_ok()
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.theme = if model.theme == "light" {
        "dark".to_string()
    } else {
        "light".to_string()
    };
    apply_theme(&model.theme);
    store_theme(&model.theme);
    true
}
