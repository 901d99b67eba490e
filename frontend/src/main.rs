mod api;
mod components;
mod state;

use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::theme_toggle::{apply_theme, load_theme, render_theme_toggle};
use components::upload_section::render_upload_section;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::AnalysisResult;
use state::ViewState;
use yew::prelude::*;

// The currently displayed image
pub struct FileData {
    pub id: u64,
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

pub enum Msg {
    // Image operations
    ImageSelected(GlooFile),
    Retake,

    // Analysis operations
    Analyze,
    AnalysisFinished(u64, Result<AnalysisResult, String>),

    // Result actions
    CopyResult,
    Copied(bool),
    ResetCopyStatus,

    // UI states
    SetError(String),
    ToggleTheme,
}

pub struct Model {
    image: Option<FileData>,
    state: ViewState,
    theme: String,
    copy_status: Option<bool>,
    copy_reset: Option<Timeout>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let theme = load_theme();
        apply_theme(&theme);

        Self {
            image: None,
            state: ViewState::default(),
            theme,
            copy_status: None,
            copy_reset: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ImageSelected(file) => handlers::handle_image_selected(self, file),
            Msg::Retake => handlers::handle_retake(self),

            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(ticket, outcome) => {
                handlers::handle_analysis_finished(self, ticket, outcome)
            }

            Msg::CopyResult => handlers::handle_copy_result(self, ctx),
            Msg::Copied(ok) => handlers::handle_copied(self, ctx, ok),
            Msg::ResetCopyStatus => {
                self.copy_status = None;
                self.copy_reset = None;
                true
            }

            Msg::SetError(error) => {
                self.state.set_error(error);
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>

                <main class="main-content">
                    <section class="capture-panel">
                        { render_header() }
                        { render_upload_section(self, ctx) }
                        { render_preview_area(self, ctx) }
                    </section>
                    <section class="result-panel">
                        { render_results(self, ctx) }
                    </section>
                </main>

                <footer class="app-footer">
                    <p>{"Image Analyzer | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
