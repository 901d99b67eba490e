pub mod parse;
pub mod upload;

use log::info;
use shared::{AnalysisMode, AnalysisResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AnalyzerSettings;
use crate::error::AnalyzeError;
use crate::gemini::VisionModel;
use parse::ParsedAnalysis;
use upload::UploadedImage;

/// Forwards an uploaded image to the model and shapes the reply.
///
/// `model` is `None` when no API key was configured; every request then
/// fails with [`AnalyzeError::MissingApiKey`].
#[derive(Clone)]
pub struct Analyzer {
    model: Option<Arc<dyn VisionModel>>,
    mode: AnalysisMode,
    settings: Arc<AnalyzerSettings>,
}

impl Analyzer {
    pub fn new(
        model: Option<Arc<dyn VisionModel>>,
        mode: AnalysisMode,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            model,
            mode,
            settings: Arc::new(settings),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn ensure_configured(&self) -> Result<&dyn VisionModel, AnalyzeError> {
        self.model.as_deref().ok_or(AnalyzeError::MissingApiKey)
    }

    pub async fn analyze(&self, image: &UploadedImage) -> Result<AnalysisResult, AnalyzeError> {
        let model = self.ensure_configured()?;
        let request_id = Uuid::new_v4();

        info!(
            "[{}] analyzing {} ({} bytes, sha256 {}) in {} mode",
            request_id,
            image.mime_type,
            image.bytes.len(),
            image.digest(),
            self.mode
        );

        let text = model.generate(self.settings.prompt(self.mode), image).await?;

        let result = match self.mode {
            AnalysisMode::Structured => {
                let parsed = ParsedAnalysis::parse(&text);
                info!("[{}] model reply parsed as {}", request_id, parsed.stage());
                parsed.into_result(&self.settings.placeholder_name)
            }
            AnalysisMode::FreeText => AnalysisResult::FreeText {
                analysis: text.trim().to_string(),
            },
        };

        Ok(result)
    }
}
