use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub const PLACEHOLDER_NAME: &str = "Unnamed Object";
pub const PLACEHOLDER_DESCRIPTION: &str = "No description provided";

/// Which answer shape the backend asks the model for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AnalysisMode {
    #[default]
    Structured,
    FreeText,
}

/// Body of a successful `POST /api/analyze`.
///
/// Untagged: the JSON is either `{name, description}` or `{analysis}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AnalysisResult {
    Structured { name: String, description: String },
    FreeText { analysis: String },
}

impl AnalysisResult {
    /// Plain-text rendering, used for the clipboard.
    pub fn to_plain_text(&self) -> String {
        match self {
            AnalysisResult::Structured { name, description } => {
                format!("Name: {}\nDescription: {}", name, description)
            }
            AnalysisResult::FreeText { analysis } => analysis.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub api_key_configured: bool,
    pub mode: AnalysisMode,
}
