use serde::Deserialize;
use shared::{AnalysisMode, PLACEHOLDER_NAME};
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PORT: u16 = 8081;

const STRUCTURED_PROMPT: &str = "Analyze this image and provide a name and description for the main object or scene. Format your response as JSON with 'name' and 'description' fields.";
const FREE_TEXT_PROMPT: &str = "Analyze this image in detail. Describe the main subject, notable objects, the setting, colours and any visible text. Organise the answer into short sections separated by a blank line, each section starting with a one-line title.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ANALYSIS_MODE '{0}', expected 'structured' or 'free-text'")]
    InvalidMode(String),
    #[error("Invalid PORT '{0}'")]
    InvalidPort(String),
    #[error("Failed to read analyzer config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse analyzer config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Tunables that may come from the optional YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub structured_prompt: String,
    pub free_text_prompt: String,
    pub placeholder_name: String,
    pub max_image_bytes: usize,
    pub request_timeout_secs: u64,
    pub model: Option<String>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            structured_prompt: STRUCTURED_PROMPT.to_string(),
            free_text_prompt: FREE_TEXT_PROMPT.to_string(),
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            max_image_bytes: 20 * 1024 * 1024,
            request_timeout_secs: 60,
            model: None,
        }
    }
}

impl AnalyzerSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn prompt(&self, mode: AnalysisMode) -> &str {
        match mode {
            AnalysisMode::Structured => &self.structured_prompt,
            AnalysisMode::FreeText => &self.free_text_prompt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub mode: AnalysisMode,
    pub port: u16,
    pub frontend_dir: String,
    pub analyzer: AnalyzerSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let analyzer = match get("ANALYZER_CONFIG") {
            Some(path) => AnalyzerSettings::load(&path)?,
            None => AnalyzerSettings::default(),
        };

        let mode = match get("ANALYSIS_MODE") {
            Some(raw) => AnalysisMode::from_str(&raw).map_err(|_| ConfigError::InvalidMode(raw))?,
            None => AnalysisMode::default(),
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let model = get("GEMINI_MODEL")
            .or_else(|| analyzer.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let frontend_dir = get("FRONTEND_DIR").unwrap_or_else(|| {
            if let Some(manifest_dir) = get("CARGO_MANIFEST_DIR") {
                format!("{}/../frontend/dist", manifest_dir)
            } else {
                "/usr/src/app/frontend/dist".to_string()
            }
        });

        Ok(Self {
            api_key: get("GEMINI_API_KEY"),
            api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model,
            mode,
            port,
            frontend_dir,
            analyzer,
        })
    }
}
