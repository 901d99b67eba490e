pub mod client;
pub mod models;

use futures::future::BoxFuture;

use crate::analysis::upload::UploadedImage;

pub use client::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Request was blocked by the model: {0}")]
    Blocked(String),
    #[error("Model returned no text")]
    EmptyResponse,
    #[error("Malformed model response: {0}")]
    Decode(String),
}

/// A hosted model that answers a text instruction about one image.
pub trait VisionModel: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        image: &'a UploadedImage,
    ) -> BoxFuture<'a, Result<String, ModelError>>;
}
