use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use sha2::{Digest, Sha256};

use crate::error::AnalyzeError;

/// An image received from the browser, held for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedImage {
    /// Validates the raw upload and settles on a MIME type.
    ///
    /// A declared `image/*` type is trusted. A missing or generic
    /// `application/octet-stream` type is sniffed from the leading bytes.
    pub fn new(
        bytes: Vec<u8>,
        declared_type: Option<&str>,
        max_bytes: usize,
    ) -> Result<Self, AnalyzeError> {
        if bytes.is_empty() {
            return Err(AnalyzeError::MissingImage);
        }
        validate_image_size(&bytes, max_bytes)?;
        let mime_type = resolve_mime_type(&bytes, declared_type)?;
        Ok(Self { bytes, mime_type })
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Short SHA-256 prefix, only used to correlate log lines.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        let hash = hex::encode(hasher.finalize());
        hash[..12].to_string()
    }
}

pub fn validate_image_size(bytes: &[u8], max_bytes: usize) -> Result<(), AnalyzeError> {
    if bytes.len() > max_bytes {
        return Err(AnalyzeError::ImageTooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    Ok(())
}

fn resolve_mime_type(bytes: &[u8], declared_type: Option<&str>) -> Result<String, AnalyzeError> {
    let declared = declared_type
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty());

    match declared {
        Some(t) if t.starts_with("image/") => Ok(t),
        Some(t) if t != "application/octet-stream" => Err(AnalyzeError::UnsupportedImageType(t)),
        _ => sniff_mime_type(bytes).ok_or_else(|| {
            AnalyzeError::UnsupportedImageType(
                declared_type.unwrap_or("unknown").to_string(),
            )
        }),
    }
}

fn sniff_mime_type(bytes: &[u8]) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Avif => "image/avif",
        _ => return None,
    };
    Some(mime.to_string())
}
