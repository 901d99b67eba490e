use futures::future::BoxFuture;
use log::{debug, warn};
use std::time::Duration;

use super::models::{
    ApiErrorBody, Blob, Content, GenerateContentRequest, GenerateContentResponse, Part,
};
use super::{ModelError, VisionModel};
use crate::analysis::upload::UploadedImage;

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: generate_content_url(api_base, model),
        })
    }

    async fn generate_content(
        &self,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<String, ModelError> {
        let request = build_request(prompt, image);

        debug!(
            "POST {} ({} bytes of {})",
            self.endpoint,
            image.bytes.len(),
            image.mime_type
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ModelError::Decode(e.to_string()))?;
        extract_text(parsed)
    }
}

impl VisionModel for GeminiClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        image: &'a UploadedImage,
    ) -> BoxFuture<'a, Result<String, ModelError>> {
        Box::pin(self.generate_content(prompt, image))
    }
}

pub fn generate_content_url(api_base: &str, model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}/v1beta/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

fn build_request<'a>(prompt: &'a str, image: &'a UploadedImage) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: &image.mime_type,
                        data: image.to_base64(),
                    },
                },
            ],
        }],
    }
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(status) => format!("{} ({})", parsed.error.message, status),
            None => parsed.error.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().chars().take(300).collect(),
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(ModelError::Blocked(reason)),
            None => Err(ModelError::EmptyResponse),
        };
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        let blocked = matches!(
            reason.as_str(),
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        );
        return if blocked {
            Err(ModelError::Blocked(reason))
        } else {
            Err(ModelError::EmptyResponse)
        };
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    fn image() -> UploadedImage {
        UploadedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".into(),
        }
    }

    #[test]
    fn url_joins_base_and_model() {
        assert_eq!(
            generate_content_url("https://generativelanguage.googleapis.com/", "gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            generate_content_url("http://localhost:9999", "models/gemini-pro-vision"),
            "http://localhost:9999/v1beta/models/gemini-pro-vision:generateContent"
        );
    }

    #[test]
    fn request_carries_prompt_and_inline_image() {
        let image = image();
        let request = build_request("Describe it", &image);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        {"text": "Describe it"},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn text_parts_of_first_candidate_are_joined() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"name\": "}, {"text": "\"Mug\"}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"name\": \"Mug\"}");
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(extract_text(response), Err(ModelError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        assert!(matches!(extract_text(response), Err(ModelError::EmptyResponse)));
    }

    #[test]
    fn safety_stop_without_text_is_blocked() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(extract_text(response), Err(ModelError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn api_error_message_prefers_structured_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid. (INVALID_ARGUMENT)");
        assert_eq!(api_error_message("  "), "empty response body");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    /// Starts a local stand-in for the API that answers every request with
    /// `status` and `body`, or 401 when the key header is wrong.
    fn serve(status: u16, body: &'static str) -> String {
        let server = HttpServer::new(move || {
            App::new().default_service(web::to(move |req: HttpRequest| async move {
                let key = req.headers().get("x-goog-api-key");
                if key.and_then(|v| v.to_str().ok()) != Some("test-key") {
                    return HttpResponse::Unauthorized()
                        .body(r#"{"error": {"message": "missing key"}}"#);
                }
                HttpResponse::build(StatusCode::from_u16(status).unwrap())
                    .content_type("application/json")
                    .body(body)
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> GeminiClient {
        GeminiClient {
            http: reqwest::Client::builder().no_proxy().build().unwrap(),
            api_key: "test-key".into(),
            endpoint: generate_content_url(base, "gemini-test"),
        }
    }

    #[actix_web::test]
    async fn generate_returns_candidate_text() {
        let base = serve(
            200,
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"name\": \"Mug\"}"}]}}]}"#,
        );
        let text = client_for(&base)
            .generate("Describe it", &image())
            .await
            .unwrap();
        assert_eq!(text, r#"{"name": "Mug"}"#);
    }

    #[actix_web::test]
    async fn generate_maps_error_status_to_api_error() {
        let base = serve(
            400,
            r#"{"error": {"code": 400, "message": "Image is malformed.", "status": "INVALID_ARGUMENT"}}"#,
        );
        let err = client_for(&base)
            .generate("Describe it", &image())
            .await
            .unwrap_err();
        match err {
            ModelError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Image is malformed. (INVALID_ARGUMENT)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn generate_reports_blocked_prompt() {
        let base = serve(200, r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        let err = client_for(&base)
            .generate("Describe it", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Blocked(r) if r == "SAFETY"));
    }

    #[actix_web::test]
    async fn generate_rejects_undecodable_success_body() {
        let base = serve(200, "<html>oops</html>");
        let err = client_for(&base)
            .generate("Describe it", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }
}
