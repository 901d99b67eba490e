use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::{AnalysisResult, ErrorResponse};

const ANALYZE_ENDPOINT: &str = "/api/analyze";

/// Posts one image as the `image` field of a multipart form.
pub async fn analyze_image(file: GlooFile) -> Result<AnalysisResult, String> {
    let form_data =
        web_sys::FormData::new().map_err(|e| format!("Failed to build form: {:?}", e))?;
    form_data
        .append_with_blob("image", file.as_ref())
        .map_err(|e| format!("Failed to attach image: {:?}", e))?;

    let request = Request::post(ANALYZE_ENDPOINT)
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;

    let response = request
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        return response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e));
    }

    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(ErrorResponse {
            error,
            details: Some(details),
        }) => Err(format!("{}: {}", error, details)),
        Ok(ErrorResponse { error, .. }) => Err(error),
        Err(_) => Err(format!("Server error: {}", status)),
    }
}
