//! HTTP client for the fal.ai generation and storage APIs.

use std::time::Duration;

use tracing::{error, info};

use super::image_prep::parse_data_url;
use super::types::{GenerationOptions, GenerationResult};

const FAL_RUN_BASE: &str = "https://fal.run";
const FAL_STORAGE_INITIATE: &str = "https://rest.alpha.fal.ai/storage/upload/initiate";

/// Client for synchronous fal.ai model runs. Holds the API key and a
/// reqwest client with a 60-second timeout, matching the model's worst
/// observed latency.
pub struct GenerationClient {
    http: reqwest::Client,
    api_key: String,
}

impl GenerationClient {
    pub fn new(api_key: &str) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
        })
    }

    /// Make sure the photo is addressable by URL. Data URLs are uploaded
    /// to fal storage first; anything else is passed through untouched.
    pub async fn resolve_image_url(&self, photo: &str) -> Result<String, String> {
        if photo.starts_with("data:") {
            self.upload_data_url(photo).await
        } else {
            Ok(photo.to_string())
        }
    }

    /// Upload a data URL payload to fal storage and return the hosted URL.
    ///
    /// Two-step protocol: initiate (returns a signed upload URL plus the
    /// final file URL), then PUT the raw bytes to the signed URL.
    async fn upload_data_url(&self, data_url: &str) -> Result<String, String> {
        let (content_type, bytes) = parse_data_url(data_url)?;
        info!("Uploading {} bytes ({}) to fal storage", bytes.len(), content_type);

        let initiate_body = serde_json::json!({
            "content_type": content_type,
            "file_name": file_name_for(&content_type),
        });
        let response = self
            .http
            .post(FAL_STORAGE_INITIATE)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&initiate_body)
            .send()
            .await
            .map_err(|e| self.describe_request_error("storage initiate", e))?;

        let body_text = handle_api_response(response, "storage initiate").await?;
        let initiate: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| format!("Failed to parse storage initiate response: {}", e))?;

        let upload_url = initiate["upload_url"]
            .as_str()
            .ok_or("Storage initiate response missing 'upload_url'")?;
        let file_url = initiate["file_url"]
            .as_str()
            .ok_or("Storage initiate response missing 'file_url'")?;

        let put_response = self
            .http
            .put(upload_url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.describe_request_error("storage upload", e))?;
        if !put_response.status().is_success() {
            let msg = format!(
                "Storage upload failed with status {}",
                put_response.status()
            );
            error!("{}", msg);
            return Err(msg);
        }

        info!("Uploaded photo to fal storage");
        Ok(file_url.to_string())
    }

    /// Run the portrait model against a hosted image URL and the
    /// synthesized directive.
    pub async fn generate(
        &self,
        image_url: &str,
        directive: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult, String> {
        let endpoint_url = format!("{}/{}", FAL_RUN_BASE, options.endpoint);
        info!("Running generation against {}", options.endpoint);

        let body = serde_json::json!({
            "image_urls": [image_url],
            "prompt": directive,
            "guidance_scale": options.guidance_scale,
            "num_inference_steps": options.num_inference_steps,
            "enable_safety_checker": true,
            "output_format": "png",
            "num_images": 1,
            "lora_scale": options.lora_scale,
        });

        let response = self
            .http
            .post(&endpoint_url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.describe_request_error("generation", e))?;

        let body_text = handle_api_response(response, "generation").await?;
        let result: GenerationResult = serde_json::from_str(&body_text)
            .map_err(|e| format!("Failed to parse generation response: {}", e))?;

        if result.images.is_empty() {
            let msg = "Generation returned no images".to_string();
            error!("{}", msg);
            return Err(msg);
        }

        info!("Generation produced {} image(s)", result.images.len());
        Ok(result)
    }

    fn describe_request_error(&self, stage: &str, e: reqwest::Error) -> String {
        let msg = if e.is_timeout() {
            format!("fal.ai {} timed out after 60s", stage)
        } else {
            format!("fal.ai {} request failed: {}", stage, e)
        };
        error!("{}", msg);
        msg
    }
}

/// Handle API response: check status and extract body text.
async fn handle_api_response(
    response: reqwest::Response,
    stage: &str,
) -> Result<String, String> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        let truncated = if body.len() > 1024 {
            format!("{}...", truncate_utf8(&body, 1024))
        } else {
            body
        };
        let msg = format!("fal.ai {} returned {}: {}", stage, status, truncated);
        error!("{}", msg);
        return Err(msg);
    }

    response
        .text()
        .await
        .map_err(|e| format!("Failed to read fal.ai {} response body: {}", stage, e))
}

/// Upload file name matching the payload's media type.
fn file_name_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "photo.jpg",
        "image/png" => "photo.png",
        "image/webp" => "photo.webp",
        _ => "photo.bin",
    }
}

/// Truncate to at most `max` bytes without splitting a multibyte character.
fn truncate_utf8(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
