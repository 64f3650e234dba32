//! Request options and response shapes for the fal.ai portrait endpoint.

use serde::{Deserialize, Serialize};

/// Tunable parameters for a generation run. Defaults are calibrated for
/// identity-preserving portrait edits; callers rarely need to change them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    /// Model endpoint path on fal.ai.
    pub endpoint: String,
    /// Prompt adherence. Low values keep the edit subtle.
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    /// Weight of the face-preservation LoRA.
    pub lora_scale: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            endpoint: "fal-ai/flux-2-lora-gallery/face-to-full-portrait".to_string(),
            guidance_scale: 2.5,
            num_inference_steps: 40,
            lora_scale: 0.85,
        }
    }
}

/// One image in an endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Parsed endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub images: Vec<GeneratedImage>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerationResult {
    /// URL of the primary (and in practice only) generated image.
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.endpoint, "fal-ai/flux-2-lora-gallery/face-to-full-portrait");
        assert_eq!(opts.guidance_scale, 2.5);
        assert_eq!(opts.num_inference_steps, 40);
        assert_eq!(opts.lora_scale, 0.85);
    }

    #[test]
    fn test_result_parses_minimal_response() {
        let json = r#"{"images": [{"url": "https://fal.media/files/abc.png"}]}"#;
        let result: GenerationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.first_image(), Some("https://fal.media/files/abc.png"));
        assert!(result.seed.is_none());
    }

    #[test]
    fn test_result_parses_full_response() {
        let json = r#"{
            "images": [{"url": "https://fal.media/files/abc.png", "content_type": "image/png", "width": 1024, "height": 1024}],
            "seed": 42,
            "prompt": "Professional portrait photo"
        }"#;
        let result: GenerationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].width, Some(1024));
        assert_eq!(result.seed, Some(42));
    }

    #[test]
    fn test_first_image_empty() {
        let result = GenerationResult {
            images: vec![],
            seed: None,
            prompt: None,
        };
        assert!(result.first_image().is_none());
    }
}
