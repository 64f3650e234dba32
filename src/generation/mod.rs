//! Image generation via the fal.ai HTTP API.
//!
//! The pipeline is: decode the session photo from its data URL, validate
//! and downscale it, upload it to fal storage (data URLs are rejected by
//! the model endpoint above a token limit), then run the portrait model
//! with the synthesized directive as prompt.

mod client;
mod image_prep;
mod types;

pub use client::GenerationClient;
pub use image_prep::{parse_data_url, prepare_photo, MAX_IMAGE_DIMENSION, MIN_IMAGE_DIMENSION};
pub use types::{GeneratedImage, GenerationOptions, GenerationResult};
