//! Request/response shapes for the Sinkin image-generation service
//!
//! Declarative only: request construction, upload handling and auth live in
//! the network layer. These types exist so persisted records and service
//! payloads share one wire-compatible definition.

use serde::{Deserialize, Serialize};

/// ControlNet preprocessing mode accepted by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlNet {
    Canny,
    Depth,
    Openpose,
}

/// Parameters of a txt2img generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImgRequest {
    /// Access token (API key)
    pub access_token: String,
    /// Model ID
    pub model_id: String,
    /// Prompt text
    pub prompt: String,

    /// Model version, defaults to the latest version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Default 512; must be a multiple of 8, range 128-896
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Default 768; must be a multiple of 8, range 128-896
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Negative prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Whether to append the model's default negative prompt (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_neg: Option<bool>,

    /// Inference steps, default 30, range 1-50
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// Guidance scale, default 7.5 or the model's default, range 1-20
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    /// Number of images, default 4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
    /// Seed, -1 for random (the default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Scheduler, default "DPMSolverMultistep" or the model's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,

    /// LoRA model ID (query /models for the full list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora: Option<String>,
    /// LoRA scale, default 0.75
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lora_scale: Option<f32>,

    /// ControlNet mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controlnet: Option<ControlNet>,
}

/// Parameters of an img2img transformation request
///
/// The init image itself is a transient upload handle supplied to the network
/// layer at request time; only the strength setting is part of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Img2ImgRequest {
    #[serde(flatten)]
    pub base: ImgRequest,
    /// How much to transform the base image, default 0.75
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_strength: Option<f32>,
}

/// Error payload returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error_code: i32,
    pub message: String,
}

/// Successful generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub error_code: i32,
    /// URLs of the generated images
    pub images: Vec<String>,
    pub credit_cost: f64,
    pub inf_id: String,
}

/// A stored API key and its remaining credit balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// The key itself; identity within the saved collection
    pub code: String,
    pub credits_left: f64,
}

/// A saved model reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A saved LoRA adaptation reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lora {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// A generated image: the request that produced it plus its URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(flatten)]
    pub request: Img2ImgRequest,
    /// Generated image URL; identity within the saved collection
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> ImgRequest {
        ImgRequest {
            access_token: "tok".into(),
            model_id: "m1".into(),
            prompt: "a lighthouse at dusk".into(),
            version: None,
            width: None,
            height: None,
            negative_prompt: None,
            use_default_neg: None,
            steps: None,
            scale: None,
            num_images: None,
            seed: None,
            scheduler: None,
            lora: None,
            lora_scale: None,
            controlnet: None,
        }
    }

    #[test]
    fn test_request_omits_absent_fields() {
        let json = serde_json::to_value(minimal_request()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["access_token"], "tok");
        assert_eq!(obj["model_id"], "m1");
        assert!(!obj.contains_key("seed"));
    }

    #[test]
    fn test_controlnet_is_lowercase_on_the_wire() {
        let mut request = minimal_request();
        request.controlnet = Some(ControlNet::Openpose);
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["controlnet"], "openpose");
    }

    #[test]
    fn test_api_key_uses_camel_case() {
        let key = ApiKey {
            code: "sk-1".into(),
            credits_left: 12.5,
        };
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(json["creditsLeft"], 12.5);
    }

    #[test]
    fn test_image_flattens_request_fields() {
        let image = Image {
            request: Img2ImgRequest {
                base: minimal_request(),
                image_strength: Some(0.5),
            },
            image_url: "https://cdn.example/img.png".into(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["prompt"], "a lighthouse at dusk");
        assert_eq!(json["image_strength"], 0.5);
        assert_eq!(json["image_url"], "https://cdn.example/img.png");

        let back: Image = serde_json::from_value(json).unwrap();
        assert_eq!(back, image);
    }
}
