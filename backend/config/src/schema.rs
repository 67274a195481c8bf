//! MindGauge runtime configuration schema.
//!
//! Typed for serde YAML deserialization, camelCase on disk. Every section is
//! optional; `defaults::apply_all_defaults` fills the gaps and
//! `apply_env_overrides` injects secrets from the environment.

use serde::{Deserialize, Serialize};

/// Root configuration for MindGauge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindGaugeConfig {
    /// External model providers and credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<ProvidersConfig>,

    /// OCR engine selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,

    /// Face-emotion provider selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceConfig>,

    /// Report output settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// HTTP front-end configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersConfig {
    /// HuggingFace Inference API, used for the sentiment fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub huggingface: Option<HuggingFaceProvider>,

    /// OpenAI credentials (vision OCR, vision face analysis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<ApiKeyProvider>,

    /// Gemini credentials (vision OCR alternative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<ApiKeyProvider>,

    /// Self-hosted text-classification endpoint, alternative to HuggingFace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuggingFaceProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model id; defaults to the SST-2 distilbert checkpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// "tesseract" | "vision"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Path or name of the tesseract binary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tesseract_command: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceConfig {
    /// "deepface" | "vision"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Base URL of a self-hosted DeepFace HTTP service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepface_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Directory PDF reports are written into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl MindGaugeConfig {
    /// Overlay secrets and service URLs from the environment.
    ///
    /// Env always wins over the file so deployments never need keys on disk.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("HF_API_KEY") {
            self.providers
                .get_or_insert_with(Default::default)
                .huggingface
                .get_or_insert_with(Default::default)
                .api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.providers
                .get_or_insert_with(Default::default)
                .openai
                .get_or_insert_with(Default::default)
                .api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.providers
                .get_or_insert_with(Default::default)
                .gemini
                .get_or_insert_with(Default::default)
                .api_key = Some(key);
        }
        if let Ok(url) = std::env::var("DEEPFACE_URL") {
            self.face.get_or_insert_with(Default::default).deepface_url = Some(url);
        }
        if let Ok(dir) = std::env::var("MINDGAUGE_REPORT_DIR") {
            self.report.get_or_insert_with(Default::default).output_dir = Some(dir);
        }
        self
    }
}
