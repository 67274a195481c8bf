//! Config validation: schema checks with user-friendly error messages.

use crate::schema::MindGaugeConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &MindGaugeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_ocr(config, &mut report);
    validate_face(config, &mut report);
    validate_providers(config, &mut report);
    validate_gateway(config, &mut report);
    report
}

/// OCR engine must be one of the two known implementations; the vision
/// engine needs a vision-capable provider key.
fn validate_ocr(config: &MindGaugeConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };
    match ocr.engine.as_deref() {
        None | Some("tesseract") => {}
        Some("vision") => {
            let has_vision_key = config
                .providers
                .as_ref()
                .map(|p| {
                    p.openai.as_ref().and_then(|o| o.api_key.as_ref()).is_some()
                        || p.gemini.as_ref().and_then(|g| g.api_key.as_ref()).is_some()
                })
                .unwrap_or(false);
            if !has_vision_key {
                report.error(
                    "ocr.engine",
                    "vision OCR requires providers.openai.apiKey or providers.gemini.apiKey",
                );
            }
        }
        Some(other) => {
            report.error("ocr.engine", format!("Unknown OCR engine '{other}' (expected 'tesseract' or 'vision')"));
        }
    }
}

fn validate_face(config: &MindGaugeConfig, report: &mut ValidationReport) {
    let Some(face) = &config.face else { return };
    match face.provider.as_deref() {
        None | Some("deepface") => {
            if face.provider.is_some() && face.deepface_url.is_none() {
                report.warn("face.deepfaceUrl", "No DeepFace URL set; the default localhost URL will be used");
            }
        }
        Some("vision") => {
            let has_openai_key = config
                .providers
                .as_ref()
                .and_then(|p| p.openai.as_ref())
                .and_then(|o| o.api_key.as_ref())
                .is_some();
            if !has_openai_key {
                report.error(
                    "face.provider",
                    "vision face analysis requires providers.openai.apiKey",
                );
            }
        }
        Some(other) => {
            report.error("face.provider", format!("Unknown face provider '{other}' (expected 'deepface' or 'vision')"));
        }
    }
}

fn validate_providers(config: &MindGaugeConfig, report: &mut ValidationReport) {
    let Some(providers) = &config.providers else { return };
    if let Some(hf) = &providers.huggingface {
        if hf.model.as_deref().map(str::trim) == Some("") {
            report.error("providers.huggingface.model", "Model id cannot be empty");
        }
        if hf.api_key.is_none() {
            report.warn(
                "providers.huggingface.apiKey",
                "No HuggingFace key; sentiment fallback uses unauthenticated, rate-limited access",
            );
        }
    }
    if let Some(url) = &providers.sentiment_endpoint {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            report.error("providers.sentimentEndpoint", "Endpoint must be an http(s) URL");
        }
    }
}

fn validate_gateway(config: &MindGaugeConfig, report: &mut ValidationReport) {
    let Some(gateway) = &config.gateway else { return };
    if gateway.port == Some(0) {
        report.error("gateway.port", "Port must be > 0");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FaceConfig, GatewayConfig, OcrConfig, ProvidersConfig};

    #[test]
    fn empty_config_is_valid() {
        let report = validate(&MindGaugeConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn vision_ocr_without_keys_is_error() {
        let mut cfg = MindGaugeConfig::default();
        cfg.ocr = Some(OcrConfig {
            engine: Some("vision".to_string()),
            tesseract_command: None,
        });
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert!(report.errors[0].path.contains("ocr"));
    }

    #[test]
    fn unknown_face_provider_is_error() {
        let mut cfg = MindGaugeConfig::default();
        cfg.face = Some(FaceConfig {
            provider: Some("phrenology".to_string()),
            deepface_url: None,
        });
        let report = validate(&cfg);
        assert!(!report.is_valid());
    }

    #[test]
    fn bad_endpoint_url_is_error() {
        let mut cfg = MindGaugeConfig::default();
        cfg.providers = Some(ProvidersConfig {
            sentiment_endpoint: Some("localhost:9000".to_string()),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(!report.is_valid());
    }

    #[test]
    fn zero_port_is_error() {
        let mut cfg = MindGaugeConfig::default();
        cfg.gateway = Some(GatewayConfig {
            bind: None,
            port: Some(0),
        });
        let report = validate(&cfg);
        assert!(!report.is_valid());
    }
}
