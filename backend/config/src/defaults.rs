//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{
    FaceConfig, GatewayConfig, HuggingFaceProvider, LoggingConfig, MindGaugeConfig, OcrConfig,
    ProvidersConfig, ReportConfig,
};

/// Sentiment fallback model (same checkpoint the original app shipped with).
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// OCR engine used when none is configured.
pub const DEFAULT_OCR_ENGINE: &str = "tesseract";

/// Tesseract binary resolved from PATH by default.
pub const DEFAULT_TESSERACT_COMMAND: &str = "tesseract";

/// Face provider used when none is configured.
pub const DEFAULT_FACE_PROVIDER: &str = "deepface";

/// Default base URL of a locally hosted DeepFace service.
pub const DEFAULT_DEEPFACE_URL: &str = "http://localhost:5005";

/// Directory PDF reports land in, relative to the working directory.
pub const DEFAULT_REPORT_DIR: &str = "reports";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: MindGaugeConfig) -> MindGaugeConfig {
    let config = apply_provider_defaults(config);
    let config = apply_ocr_defaults(config);
    let config = apply_face_defaults(config);
    let config = apply_report_defaults(config);
    let config = apply_logging_defaults(config);
    apply_gateway_defaults(config)
}

/// Ensure the sentiment model id is set whenever HuggingFace is configured.
fn apply_provider_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let providers = config.providers.get_or_insert_with(ProvidersConfig::default);
    if let Some(hf) = providers.huggingface.as_mut() {
        if hf.model.is_none() {
            hf.model = Some(DEFAULT_SENTIMENT_MODEL.to_string());
        }
    } else if providers.sentiment_endpoint.is_none() {
        // No sentiment source at all: default to HuggingFace without a key
        // (public inference, rate-limited). Validation warns about this.
        providers.huggingface = Some(HuggingFaceProvider {
            api_key: None,
            model: Some(DEFAULT_SENTIMENT_MODEL.to_string()),
        });
    }
    config
}

fn apply_ocr_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    if ocr.engine.is_none() {
        ocr.engine = Some(DEFAULT_OCR_ENGINE.to_string());
    }
    if ocr.tesseract_command.is_none() {
        ocr.tesseract_command = Some(DEFAULT_TESSERACT_COMMAND.to_string());
    }
    config
}

fn apply_face_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let face = config.face.get_or_insert_with(FaceConfig::default);
    if face.provider.is_none() {
        face.provider = Some(DEFAULT_FACE_PROVIDER.to_string());
    }
    if face.deepface_url.is_none() {
        face.deepface_url = Some(DEFAULT_DEEPFACE_URL.to_string());
    }
    config
}

fn apply_report_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let report = config.report.get_or_insert_with(ReportConfig::default);
    if report.output_dir.is_none() {
        report.output_dir = Some(DEFAULT_REPORT_DIR.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.dir.is_none() {
        logging.dir = Some(DEFAULT_LOG_DIR.to_string());
    }
    config
}

fn apply_gateway_defaults(mut config: MindGaugeConfig) -> MindGaugeConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    if gateway.bind.is_none() {
        gateway.bind = Some(DEFAULT_BIND.to_string());
    }
    if gateway.port.is_none() {
        gateway.port = Some(DEFAULT_PORT);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_section() {
        let cfg = apply_all_defaults(MindGaugeConfig::default());
        assert_eq!(
            cfg.ocr.as_ref().unwrap().engine.as_deref(),
            Some(DEFAULT_OCR_ENGINE)
        );
        assert_eq!(
            cfg.face.as_ref().unwrap().deepface_url.as_deref(),
            Some(DEFAULT_DEEPFACE_URL)
        );
        assert_eq!(
            cfg.gateway.as_ref().unwrap().port,
            Some(DEFAULT_PORT)
        );
        let hf = cfg.providers.unwrap().huggingface.unwrap();
        assert_eq!(hf.model.as_deref(), Some(DEFAULT_SENTIMENT_MODEL));
    }

    #[test]
    fn explicit_values_are_preserved() {
        let mut cfg = MindGaugeConfig::default();
        cfg.ocr = Some(crate::schema::OcrConfig {
            engine: Some("vision".to_string()),
            tesseract_command: None,
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.ocr.unwrap().engine.as_deref(), Some("vision"));
    }
}
