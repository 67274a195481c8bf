//! Optical Character Recognition (OCR)
//!
//! Two independent engines: a local tesseract subprocess and a vision-LLM
//! call. The caller picks one explicitly; there is no fallback or consensus
//! between them.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::info;

use crate::vision::{self, VisionProvider};

const OCR_PROMPT: &str = "Transcribe all text visible in this image. \
Return only the plain transcribed text, preserving line breaks. \
If there is no text, return an empty response.";

/// An OCR engine selection. Construct the variant you want; `extract_text`
/// never switches engines on your behalf.
pub enum OcrEngine {
    /// Local `tesseract <image> stdout` subprocess.
    Tesseract { command: String },
    /// Vision-LLM transcription (OpenAI or Gemini).
    Vision { provider: VisionProvider },
}

impl OcrEngine {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tesseract { .. } => "tesseract",
            Self::Vision { .. } => "vision",
        }
    }
}

/// Extract text from an image. The result is trimmed and may be empty.
pub async fn extract_text(engine: &OcrEngine, image_path: &Path) -> Result<String> {
    info!(engine = engine.name(), path = %image_path.display(), "Running OCR");
    match engine {
        OcrEngine::Tesseract { command } => extract_via_tesseract(command, image_path).await,
        OcrEngine::Vision { provider } => extract_via_vision(provider, image_path).await,
    }
}

async fn extract_via_tesseract(command: &str, image_path: &Path) -> Result<String> {
    let output = Command::new(command)
        .arg(image_path)
        .arg("stdout")
        .output()
        .await
        .with_context(|| format!("Failed to spawn tesseract ('{command}')"))?;

    if !output.status.success() {
        bail!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

async fn extract_via_vision(provider: &VisionProvider, image_path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;
    let mime = vision::mime_for_path(image_path);
    let text = vision::ask_about_image(provider, &bytes, mime, OCR_PROMPT).await?;
    Ok(text.trim().to_string())
}
