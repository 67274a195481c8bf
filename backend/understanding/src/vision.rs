/// Vision understanding — ask a vision LLM a question about an image.
///
/// Shared by the vision OCR engine and the vision face provider; both send a
/// base64 data URI plus a task prompt and read back the model's text answer.
use anyhow::{Result, bail};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::path::Path;
use tracing::info;

/// Supported vision providers.
pub enum VisionProvider {
    OpenAI { api_key: String, model: String },
    Gemini { api_key: String },
}

impl VisionProvider {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAI { api_key: api_key.into(), model: "gpt-4o".to_string() }
    }
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini { api_key: api_key.into() }
    }
}

/// Guess a MIME type from the image file extension. Defaults to JPEG.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Send image bytes and a prompt to a vision LLM, returning its text answer.
pub async fn ask_about_image(
    provider: &VisionProvider,
    image_bytes: &[u8],
    mime_type: &str,
    prompt: &str,
) -> Result<String> {
    let b64 = STANDARD.encode(image_bytes);
    match provider {
        VisionProvider::OpenAI { api_key, model } => {
            ask_via_openai(api_key, model, &b64, mime_type, prompt).await
        }
        VisionProvider::Gemini { api_key } => {
            ask_via_gemini(api_key, &b64, mime_type, prompt).await
        }
    }
}

async fn ask_via_openai(
    api_key: &str, model: &str, b64: &str, mime_type: &str, prompt: &str,
) -> Result<String> {
    info!("[Vision] Querying image via OpenAI {}", model);
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": prompt },
                { "type": "image_url",
                  "image_url": { "url": format!("data:{};base64,{}", mime_type, b64) } }
            ]
        }],
        "max_tokens": 1024
    });
    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;
    if !resp.status().is_success() {
        bail!("OpenAI vision error: {}", resp.text().await.unwrap_or_default());
    }
    let json: serde_json::Value = resp.json().await?;
    Ok(json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

async fn ask_via_gemini(
    api_key: &str, b64: &str, mime_type: &str, prompt: &str,
) -> Result<String> {
    info!("[Vision] Querying image via Gemini");
    let client = reqwest::Client::new();
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key={}",
        api_key
    );
    let body = serde_json::json!({
        "contents": [{ "parts": [
            { "text": prompt },
            { "inlineData": { "mimeType": mime_type, "data": b64 } }
        ]}]
    });
    let resp = client.post(&url).json(&body).send().await?;
    if !resp.status().is_success() {
        bail!("Gemini vision error: {}", resp.text().await.unwrap_or_default());
    }
    let json: serde_json::Value = resp.json().await?;
    Ok(json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or("")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_guessing_defaults_to_jpeg() {
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("noext")), "image/jpeg");
    }
}
