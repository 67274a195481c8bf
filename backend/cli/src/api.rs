//! HTTP front end: multi-input analysis form, JSON health check, and report
//! downloads.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower_http::cors::CorsLayer;
use tracing::error;

use mindgauge_analysis::Pipeline;
use mindgauge_core::AnalysisRequest;
use mindgauge_report::{build_report, markdown};

/// Shared application state for API handlers.
pub struct AppState {
    pub pipeline: Pipeline,
    pub report_dir: PathBuf,
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/reports/:file", get(download_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The multi-input entry form.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mindgauge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run one analysis from a multipart form submission.
///
/// Uploaded images are staged as tempfiles that live for the duration of the
/// request only.
async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut request = AnalysisRequest::default();
    // Keep staged uploads alive until the pipeline has consumed them.
    let mut staged: Vec<NamedTempFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "diary_text" => {
                request.diary_text = Some(field.text().await.map_err(bad_request)?);
            }
            "generate_pdf" => {
                request.generate_pdf = true;
            }
            "ocr_image" | "face_image" => {
                let is_face = name == "face_image";
                let suffix = field
                    .file_name()
                    .and_then(|f| f.rsplit('.').next().map(|e| format!(".{e}")))
                    .unwrap_or_else(|| ".jpg".to_string());
                let bytes = field.bytes().await.map_err(bad_request)?;
                if bytes.is_empty() {
                    continue;
                }
                let file = tempfile::Builder::new()
                    .prefix("mindgauge-upload-")
                    .suffix(&suffix)
                    .tempfile()
                    .map_err(internal)?;
                tokio::fs::write(file.path(), &bytes).await.map_err(internal)?;
                if is_face {
                    request.face_image = Some(file.path().to_path_buf());
                } else {
                    request.ocr_image = Some(file.path().to_path_buf());
                }
                staged.push(file);
            }
            _ => {}
        }
    }

    let outcome = state.pipeline.run(&request).await;
    let bundle = build_report(&outcome, request.generate_pdf, &state.report_dir);
    drop(staged);

    Ok(Html(result_page(&bundle)))
}

/// Serve a generated PDF by file name. Names are UUID-suffixed and flat, so
/// anything with a path separator is rejected.
async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    if file.contains('/') || file.contains("..") || !file.ends_with(".pdf") {
        return Err(StatusCode::BAD_REQUEST);
    }
    let path = state.report_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((
            [(header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )),
        Err(e) => {
            error!(error = %e, file = %file, "Report download failed");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

fn result_page(bundle: &mindgauge_report::ReportBundle) -> String {
    let body = markdown::to_html(&bundle.markdown);
    let pdf_link = match (&bundle.pdf_path, &bundle.pdf_error) {
        (Some(path), _) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("<p><a href=\"/reports/{name}\">Download PDF report</a></p>")
        }
        (None, Some(err)) => format!("<p class=\"warn\">{err}</p>"),
        (None, None) => String::new(),
    };
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>MindGauge — Result</title>{STYLE}</head>\
         <body><main>{body}{pdf_link}\
         <p><a href=\"/\">&larr; Analyze something else</a></p></main></body></html>"
    )
}

const STYLE: &str = "<style>\
body{font-family:sans-serif;background:#f6f7f9;margin:0}\
main{max-width:760px;margin:2rem auto;background:#fff;padding:2rem;border-radius:8px}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:4px 8px}\
.warn{color:#a15c00}\
</style>";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>MindGauge</title>
<style>
body{font-family:sans-serif;background:#f6f7f9;margin:0}
main{max-width:560px;margin:2rem auto;background:#fff;padding:2rem;border-radius:8px}
label{display:block;margin-top:1rem;font-weight:bold}
textarea{width:100%;min-height:8rem}
button{margin-top:1.5rem;padding:.5rem 1.5rem}
</style></head>
<body><main>
<h1>MindGauge</h1>
<p>Enter a diary entry, upload an image containing text, and/or a face photo.</p>
<form action="/api/analyze" method="post" enctype="multipart/form-data">
  <label for="diary_text">Your thoughts or feelings</label>
  <textarea id="diary_text" name="diary_text" placeholder="How was your day?"></textarea>
  <label for="ocr_image">Image containing text (OCR)</label>
  <input type="file" id="ocr_image" name="ocr_image" accept="image/*">
  <label for="face_image">Face photo</label>
  <input type="file" id="face_image" name="face_image" accept="image/*">
  <label><input type="checkbox" name="generate_pdf"> Generate PDF report</label>
  <button type="submit">Analyze</button>
</form>
</main></body>
</html>
"#;

fn bad_request(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_page_embeds_pdf_error_inline() {
        let bundle = mindgauge_report::ReportBundle {
            markdown: "# Mental Health Analysis".to_string(),
            pdf_path: None,
            pdf_error: Some("PDF generation failed: disk full".to_string()),
        };
        let page = result_page(&bundle);
        assert!(page.contains("Mental Health Analysis"));
        assert!(page.contains("PDF generation failed"));
    }

    #[test]
    fn result_page_links_generated_pdf() {
        let bundle = mindgauge_report::ReportBundle {
            markdown: "# Mental Health Analysis".to_string(),
            pdf_path: Some("reports/mindgauge-report-abcd1234.pdf".into()),
            pdf_error: None,
        };
        let page = result_page(&bundle);
        assert!(page.contains("/reports/mindgauge-report-abcd1234.pdf"));
    }
}
