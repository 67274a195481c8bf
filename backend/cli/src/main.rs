mod api;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use mindgauge_config::{
    apply_all_defaults, config_dir, config_file_path, load_config, validate, write_config,
    MindGaugeConfig,
};
use mindgauge_core::AnalysisRequest;
use mindgauge_report::build_report;

use api::AppState;
use terminal_output as term;

#[derive(Parser)]
#[command(name = "mindgauge")]
#[command(about = "MindGauge — mental-state analysis from diary text, OCR images, and face photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze inputs and print the summary to the terminal
    Analyze {
        /// Diary text to analyze
        #[arg(short, long)]
        text: Option<String>,
        /// Image containing text to OCR
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Face photo for emotion analysis
        #[arg(short, long)]
        face: Option<PathBuf>,
        /// Also render a PDF report
        #[arg(long)]
        pdf: bool,
        /// OCR engine override: "tesseract" or "vision"
        #[arg(long)]
        engine: Option<String>,
    },
    /// Start the web front end
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether a local server is running
    Status,
    /// Write a starter config file with defaults filled in
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dir = config_dir();
    let config = load_config(&config_file_path(&dir)).await?;
    let config = apply_all_defaults(config.apply_env_overrides());

    let report = validate(&config);
    for warning in &report.warnings {
        term::note_warn(&warning.to_string());
    }
    if !report.is_valid() {
        for error in &report.errors {
            term::note_error(&error.to_string());
        }
        bail!("invalid configuration");
    }

    let logging_cfg = config.logging.clone().unwrap_or_default();
    logging::init_logger(
        logging_cfg.dir.as_deref().unwrap_or("logs"),
        logging_cfg.level.as_deref().unwrap_or("info"),
    );

    match cli.command {
        Commands::Analyze { text, image, face, pdf, engine } => {
            run_analyze(&config, text, image, face, pdf, engine).await
        }
        Commands::Serve { port } => run_server(&config, port).await,
        Commands::Status => run_status(&config).await,
        Commands::Init => run_init().await,
    }
}

async fn run_analyze(
    config: &mindgauge_config::MindGaugeConfig,
    text: Option<String>,
    image: Option<PathBuf>,
    face: Option<PathBuf>,
    pdf: bool,
    engine_override: Option<String>,
) -> Result<()> {
    let pipeline = setup::build_pipeline(config, engine_override.as_deref())?;
    let request = AnalysisRequest {
        diary_text: text,
        ocr_image: image,
        face_image: face,
        generate_pdf: pdf,
    };

    if let Some(text) = &request.diary_text {
        tracing::debug!(diary = %logging::redact_sensitive_data(text), "Analyzing diary text");
    }
    let outcome = pipeline.run(&request).await;

    if outcome.is_warning_only() {
        for warning in &outcome.warnings {
            term::note_warn(warning);
        }
        return Ok(());
    }

    let bundle = build_report(&outcome, request.generate_pdf, &setup::report_dir(config));

    term::print_outcome(&outcome);
    if let Some(path) = &bundle.pdf_path {
        term::note_info(&format!("PDF report written to {}", path.display()));
    }
    if let Some(err) = &bundle.pdf_error {
        term::note_warn(err);
    }

    Ok(())
}

async fn run_server(config: &mindgauge_config::MindGaugeConfig, port: Option<u16>) -> Result<()> {
    let gateway = config.gateway.clone().unwrap_or_default();
    let bind = gateway.bind.unwrap_or_else(|| "0.0.0.0".to_string());
    let port = port.or(gateway.port).unwrap_or(8080);

    let pipeline = setup::build_pipeline(config, None)?;
    let state = Arc::new(AppState {
        pipeline,
        report_dir: setup::report_dir(config),
    });

    let app = api::build_router(state);
    let addr = format!("{bind}:{port}");
    info!(addr = %addr, "Starting MindGauge web front end");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_status(config: &mindgauge_config::MindGaugeConfig) -> Result<()> {
    let port = config
        .gateway
        .as_ref()
        .and_then(|g| g.port)
        .unwrap_or(8080);
    let client = reqwest::Client::new();
    match client
        .get(format!("http://localhost:{port}/api/health"))
        .send()
        .await
    {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("MindGauge is not running on port {port}");
        }
    }
    Ok(())
}

/// Writes a defaults-filled config file for the user to edit. Secrets stay
/// in the environment; nothing from env is persisted.
async fn run_init() -> Result<()> {
    let dir = config_dir();
    let path = config_file_path(&dir);
    if path.exists() {
        bail!("config already exists at {}", path.display());
    }
    let config = apply_all_defaults(MindGaugeConfig::default());
    write_config(&config, &path).await?;
    term::note_info(&format!("Wrote starter config to {}", path.display()));
    Ok(())
}

/// Wires config sections into pipeline parts.
mod setup {
    use std::path::PathBuf;

    use anyhow::{bail, Result};

    use mindgauge_analysis::Pipeline;
    use mindgauge_config::MindGaugeConfig;
    use mindgauge_understanding::face::FaceProvider;
    use mindgauge_understanding::ocr::OcrEngine;
    use mindgauge_understanding::sentiment::SentimentProvider;
    use mindgauge_understanding::vision::VisionProvider;

    pub fn report_dir(config: &MindGaugeConfig) -> PathBuf {
        config
            .report
            .as_ref()
            .and_then(|r| r.output_dir.clone())
            .unwrap_or_else(|| "reports".to_string())
            .into()
    }

    pub fn build_pipeline(
        config: &MindGaugeConfig,
        engine_override: Option<&str>,
    ) -> Result<Pipeline> {
        Ok(Pipeline {
            sentiment: sentiment_backend(config),
            ocr: ocr_engine(config, engine_override)?,
            face: face_provider(config),
        })
    }

    fn sentiment_backend(
        config: &MindGaugeConfig,
    ) -> Option<Box<dyn mindgauge_analysis::SentimentBackend>> {
        let providers = config.providers.as_ref()?;
        if let Some(url) = &providers.sentiment_endpoint {
            return Some(Box::new(SentimentProvider::endpoint(url.clone())));
        }
        let hf = providers.huggingface.as_ref()?;
        Some(Box::new(SentimentProvider::huggingface(
            hf.api_key.clone(),
            hf.model.clone()?,
        )))
    }

    fn vision_provider(config: &MindGaugeConfig) -> Option<VisionProvider> {
        let providers = config.providers.as_ref()?;
        if let Some(openai) = &providers.openai {
            if let Some(key) = &openai.api_key {
                return Some(match &openai.model {
                    Some(model) => VisionProvider::OpenAI {
                        api_key: key.clone(),
                        model: model.clone(),
                    },
                    None => VisionProvider::openai(key.clone()),
                });
            }
        }
        let key = providers.gemini.as_ref()?.api_key.as_ref()?;
        Some(VisionProvider::gemini(key.clone()))
    }

    fn ocr_engine(
        config: &MindGaugeConfig,
        engine_override: Option<&str>,
    ) -> Result<Option<OcrEngine>> {
        let configured = config
            .ocr
            .as_ref()
            .and_then(|o| o.engine.as_deref())
            .unwrap_or("tesseract");
        let engine = engine_override.unwrap_or(configured);
        match engine {
            "tesseract" => {
                let command = config
                    .ocr
                    .as_ref()
                    .and_then(|o| o.tesseract_command.clone())
                    .unwrap_or_else(|| "tesseract".to_string());
                Ok(Some(OcrEngine::Tesseract { command }))
            }
            "vision" => match vision_provider(config) {
                Some(provider) => Ok(Some(OcrEngine::Vision { provider })),
                None => bail!("vision OCR requires an OpenAI or Gemini API key"),
            },
            other => bail!("unknown OCR engine '{other}' (expected 'tesseract' or 'vision')"),
        }
    }

    fn face_provider(config: &MindGaugeConfig) -> Option<FaceProvider> {
        let face = config.face.as_ref()?;
        match face.provider.as_deref().unwrap_or("deepface") {
            "vision" => {
                let providers = config.providers.as_ref()?;
                let key = providers.openai.as_ref()?.api_key.as_ref()?;
                Some(FaceProvider::Vision {
                    provider: VisionProvider::openai(key.clone()),
                })
            }
            _ => Some(FaceProvider::deepface(
                face.deepface_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:5005".to_string()),
            )),
        }
    }
}
