pub mod face;
pub mod ocr;
pub mod sentiment;
pub mod vision;

pub use face::{FaceProvider, analyze_face};
pub use ocr::{OcrEngine, extract_text};
pub use sentiment::{SentimentProvider, SentimentVerdict, classify_sentiment};
pub use vision::VisionProvider;
