//! Text classification, aggregation, and the end-to-end analysis pipeline.

pub mod aggregate;
pub mod classify;
pub mod pipeline;

pub use classify::{SentimentBackend, TextClassification};
pub use pipeline::Pipeline;
