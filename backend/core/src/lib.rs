pub mod error;
pub mod types;

pub use error::MindError;
pub use types::{
    AnalysisOutcome, AnalysisRequest, CombinedResult, FaceResult, MentalState, SentenceResult,
};
