pub mod bigram;
pub mod clean;
pub mod pipeline;
pub mod stem;
pub mod tokenize;

pub use bigram::BigramStage;
pub use clean::CleanStage;
pub use pipeline::{SpeechFeatures, SpeechPipeline};
pub use stem::StemStage;
pub use tokenize::TokenizeStage;
