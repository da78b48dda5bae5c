use serde::{Deserialize, Serialize};

/// Sparse bag-of-words entry: `(token_id, count)`.
pub type TermFrequency = (u32, u32);

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Word whose presence sets the speech-level keyword dummy.
    pub keyword: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            keyword: "god".to_string(),
        }
    }
}

/// Input payload for a processing stage.
#[derive(Debug, Clone, Default)]
pub struct StageInput {
    pub text: String,
    pub tokens: Vec<String>,
}

impl StageInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
        }
    }

    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self {
            text: String::new(),
            tokens,
        }
    }
}

/// Output produced by each stage.
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    pub text: String,
    pub tokens: Vec<String>,
    pub metadata: StageMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    pub keyword_present: Option<bool>,
    pub term_frequencies: Option<Vec<TermFrequency>>,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the speech normalization stages.
pub trait ProcessingStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput>;
    fn cleanup(&mut self);
}
