use std::sync::Arc;

use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::vocab::Dictionary;

/// Joins each consecutive pair of words with `_`.
pub fn bigrams<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .windows(2)
        .map(|pair| format!("{}_{}", pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}

/// Final stage: forms bigrams and encodes them against the fixed dictionary.
pub struct BigramStage {
    dictionary: Arc<Dictionary>,
    config: Option<StageConfig>,
}

impl BigramStage {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            config: None,
        }
    }
}

impl ProcessingStage for BigramStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if self.dictionary.is_empty() {
            return Err(StageError::InvalidInput("dictionary is empty".into()));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        if self.config.is_none() {
            return Err(StageError::Internal("stage not initialized".into()));
        }

        let tokens = bigrams(input.tokens.as_slice());
        let term_frequencies = self.dictionary.doc2bow(tokens.as_slice());
        let metadata = StageMetadata {
            notes: vec![format!(
                "{} of {} bigrams in vocabulary",
                term_frequencies.iter().map(|&(_, count)| count).sum::<u32>(),
                tokens.len()
            )],
            term_frequencies: Some(term_frequencies),
            ..Default::default()
        };

        Ok(StageOutput {
            text: String::new(),
            tokens,
            metadata,
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
