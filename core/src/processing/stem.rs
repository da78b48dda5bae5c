use rust_stemmers::{Algorithm, Stemmer};

use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageOutput, StageResult,
};

/// Third stage: Porter2 (Snowball English) stemming of each word.
pub struct StemStage {
    stemmer: Option<Stemmer>,
}

impl StemStage {
    pub fn new() -> Self {
        Self { stemmer: None }
    }
}

impl Default for StemStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for StemStage {
    fn initialize(&mut self, _config: &StageConfig) -> StageResult<()> {
        self.stemmer = Some(Stemmer::create(Algorithm::English));
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let stemmer = self
            .stemmer
            .as_ref()
            .ok_or_else(|| StageError::Internal("stemmer not configured".into()))?;

        let tokens = input
            .tokens
            .iter()
            .map(|word| stemmer.stem(word).into_owned())
            .collect();

        Ok(StageOutput {
            text: String::new(),
            tokens,
            metadata: Default::default(),
        })
    }

    fn cleanup(&mut self) {
        self.stemmer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_stage_applies_porter2() {
        let mut stage = StemStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let input = StageInput::from_tokens(vec![
            "taxes".into(),
            "running".into(),
            "security".into(),
            "1950".into(),
        ]);
        let output = stage.execute(input).unwrap();
        assert_eq!(output.tokens, vec!["tax", "run", "secur", "1950"]);
        stage.cleanup();
    }
}
