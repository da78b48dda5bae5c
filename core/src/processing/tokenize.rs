use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::vocab::StopwordList;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-z0-9]+").expect("valid regex"));

/// Splits lower-cased text into words, dropping empty fragments and stopwords.
pub fn tokenize(text: &str, stopwords: &StopwordList) -> Vec<String> {
    NON_ALPHANUMERIC
        .split(text)
        .filter(|word| !word.is_empty() && !stopwords.contains(word))
        .map(str::to_string)
        .collect()
}

/// Second stage: word segmentation, stopword removal and keyword detection.
/// The keyword is checked before stemming.
pub struct TokenizeStage {
    stopwords: Arc<StopwordList>,
    keyword: Option<String>,
}

impl TokenizeStage {
    pub fn new(stopwords: Arc<StopwordList>) -> Self {
        Self {
            stopwords,
            keyword: None,
        }
    }
}

impl ProcessingStage for TokenizeStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        let keyword = config.keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(StageError::InvalidInput("keyword must not be empty".into()));
        }
        self.keyword = Some(keyword);
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        let keyword = self
            .keyword
            .as_deref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let tokens = tokenize(&input.text, &self.stopwords);
        let keyword_present = tokens.iter().any(|word| word == keyword);

        let metadata = StageMetadata {
            keyword_present: Some(keyword_present),
            notes: vec![format!("{} words after stopword filter", tokens.len())],
            ..Default::default()
        };

        Ok(StageOutput {
            text: String::new(),
            tokens,
            metadata,
        })
    }

    fn cleanup(&mut self) {
        self.keyword = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopwords() -> Arc<StopwordList> {
        Arc::new(StopwordList::parse("the\nof\nand\ni\nll\n"))
    }

    #[test]
    fn tokenize_splits_on_non_alphanumerics() {
        let words = tokenize("...the state of the union, and 1950's budget!", &stopwords());
        assert_eq!(words, vec!["state", "union", "1950", "s", "budget"]);
    }

    #[test]
    fn tokenize_stage_flags_keyword_before_stemming() {
        let mut stage = TokenizeStage::new(stopwords());
        stage.initialize(&StageConfig::default()).unwrap();

        let output = stage
            .execute(StageInput::from_text("in god we trust"))
            .unwrap();
        assert_eq!(output.metadata.keyword_present, Some(true));

        let output = stage
            .execute(StageInput::from_text("goddess of liberty"))
            .unwrap();
        assert_eq!(output.metadata.keyword_present, Some(false));
        stage.cleanup();
    }

    #[test]
    fn tokenize_stage_rejects_blank_keyword() {
        let mut stage = TokenizeStage::new(stopwords());
        let config = StageConfig {
            keyword: "  ".into(),
        };
        assert!(stage.initialize(&config).is_err());
    }
}
