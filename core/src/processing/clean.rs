use once_cell::sync::Lazy;
use regex::Regex;

use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(" +").expect("valid regex"));

/// Joins hyphenated line breaks, flattens newlines and non-breaking spaces,
/// and collapses repeated spaces.
pub fn clean_text(text: &str) -> String {
    let text = text
        .replace("-\n", "")
        .replace('\n', " ")
        .replace('\u{a0}', " ");
    SPACE_RUNS.replace_all(&text, " ").into_owned()
}

/// First stage: normalizes raw speech text and lower-cases it.
pub struct CleanStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl CleanStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for CleanStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for CleanStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: StageInput) -> StageResult<StageOutput> {
        if self.config.is_none() {
            return Err(StageError::Internal("stage not initialized".into()));
        }
        if !input.text.is_empty() && input.text.trim().is_empty() {
            return Err(StageError::InvalidInput("whitespace-only speech".into()));
        }

        let text = clean_text(&input.text).to_lowercase();
        self.logger
            .trace(&format!("CleanStage {} -> {} chars", input.text.len(), text.len()));

        Ok(StageOutput {
            text,
            tokens: Vec::new(),
            metadata: StageMetadata::default(),
        })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_joins_hyphenated_breaks() {
        assert_eq!(clean_text("appro-\npriation bill"), "appropriation bill");
        assert_eq!(clean_text("one\ntwo\u{a0}\u{a0}three   four"), "one two three four");
    }

    #[test]
    fn clean_stage_lowercases() {
        let mut stage = CleanStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let output = stage
            .execute(StageInput::from_text("Mr. SPEAKER,\nI rise"))
            .unwrap();
        assert_eq!(output.text, "mr. speaker, i rise");
        stage.cleanup();
    }

    #[test]
    fn clean_stage_rejects_blank_speech() {
        let mut stage = CleanStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        assert!(matches!(
            stage.execute(StageInput::from_text(" \n\t ")),
            Err(StageError::InvalidInput(_))
        ));
    }

    #[test]
    fn clean_stage_passes_empty_speech_through() {
        let mut stage = CleanStage::new();
        stage.initialize(&StageConfig::default()).unwrap();
        let output = stage.execute(StageInput::from_text("")).unwrap();
        assert!(output.text.is_empty());
    }

    #[test]
    fn clean_stage_requires_initialization() {
        let mut stage = CleanStage::new();
        assert!(matches!(
            stage.execute(StageInput::from_text("text")),
            Err(StageError::Internal(_))
        ));
    }
}
