use std::sync::Arc;

use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageResult, TermFrequency,
};
use crate::processing::{BigramStage, CleanStage, StemStage, TokenizeStage};
use crate::vocab::{Dictionary, StopwordList};

/// Speech-level features extracted by [`SpeechPipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechFeatures {
    pub term_frequencies: Vec<TermFrequency>,
    pub keyword_present: bool,
}

impl SpeechFeatures {
    pub fn keyword_dummy(&self) -> u8 {
        self.keyword_present as u8
    }
}

/// Clean -> tokenize -> stem -> bigram chain applied to each speech.
pub struct SpeechPipeline {
    clean: CleanStage,
    tokenize: TokenizeStage,
    stem: StemStage,
    bigram: BigramStage,
}

impl SpeechPipeline {
    pub fn new(stopwords: Arc<StopwordList>, dictionary: Arc<Dictionary>) -> Self {
        Self {
            clean: CleanStage::new(),
            tokenize: TokenizeStage::new(stopwords),
            stem: StemStage::new(),
            bigram: BigramStage::new(dictionary),
        }
    }

    pub fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.clean.initialize(config)?;
        self.tokenize.initialize(config)?;
        self.stem.initialize(config)?;
        self.bigram.initialize(config)?;
        Ok(())
    }

    pub fn process(&mut self, speech: &str) -> StageResult<SpeechFeatures> {
        let cleaned = self.clean.execute(StageInput::from_text(speech))?;
        let words = self.tokenize.execute(StageInput::from_text(cleaned.text))?;
        let keyword_present = words
            .metadata
            .keyword_present
            .ok_or_else(|| StageError::Internal("tokenizer did not report keyword".into()))?;
        let stems = self.stem.execute(StageInput::from_tokens(words.tokens))?;
        let encoded = self.bigram.execute(StageInput::from_tokens(stems.tokens))?;
        let term_frequencies = encoded
            .metadata
            .term_frequencies
            .ok_or_else(|| StageError::Internal("bigram stage produced no encoding".into()))?;

        Ok(SpeechFeatures {
            term_frequencies,
            keyword_present,
        })
    }

    pub fn cleanup(&mut self) {
        self.clean.cleanup();
        self.tokenize.cleanup();
        self.stem.cleanup();
        self.bigram.cleanup();
    }
}
