use crate::jobs::{self, CombineSummary, PartisanSummary, TermFrequencySummary};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;

/// Batch job selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    TermFrequencies,
    PartisanDummies,
    Combine,
    All,
}

#[derive(Default)]
pub struct WorkflowResult {
    pub term_frequencies: Option<TermFrequencySummary>,
    pub partisan_dummies: Option<PartisanSummary>,
    pub combine: Option<CombineSummary>,
}

impl WorkflowResult {
    /// One-line summary appended to the run log.
    pub fn report(&self) -> String {
        let mut parts = Vec::new();
        if let Some(tf) = &self.term_frequencies {
            parts.push(format!(
                "term_frequencies[{} years, vocab {}, {}]",
                tf.years_written, tf.vocabulary_size, tf.metrics
            ));
        }
        if let Some(partisan) = &self.partisan_dummies {
            parts.push(format!(
                "partisan_dummies[rep {}x{}, dem {}x{}]",
                partisan.republican_rows,
                partisan.republican_bigrams,
                partisan.democrat_rows,
                partisan.democrat_bigrams
            ));
        }
        if let Some(combine) = &self.combine {
            parts.push(format!(
                "combine[{} rows, {} columns]",
                combine.rows, combine.columns
            ));
        }
        parts.join(" ")
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, job: Job) -> anyhow::Result<WorkflowResult> {
        self.config.validate().context("validating workflow config")?;
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "creating output directory {}",
                self.config.output_dir.display()
            )
        })?;

        let mut result = WorkflowResult::default();
        if matches!(job, Job::TermFrequencies | Job::All) {
            result.term_frequencies = Some(
                jobs::term_frequencies::run(&self.config).context("term frequency job")?,
            );
        }
        if matches!(job, Job::PartisanDummies | Job::All) {
            result.partisan_dummies = Some(
                jobs::partisan_dummies::run(&self.config).context("partisan bigram dummy job")?,
            );
        }
        if matches!(job, Job::Combine | Job::All) {
            result.combine = Some(jobs::combine::run(&self.config).context("combine job")?);
        }
        Ok(result)
    }
}
