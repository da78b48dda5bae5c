use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use congresscore::calendar::{days_of_year, Chamber, Dataset};
use congresscore::corpus::{parse_speech_filename, Roster, SpeechFilename, SpeechRecord};
use congresscore::prelude::TermFrequency;
use congresscore::processing::SpeechPipeline;
use congresscore::store::MetadataTable;
use congresscore::telemetry::{LogManager, MetricsRecorder, SkipReason};
use congresscore::vocab::{Dictionary, StopwordList};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct TermFrequencySummary {
    pub metrics: MetricsRecorder,
    pub vocabulary_size: usize,
    pub years_written: usize,
}

/// Speech-level outputs gathered for one chamber-year, in matching order.
struct YearOutput {
    metadata: MetadataTable,
    term_frequencies: Vec<Vec<TermFrequency>>,
    keyword_dummies: Vec<u8>,
    metrics: MetricsRecorder,
}

pub fn run(config: &WorkflowConfig) -> anyhow::Result<TermFrequencySummary> {
    let logger = LogManager::new();

    let stopwords = StopwordList::load(&config.stopwords)
        .with_context(|| format!("loading stopwords {}", config.stopwords.display()))?;
    let dictionary = Dictionary::from_vocab_file(&config.vocab)
        .with_context(|| format!("building dictionary from {}", config.vocab.display()))?;
    dictionary
        .save(config.dictionary_path())
        .context("persisting dictionary")?;
    let roster = Roster::load(&config.roster)
        .with_context(|| format!("loading roster {}", config.roster.display()))?;
    logger.record(&format!(
        "{} stopwords, {} vocabulary bigrams, {} roster rows",
        stopwords.len(),
        dictionary.len(),
        roster.len()
    ));

    let vocabulary_size = dictionary.len();
    let mut pipeline = SpeechPipeline::new(Arc::new(stopwords), Arc::new(dictionary));
    pipeline
        .initialize(&config.to_stage_config())
        .context("initializing speech pipeline")?;

    let keyword = config.keyword();
    let store = config.store();
    let mut metrics = MetricsRecorder::new();
    let mut years_written = 0;

    for &chamber in &config.chambers {
        for year in config.years() {
            logger.record_progress(chamber, year);
            let output = process_year(config, &roster, &mut pipeline, chamber, year)
                .with_context(|| format!("processing {} {}", chamber, year))?;

            store
                .write_metadata(chamber, year, &output.metadata)
                .context("writing speech metadata")?;
            store
                .write_term_frequencies(chamber, year, &output.term_frequencies)
                .context("writing term frequencies")?;
            store
                .write_keyword_dummies(chamber, year, &keyword, &output.keyword_dummies)
                .context("writing keyword dummies")?;

            info!("{} {} -> {}", chamber, year, output.metrics);
            metrics.merge(&output.metrics);
            years_written += 1;
        }
    }
    pipeline.cleanup();

    Ok(TermFrequencySummary {
        metrics,
        vocabulary_size,
        years_written,
    })
}

fn process_year(
    config: &WorkflowConfig,
    roster: &Roster,
    pipeline: &mut SpeechPipeline,
    chamber: Chamber,
    year: i32,
) -> anyhow::Result<YearOutput> {
    let mut output = YearOutput {
        metadata: MetadataTable {
            header: SpeechRecord::header_for(roster.columns()),
            records: Vec::new(),
        },
        term_frequencies: Vec::new(),
        keyword_dummies: Vec::new(),
        metrics: MetricsRecorder::new(),
    };

    for date in days_of_year(year) {
        let dir = day_directory(config, chamber, date);
        let Some(filenames) = list_speech_files(&dir)? else {
            continue;
        };

        for filename in filenames {
            let key = match parse_speech_filename(&filename) {
                SpeechFilename::Member(key) => key,
                SpeechFilename::NonMember => {
                    output.metrics.record_skip(SkipReason::NonMember);
                    continue;
                }
                SpeechFilename::Procedural(_) => {
                    output.metrics.record_skip(SkipReason::Procedural);
                    continue;
                }
                SpeechFilename::InvalidStart(start) => {
                    debug!("{}: start `{}` is not a year", filename, start);
                    output.metrics.record_skip(SkipReason::InvalidStart);
                    continue;
                }
            };

            let Some(entry) = roster.lookup(date.year(), date.month(), &key, chamber) else {
                debug!("{}: no roster match for {:?}", filename, key);
                output.metrics.record_skip(SkipReason::Unmatched);
                continue;
            };

            let path = dir.join(&filename);
            let speech = fs::read_to_string(&path)
                .with_context(|| format!("reading speech {}", path.display()))?;
            if !speech.is_empty() && speech.trim().is_empty() {
                output.metrics.record_skip(SkipReason::Whitespace);
                continue;
            }

            let features = pipeline
                .process(&speech)
                .with_context(|| format!("processing speech {}", path.display()))?;

            output.metadata.records.push(SpeechRecord::new(
                &filename,
                chamber,
                date,
                roster.columns(),
                entry,
            ));
            output.keyword_dummies.push(features.keyword_dummy());
            output.term_frequencies.push(features.term_frequencies);
            output.metrics.record_processed();
        }
    }

    Ok(output)
}

pub fn day_directory(config: &WorkflowConfig, chamber: Chamber, date: NaiveDate) -> PathBuf {
    config
        .corpus_root
        .join(Dataset::for_date(date, config.gpo_start_year).dir_name())
        .join(chamber.code())
        .join(date.format("%Y-%m-%d").to_string())
}

/// Sorted file names in `dir`, or `None` when no speeches exist for that day.
fn list_speech_files(dir: &Path) -> anyhow::Result<Option<Vec<String>>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("listing speeches in {}", dir.display()))
        }
    };

    let mut filenames = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing speeches in {}", dir.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => filenames.push(name),
            Err(name) => warn!("skipping non UTF-8 file name {:?}", name),
        }
    }
    filenames.sort();
    Ok(Some(filenames))
}
