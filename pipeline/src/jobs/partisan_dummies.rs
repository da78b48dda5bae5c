use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use congresscore::calendar::Chamber;
use congresscore::error::CorpusError;
use congresscore::prelude::TermFrequency;
use congresscore::store::{MetadataTable, YearFile, YearStore};
use congresscore::telemetry::LogManager;
use congresscore::vocab::{presence_matrix, Dictionary, PartisanRanking, PhraseScores};
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const REPUBLICAN: &str = "rep";
pub const DEMOCRAT: &str = "dem";

/// Roster dummies selecting each party's speeches.
const PARTY_COLUMNS: [&str; 2] = ["republican", "democrat"];

pub struct PartisanSummary {
    pub republican_bigrams: usize,
    pub democrat_bigrams: usize,
    pub republican_rows: usize,
    pub democrat_rows: usize,
}

/// Appends speech-by-bigram dummy rows for one party, plus the keyword dummy.
struct DummyWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    bigram_ids: Vec<u32>,
    rows: usize,
}

impl DummyWriter {
    fn create(
        path: PathBuf,
        bigrams: &[String],
        bigram_ids: Vec<u32>,
        keyword: &str,
    ) -> anyhow::Result<Self> {
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut header: Vec<&str> = bigrams.iter().map(String::as_str).collect();
        header.push(keyword);
        writer
            .write_record(&header)
            .with_context(|| format!("writing header to {}", path.display()))?;
        Ok(Self {
            path,
            writer,
            bigram_ids,
            rows: 0,
        })
    }

    fn append(
        &mut self,
        speeches: &[usize],
        term_frequencies: &[Vec<TermFrequency>],
        keyword_dummies: &[u8],
    ) -> anyhow::Result<()> {
        let selected: Vec<&[TermFrequency]> = speeches
            .iter()
            .map(|&index| term_frequencies[index].as_slice())
            .collect();
        let matrix = presence_matrix(&selected, &self.bigram_ids);

        for (row, &index) in matrix.rows().into_iter().zip(speeches) {
            let mut record: Vec<String> = row.iter().map(|value| value.to_string()).collect();
            record.push(keyword_dummies[index].to_string());
            self.writer
                .write_record(&record)
                .with_context(|| format!("appending to {}", self.path.display()))?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(mut self) -> anyhow::Result<usize> {
        self.writer
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        Ok(self.rows)
    }
}

pub fn run(config: &WorkflowConfig) -> anyhow::Result<PartisanSummary> {
    let logger = LogManager::new();

    let dictionary = Dictionary::load(config.dictionary_path())
        .context("loading dictionary; run term-frequencies first")?;
    let scores = PhraseScores::load_sessions(&config.phrase_dir, config.start_year, config.end_year)
        .with_context(|| format!("reading phrase scores from {}", config.phrase_dir.display()))?;
    let ranking = scores.rank(config.top_bigrams);
    logger.record(&format!(
        "{} scored bigrams -> {} republican, {} democrat",
        scores.len(),
        ranking.republican.len(),
        ranking.democrat.len()
    ));

    save_list(&ranking.republican, &config.bigram_list_path(REPUBLICAN))?;
    save_list(&ranking.democrat, &config.bigram_list_path(DEMOCRAT))?;

    let republican_ids = ranking
        .republican_ids(&dictionary)
        .context("mapping republican bigrams to dictionary ids")?;
    let democrat_ids = ranking
        .democrat_ids(&dictionary)
        .context("mapping democrat bigrams to dictionary ids")?;

    let keyword = config.keyword();
    let mut republican = DummyWriter::create(
        config.bigram_dummies_path(REPUBLICAN),
        &ranking.republican,
        republican_ids,
        &keyword,
    )?;
    let mut democrat = DummyWriter::create(
        config.bigram_dummies_path(DEMOCRAT),
        &ranking.democrat,
        democrat_ids,
        &keyword,
    )?;

    let store = config.store();
    for &chamber in &config.chambers {
        for year in config.years() {
            logger.record_progress(chamber, year);

            let metadata = store.read_metadata(chamber, year)?;
            ensure_party_columns(&store, chamber, year, &metadata)?;
            let keyword_dummies = store.read_keyword_dummies(chamber, year)?;
            let term_frequencies = store.read_term_frequencies(chamber, year)?;
            let context = format!("{} {}", chamber, year);
            ensure_rows(&context, metadata.records.len(), keyword_dummies.len())?;
            ensure_rows(&context, metadata.records.len(), term_frequencies.len())?;

            let party_rows = |column: &str| -> Vec<usize> {
                metadata
                    .records
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| record.is_flagged(column))
                    .map(|(index, _)| index)
                    .collect()
            };
            let [republican_column, democrat_column] = PARTY_COLUMNS;
            let republican_rows = party_rows(republican_column);
            let democrat_rows = party_rows(democrat_column);
            info!(
                "{} -> {} republican, {} democrat speeches",
                context,
                republican_rows.len(),
                democrat_rows.len()
            );

            republican.append(&republican_rows, &term_frequencies, &keyword_dummies)?;
            democrat.append(&democrat_rows, &term_frequencies, &keyword_dummies)?;
        }
    }

    Ok(PartisanSummary {
        republican_bigrams: ranking.republican.len(),
        democrat_bigrams: ranking.democrat.len(),
        republican_rows: republican.finish()?,
        democrat_rows: democrat.finish()?,
    })
}

fn save_list(bigrams: &[String], path: &Path) -> anyhow::Result<()> {
    PartisanRanking::save_list(bigrams, path)
        .with_context(|| format!("saving bigram list {}", path.display()))
}

fn ensure_party_columns(
    store: &YearStore,
    chamber: Chamber,
    year: i32,
    metadata: &MetadataTable,
) -> Result<(), CorpusError> {
    match PARTY_COLUMNS.iter().find(|column| !metadata.has_column(column)) {
        Some(column) => Err(CorpusError::MissingColumn {
            path: store.path(chamber, year, YearFile::Metadata),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn ensure_rows(context: &str, expected: usize, found: usize) -> Result<(), CorpusError> {
    if expected == found {
        Ok(())
    } else {
        Err(CorpusError::RowMismatch {
            context: context.to_string(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dummy_writer_marks_present_bigrams() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rep.csv");
        let bigrams = vec!["tax_cut".to_string(), "border_secur".to_string()];
        let mut writer = DummyWriter::create(path.clone(), &bigrams, vec![5, 2], "god").unwrap();

        let tfs = vec![vec![(2, 1), (5, 3)], vec![(1, 1)], vec![(5, 1)]];
        writer.append(&[0, 2], &tfs, &[1, 0, 0]).unwrap();
        writer.append(&[1], &tfs, &[1, 0, 0]).unwrap();
        assert_eq!(writer.finish().unwrap(), 3);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "tax_cut,border_secur,god\n1,1,1\n1,0,0\n0,0,0\n");
    }

    #[test]
    fn party_columns_are_required() {
        let store = YearStore::new("out");
        let table = |header: &[&str]| MetadataTable {
            header: header.iter().map(|name| name.to_string()).collect(),
            records: Vec::new(),
        };

        let full = table(&["filename", "republican", "democrat"]);
        assert!(ensure_party_columns(&store, Chamber::House, 1990, &full).is_ok());

        let partial = table(&["filename", "republican"]);
        let err = ensure_party_columns(&store, Chamber::House, 1990, &partial).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn { ref column, .. } if column == "democrat"));
    }

    #[test]
    fn ensure_rows_reports_mismatch() {
        assert!(ensure_rows("H 1950", 3, 3).is_ok());
        let err = ensure_rows("H 1950", 3, 2).unwrap_err();
        assert!(err.to_string().contains("expected 3, found 2"));
    }
}
