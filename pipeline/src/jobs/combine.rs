use crate::jobs::partisan_dummies::ensure_rows;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use congresscore::calendar::{decade_for_year, session_for_year};
use congresscore::corpus::SpeechRecord;
use congresscore::store::{keyword_column, BIAS_COLUMN};
use congresscore::telemetry::LogManager;
use std::path::Path;

pub struct CombineSummary {
    pub rows: usize,
    pub columns: usize,
}

/// Column order of the combined dataset: every header seen, first seen first.
#[derive(Default)]
struct ColumnSet {
    columns: Vec<String>,
}

impl ColumnSet {
    fn extend<'a, I: IntoIterator<Item = &'a str>>(&mut self, columns: I) {
        for column in columns {
            if !self.columns.iter().any(|existing| existing == column) {
                self.columns.push(column.to_string());
            }
        }
    }
}

pub fn run(config: &WorkflowConfig) -> anyhow::Result<CombineSummary> {
    let logger = LogManager::new();
    let store = config.store();
    let keyword_col = keyword_column(&config.keyword());
    let derived = [keyword_col.as_str(), BIAS_COLUMN, "session", "decade"];

    let mut columns = ColumnSet::default();
    let mut rows: Vec<SpeechRecord> = Vec::new();

    for &chamber in &config.chambers {
        for year in config.years() {
            logger.record_progress(chamber, year);
            let context = format!("{} {}", chamber, year);

            let metadata = store.read_metadata(chamber, year)?;
            let keyword_dummies = store.read_keyword_dummies(chamber, year)?;
            let scores = store
                .read_partisan_scores(chamber, year)
                .with_context(|| format!("reading partisanship scores for {}", context))?;
            ensure_rows(&context, metadata.records.len(), keyword_dummies.len())?;
            ensure_rows(&context, metadata.records.len(), scores.len())?;

            columns.extend(metadata.header.iter().map(String::as_str));
            columns.extend(derived);

            for ((mut record, dummy), score) in metadata
                .records
                .into_iter()
                .zip(keyword_dummies)
                .zip(scores)
            {
                let speech_year = record
                    .year()
                    .with_context(|| format!("speech without a year in {}", context))?;
                record.set(&keyword_col, dummy.to_string());
                record.set(
                    BIAS_COLUMN,
                    score.map(|value| value.to_string()).unwrap_or_default(),
                );
                record.set("session", session_for_year(speech_year)?.to_string());
                record.set("decade", decade_for_year(speech_year).to_string());
                rows.push(record);
            }
        }
    }

    let path = config.combined_path();
    write_dataset(&path, &columns.columns, &rows)
        .with_context(|| format!("writing combined dataset {}", path.display()))?;
    logger.record(&format!(
        "combined dataset: {} speeches, {} columns",
        rows.len(),
        columns.columns.len()
    ));

    Ok(CombineSummary {
        rows: rows.len(),
        columns: columns.columns.len(),
    })
}

fn write_dataset(path: &Path, columns: &[String], rows: &[SpeechRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns)?;
    for record in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.get(column).unwrap_or("")),
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_set_keeps_first_seen_order() {
        let mut columns = ColumnSet::default();
        columns.extend(["filename", "year", "party"]);
        columns.extend(["filename", "district", "year"]);
        assert_eq!(columns.columns, vec!["filename", "year", "party", "district"]);
    }

    #[test]
    fn dataset_fills_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech_data.csv");
        let columns = vec!["filename".to_string(), "district".to_string()];
        let rows = vec![SpeechRecord::from_fields(vec![(
            "filename".into(),
            "a.txt".into(),
        )])];
        write_dataset(&path, &columns, &rows).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "filename,district\na.txt,\n"
        );
    }
}
