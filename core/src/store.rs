//! Year-partitioned intermediate files shared by the batch jobs.
//!
//! Each `(chamber, year)` pair owns a metadata table, one term-frequency line
//! per speech and one keyword dummy per speech, all in the same row order.
//! Partisanship scores are supplied externally in that same order.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::calendar::Chamber;
use crate::corpus::SpeechRecord;
use crate::error::{CorpusError, CorpusResult};
use crate::prelude::TermFrequency;

/// Column holding the externally supplied partisanship score.
pub const BIAS_COLUMN: &str = "bias";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFile {
    TermFrequencies,
    KeywordDummies,
    Metadata,
    PartisanScores,
}

impl YearFile {
    fn suffix(&self) -> &'static str {
        match self {
            YearFile::TermFrequencies => "tfs.jsonl",
            YearFile::KeywordDummies => "keyword_dummies.csv",
            YearFile::Metadata => "metadata.csv",
            YearFile::PartisanScores => "partisan_scores.csv",
        }
    }
}

/// Header plus speech records for one chamber-year.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    pub header: Vec<String>,
    pub records: Vec<SpeechRecord>,
}

impl MetadataTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|name| name == column)
    }
}

/// Name of the keyword dummy column, e.g. `god_dummy`.
pub fn keyword_column(keyword: &str) -> String {
    format!("{}_dummy", keyword)
}

/// Root of the `{chamber}/{year}-*` tree.
#[derive(Debug, Clone)]
pub struct YearStore {
    root: PathBuf,
}

impl YearStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, chamber: Chamber, year: i32, file: YearFile) -> PathBuf {
        self.root
            .join(chamber.code())
            .join(format!("{}-{}", year, file.suffix()))
    }

    fn create(&self, chamber: Chamber, year: i32, file: YearFile) -> CorpusResult<(PathBuf, File)> {
        let path = self.path(chamber, year, file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| CorpusError::io(parent, err))?;
        }
        let handle = File::create(&path).map_err(|err| CorpusError::io(&path, err))?;
        Ok((path, handle))
    }

    pub fn write_term_frequencies(
        &self,
        chamber: Chamber,
        year: i32,
        speeches: &[Vec<TermFrequency>],
    ) -> CorpusResult<()> {
        let (path, file) = self.create(chamber, year, YearFile::TermFrequencies)?;
        let mut writer = BufWriter::new(file);
        for tfs in speeches {
            serde_json::to_writer(&mut writer, tfs).map_err(|err| CorpusError::json(&path, err))?;
            writer.write_all(b"\n").map_err(|err| CorpusError::io(&path, err))?;
        }
        writer.flush().map_err(|err| CorpusError::io(&path, err))
    }

    pub fn read_term_frequencies(
        &self,
        chamber: Chamber,
        year: i32,
    ) -> CorpusResult<Vec<Vec<TermFrequency>>> {
        let path = self.path(chamber, year, YearFile::TermFrequencies);
        let file = File::open(&path).map_err(|err| CorpusError::io(&path, err))?;
        let mut speeches = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|err| CorpusError::io(&path, err))?;
            if line.trim().is_empty() {
                continue;
            }
            let tfs = serde_json::from_str(&line).map_err(|err| CorpusError::json(&path, err))?;
            speeches.push(tfs);
        }
        Ok(speeches)
    }

    pub fn write_keyword_dummies(
        &self,
        chamber: Chamber,
        year: i32,
        keyword: &str,
        dummies: &[u8],
    ) -> CorpusResult<()> {
        let (path, file) = self.create(chamber, year, YearFile::KeywordDummies)?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record([keyword_column(keyword)])
            .map_err(|err| CorpusError::csv(&path, err))?;
        for dummy in dummies {
            writer
                .write_record([dummy.to_string()])
                .map_err(|err| CorpusError::csv(&path, err))?;
        }
        writer.flush().map_err(|err| CorpusError::io(&path, err))
    }

    pub fn read_keyword_dummies(&self, chamber: Chamber, year: i32) -> CorpusResult<Vec<u8>> {
        let path = self.path(chamber, year, YearFile::KeywordDummies);
        read_first_column(&path, |raw| raw.parse::<u8>().ok())
    }

    pub fn write_metadata(
        &self,
        chamber: Chamber,
        year: i32,
        table: &MetadataTable,
    ) -> CorpusResult<()> {
        let (path, file) = self.create(chamber, year, YearFile::Metadata)?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(&table.header)
            .map_err(|err| CorpusError::csv(&path, err))?;
        for record in &table.records {
            let row: Vec<&str> = table
                .header
                .iter()
                .map(|column| record.get(column).unwrap_or(""))
                .collect();
            writer
                .write_record(&row)
                .map_err(|err| CorpusError::csv(&path, err))?;
        }
        writer.flush().map_err(|err| CorpusError::io(&path, err))
    }

    pub fn read_metadata(&self, chamber: Chamber, year: i32) -> CorpusResult<MetadataTable> {
        let path = self.path(chamber, year, YearFile::Metadata);
        let mut reader = csv::Reader::from_path(&path).map_err(|err| CorpusError::csv(&path, err))?;
        let header: Vec<String> = reader
            .headers()
            .map_err(|err| CorpusError::csv(&path, err))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|err| CorpusError::csv(&path, err))?;
            let fields = header
                .iter()
                .cloned()
                .zip(row.iter().map(str::to_string))
                .collect();
            records.push(SpeechRecord::from_fields(fields));
        }
        Ok(MetadataTable { header, records })
    }

    pub fn write_partisan_scores(
        &self,
        chamber: Chamber,
        year: i32,
        scores: &[Option<f64>],
    ) -> CorpusResult<()> {
        let (path, file) = self.create(chamber, year, YearFile::PartisanScores)?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record([BIAS_COLUMN])
            .map_err(|err| CorpusError::csv(&path, err))?;
        for score in scores {
            let cell = score.map(|value| value.to_string()).unwrap_or_default();
            writer
                .write_record([cell])
                .map_err(|err| CorpusError::csv(&path, err))?;
        }
        writer.flush().map_err(|err| CorpusError::io(&path, err))
    }

    /// Reads the `bias` column; blank cells are missing scores.
    pub fn read_partisan_scores(&self, chamber: Chamber, year: i32) -> CorpusResult<Vec<Option<f64>>> {
        let path = self.path(chamber, year, YearFile::PartisanScores);
        let mut reader = csv::Reader::from_path(&path).map_err(|err| CorpusError::csv(&path, err))?;
        let position = reader
            .headers()
            .map_err(|err| CorpusError::csv(&path, err))?
            .iter()
            .position(|column| column == BIAS_COLUMN)
            .ok_or_else(|| CorpusError::MissingColumn {
                path: path.clone(),
                column: BIAS_COLUMN.to_string(),
            })?;

        let mut scores = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|err| CorpusError::csv(&path, err))?;
            let raw = record.get(position).unwrap_or("").trim();
            if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
                scores.push(None);
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| CorpusError::Parse {
                path: path.clone(),
                line: row + 2,
                message: format!("invalid score `{}`", raw),
            })?;
            scores.push(Some(value));
        }
        Ok(scores)
    }
}

fn read_first_column<T>(path: &Path, parse: impl Fn(&str) -> Option<T>) -> CorpusResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| CorpusError::csv(path, err))?;
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| CorpusError::csv(path, err))?;
        let raw = record.get(0).unwrap_or("").trim();
        let value = parse(raw).ok_or_else(|| CorpusError::Parse {
            path: path.to_path_buf(),
            line: row + 2,
            message: format!("unexpected value `{}`", raw),
        })?;
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_are_partitioned_by_chamber_and_year() {
        let store = YearStore::new("/data/congress");
        assert_eq!(
            store.path(Chamber::Senate, 1972, YearFile::Metadata),
            PathBuf::from("/data/congress/S/1972-metadata.csv")
        );
    }

    #[test]
    fn term_frequencies_survive_a_write_and_read() {
        let dir = tempdir().unwrap();
        let store = YearStore::new(dir.path());
        let speeches = vec![vec![(0, 2), (7, 1)], vec![], vec![(3, 1)]];
        store
            .write_term_frequencies(Chamber::House, 1950, &speeches)
            .unwrap();
        assert_eq!(
            store.read_term_frequencies(Chamber::House, 1950).unwrap(),
            speeches
        );
    }

    #[test]
    fn keyword_dummies_use_keyword_header() {
        let dir = tempdir().unwrap();
        let store = YearStore::new(dir.path());
        store
            .write_keyword_dummies(Chamber::House, 1951, "god", &[1, 0, 0])
            .unwrap();
        let raw = fs::read_to_string(store.path(Chamber::House, 1951, YearFile::KeywordDummies))
            .unwrap();
        assert!(raw.starts_with("god_dummy\n"));
        assert_eq!(
            store.read_keyword_dummies(Chamber::House, 1951).unwrap(),
            vec![1, 0, 0]
        );
    }

    #[test]
    fn metadata_table_keeps_header_order() {
        let dir = tempdir().unwrap();
        let store = YearStore::new(dir.path());
        let header: Vec<String> = ["filename", "year", "republican"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let record = SpeechRecord::from_fields(vec![
            ("filename".into(), "a.txt".into()),
            ("year".into(), "1950".into()),
            ("republican".into(), "1".into()),
        ]);
        let table = MetadataTable {
            header: header.clone(),
            records: vec![record.clone()],
        };
        store.write_metadata(Chamber::Senate, 1950, &table).unwrap();

        let loaded = store.read_metadata(Chamber::Senate, 1950).unwrap();
        assert_eq!(loaded.header, header);
        assert_eq!(loaded.records, vec![record]);
    }

    #[test]
    fn partisan_scores_allow_missing_values() {
        let dir = tempdir().unwrap();
        let store = YearStore::new(dir.path());
        store
            .write_partisan_scores(Chamber::House, 1960, &[Some(0.25), None, Some(-1.5)])
            .unwrap();
        assert_eq!(
            store.read_partisan_scores(Chamber::House, 1960).unwrap(),
            vec![Some(0.25), None, Some(-1.5)]
        );
    }

    #[test]
    fn reading_a_missing_year_fails() {
        let dir = tempdir().unwrap();
        let store = YearStore::new(dir.path());
        assert!(store.read_metadata(Chamber::House, 2001).is_err());
    }
}
