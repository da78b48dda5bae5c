use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::calendar::Chamber;
use crate::corpus::filename::SpeakerKey;
use crate::error::{CorpusError, CorpusResult};

const REQUIRED_COLUMNS: [&str; 7] = [
    "speech_year",
    "speech_month",
    "state",
    "last",
    "start",
    "house",
    "senate",
];

/// One legislator-month row of the roster, with every column kept as text.
/// Numeric key fields left blank or `nan` are `None`; such a row never matches.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub state: String,
    pub last: String,
    pub start: Option<i64>,
    pub house: Option<i64>,
    pub senate: Option<i64>,
    pub values: Vec<String>,
}

impl RosterEntry {
    fn matches(&self, key: &SpeakerKey, chamber: Chamber) -> bool {
        self.state == key.state
            && self.last == key.last_name
            && self.start == Some(key.start)
            && self.house == Some(chamber.house_dummy())
            && self.senate == Some(chamber.senate_dummy())
    }
}

/// Monthly legislator roster, indexed by `(year, month)`.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    columns: Vec<String>,
    entries: Vec<RosterEntry>,
    by_month: HashMap<(i32, u32), Vec<usize>>,
}

impl Roster {
    pub fn load<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
        let path_ref = path.as_ref();
        let reader = csv::Reader::from_path(path_ref).map_err(|err| CorpusError::csv(path_ref, err))?;
        Self::from_csv(reader, path_ref)
    }

    pub fn from_reader<R: Read>(reader: R) -> CorpusResult<Self> {
        Self::from_csv(csv::Reader::from_reader(reader), Path::new("<roster>"))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>, source: &Path) -> CorpusResult<Self> {
        let columns: Vec<String> = reader
            .headers()
            .map_err(|err| CorpusError::csv(source, err))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = columns
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| CorpusError::MissingColumn {
                    path: source.to_path_buf(),
                    column: name.to_string(),
                })?;
        }
        let [year_at, month_at, state_at, last_at, start_at, house_at, senate_at] = positions;

        let mut roster = Roster {
            columns,
            ..Default::default()
        };

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|err| CorpusError::csv(source, err))?;
            let line = row + 2;
            let values: Vec<String> = record.iter().map(str::to_string).collect();
            let field = |at: usize| values.get(at).map(String::as_str).unwrap_or("");
            let number = |at: usize| parse_whole(field(at), source, line, &roster.columns[at]);

            let entry = RosterEntry {
                year: narrow(number(year_at)?, source, line, &roster.columns[year_at])?,
                month: narrow(number(month_at)?, source, line, &roster.columns[month_at])?,
                state: field(state_at).to_string(),
                last: field(last_at).to_string(),
                start: number(start_at)?,
                house: number(house_at)?,
                senate: number(senate_at)?,
                values: values.clone(),
            };
            roster.push(entry);
        }

        debug!(
            "roster loaded: {} rows across {} months",
            roster.entries.len(),
            roster.by_month.len()
        );
        Ok(roster)
    }

    fn push(&mut self, entry: RosterEntry) {
        let index = self.entries.len();
        if let (Some(year), Some(month)) = (entry.year, entry.month) {
            self.by_month.entry((year, month)).or_default().push(index);
        }
        self.entries.push(entry);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First roster row for the given month that matches the speaker and chamber.
    pub fn lookup(
        &self,
        year: i32,
        month: u32,
        key: &SpeakerKey,
        chamber: Chamber,
    ) -> Option<&RosterEntry> {
        self.by_month
            .get(&(year, month))?
            .iter()
            .map(|&index| &self.entries[index])
            .find(|entry| entry.matches(key, chamber))
    }
}

fn narrow<T: TryFrom<i64>>(
    value: Option<i64>,
    source: &Path,
    line: usize,
    column: &str,
) -> CorpusResult<Option<T>> {
    value
        .map(|value| {
            T::try_from(value).map_err(|_| CorpusError::Parse {
                path: PathBuf::from(source),
                line,
                message: format!("column `{}` is out of range: `{}`", column, value),
            })
        })
        .transpose()
}

/// Accepts integral values written either as `1990` or as `1990.0`.
/// Blank and `nan` cells are missing values.
fn parse_whole(raw: &str, source: &Path, line: usize, column: &str) -> CorpusResult<Option<i64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let invalid = || CorpusError::Parse {
        path: PathBuf::from(source),
        line,
        message: format!("column `{}` is not a whole number: `{}`", column, trimmed),
    };
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(Some(value));
    }
    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Ok(Some(value as i64))
    } else {
        Err(invalid())
    }
}
