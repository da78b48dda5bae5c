use chrono::{Datelike, NaiveDate};

use crate::calendar::Chamber;
use crate::corpus::roster::RosterEntry;

/// Leading metadata fields that precede the roster columns.
pub const LEADING_FIELDS: [&str; 6] = ["filename", "chamber", "date", "year", "month", "day"];

/// Speech-level metadata row: the speech's own fields followed by the
/// matched roster columns, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRecord {
    fields: Vec<(String, String)>,
}

impl SpeechRecord {
    /// Combines the speech fields with the matched roster row. A roster column
    /// sharing a name with a leading field overwrites that field in place.
    pub fn new(
        filename: &str,
        chamber: Chamber,
        date: NaiveDate,
        roster_columns: &[String],
        entry: &RosterEntry,
    ) -> Self {
        let leading = [
            filename.to_string(),
            chamber.code().to_string(),
            date.format("%Y-%m-%d").to_string(),
            date.year().to_string(),
            date.month().to_string(),
            date.day().to_string(),
        ];
        let mut record = Self {
            fields: LEADING_FIELDS
                .iter()
                .map(|name| name.to_string())
                .zip(leading)
                .collect(),
        };
        for (column, value) in roster_columns.iter().zip(&entry.values) {
            record.set(column, value.clone());
        }
        record
    }

    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Column names a record built from `roster_columns` will carry.
    pub fn header_for(roster_columns: &[String]) -> Vec<String> {
        let mut header: Vec<String> = LEADING_FIELDS.iter().map(|name| name.to_string()).collect();
        for column in roster_columns {
            if !header.contains(column) {
                header.push(column.clone());
            }
        }
        header
    }

    pub fn set(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn year(&self) -> Option<i32> {
        self.get("year").and_then(|value| value.trim().parse().ok())
    }

    /// True when `column` holds a numeric 1, as party dummies do.
    pub fn is_flagged(&self, column: &str) -> bool {
        self.get(column)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .map_or(false, |value| value == 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(values: &[&str]) -> RosterEntry {
        RosterEntry {
            year: Some(1950),
            month: Some(3),
            state: "NY".into(),
            last: "SMITH".into(),
            start: Some(1945),
            house: Some(1),
            senate: Some(0),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    #[test]
    fn record_orders_speech_fields_before_roster() {
        let columns: Vec<String> = ["state", "last", "republican"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let date = NaiveDate::from_ymd_opt(1950, 3, 7).unwrap();
        let record = SpeechRecord::new(
            "H_NY_SMITH_1945_1.txt",
            Chamber::House,
            date,
            &columns,
            &entry(&["NY", "SMITH", "1.0"]),
        );

        let names: Vec<&str> = record.columns().collect();
        assert_eq!(
            names,
            vec!["filename", "chamber", "date", "year", "month", "day", "state", "last", "republican"]
        );
        assert_eq!(record.get("date"), Some("1950-03-07"));
        assert_eq!(record.year(), Some(1950));
        assert!(record.is_flagged("republican"));
        assert!(!record.is_flagged("democrat"));
    }

    #[test]
    fn roster_columns_overwrite_leading_fields() {
        let columns = vec!["chamber".to_string(), "party".to_string()];
        let date = NaiveDate::from_ymd_opt(1960, 1, 2).unwrap();
        let record = SpeechRecord::new("f", Chamber::Senate, date, &columns, &entry(&["Senate", "D"]));
        assert_eq!(record.get("chamber"), Some("Senate"));
        assert_eq!(record.columns().nth(1), Some("chamber"));
        assert_eq!(SpeechRecord::header_for(&columns).len(), 7);
    }
}
