use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, CorpusResult};

const FIRST_SESSION_YEAR: i32 = 1949;
const FIRST_SESSION: i32 = 81;

/// Congressional chamber a speech was delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chamber {
    #[serde(rename = "H")]
    House,
    #[serde(rename = "S")]
    Senate,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::House, Chamber::Senate];

    pub fn code(&self) -> &'static str {
        match self {
            Chamber::House => "H",
            Chamber::Senate => "S",
        }
    }

    /// Roster `house` dummy for this chamber.
    pub fn house_dummy(&self) -> i64 {
        matches!(self, Chamber::House) as i64
    }

    /// Roster `senate` dummy for this chamber.
    pub fn senate_dummy(&self) -> i64 {
        matches!(self, Chamber::Senate) as i64
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Chamber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "HOUSE" => Ok(Chamber::House),
            "S" | "SENATE" => Ok(Chamber::Senate),
            other => Err(format!("unknown chamber `{}`", other)),
        }
    }
}

/// Source collection holding the raw speech files for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Hein,
    Gpo,
}

impl Dataset {
    pub fn for_date(date: NaiveDate, gpo_start_year: i32) -> Self {
        if date.year() >= gpo_start_year {
            Dataset::Gpo
        } else {
            Dataset::Hein
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Dataset::Hein => "hein",
            Dataset::Gpo => "gpo",
        }
    }
}

/// Congress number sitting in `year`; each Congress spans two calendar years
/// starting with the 81st in 1949.
pub fn session_for_year(year: i32) -> CorpusResult<i32> {
    if year < FIRST_SESSION_YEAR {
        return Err(CorpusError::YearOutOfRange(year));
    }
    Ok(FIRST_SESSION + (year - FIRST_SESSION_YEAR) / 2)
}

pub fn decade_for_year(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Every calendar day of `year`, in order.
pub fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1);
    let span = match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days(),
        _ => 0,
    };
    (0..span).filter_map(move |offset| start.map(|day| day + Duration::days(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_advance_every_two_years() {
        assert_eq!(session_for_year(1949).unwrap(), 81);
        assert_eq!(session_for_year(1950).unwrap(), 81);
        assert_eq!(session_for_year(1951).unwrap(), 82);
        assert_eq!(session_for_year(1999).unwrap(), 106);
        assert_eq!(session_for_year(2014).unwrap(), 113);
        assert!(session_for_year(1948).is_err());
    }

    #[test]
    fn decade_floors_year() {
        assert_eq!(decade_for_year(1950), 1950);
        assert_eq!(decade_for_year(1999), 1990);
    }

    #[test]
    fn dataset_switches_at_gpo_year() {
        let hein = NaiveDate::from_ymd_opt(1993, 12, 31).unwrap();
        let gpo = NaiveDate::from_ymd_opt(1994, 1, 1).unwrap();
        assert_eq!(Dataset::for_date(hein, 1994), Dataset::Hein);
        assert_eq!(Dataset::for_date(gpo, 1994).dir_name(), "gpo");
    }

    #[test]
    fn leap_years_have_366_days() {
        assert_eq!(days_of_year(2000).count(), 366);
        assert_eq!(days_of_year(1950).count(), 365);
        let last = days_of_year(1950).last().unwrap();
        assert_eq!((last.month(), last.day()), (12, 31));
    }

    #[test]
    fn chamber_parses_codes() {
        assert_eq!("h".parse::<Chamber>().unwrap(), Chamber::House);
        assert_eq!("Senate".parse::<Chamber>().unwrap().senate_dummy(), 1);
        assert!("X".parse::<Chamber>().is_err());
    }
}
