use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::Array2;

use crate::calendar::session_for_year;
use crate::error::{CorpusError, CorpusResult};
use crate::prelude::TermFrequency;
use crate::vocab::Dictionary;

/// File name of the phrase partisanship table for one Congress.
pub fn phrase_file_name(session: i32) -> String {
    format!("partisan_phrases_{:03}.txt", session)
}

/// Partisanship scores summed per bigram across sessions.
/// Positive totals lean Republican, negative totals lean Democrat.
#[derive(Debug, Clone, Default)]
pub struct PhraseScores {
    totals: HashMap<String, f64>,
}

impl PhraseScores {
    /// Adds the rows of one `phrase|score` table; the first line is a header.
    pub fn add_table(&mut self, contents: &str, source: &Path) -> CorpusResult<usize> {
        let mut rows = 0;
        for (offset, row) in contents.lines().enumerate().skip(1) {
            if row.trim().is_empty() {
                continue;
            }
            let line = offset + 1;
            let (phrase, score) = row.split_once('|').ok_or_else(|| CorpusError::Parse {
                path: source.to_path_buf(),
                line,
                message: "expected `phrase|score`".into(),
            })?;
            let score: f64 = score.trim().parse().map_err(|_| CorpusError::Parse {
                path: source.to_path_buf(),
                line,
                message: format!("invalid score `{}`", score.trim()),
            })?;
            let bigram = phrase.replace(' ', "_").trim().to_string();
            *self.totals.entry(bigram).or_insert(0.0) += score;
            rows += 1;
        }
        Ok(rows)
    }

    /// Reads every session table covering `start_year..=end_year` from `dir`.
    pub fn load_sessions<P: AsRef<Path>>(
        dir: P,
        start_year: i32,
        end_year: i32,
    ) -> CorpusResult<Self> {
        let mut scores = Self::default();
        let first = session_for_year(start_year)?;
        let last = session_for_year(end_year)?;
        for session in first..=last {
            let path: PathBuf = dir.as_ref().join(phrase_file_name(session));
            let contents = fs::read_to_string(&path).map_err(|err| CorpusError::io(&path, err))?;
            let rows = scores.add_table(&contents, &path)?;
            debug!("session {} contributed {} phrase scores", session, rows);
        }
        Ok(scores)
    }

    pub fn total(&self, bigram: &str) -> Option<f64> {
        self.totals.get(bigram).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Most partisan bigrams per party, at most `top_n` each.
    pub fn rank(&self, top_n: usize) -> PartisanRanking {
        let mut republican: Vec<(&String, f64)> = self
            .totals
            .iter()
            .filter(|(_, &score)| score > 0.0)
            .map(|(bigram, &score)| (bigram, score))
            .collect();
        let mut democrat: Vec<(&String, f64)> = self
            .totals
            .iter()
            .filter(|(_, &score)| score < 0.0)
            .map(|(bigram, &score)| (bigram, score))
            .collect();

        republican.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        democrat.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        let take = |ranked: Vec<(&String, f64)>| -> Vec<String> {
            ranked
                .into_iter()
                .take(top_n)
                .map(|(bigram, _)| bigram.clone())
                .collect()
        };

        PartisanRanking {
            republican: take(republican),
            democrat: take(democrat),
        }
    }
}

/// Ordered lists of the most Republican and most Democrat leaning bigrams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartisanRanking {
    pub republican: Vec<String>,
    pub democrat: Vec<String>,
}

impl PartisanRanking {
    pub fn republican_ids(&self, dictionary: &Dictionary) -> CorpusResult<Vec<u32>> {
        ids_for(&self.republican, dictionary)
    }

    pub fn democrat_ids(&self, dictionary: &Dictionary) -> CorpusResult<Vec<u32>> {
        ids_for(&self.democrat, dictionary)
    }

    pub fn save_list<P: AsRef<Path>>(bigrams: &[String], path: P) -> CorpusResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        serde_json::to_writer_pretty(BufWriter::new(file), bigrams)
            .map_err(|err| CorpusError::json(path_ref, err))
    }

    pub fn load_list<P: AsRef<Path>>(path: P) -> CorpusResult<Vec<String>> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| CorpusError::json(path_ref, err))
    }
}

fn ids_for(bigrams: &[String], dictionary: &Dictionary) -> CorpusResult<Vec<u32>> {
    bigrams
        .iter()
        .map(|bigram| dictionary.require_id(bigram))
        .collect()
}

/// Speech-by-bigram presence matrix: cell `(s, b)` is 1 when bigram id
/// `bigram_ids[b]` occurs in speech `s`.
pub fn presence_matrix(speeches: &[&[TermFrequency]], bigram_ids: &[u32]) -> Array2<u8> {
    let mut matrix = Array2::zeros((speeches.len(), bigram_ids.len()));
    for (row, tfs) in speeches.iter().enumerate() {
        for (column, id) in bigram_ids.iter().enumerate() {
            if tfs.binary_search_by_key(id, |&(token, _)| token).is_ok() {
                matrix[[row, column]] = 1;
            }
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TABLE_81: &str = "phrase|partisanship\n\
tax cut|0.5\n\
civil right|-0.75\n\
border secur|0.25\n\
\n";

    const TABLE_82: &str = "phrase|partisanship\n\
tax cut|0.25\n\
civil right|-0.25\n\
minimum wage|-0.5\n\
farm bill|0.0\n";

    #[test]
    fn phrase_files_are_zero_padded() {
        assert_eq!(phrase_file_name(81), "partisan_phrases_081.txt");
        assert_eq!(phrase_file_name(113), "partisan_phrases_113.txt");
    }

    #[test]
    fn scores_sum_across_sessions() {
        let mut scores = PhraseScores::default();
        let path = Path::new("table.txt");
        assert_eq!(scores.add_table(TABLE_81, path).unwrap(), 3);
        assert_eq!(scores.add_table(TABLE_82, path).unwrap(), 4);
        assert_eq!(scores.total("tax_cut"), Some(0.75));
        assert_eq!(scores.total("civil_right"), Some(-1.0));
        assert_eq!(scores.len(), 5);
    }

    #[test]
    fn rank_splits_by_sign_and_orders_by_strength() {
        let mut scores = PhraseScores::default();
        let path = Path::new("table.txt");
        scores.add_table(TABLE_81, path).unwrap();
        scores.add_table(TABLE_82, path).unwrap();

        let ranking = scores.rank(1000);
        assert_eq!(ranking.republican, vec!["tax_cut", "border_secur"]);
        assert_eq!(ranking.democrat, vec!["civil_right", "minimum_wage"]);

        let top_one = scores.rank(1);
        assert_eq!(top_one.republican, vec!["tax_cut"]);
        assert_eq!(top_one.democrat, vec!["civil_right"]);
    }

    #[test]
    fn malformed_rows_are_reported_with_line_numbers() {
        let mut scores = PhraseScores::default();
        let err = scores
            .add_table("phrase|partisanship\ntax cut 0.5\n", Path::new("bad.txt"))
            .unwrap_err();
        assert!(matches!(err, CorpusError::Parse { line: 2, .. }));
    }

    #[test]
    fn load_sessions_reads_each_congress() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(phrase_file_name(81)), TABLE_81).unwrap();
        fs::write(dir.path().join(phrase_file_name(82)), TABLE_82).unwrap();
        let scores = PhraseScores::load_sessions(dir.path(), 1950, 1952).unwrap();
        assert_eq!(scores.total("minimum_wage"), Some(-0.5));
        assert!(PhraseScores::load_sessions(dir.path(), 1950, 1953).is_err());
    }

    #[test]
    fn presence_matrix_marks_bigrams_per_speech() {
        let first: Vec<TermFrequency> = vec![(1, 3), (4, 1)];
        let second: Vec<TermFrequency> = vec![(2, 1)];
        let matrix = presence_matrix(&[first.as_slice(), second.as_slice(), &[]], &[4, 2, 1]);
        assert_eq!(matrix.shape(), &[3, 3]);
        assert_eq!(matrix.row(0).to_vec(), vec![1, 0, 1]);
        assert_eq!(matrix.row(1).to_vec(), vec![0, 1, 0]);
        assert_eq!(matrix.row(2).sum(), 0);
    }

    #[test]
    fn ranking_ids_require_known_bigrams() {
        let dictionary = Dictionary::from_tokens(["tax_cut", "civil_right"]);
        let ranking = PartisanRanking {
            republican: vec!["tax_cut".into()],
            democrat: vec!["civil_right".into(), "minimum_wage".into()],
        };
        assert_eq!(ranking.republican_ids(&dictionary).unwrap(), vec![1]);
        assert!(matches!(
            ranking.democrat_ids(&dictionary),
            Err(CorpusError::UnknownToken(token)) if token == "minimum_wage"
        ));
    }
}
