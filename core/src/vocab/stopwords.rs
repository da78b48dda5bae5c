use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CorpusError, CorpusResult};

static LEADING_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z']+").expect("valid regex"));

/// Stopword set built from a Snowball stopword list.
///
/// Contractions such as `i'll` are not kept whole: their components (`i`,
/// `ll`) are added instead, since tokenization splits on apostrophes.
#[derive(Debug, Clone, Default)]
pub struct StopwordList {
    words: HashSet<String>,
}

impl StopwordList {
    pub fn load<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
        let path_ref = path.as_ref();
        let contents =
            fs::read_to_string(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut words = HashSet::new();
        for line in contents.lines() {
            let Some(found) = LEADING_WORD.find(line) else {
                continue;
            };
            let word = found.as_str();
            if word.contains('\'') {
                words.extend(word.split('\'').map(str::to_string));
            } else {
                words.insert(word.to_string());
            }
        }
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<String> for StopwordList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNOWBALL_SAMPLE: &str = " | An English stop word list. Comments begin with vertical bar.\n\
i              |  personal pronoun\n\
me\n\
\n\
i'll           |  contraction\n\
can't\n\
THE\n";

    #[test]
    fn parse_skips_comments_and_splits_contractions() {
        let list = StopwordList::parse(SNOWBALL_SAMPLE);
        assert!(list.contains("i"));
        assert!(list.contains("me"));
        assert!(list.contains("ll"));
        assert!(list.contains("can"));
        assert!(list.contains("t"));
        assert!(!list.contains("i'll"));
        assert!(!list.contains("the"));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = StopwordList::load("/nonexistent/stopwords.txt").unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
