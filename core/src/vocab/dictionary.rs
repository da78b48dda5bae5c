use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, CorpusResult};
use crate::prelude::TermFrequency;

/// Fixed bigram vocabulary mapping tokens to dense ids.
///
/// Ids follow the ascending order of the unique tokens, so the same
/// vocabulary file always yields the same encoding.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tokens: Vec<String>,
    index: HashMap<String, u32>,
}

#[derive(Serialize, Deserialize)]
struct DictionaryFile {
    tokens: Vec<String>,
}

impl Dictionary {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
        Self::from_ordered(unique.into_iter().collect())
    }

    fn from_ordered(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as u32))
            .collect();
        Self { tokens, index }
    }

    /// Reads a vocabulary file with one space-separated phrase per line.
    pub fn from_vocab_file<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
        let path_ref = path.as_ref();
        let contents =
            fs::read_to_string(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        Ok(Self::from_tokens(
            contents
                .lines()
                .map(|line| line.trim().replace(' ', "_"))
                .filter(|token| !token.is_empty()),
        ))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        let stored: DictionaryFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| CorpusError::json(path_ref, err))?;
        Ok(Self::from_ordered(stored.tokens))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> CorpusResult<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            fs::create_dir_all(parent).map_err(|err| CorpusError::io(parent, err))?;
        }
        let file = File::create(path_ref).map_err(|err| CorpusError::io(path_ref, err))?;
        let stored = DictionaryFile {
            tokens: self.tokens.clone(),
        };
        serde_json::to_writer(BufWriter::new(file), &stored)
            .map_err(|err| CorpusError::json(path_ref, err))
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    /// Like [`token_to_id`](Self::token_to_id) but fails on unknown tokens.
    pub fn require_id(&self, token: &str) -> CorpusResult<u32> {
        self.token_to_id(token)
            .ok_or_else(|| CorpusError::UnknownToken(token.to_string()))
    }

    /// Counts known tokens, returning `(id, count)` pairs sorted by id.
    /// Tokens outside the vocabulary are dropped.
    pub fn doc2bow<S: AsRef<str>>(&self, document: &[S]) -> Vec<TermFrequency> {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in document {
            if let Some(id) = self.token_to_id(token.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut bow: Vec<TermFrequency> = counts.into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn ids_follow_sorted_token_order() {
        let dct = Dictionary::from_tokens(["war_vet", "tax_cut", "border_secur", "tax_cut"]);
        assert_eq!(dct.len(), 3);
        assert_eq!(dct.token_to_id("border_secur"), Some(0));
        assert_eq!(dct.token_to_id("tax_cut"), Some(1));
        assert_eq!(dct.id_to_token(2), Some("war_vet"));
        assert!(dct.require_id("estat_tax").is_err());
    }

    #[test]
    fn doc2bow_counts_known_tokens() {
        let dct = Dictionary::from_tokens(["a_b", "b_c", "c_d"]);
        let bow = dct.doc2bow(&["c_d", "a_b", "x_y", "c_d"]);
        assert_eq!(bow, vec![(0, 1), (2, 2)]);
        assert!(dct.doc2bow::<&str>(&[]).is_empty());
    }

    #[test]
    fn vocab_file_joins_phrases_with_underscores() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"tax cut\n  border secur \n\nwar vet\n").unwrap();
        let dct = Dictionary::from_vocab_file(temp.path()).unwrap();
        assert_eq!(dct.len(), 3);
        assert!(dct.token_to_id("border_secur").is_some());
    }

    #[test]
    fn save_and_load_preserve_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dct.json");
        let dct = Dictionary::from_tokens(["z_z", "a_a", "m_m"]);
        dct.save(&path).unwrap();
        let reloaded = Dictionary::load(&path).unwrap();
        assert_eq!(reloaded.token_to_id("m_m"), dct.token_to_id("m_m"));
        assert_eq!(reloaded.len(), 3);
    }
}
