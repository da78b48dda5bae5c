use anyhow::{bail, Context};
use congresscore::calendar::Chamber;
use congresscore::prelude::StageConfig;
use congresscore::store::YearStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Holds `{hein,gpo}/{H,S}/{YYYY-MM-DD}/` speech directories.
    pub corpus_root: PathBuf,
    /// CSV export of the monthly legislator roster.
    pub roster: PathBuf,
    pub stopwords: PathBuf,
    pub vocab: PathBuf,
    /// Directory of `partisan_phrases_NNN.txt` tables.
    pub phrase_dir: PathBuf,
    pub output_dir: PathBuf,
    pub start_year: i32,
    pub end_year: i32,
    pub chambers: Vec<Chamber>,
    pub keyword: String,
    pub gpo_start_year: i32,
    pub top_bigrams: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("corpora/congress"),
            roster: PathBuf::from("corpora/congress/metadata_by_month.csv"),
            stopwords: PathBuf::from("data/snowball_stopwords.txt"),
            vocab: PathBuf::from("data/gentzkow/vocab.txt"),
            phrase_dir: PathBuf::from("data/gentzkow/phrase_partisanship"),
            output_dir: PathBuf::from("data"),
            start_year: 1950,
            end_year: 2014,
            chambers: Chamber::ALL.to_vec(),
            keyword: "god".to_string(),
            gpo_start_year: 1994,
            top_bigrams: 1000,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let contents = serde_yaml::to_string(self).context("serializing workflow config")?;
        fs::write(path_ref, contents)
            .with_context(|| format!("writing workflow config {}", path_ref.display()))
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        start_year: Option<i32>,
        end_year: Option<i32>,
        chamber: Option<Chamber>,
    ) -> Self {
        if let Some(year) = start_year {
            self.start_year = year;
        }
        if let Some(year) = end_year {
            self.end_year = year;
        }
        if let Some(chamber) = chamber {
            self.chambers = vec![chamber];
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start_year < 1949 {
            bail!("start_year {} precedes the 81st Congress", self.start_year);
        }
        if self.start_year > self.end_year {
            bail!(
                "start_year {} is after end_year {}",
                self.start_year,
                self.end_year
            );
        }
        if self.chambers.is_empty() {
            bail!("no chambers selected");
        }
        if self.keyword.trim().is_empty() {
            bail!("keyword must not be empty");
        }
        if self.top_bigrams == 0 {
            bail!("top_bigrams must be positive");
        }
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Keyword as matched against lower-cased words and used in column names.
    pub fn keyword(&self) -> String {
        self.keyword.trim().to_lowercase()
    }

    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            keyword: self.keyword(),
        }
    }

    pub fn store(&self) -> YearStore {
        YearStore::new(self.output_dir.join("congress"))
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.output_dir.join("dct.json")
    }

    pub fn bigram_list_path(&self, party: &str) -> PathBuf {
        self.output_dir.join(format!("{}_partisan_bigrams.json", party))
    }

    pub fn bigram_dummies_path(&self, party: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_partisan_bigram_dummies.csv", party))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join("speech_data.csv")
    }

    pub fn summary_log_path(&self) -> PathBuf {
        self.output_dir.join("run_summary.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_cover_full_sample() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.years().count(), 65);
        assert_eq!(cfg.chambers, vec![Chamber::House, Chamber::Senate]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"start_year: 1980\nend_year: 1982\nchambers: [S]\nkeyword: God\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.start_year, 1980);
        assert_eq!(cfg.chambers, vec![Chamber::Senate]);
        assert_eq!(cfg.top_bigrams, 1000);
        assert_eq!(cfg.to_stage_config().keyword, "god");
    }

    #[test]
    fn overrides_replace_years_and_chamber() {
        let cfg = WorkflowConfig::default().with_overrides(Some(2000), None, Some(Chamber::House));
        assert_eq!(cfg.start_year, 2000);
        assert_eq!(cfg.end_year, 2014);
        assert_eq!(cfg.chambers, vec![Chamber::House]);
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let cfg = WorkflowConfig::default().with_overrides(Some(1990), Some(1980), None);
        assert!(cfg.validate().is_err());
        let early = WorkflowConfig::default().with_overrides(Some(1940), None, None);
        assert!(early.validate().is_err());
    }

    #[test]
    fn output_paths_live_under_output_dir() {
        let cfg = WorkflowConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(cfg.dictionary_path(), PathBuf::from("out/dct.json"));
        assert_eq!(
            cfg.bigram_dummies_path("rep"),
            PathBuf::from("out/rep_partisan_bigram_dummies.csv")
        );
        assert_eq!(cfg.store().root(), Path::new("out/congress"));
    }
}
