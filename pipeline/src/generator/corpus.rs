use crate::generator::template::{
    MemberTemplate, Party, DEMOCRAT_PHRASES, FILLER_WORDS, KEYWORD_CLOSING, MEMBERS,
    NEUTRAL_PHRASES, REPUBLICAN_PHRASES, STOPWORDS,
};
use crate::jobs::term_frequencies::day_directory;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use chrono::NaiveDate;
use congresscore::calendar::{days_of_year, session_for_year};
use congresscore::prelude::{ProcessingStage, StageConfig, StageInput};
use congresscore::processing::StemStage;
use congresscore::vocab::partisan::phrase_file_name;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for generating a synthetic speech corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoCorpusConfig {
    pub seed: u64,
    pub start_year: i32,
    pub end_year: i32,
    pub gpo_start_year: i32,
    pub sitting_days_per_year: usize,
    pub speeches_per_day: usize,
    pub keyword_rate: f64,
}

impl Default for DemoCorpusConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            start_year: 1993,
            end_year: 1994,
            gpo_start_year: 1994,
            sitting_days_per_year: 6,
            speeches_per_day: 3,
            keyword_rate: 0.3,
        }
    }
}

/// What was written, with the counts a full run is expected to reproduce.
pub struct DemoCorpus {
    pub workflow: WorkflowConfig,
    pub config_path: PathBuf,
    pub speeches: usize,
    pub republican_speeches: usize,
    pub democrat_speeches: usize,
    pub keyword_speeches: usize,
    pub empty_speeches: usize,
    pub noise_files: usize,
}

pub fn write_demo_corpus(root: &Path, config: &DemoCorpusConfig) -> anyhow::Result<DemoCorpus> {
    let workflow = WorkflowConfig {
        corpus_root: root.join("corpus"),
        roster: root.join("metadata_by_month.csv"),
        stopwords: root.join("snowball_stopwords.txt"),
        vocab: root.join("vocab.txt"),
        phrase_dir: root.join("phrase_partisanship"),
        output_dir: root.join("output"),
        start_year: config.start_year,
        end_year: config.end_year,
        gpo_start_year: config.gpo_start_year,
        ..Default::default()
    };
    workflow.validate().context("validating demo corpus years")?;

    let mut rng = StdRng::seed_from_u64(config.seed);

    fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;
    write_file(&workflow.stopwords, STOPWORDS)?;
    write_roster(&workflow)?;
    let stems = stem_phrases().context("stemming template phrases")?;
    write_vocab(&workflow.vocab, &stems)?;
    write_phrase_tables(&workflow, &stems, &mut rng)?;

    let mut corpus = DemoCorpus {
        config_path: root.join("workflow.yaml"),
        workflow,
        speeches: 0,
        republican_speeches: 0,
        democrat_speeches: 0,
        keyword_speeches: 0,
        empty_speeches: 0,
        noise_files: 0,
    };

    let store = corpus.workflow.store();
    for &chamber in &corpus.workflow.chambers.clone() {
        let members: Vec<&MemberTemplate> = MEMBERS
            .iter()
            .filter(|member| member.chamber == chamber)
            .collect();

        for year in corpus.workflow.years() {
            let days: Vec<NaiveDate> = days_of_year(year).collect();
            let mut sitting: Vec<NaiveDate> = days
                .choose_multiple(&mut rng, config.sitting_days_per_year.min(days.len()))
                .copied()
                .collect();
            sitting.sort();

            let mut matched = 0;
            for (day_index, &date) in sitting.iter().enumerate() {
                let dir = day_directory(&corpus.workflow, chamber, date);
                fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
                let stamp = date.format("%Y-%m-%d").to_string();

                write_file(
                    &dir.join(format!("{}_{}_SPEAKER_NULL_NULL_0000.txt", stamp, chamber)),
                    "The House will be in order.",
                )?;
                corpus.noise_files += 1;

                if day_index == 0 {
                    let member = members[0];
                    write_file(&dir.join(speech_filename(&stamp, member, member.start, 9998)), "  \n")?;
                    write_file(
                        &dir.join(speech_filename(&stamp, member, member.start + 1, 9999)),
                        "Unmatched speaker remarks.",
                    )?;
                    corpus.noise_files += 2;

                    // A zero-byte member speech is kept with an empty encoding.
                    write_file(&dir.join(speech_filename(&stamp, member, member.start, 9997)), "")?;
                    matched += 1;
                    corpus.speeches += 1;
                    corpus.empty_speeches += 1;
                    match member.party {
                        Party::Republican => corpus.republican_speeches += 1,
                        Party::Democrat => corpus.democrat_speeches += 1,
                    }
                }

                for seq in 1..=config.speeches_per_day {
                    let Some(&member) = members.choose(&mut rng) else {
                        continue;
                    };
                    let with_keyword = rng.gen_bool(config.keyword_rate.clamp(0.0, 1.0));
                    let text = compose_speech(member.party, with_keyword, &mut rng);
                    write_file(&dir.join(speech_filename(&stamp, member, member.start, seq)), &text)?;

                    matched += 1;
                    corpus.speeches += 1;
                    corpus.keyword_speeches += with_keyword as usize;
                    match member.party {
                        Party::Republican => corpus.republican_speeches += 1,
                        Party::Democrat => corpus.democrat_speeches += 1,
                    }
                }
            }

            let scores: Vec<Option<f64>> = (0..matched)
                .map(|_| Some(rng.gen_range(-1.0..1.0)))
                .collect();
            store
                .write_partisan_scores(chamber, year, &scores)
                .with_context(|| format!("writing demo partisanship scores for {} {}", chamber, year))?;
        }
    }

    corpus.workflow.save(&corpus.config_path)?;
    Ok(corpus)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

fn speech_filename(stamp: &str, member: &MemberTemplate, start: i64, seq: usize) -> String {
    format!(
        "{}_{}_{}_{}_{}_{:04}.txt",
        stamp, member.chamber, member.state, member.last, start, seq
    )
}

fn write_roster(workflow: &WorkflowConfig) -> anyhow::Result<()> {
    let path = &workflow.roster;
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "speech_year",
        "speech_month",
        "state",
        "last",
        "first",
        "start",
        "house",
        "senate",
        "party",
        "republican",
        "democrat",
    ])?;
    for year in workflow.years() {
        for month in 1..=12 {
            for member in &MEMBERS {
                let republican = member.party == Party::Republican;
                writer.write_record([
                    year.to_string(),
                    month.to_string(),
                    member.state.to_string(),
                    member.last.to_string(),
                    member.first.to_string(),
                    member.start.to_string(),
                    member.chamber.house_dummy().to_string(),
                    member.chamber.senate_dummy().to_string(),
                    if republican { "R" } else { "D" }.to_string(),
                    (republican as u8).to_string(),
                    (!republican as u8).to_string(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Stemmed form of every template phrase, keyed by its raw words.
fn stem_phrases() -> anyhow::Result<HashMap<(&'static str, &'static str), String>> {
    let mut stage = StemStage::new();
    stage.initialize(&StageConfig::default())?;
    let mut stems = HashMap::new();
    for &(first, second) in REPUBLICAN_PHRASES
        .iter()
        .chain(&DEMOCRAT_PHRASES)
        .chain(&NEUTRAL_PHRASES)
    {
        let output = stage.execute(StageInput::from_tokens(vec![
            first.to_string(),
            second.to_string(),
        ]))?;
        stems.insert((first, second), output.tokens.join(" "));
    }
    stage.cleanup();
    Ok(stems)
}

fn write_vocab(
    path: &Path,
    stems: &HashMap<(&'static str, &'static str), String>,
) -> anyhow::Result<()> {
    let mut phrases: Vec<&String> = stems.values().collect();
    phrases.sort();
    let mut contents = String::new();
    for phrase in phrases {
        writeln!(contents, "{}", phrase)?;
    }
    write_file(path, &contents)
}

fn write_phrase_tables(
    workflow: &WorkflowConfig,
    stems: &HashMap<(&'static str, &'static str), String>,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    fs::create_dir_all(&workflow.phrase_dir)
        .with_context(|| format!("creating {}", workflow.phrase_dir.display()))?;
    let first = session_for_year(workflow.start_year)?;
    let last = session_for_year(workflow.end_year)?;

    for session in first..=last {
        let mut contents = String::from("phrase|partisanship\n");
        let groups: [(&[(&str, &str)], f64); 3] = [
            (&REPUBLICAN_PHRASES, 1.0),
            (&DEMOCRAT_PHRASES, -1.0),
            (&NEUTRAL_PHRASES, 0.0),
        ];
        for (phrases, sign) in groups {
            for key in phrases {
                let score = if sign == 0.0 {
                    rng.gen_range(-0.01..0.01)
                } else {
                    sign * rng.gen_range(0.1..1.0)
                };
                writeln!(contents, "{}|{:.6}", stems[key], score)?;
            }
        }
        write_file(&workflow.phrase_dir.join(phrase_file_name(session)), &contents)?;
    }
    Ok(())
}

fn compose_speech(party: Party, with_keyword: bool, rng: &mut StdRng) -> String {
    let (own, other) = match party {
        Party::Republican => (&REPUBLICAN_PHRASES, &DEMOCRAT_PHRASES),
        Party::Democrat => (&DEMOCRAT_PHRASES, &REPUBLICAN_PHRASES),
    };

    let mut sentences = vec!["Mr. Speaker, I rise today.".to_string()];
    for _ in 0..3 {
        let filler = FILLER_WORDS.choose(rng).copied().unwrap_or("today");
        let (first, second) = own.choose(rng).copied().unwrap_or(own[0]);
        sentences.push(format!("The {} needs {} {}.", filler, first, second));
    }
    if let Some(&(first, second)) = other.choose(rng) {
        sentences.push(format!("We also hear about {} {}.", first, second));
    }
    if let Some(&(first, second)) = NEUTRAL_PHRASES.choose(rng) {
        sentences.push(format!("I thank the {} {}.", first, second));
    }
    sentences.push("This legis-\nlation is important.".to_string());
    if with_keyword {
        sentences.push(KEYWORD_CLOSING.to_string());
    }
    sentences.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use congresscore::corpus::Roster;
    use congresscore::vocab::Dictionary;
    use tempfile::tempdir;

    #[test]
    fn generator_writes_inputs_and_config() {
        let dir = tempdir().unwrap();
        let config = DemoCorpusConfig {
            start_year: 1990,
            end_year: 1990,
            ..Default::default()
        };
        let corpus = write_demo_corpus(dir.path(), &config).unwrap();

        assert_eq!(corpus.empty_speeches, 2);
        assert_eq!(corpus.speeches, 2 * 6 * 3 + corpus.empty_speeches);
        assert_eq!(
            corpus.republican_speeches + corpus.democrat_speeches,
            corpus.speeches
        );
        assert_eq!(corpus.noise_files, 2 * (6 + 2));

        let reloaded = WorkflowConfig::load(&corpus.config_path).unwrap();
        assert_eq!(reloaded, corpus.workflow);

        let roster = Roster::load(&corpus.workflow.roster).unwrap();
        assert_eq!(roster.len(), 12 * MEMBERS.len());

        let dictionary = Dictionary::from_vocab_file(&corpus.workflow.vocab).unwrap();
        assert_eq!(dictionary.len(), 16);
        assert!(dictionary.token_to_id("border_secur").is_some());
    }

    #[test]
    fn generator_is_deterministic_for_a_seed() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let config = DemoCorpusConfig::default();
        let a = write_demo_corpus(first.path(), &config).unwrap();
        let b = write_demo_corpus(second.path(), &config).unwrap();
        assert_eq!(a.keyword_speeches, b.keyword_speeches);
        assert_eq!(a.republican_speeches, b.republican_speeches);
    }

    #[test]
    fn composed_speech_mentions_keyword_only_when_asked() {
        let mut rng = StdRng::seed_from_u64(1);
        let plain = compose_speech(Party::Democrat, false, &mut rng);
        let blessed = compose_speech(Party::Republican, true, &mut rng);
        assert!(!plain.to_lowercase().contains("god"));
        assert!(blessed.ends_with(KEYWORD_CLOSING));
    }
}
