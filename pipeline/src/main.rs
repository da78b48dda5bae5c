use anyhow::Context;
use clap::{Parser, Subcommand};
use congresscore::calendar::Chamber;
use generator::corpus::{write_demo_corpus, DemoCorpusConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::{Job, Runner};

mod generator;
mod jobs;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Congressional speech dataset builder")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long, global = true)]
    workflow: Option<PathBuf>,
    /// First year to process (overrides the config)
    #[arg(long, global = true)]
    start_year: Option<i32>,
    /// Last year to process, inclusive (overrides the config)
    #[arg(long, global = true)]
    end_year: Option<i32>,
    /// Restrict the run to one chamber (H or S)
    #[arg(long, global = true)]
    chamber: Option<Chamber>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract speech metadata, bigram term frequencies and keyword dummies
    TermFrequencies,
    /// Rank partisan bigrams and write speech-level bigram dummies
    PartisanDummies,
    /// Merge metadata, keyword dummies and partisanship scores
    Combine,
    /// Run all three jobs in order
    All,
    /// Write a small synthetic corpus and a workflow config pointing at it
    DemoCorpus {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let job = match args.command {
        Command::TermFrequencies => Job::TermFrequencies,
        Command::PartisanDummies => Job::PartisanDummies,
        Command::Combine => Job::Combine,
        Command::All => Job::All,
        Command::DemoCorpus { out, seed } => {
            let defaults = DemoCorpusConfig::default();
            let config = DemoCorpusConfig {
                seed,
                start_year: args.start_year.unwrap_or(defaults.start_year),
                end_year: args.end_year.unwrap_or(defaults.end_year),
                ..defaults
            };
            let corpus = write_demo_corpus(&out, &config)
                .with_context(|| format!("writing demo corpus to {}", out.display()))?;
            println!(
                "Demo corpus -> {} speeches ({} republican, {} democrat, {} with keyword), {} noise files, config {}",
                corpus.speeches,
                corpus.republican_speeches,
                corpus.democrat_speeches,
                corpus.keyword_speeches,
                corpus.noise_files,
                corpus.config_path.display()
            );
            return Ok(());
        }
    };

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    }
    .with_overrides(args.start_year, args.end_year, args.chamber);

    let runner = Runner::new(workflow_config.clone());
    let result = runner.execute(job)?;
    let report = result.report();
    println!("{:?} run -> {}", job, report);

    let report_path = workflow_config.summary_log_path();
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("opening {}", report_path.display()))?;
    writeln!(
        file,
        "{:?} years={}-{} chambers={:?} {}",
        job, workflow_config.start_year, workflow_config.end_year, workflow_config.chambers, report
    )?;

    Ok(())
}
