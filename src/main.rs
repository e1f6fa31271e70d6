use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use garden::model::{self, Answer, NewJournalEntry};
use garden::questionnaire::{QUESTIONS, Questionnaire, Step};
use garden::store::{Fallback, JsonFileStore, RemoteStore, Repository};
use garden::{Garden, GardenConfig, Point2, Rng, Sampler};

/// Journal garden command-line client.
#[derive(Parser, Debug)]
#[command(name = "garden", version, about)]
struct Cli {
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Garden server root
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Local copy used when the server is unreachable
    #[arg(long, default_value = "garden.json")]
    store: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample positions and print them as JSON
    Place {
        #[arg(short, long, default_value = "1")]
        count: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "10")]
        radius: f64,

        #[arg(long, default_value = "2")]
        min_separation: f64,

        #[arg(long, default_value = "50")]
        max_attempts: usize,

        /// Sample the ring INNER..OUTER without separation instead
        #[arg(long, num_args = 2, value_names = ["INNER", "OUTER"])]
        annulus: Option<Vec<f64>>,
    },

    /// Write a journal entry
    Journal {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Answer the questionnaire and plant a flower for a journal entry
    Plant {
        #[command(flatten)]
        store: StoreArgs,

        #[arg(long)]
        journal: String,

        /// One letter per question, e.g. ABCDABCDAB
        #[arg(long)]
        answers: String,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print stored journal entries and flowers
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
}

type ClientRepo = Fallback<RemoteStore, JsonFileStore>;

fn open_repo(args: &StoreArgs) -> anyhow::Result<ClientRepo> {
    let remote = RemoteStore::new(&args.server)?;
    let local = JsonFileStore::open(&args.store)
        .with_context(|| format!("opening {}", args.store.display()))?;
    Ok(Fallback::new(remote, local))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run `letters` through the questionnaire; exactly one answer per question.
fn questionnaire_answers(letters: &str) -> anyhow::Result<Vec<Answer>> {
    let answers = model::decode_answers(letters)?;
    if answers.len() != QUESTIONS.len() {
        bail!("expected {} answers, got {}", QUESTIONS.len(), answers.len());
    }
    let mut quiz = Questionnaire::new();
    for answer in answers {
        if let Step::Complete(all) = quiz.answer(answer) {
            return Ok(all);
        }
    }
    bail!("questionnaire stopped after {} answers", quiz.answered().len())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    garden::init_logging(cli.log_level)?;

    match cli.command {
        Command::Place {
            count,
            seed,
            radius,
            min_separation,
            max_attempts,
            annulus,
        } => {
            let sampler = match annulus.as_deref() {
                Some(&[inner, outer]) => Sampler::annulus(inner, outer),
                Some(_) => bail!("--annulus takes INNER and OUTER"),
                None => Sampler::disk(radius, min_separation).with_max_attempts(max_attempts),
            };
            sampler.validate()?;
            let mut rng = Rng::new(seed);
            let mut placed: Vec<Point2> = Vec::with_capacity(count);
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                let p = sampler.place(&placed, &mut rng);
                placed.push(p.position);
                out.push(p);
            }
            let fallbacks = out.iter().filter(|p| p.fallback).count();
            info!(count, fallbacks, "sampled positions");
            print_json(&out)?;
        }

        Command::Journal {
            store,
            title,
            content,
            date,
        } => {
            let repo = open_repo(&store)?;
            let garden = Garden::new(repo, GardenConfig::default(), Rng::from_clock());
            let entry = garden.write_entry(NewJournalEntry {
                date,
                title,
                content,
            })?;
            print_json(&entry)?;
        }

        Command::Plant {
            store,
            journal,
            answers,
            seed,
        } => {
            let answers = questionnaire_answers(&answers)?;
            let repo = open_repo(&store)?;
            let rng = seed.map(Rng::new).unwrap_or_else(Rng::from_clock);
            let garden = Garden::new(repo, GardenConfig::default(), rng);
            let planted = garden.plant(model::FlowerDraft {
                id: None,
                journal_id: journal,
                answers,
            })?;
            print_json(&planted)?;
        }

        Command::List { store } => {
            let repo = open_repo(&store)?;
            print_json(&serde_json::json!({
                "journalEntries": repo.journal_entries()?,
                "flowers": repo.flowers()?,
            }))?;
        }
    }

    Ok(())
}
