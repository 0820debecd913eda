//! Offline dictionary tooling.
//!
//! `compile` turns a text dictionary (plus optional user dictionaries) into
//! the bincode cache the engine can load without re-parsing; `inspect`
//! prints dictionary statistics, optionally as JSON; `check` runs a sample
//! sentence through a freshly loaded segmenter as a smoke test.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use libhanseg::{SegMode, Segmenter};
use libhanseg_core::{Config, HmmModel, WordDict, DEFAULT_USER_FREQ};

#[derive(Parser)]
#[command(name = "hanseg-dict", about = "libhanseg dictionary tooling")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a text dictionary into a bincode cache.
    Compile {
        /// Main dictionary file (word freq [tag] lines)
        #[arg(long)]
        input: PathBuf,

        /// User dictionary files merged before the snapshot
        #[arg(long)]
        user_dict: Vec<PathBuf>,

        /// Output cache path
        #[arg(long, default_value = "dict.cache")]
        output: PathBuf,
    },

    /// Print statistics for a text dictionary or a compiled cache.
    Inspect {
        /// Dictionary file to inspect
        #[arg(long)]
        input: PathBuf,

        /// Treat the input as a compiled cache instead of text
        #[arg(long)]
        cache: bool,

        /// Emit the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Segment a sample sentence with a freshly loaded dictionary.
    Check {
        /// Main dictionary file
        #[arg(long)]
        input: PathBuf,

        /// Emission file enabling the HMM fallback
        #[arg(long)]
        emit: Option<PathBuf>,

        /// Sentence to segment
        sentence: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Compile {
            input,
            user_dict,
            output,
        } => {
            let mut dict = WordDict::from_main_path(&input)
                .with_context(|| format!("load main dict {}", input.display()))?;
            let added = dict.init_user_dict_paths(&user_dict, DEFAULT_USER_FREQ);
            dict.save_cache(&output)
                .with_context(|| format!("write cache {}", output.display()))?;
            println!(
                "compiled {} words ({} from user dicts) into {}",
                dict.len(),
                added,
                output.display()
            );
        }

        Command::Inspect { input, cache, json } => {
            let dict = if cache {
                WordDict::load_cache(&input)
                    .with_context(|| format!("load cache {}", input.display()))?
            } else {
                WordDict::from_main_path(&input)
                    .with_context(|| format!("load main dict {}", input.display()))?
            };
            if json {
                let stats = serde_json::json!({
                    "words": dict.len(),
                    "total": dict.total(),
                    "min_log": dict.min_log(),
                });
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("words:   {}", dict.len());
                println!("total:   {}", dict.total());
                println!("min_log: {}", dict.min_log());
            }
        }

        Command::Check {
            input,
            emit,
            sentence,
        } => {
            let dict = WordDict::from_main_path(&input)
                .with_context(|| format!("load main dict {}", input.display()))?;
            let hmm = match emit {
                Some(path) => HmmModel::from_emit_path(&path)
                    .with_context(|| format!("load emission file {}", path.display()))?,
                None => HmmModel::empty(),
            };
            let segmenter = Segmenter::with_dict(dict, hmm, Config::default());
            for token in segmenter.process(&sentence, SegMode::Search) {
                println!("{}", token);
            }
        }
    }
    Ok(())
}
