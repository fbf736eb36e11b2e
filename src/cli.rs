use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "raid-scoring day pipeline")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Score a day's records and print the team ranking
    Score {
        /// Path to the day's records file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Match and validate punches without scoring (dry run for organizers)
    Check {
        /// Path to the day's records file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}
