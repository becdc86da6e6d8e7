use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Augments a Salesforce "Apex Jobs" listing with per-job log downloads.
#[derive(Debug, Parser)]
#[command(name = "apexlogs", version, about)]
pub struct Cli {
    /// Also write logs to ./apexlogs.log.
    #[arg(long, global = true)]
    pub log_to_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a saved page snapshot once and print the augmented table.
    Scan {
        /// Path to a saved HTML page.
        file: PathBuf,
    },
    /// Poll a live page and keep the augmented table up to date.
    Watch {
        /// Page URL to poll.
        url: String,
        /// Poll interval in seconds.
        #[arg(long, default_value_t = 5)]
        interval: u64,
        /// Immediately fetch logs for every row with a job id.
        #[arg(long)]
        auto_fetch: bool,
        /// Directory for downloaded log bodies.
        #[arg(long, default_value = "logs")]
        download_dir: PathBuf,
    },
    /// Fetch the logs for one job id and print download links.
    Logs {
        /// Async job id (707-prefixed).
        job_id: String,
        /// Page origin the job lives under.
        #[arg(long)]
        origin: String,
        /// Directory for downloaded log bodies.
        #[arg(long, default_value = "logs")]
        download_dir: PathBuf,
    },
}
