//! Command-line front end for the apexlogs pipeline.
mod cli;
mod credentials;
mod logging;
mod render;
mod run;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    logging::initialize(args.log_to_file);
    run::dispatch(args)
}
