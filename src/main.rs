mod calibrate_cmd;
mod cli;
mod config;
mod convert;
mod evaluate_cmd;
mod events_cmd;
mod logging;
mod output;
mod plot_cmd;
mod report_cmd;
mod resample_cmd;
mod stats_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::RillConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = config::load(cli.config.as_deref()).and_then(|cfg| run(cli.command, &cfg));
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command, config: &RillConfig) -> Result<()> {
    match command {
        Command::Stats(args) => stats_cmd::run(args, config),
        Command::Plot(args) => plot_cmd::run(args, config),
        Command::EventDetect(args) => events_cmd::run_detect(args, config),
        Command::EventExtract(args) => events_cmd::run_extract(args, config),
        Command::Evaluate(args) => evaluate_cmd::run(args, config),
        Command::Calibrate(args) => calibrate_cmd::run(args, config),
        Command::Report(args) => report_cmd::run(args, config),
        Command::Resample(args) => resample_cmd::run(args, config),
    }
}
