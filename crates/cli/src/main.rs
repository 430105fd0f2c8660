use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::Level;

mod commands;
mod printer;

use commands::WalkArgs;
use statwalk_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "statwalk",
    version,
    about = "List metadata of a directory tree in walk order"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); overrides
    /// STATWALK_LOG_LEVEL.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub walk: WalkArgs,
}

fn verbosity(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::Info),
        2 => Some(Level::Debug),
        _ => Some(Level::Trace),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with(verbosity(cli.verbose)).ok();

    commands::walk::run(cli.walk)
}
