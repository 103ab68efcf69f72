mod cli;
mod init;
mod logging;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use tokio::runtime::Runtime;

use cli::commands::run_cli;
use cli::opts::Cli;
use logging::{init_logging, Verbosity};

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(Verbosity::from_flags(args.quiet, args.verbose));

    let rt = Runtime::new()?;
    rt.block_on(run_cli(args))
}
