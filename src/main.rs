//! `roku-deploy` - Roku configuration validation and device selection

use clap::Parser;

use roku_deploy::cli::args::Cli;
use roku_deploy::cli::commands;
use roku_deploy::error::ExitCode;
use roku_deploy::observability::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogFormat::from_env(), cli.verbose, cli.color);
    }

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted");
            std::process::exit(ExitCode::INTERRUPTED);
        }
    });

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
