use clap::Parser;
use tracing_subscriber::EnvFilter;

use lanscan::cli::{self, Command, ConfigAction};
use lanscan::output;

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("lanscan=debug")
    } else {
        EnvFilter::new("lanscan=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = run(args).await;
    if let Err(e) = result {
        output::print_error(&e, false);
        std::process::exit(1);
    }
}

async fn run(args: cli::Cli) -> anyhow::Result<()> {
    let json = args.json;

    match args.command {
        Command::Scan {
            target,
            timeout,
            concurrency,
            events,
        } => {
            cli::scan::run(target, timeout, concurrency, events, json).await?;
        }
        Command::Config { action } => match action {
            ConfigAction::Show => cli::config_cmd::show(json)?,
            ConfigAction::Set { key, value } => cli::config_cmd::set(&key, &value, json)?,
            ConfigAction::Reset => cli::config_cmd::reset(json)?,
        },
    }
    Ok(())
}
