use clap::Parser;

#[derive(Parser)]
#[command(name = "lanscan", version, about = "Concurrent local-network device discovery")]
pub struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Scan an address range for live devices
    Scan {
        /// CIDR block, single address, or comma-separated address list.
        /// Defaults to the local /24.
        target: Option<String>,

        /// Per-address probe timeout in milliseconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum concurrent probes
        #[arg(long)]
        concurrency: Option<usize>,

        /// Stream raw scan events as JSON lines instead of a report
        #[arg(long)]
        events: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
}

pub mod config_cmd;
pub mod scan;
