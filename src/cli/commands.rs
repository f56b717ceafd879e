use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ScannerOverrides, ServerOverrides};

#[derive(Parser)]
#[command(name = "smuggler-mcp", version, about = "HTTP request smuggling scanner tool host")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the do-smuggler tool over JSON-RPC
    Serve(ServeArgs),
    /// Run a single scan and print the tool result as JSON
    Scan(ScanArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Scanner location settings shared by `serve` and `scan`.
#[derive(Args, Clone, Debug)]
pub struct ScannerArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Python interpreter used to run the scanner
    #[arg(long, env = "PYTHON_BIN")]
    pub python_bin: Option<PathBuf>,

    /// Path to smuggler.py
    #[arg(long, env = "SMUGGLER_PATH")]
    pub smuggler_path: Option<PathBuf>,

    /// Kill a scan after this many seconds (0 disables)
    #[arg(long, env = "SMUGGLER_MAX_DURATION")]
    pub max_duration: Option<u64>,
}

impl ScannerArgs {
    pub fn overrides(&self) -> ScannerOverrides {
        ScannerOverrides {
            python_bin: self.python_bin.clone(),
            smuggler_path: self.smuggler_path.clone(),
            max_duration_secs: self.max_duration,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub scanner: ScannerArgs,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    pub fn overrides(&self) -> ServerOverrides {
        ServerOverrides {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub scanner: ScannerArgs,

    /// Target URL
    #[arg(short, long)]
    pub url: String,

    /// Arguments passed through to smuggler, after `--`
    #[arg(last = true)]
    pub smuggler_args: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: PathBuf,
}
