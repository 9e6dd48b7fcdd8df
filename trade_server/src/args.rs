//! Command-line arguments for the trade server.
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[clap(long, default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Number of worker threads serving connections.
    #[clap(long, default_value_t = 4)]
    pub workers: usize,
}
