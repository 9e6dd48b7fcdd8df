//! Command-line arguments for the trade client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use trade_common::net::{DEFAULT_HOST, DEFAULT_PORT, TRADE_ENDPOINT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server host name or IP address.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server TCP port.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Request path of the binary trade endpoint.
    #[clap(long, default_value = TRADE_ENDPOINT)]
    pub endpoint: String,

    /// Trade identifier (must fit in 64 bits).
    #[clap(long, default_value_t = 12345)]
    pub trade_id: u128,

    /// Symbol as a single character (`A`) or a numeric code point (`65`).
    #[clap(long, default_value = "A", value_parser = parse_symbol)]
    pub symbol: u32,

    /// Trade price.
    #[clap(long, default_value_t = 99.5, allow_negative_numbers = true)]
    pub price: f64,

    /// Trade quantity (must fit in 32 signed bits).
    #[clap(long, default_value_t = 1000, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Print the outcome as a JSON report on stdout.
    #[clap(long)]
    pub json: bool,
}

/// Accepts either a lone character or a decimal code point.
fn parse_symbol(raw: &str) -> Result<u32, String> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_ascii_digit() => Ok(u32::from(c)),
        _ => raw
            .parse::<u32>()
            .map_err(|e| format!("expected a character or code point, got {:?}: {}", raw, e)),
    }
}
