//! Command line argument parsing

use clap::Parser;
use std::path::PathBuf;

use super::Commands;

/// Interactive client for the pledge accountability services
#[derive(Parser)]
#[command(name = "pledge-client")]
#[command(about = "Lock funds, prove your daily check-ins and mint your commemorative token")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Pledge server base URL
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Wallet file path
    #[arg(long, global = true, default_value = "wallet.json")]
    pub wallet: PathBuf,

    /// Verification domain expected by the server
    #[arg(long, global = true, default_value = "example.com")]
    pub domain: String,
}
