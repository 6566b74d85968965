//! CLI command definitions

use clap::Subcommand;
use std::path::PathBuf;

/// Available subcommands for the pledge client
#[derive(Subcommand)]
pub enum Commands {
    /// Create the local wallet (or show the existing one)
    Wallet,
    /// Lock funds for a committed number of days
    Lock {
        /// Amount to lock (native currency units)
        #[arg(long)]
        amount: u128,
        /// Committed duration in days
        #[arg(long)]
        days: u64,
        /// Raw duration in seconds (overrides --days, handy for demos)
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Show locked funds for the local wallet
    Status,
    /// Request a minting voucher after honoring the commitment
    Voucher {
        /// Session token from the platform login flow
        /// (falls back to the PLEDGE_SESSION_TOKEN environment variable)
        #[arg(long)]
        session: Option<String>,
        /// Save the voucher JSON to this file
        #[arg(short, long, default_value = "voucher.json")]
        output: PathBuf,
    },
    /// Redeem a voucher for a commemorative token
    Mint {
        /// Voucher JSON file
        #[arg(short, long, default_value = "voucher.json")]
        voucher: PathBuf,
    },
    /// Withdraw unlocked funds
    Withdraw,
    /// Run the full interactive journey
    Journey,
}
