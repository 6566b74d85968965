//! Pledge 交互式客户端
//!
//! 驱动端到端用户流程：生成钱包 → 锁定资金 →（平台打卡）→
//! 请求铸造凭证 → 铸造纪念代币 → 取回资金。

use anyhow::Result;
use clap::Parser;
use console::style;

mod api;
mod cli;
mod flow;
mod wallet;

use api::PledgeApi;
use cli::{Cli, Commands};
use wallet::Wallet;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = PledgeApi::new(&cli.server);

    match cli.command {
        Some(Commands::Wallet) => {
            let (wallet, created) = Wallet::load_or_generate(&cli.wallet)?;
            if created {
                println!("Created wallet at {}", cli.wallet.display());
            }
            println!("Address: {}", wallet.address());
            Ok(())
        }
        Some(Commands::Lock {
            amount,
            days,
            duration_secs,
        }) => {
            let wallet = Wallet::load(&cli.wallet)?;
            let duration = duration_secs.unwrap_or(days * 86_400);
            let locked_at = api.lock(wallet.address(), amount, duration).await?;
            println!(
                "{} Locked {} units for {}s (locked_at={})",
                style("✓").green(),
                amount,
                duration,
                locked_at
            );
            Ok(())
        }
        Some(Commands::Status) => {
            let wallet = Wallet::load(&cli.wallet)?;
            let funds = api.locked_funds(wallet.address()).await?;
            if funds.amount == 0 {
                println!("No funds locked.");
            } else {
                println!(
                    "{} units locked, duration {}s, locked_at {}",
                    funds.amount, funds.duration_secs, funds.locked_at
                );
            }
            Ok(())
        }
        Some(Commands::Voucher { session, output }) => {
            let wallet = Wallet::load(&cli.wallet)?;
            let session = match session.or_else(|| std::env::var("PLEDGE_SESSION_TOKEN").ok()) {
                Some(s) if !s.trim().is_empty() => s,
                _ => anyhow::bail!(
                    "no session token: pass --session or set PLEDGE_SESSION_TOKEN"
                ),
            };

            let assertion = wallet.sign_login(&cli.domain)?;
            let voucher = api.request_voucher(&assertion, session.trim()).await?;
            std::fs::write(&output, serde_json::to_string_pretty(&voucher)?)?;
            println!(
                "{} Voucher {} issued ({}), saved to {}",
                style("✓").green(),
                voucher.voucher_id,
                voucher.metadata.description,
                output.display()
            );
            Ok(())
        }
        Some(Commands::Mint { voucher }) => {
            let raw = std::fs::read_to_string(&voucher)?;
            let voucher = serde_json::from_str(&raw)?;
            let token_id = api.mint(&voucher).await?;
            println!(
                "{} Minted commemorative token #{token_id}",
                style("✓").green()
            );
            Ok(())
        }
        Some(Commands::Withdraw) => {
            let wallet = Wallet::load(&cli.wallet)?;
            let amount = api.withdraw(wallet.address()).await?;
            println!("{} Withdrew {} units", style("✓").green(), amount);
            Ok(())
        }
        Some(Commands::Journey) | None => {
            let (wallet, created) = Wallet::load_or_generate(&cli.wallet)?;
            if created {
                println!("Created wallet at {}", cli.wallet.display());
            }
            flow::run(&api, &wallet, &cli.domain).await
        }
    }
}
