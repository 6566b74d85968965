//! 交互式流程
//!
//! 把整条用户旅程串成一个菜单循环：
//! 锁定资金 → （在平台频道里每日打卡）→ 请求凭证 → 铸造 → 取回

use crate::api::PledgeApi;
use crate::wallet::Wallet;
use anyhow::Result;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use pledge_common::MintingVoucher;
use std::path::Path;
use std::time::Duration;

const VOUCHER_FILE: &str = "voucher.json";

/// 运行交互式旅程
pub async fn run(api: &PledgeApi, wallet: &Wallet, domain: &str) -> Result<()> {
    println!();
    println!(
        "{}",
        style("Pledge: commit, check in daily, earn it back").bold()
    );
    println!("Wallet address: {}", style(wallet.address()).cyan());
    println!();

    let mut voucher: Option<MintingVoucher> = load_saved_voucher();
    let theme = ColorfulTheme::default();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&[
                "Show locked funds",
                "Lock funds",
                "Request minting voucher",
                "Mint commemorative token",
                "Withdraw funds",
                "Quit",
            ])
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => show_status(api, wallet).await,
            1 => lock_funds(api, wallet, &theme).await,
            2 => request_voucher(api, wallet, domain, &theme, &mut voucher).await,
            3 => mint(api, &voucher).await,
            4 => withdraw(api, wallet).await,
            _ => break,
        };

        if let Err(e) = outcome {
            println!("{} {e:#}", style("✗").red());
        }
        println!();
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn load_saved_voucher() -> Option<MintingVoucher> {
    let raw = std::fs::read_to_string(VOUCHER_FILE).ok()?;
    serde_json::from_str(&raw).ok()
}

async fn show_status(api: &PledgeApi, wallet: &Wallet) -> Result<()> {
    let pb = spinner("Fetching locked funds...");
    let funds = api.locked_funds(wallet.address()).await;
    pb.finish_and_clear();

    let funds = funds?;
    if funds.amount == 0 {
        println!("No funds locked.");
    } else {
        println!(
            "{} {} units locked for {} days (since unix {})",
            style("●").green(),
            funds.amount,
            funds.duration_secs / 86_400,
            funds.locked_at
        );
    }
    Ok(())
}

async fn lock_funds(api: &PledgeApi, wallet: &Wallet, theme: &ColorfulTheme) -> Result<()> {
    let amount: u128 = Input::with_theme(theme)
        .with_prompt("Amount to lock")
        .default(1000)
        .interact_text()?;
    let days: u64 = Input::with_theme(theme)
        .with_prompt("Committed days")
        .default(7)
        .interact_text()?;

    let pb = spinner("Locking funds...");
    let locked_at = api.lock(wallet.address(), amount, days * 86_400).await;
    pb.finish_and_clear();

    let locked_at = locked_at?;
    println!(
        "{} Locked {} units for {} days (locked_at={}). Now go check in daily!",
        style("✓").green(),
        amount,
        days,
        locked_at
    );
    Ok(())
}

async fn request_voucher(
    api: &PledgeApi,
    wallet: &Wallet,
    domain: &str,
    theme: &ColorfulTheme,
    voucher: &mut Option<MintingVoucher>,
) -> Result<()> {
    let default_session = std::env::var("PLEDGE_SESSION_TOKEN").unwrap_or_default();
    let session: String = Input::with_theme(theme)
        .with_prompt("Platform session token")
        .default(default_session)
        .interact_text()?;

    let assertion = wallet.sign_login(domain)?;
    let pb = spinner("Auditing your check-ins...");
    let result = api.request_voucher(&assertion, session.trim()).await;
    pb.finish_and_clear();

    let fresh = result?;
    std::fs::write(
        Path::new(VOUCHER_FILE),
        serde_json::to_string_pretty(&fresh)?,
    )?;
    println!(
        "{} Voucher {} issued: {}",
        style("✓").green(),
        fresh.voucher_id,
        fresh.metadata.description
    );
    println!("Saved to {VOUCHER_FILE}");
    *voucher = Some(fresh);
    Ok(())
}

async fn mint(api: &PledgeApi, voucher: &Option<MintingVoucher>) -> Result<()> {
    let Some(voucher) = voucher else {
        anyhow::bail!("no voucher yet, request one first");
    };

    let pb = spinner("Minting token...");
    let result = api.mint(voucher).await;
    pb.finish_and_clear();

    let token_id = result?;
    println!(
        "{} Minted commemorative token #{token_id}",
        style("✓").green()
    );
    Ok(())
}

async fn withdraw(api: &PledgeApi, wallet: &Wallet) -> Result<()> {
    let pb = spinner("Withdrawing...");
    let result = api.withdraw(wallet.address()).await;
    pb.finish_and_clear();

    let amount = result?;
    println!(
        "{} Withdrew {} units. Commitment honored.",
        style("✓").green(),
        amount
    );
    Ok(())
}
