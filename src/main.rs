//! Pledge 服务套件主程序
//!
//! 启动并管理承诺问责相关的服务：承诺账本（链上合约的进程内替身）
//! 与 AVS（承诺审计 + 铸造凭证签发）。

mod cli;
mod error;
mod observability;
mod service;

use clap::Parser;
use cli::{Cli, Commands};
use ed25519_dalek::SigningKey;
use error::Result;
use ledger::{CommitmentLedger, LedgerState, SystemClock, TokenRegistry};
use pledge_common::{PledgeConfig, Secrets, VoucherValidator};
use service::{AvsService, LedgerBridge, LedgerService, ServiceManager};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Keygen) = cli.command {
        let key = SigningKey::generate(&mut rand::rngs::OsRng);
        println!("PLEDGE_SIGNING_KEY={}", hex::encode(key.to_bytes()));
        println!("verifying key:      {}", hex::encode(key.verifying_key().as_bytes()));
        return Ok(());
    }

    // 配置测试模式：只加载并校验，不启动任何服务
    if let Some(Commands::Test { config_file }) = cli.command {
        let path = config_file.unwrap_or(cli.config);
        match PledgeConfig::load(&path) {
            Ok(config) => {
                let mut enabled = Vec::new();
                if config.ledger_config().is_some() {
                    enabled.push("ledger");
                }
                if config.avs_config().is_some() {
                    enabled.push("avs");
                }
                println!(
                    "Configuration file {} is valid (services: {})",
                    path.display(),
                    if enabled.is_empty() {
                        "none".to_string()
                    } else {
                        enabled.join(", ")
                    }
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration file {} is invalid: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    let config = PledgeConfig::load(&cli.config)?;
    let secrets = Secrets::from_env()?;
    let _observability_guard = observability::init_observability(&config.observability)?;

    info!("Starting {} (env: {})", config.name, config.env);

    let (shutdown_tx, _) = tokio::sync::broadcast::channel(4);
    let mut manager = ServiceManager::new(shutdown_tx.clone());

    // 注册表校验凭证用的公钥，从 AVS 的签发种子派生：
    // 两个服务必须认同同一个签发方与同一个部署绑定
    let signing_key = SigningKey::from_bytes(&secrets.signing_seed);
    let validator = VoucherValidator::new(
        signing_key.verifying_key(),
        config.deployment.chain_id.clone(),
        config.deployment.token_contract.clone(),
    );
    let registry = Arc::new(TokenRegistry::new(validator));
    let vault = Arc::new(CommitmentLedger::new(registry.clone(), Arc::new(SystemClock)));

    if config.ledger_config().is_some() {
        manager.add_service(Box::new(LedgerService::new(LedgerState::new(
            vault.clone(),
            registry.clone(),
        ))));
    }

    if let Some(avs_config) = config.avs_config() {
        let bridge = Arc::new(LedgerBridge::new(vault.clone()));
        manager.add_service(Box::new(AvsService::new(
            avs_config.clone(),
            config.deployment.clone(),
            secrets.clone(),
            bridge,
        )));
    }

    let server_handle = manager.start_http(&config.bind).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    let _ = shutdown_tx.send(());
    server_handle.await?;

    info!("Shutdown complete");
    Ok(())
}
