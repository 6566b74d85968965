//! 命令行界面定义
//!
//! 除了启动服务本身，还提供两个运维入口：配置文件体检（`test`）
//! 与签发密钥的初始化（`keygen`，生成 PLEDGE_SIGNING_KEY 用的种子）。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pledge", version)]
#[command(
    about = "Commitment accountability service suite: funds lock ledger, check-in audit and mint-voucher issuance"
)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    pub(crate) config: PathBuf,

    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Validate a configuration file without starting any service
    Test {
        /// Configuration file path (optional, defaults to config.toml)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,
    },

    /// Generate a fresh voucher-signing seed for PLEDGE_SIGNING_KEY
    ///
    /// 打印 32 字节种子的十六进制与对应的校验公钥；
    /// 种子进环境变量，公钥可分发给独立部署的注册表。
    Keygen,
}
