//! 本地钱包
//!
//! 客户端持有 Ed25519 私钥种子，负责签登录断言。
//! 种子以十六进制存放在钱包文件里，仅用于演示环境。

use anyhow::{Context, Result};
use ed25519_dalek::SigningKey;
use pledge_common::{Address, AssertionPayload, LoginAssertion};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// 登录断言的有效窗口（秒）
const ASSERTION_TTL_SECS: u64 = 300;

#[derive(Serialize, Deserialize)]
struct WalletFile {
    seed: String,
}

/// 本地钱包
pub struct Wallet {
    signing_key: SigningKey,
}

impl Wallet {
    /// 生成新钱包
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// 从文件加载钱包
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read wallet file {}", path.display()))?;
        let file: WalletFile = serde_json::from_str(&raw)?;
        let seed: [u8; 32] = hex::decode(file.seed.trim())?
            .try_into()
            .map_err(|_| anyhow::anyhow!("wallet seed must be 32 bytes"))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// 保存钱包到文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = WalletFile {
            seed: hex::encode(self.signing_key.to_bytes()),
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)
            .with_context(|| format!("Failed to write wallet file {}", path.display()))?;
        Ok(())
    }

    /// 加载钱包，不存在则生成并保存
    pub fn load_or_generate(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            Ok((Self::load(path)?, false))
        } else {
            let wallet = Self::generate();
            wallet.save(path)?;
            Ok((wallet, true))
        }
    }

    /// 钱包地址
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.signing_key.verifying_key())
    }

    /// 为校验域签一份登录断言
    pub fn sign_login(&self, domain: &str) -> Result<LoginAssertion> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let nonce: [u8; 8] = rand::random();

        let assertion = LoginAssertion::sign(
            AssertionPayload {
                domain: domain.to_string(),
                address: self.address(),
                issued_at: now,
                expires_at: now + ASSERTION_TTL_SECS,
                nonce: hex::encode(nonce),
            },
            &self.signing_key,
        )?;
        Ok(assertion)
    }
}
