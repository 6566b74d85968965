//! 铸造凭证签发器
//!
//! 只在审计通过后被调用。凭证绑定接收地址与消费部署，
//! 元数据由认证的显示名与承诺天数派生，艺术品引用固定。
//!
//! 签发私钥在启动时从环境变量种子加载，进程内常驻，
//! 每次签发只借用一次，不跨请求持有任何状态。

use crate::error::AvsError;
use base64::prelude::*;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use pledge_common::{
    Address, DeploymentConfig, MintingVoucher, VoucherClaims, VoucherMetadata,
};
use tracing::info;
use uuid::Uuid;

/// 铸造凭证签发器
pub struct VoucherIssuer {
    signing_key: SigningKey,
    chain_id: String,
    token_contract: String,
    artwork_uri: String,
}

impl VoucherIssuer {
    /// 创建新的签发器
    pub fn new(
        signing_key: SigningKey,
        deployment: &DeploymentConfig,
        artwork_uri: String,
    ) -> Self {
        Self {
            signing_key,
            chain_id: deployment.chain_id.clone(),
            token_contract: deployment.token_contract.clone(),
            artwork_uri,
        }
    }

    /// 签发方公钥，注册表用它校验凭证
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// 为通过审计的地址签发一张凭证
    pub fn issue(
        &self,
        recipient: Address,
        display_name: &str,
        days_committed: u64,
    ) -> Result<MintingVoucher, AvsError> {
        let claims = VoucherClaims {
            voucher_id: Uuid::new_v4(),
            recipient,
            chain_id: self.chain_id.clone(),
            token_contract: self.token_contract.clone(),
            metadata: VoucherMetadata {
                name: format!("{display_name}'s Commitment Token"),
                description: format!(
                    "For committing to {days_committed} days of accountability"
                ),
                image: self.artwork_uri.clone(),
            },
        };

        let claims_bytes = claims
            .to_bytes()
            .map_err(|e| AvsError::Signing(e.to_string()))?;
        let signature = BASE64_STANDARD.encode(self.signing_key.sign(&claims_bytes).to_bytes());

        info!(
            "Issued voucher {} for {} ({} days committed)",
            claims.voucher_id, recipient, days_committed
        );
        Ok(claims.into_voucher(signature))
    }
}
