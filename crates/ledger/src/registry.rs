//! 纪念代币注册表
//!
//! 消费铸造凭证：校验签名与部署绑定，按 voucher_id 去重，
//! 然后记录代币归属。凭证本身不带过期时间，重放在消费点被拦截。

use crate::error::LedgerError;
use pledge_common::{Address, MintingVoucher, VoucherMetadata, VoucherValidator};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// 已铸造的纪念代币
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintedToken {
    /// 代币序号，注册表内单调递增
    pub token_id: u64,

    /// 铸造它的凭证标识
    pub voucher_id: Uuid,

    /// 持有者地址
    pub owner: Address,

    /// 凭证携带的元数据
    pub metadata: VoucherMetadata,
}

#[derive(Default)]
struct RegistryState {
    used_vouchers: HashSet<Uuid>,
    owners: HashMap<Address, Vec<MintedToken>>,
    next_token_id: u64,
}

/// 纪念代币注册表
pub struct TokenRegistry {
    validator: VoucherValidator,
    state: RwLock<RegistryState>,
}

impl TokenRegistry {
    /// 创建新的注册表
    pub fn new(validator: VoucherValidator) -> Self {
        Self {
            validator,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// 消费凭证并铸造代币
    ///
    /// 同一 voucher_id 至多成功一次
    pub async fn mint(&self, voucher: &MintingVoucher) -> Result<MintedToken, LedgerError> {
        self.validator.validate(voucher)?;

        let mut state = self.state.write().await;
        if !state.used_vouchers.insert(voucher.voucher_id) {
            return Err(LedgerError::VoucherReplayed);
        }

        let token = MintedToken {
            token_id: state.next_token_id,
            voucher_id: voucher.voucher_id,
            owner: voucher.recipient,
            metadata: voucher.metadata.clone(),
        };
        state.next_token_id += 1;
        state
            .owners
            .entry(voucher.recipient)
            .or_default()
            .push(token.clone());

        info!(
            "Minted token {} for {} (voucher {})",
            token.token_id, token.owner, token.voucher_id
        );
        Ok(token)
    }

    /// 该地址是否持有任何纪念代币
    pub async fn owns_token(&self, owner: &Address) -> bool {
        self.state
            .read()
            .await
            .owners
            .get(owner)
            .is_some_and(|tokens| !tokens.is_empty())
    }

    /// 该地址持有的全部代币
    pub async fn tokens_of(&self, owner: &Address) -> Vec<MintedToken> {
        self.state
            .read()
            .await
            .owners
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::prelude::*;
    use ed25519_dalek::{Signer, SigningKey};
    use pledge_common::VoucherClaims;
    use rand::rngs::OsRng;

    pub(crate) const TEST_CHAIN_ID: &str = "goerli";
    pub(crate) const TEST_TOKEN_CONTRACT: &str = "0xA9b89BE286062A7aa2a6AD0f67DA07A6B573d682";

    /// 用全新签发密钥构造注册表
    pub(crate) fn registry_with_key() -> (TokenRegistry, SigningKey) {
        let key = SigningKey::generate(&mut OsRng);
        let validator = VoucherValidator::new(
            key.verifying_key(),
            TEST_CHAIN_ID.to_string(),
            TEST_TOKEN_CONTRACT.to_string(),
        );
        (TokenRegistry::new(validator), key)
    }

    /// 用给定密钥为接收地址签一张凭证
    pub(crate) fn signed_voucher(key: &SigningKey, recipient: Address) -> MintingVoucher {
        let claims = VoucherClaims {
            voucher_id: Uuid::new_v4(),
            recipient,
            chain_id: TEST_CHAIN_ID.to_string(),
            token_contract: TEST_TOKEN_CONTRACT.to_string(),
            metadata: VoucherMetadata {
                name: "Tester's Commitment Token".to_string(),
                description: "For committing to 1 days of accountability".to_string(),
                image: "ipfs://artwork".to_string(),
            },
        };
        let signature = BASE64_STANDARD.encode(key.sign(&claims.to_bytes().unwrap()).to_bytes());
        claims.into_voucher(signature)
    }

    fn recipient() -> Address {
        Address::from_bytes([0x22; 20])
    }

    #[tokio::test]
    async fn test_mint_records_ownership() {
        let (registry, key) = registry_with_key();
        assert!(!registry.owns_token(&recipient()).await);

        let token = registry
            .mint(&signed_voucher(&key, recipient()))
            .await
            .unwrap();

        assert_eq!(token.owner, recipient());
        assert!(registry.owns_token(&recipient()).await);
        assert_eq!(registry.tokens_of(&recipient()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_token_ids_are_sequential() {
        let (registry, key) = registry_with_key();
        let first = registry
            .mint(&signed_voucher(&key, recipient()))
            .await
            .unwrap();
        let second = registry
            .mint(&signed_voucher(&key, Address::from_bytes([0x33; 20])))
            .await
            .unwrap();

        assert_eq!(second.token_id, first.token_id + 1);
    }

    #[tokio::test]
    async fn test_rejects_voucher_replay() {
        let (registry, key) = registry_with_key();
        let voucher = signed_voucher(&key, recipient());

        registry.mint(&voucher).await.unwrap();
        assert!(matches!(
            registry.mint(&voucher).await,
            Err(LedgerError::VoucherReplayed)
        ));
        // 重放失败不会产生第二枚代币
        assert_eq!(registry.tokens_of(&recipient()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_forged_voucher() {
        let (registry, _key) = registry_with_key();
        let forger = SigningKey::generate(&mut OsRng);

        assert!(matches!(
            registry.mint(&signed_voucher(&forger, recipient())).await,
            Err(LedgerError::InvalidVoucher(_))
        ));
    }
}
