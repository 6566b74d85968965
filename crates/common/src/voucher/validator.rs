//! 凭证验证器
//!
//! 负责校验铸造凭证的签名与部署绑定，专注于验证职责

use super::{MintingVoucher, VoucherError};
use base64::prelude::*;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::debug;

/// 铸造凭证验证器
///
/// 持有签发方公钥与本部署的绑定信息（链标识 + 代币合约）。
/// 验证通过只说明凭证真实且属于本部署；是否已被消费由注册表判断。
#[derive(Debug, Clone)]
pub struct VoucherValidator {
    verifying_key: VerifyingKey,
    chain_id: String,
    token_contract: String,
}

impl VoucherValidator {
    /// 创建新的验证器实例
    pub fn new(verifying_key: VerifyingKey, chain_id: String, token_contract: String) -> Self {
        Self {
            verifying_key,
            chain_id,
            token_contract,
        }
    }

    /// 校验凭证（签名 + 部署绑定）
    pub fn validate(&self, voucher: &MintingVoucher) -> Result<(), VoucherError> {
        if voucher.chain_id != self.chain_id {
            return Err(VoucherError::DeploymentMismatch { field: "chain_id" });
        }
        if voucher.token_contract != self.token_contract {
            return Err(VoucherError::DeploymentMismatch {
                field: "token_contract",
            });
        }

        let sig_bytes: [u8; 64] = BASE64_STANDARD
            .decode(&voucher.signature)
            .map_err(|e| VoucherError::Malformed(format!("signature: {e}")))?
            .try_into()
            .map_err(|_| VoucherError::Malformed("signature must be 64 bytes".to_string()))?;
        let signature = Signature::from_bytes(&sig_bytes);

        let claims_bytes = voucher.claims().to_bytes()?;
        self.verifying_key
            .verify(&claims_bytes, &signature)
            .map_err(|_| VoucherError::BadSignature)?;

        debug!(
            "Voucher {} validated for recipient {}",
            voucher.voucher_id, voucher.recipient
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;
    use crate::voucher::{VoucherClaims, VoucherMetadata};
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;
    use uuid::Uuid;

    fn signed_voucher(key: &SigningKey) -> MintingVoucher {
        let claims = VoucherClaims {
            voucher_id: Uuid::new_v4(),
            recipient: Address::from_bytes([7u8; 20]),
            chain_id: "goerli".to_string(),
            token_contract: "0xtoken".to_string(),
            metadata: VoucherMetadata {
                name: "Tester's Commitment Token".to_string(),
                description: "For committing to 3 days of accountability".to_string(),
                image: "ipfs://artwork".to_string(),
            },
        };
        let signature = BASE64_STANDARD.encode(key.sign(&claims.to_bytes().unwrap()).to_bytes());
        claims.into_voucher(signature)
    }

    fn validator_for(key: &SigningKey) -> VoucherValidator {
        VoucherValidator::new(
            key.verifying_key(),
            "goerli".to_string(),
            "0xtoken".to_string(),
        )
    }

    #[test]
    fn test_accepts_genuine_voucher() {
        let key = SigningKey::generate(&mut OsRng);
        let voucher = signed_voucher(&key);
        assert!(validator_for(&key).validate(&voucher).is_ok());
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let key = SigningKey::generate(&mut OsRng);
        let other = SigningKey::generate(&mut OsRng);
        let voucher = signed_voucher(&other);

        assert!(matches!(
            validator_for(&key).validate(&voucher),
            Err(VoucherError::BadSignature)
        ));
    }

    #[test]
    fn test_rejects_tampered_recipient() {
        let key = SigningKey::generate(&mut OsRng);
        let mut voucher = signed_voucher(&key);
        voucher.recipient = Address::from_bytes([8u8; 20]);

        assert!(matches!(
            validator_for(&key).validate(&voucher),
            Err(VoucherError::BadSignature)
        ));
    }

    #[test]
    fn test_rejects_wrong_deployment() {
        let key = SigningKey::generate(&mut OsRng);
        let voucher = signed_voucher(&key);
        let validator = VoucherValidator::new(
            key.verifying_key(),
            "mainnet".to_string(),
            "0xtoken".to_string(),
        );

        assert!(matches!(
            validator.validate(&voucher),
            Err(VoucherError::DeploymentMismatch { field: "chain_id" })
        ));
    }
}
