//! 铸造凭证
//!
//! 凭证由 AVS 用服务端私钥签发，授权持有者在纪念代币注册表上
//! 铸造一枚代币。凭证的有效性完全由签名承载，服务端不持久化；
//! 单次使用由注册表按 voucher_id 去重强制执行。
//!
//! 签发与校验分置：签发逻辑在 avs crate，校验逻辑在本模块，
//! 供注册表直接消费。

mod error;
mod validator;

pub use error::VoucherError;
pub use validator::VoucherValidator;

use crate::types::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 凭证元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherMetadata {
    /// 人类可读名称（由认证的显示名派生）
    pub name: String,

    /// 描述（引用承诺天数）
    pub description: String,

    /// 固定艺术品引用
    pub image: String,
}

/// 凭证声明 —— 签名覆盖的全部内容
///
/// 凭证绑定接收地址与消费部署（链标识 + 代币合约），
/// 防止同一签名被挪用到其他部署。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherClaims {
    /// 凭证唯一标识，注册表按此去重
    pub voucher_id: Uuid,

    /// 接收地址
    pub recipient: Address,

    /// 目标链标识
    pub chain_id: String,

    /// 纪念代币合约地址
    pub token_contract: String,

    /// 凭证元数据
    pub metadata: VoucherMetadata,
}

impl VoucherClaims {
    /// 声明的规范签名字节（JSON，按字段声明顺序）
    pub fn to_bytes(&self) -> Result<Vec<u8>, VoucherError> {
        serde_json::to_vec(self).map_err(|e| VoucherError::Malformed(e.to_string()))
    }

    /// 附上签名，组装为完整凭证
    pub fn into_voucher(self, signature: String) -> MintingVoucher {
        MintingVoucher {
            voucher_id: self.voucher_id,
            recipient: self.recipient,
            chain_id: self.chain_id,
            token_contract: self.token_contract,
            metadata: self.metadata,
            signature,
        }
    }
}

/// 签名后的铸造凭证
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintingVoucher {
    /// 凭证唯一标识
    pub voucher_id: Uuid,

    /// 接收地址
    pub recipient: Address,

    /// 目标链标识
    pub chain_id: String,

    /// 纪念代币合约地址
    pub token_contract: String,

    /// 凭证元数据
    pub metadata: VoucherMetadata,

    /// Ed25519 签名（base64）
    pub signature: String,
}

impl MintingVoucher {
    /// 重建签名覆盖的声明
    pub fn claims(&self) -> VoucherClaims {
        VoucherClaims {
            voucher_id: self.voucher_id,
            recipient: self.recipient,
            chain_id: self.chain_id.clone(),
            token_contract: self.token_contract.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
