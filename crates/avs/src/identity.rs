//! 身份验证器
//!
//! 校验登录断言并恢复钱包地址。断言格式与签名原语在
//! `pledge_common::assertion`，这里绑定本服务的校验域。

use crate::error::AvsError;
use pledge_common::{Address, LoginAssertion};
use tracing::debug;

/// 登录断言验证器
#[derive(Debug, Clone)]
pub struct IdentityVerifier {
    domain: String,
}

impl IdentityVerifier {
    /// 绑定校验域创建验证器
    pub fn new(domain: String) -> Self {
        Self { domain }
    }

    /// 校验断言并恢复钱包地址
    pub fn verify(&self, assertion: &LoginAssertion, now: u64) -> Result<Address, AvsError> {
        let address = assertion.verify(&self.domain, now)?;
        debug!("Verified wallet address {}", address);
        Ok(address)
    }
}
