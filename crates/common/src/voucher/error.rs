//! 凭证校验错误

use thiserror::Error;

/// 凭证校验错误类型
#[derive(Debug, Error)]
pub enum VoucherError {
    /// 凭证字段无法解析或序列化
    #[error("Malformed voucher: {0}")]
    Malformed(String),

    /// 签名校验失败
    #[error("Voucher signature verification failed")]
    BadSignature,

    /// 凭证绑定的部署与本注册表不符
    #[error("Voucher bound to a different deployment: {field}")]
    DeploymentMismatch { field: &'static str },
}
