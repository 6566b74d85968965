//! AVS 服务错误定义
//!
//! 认证与资格失败是面向用户的预期结果，以 401 + 可读文案返回；
//! 外部服务与签发失败是运维问题，以 5xx 返回，绝不伪装成
//! "你没有坚持打卡"。内部细节只进日志，不进响应。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pledge_common::{Address, AssertionError};
use serde_json::json;
use thiserror::Error;

/// AVS 服务错误类型
#[derive(Debug, Error)]
pub enum AvsError {
    /// 无会话或会话令牌无效
    #[error("No valid session: {0}")]
    NotLoggedIn(String),

    /// 登录断言校验失败
    #[error("Login assertion rejected: {0}")]
    InvalidAssertion(#[from] AssertionError),

    /// 地址没有生效中的承诺
    #[error("No active commitment for {0}")]
    NoCommitment(Address),

    /// 社区中找不到配置的审计频道
    #[error("Audit channel {0} not found in community")]
    ChannelNotFound(String),

    /// 打卡节奏或天数不满足承诺
    #[error("Commitment not met: {0}")]
    CommitmentNotMet(String),

    /// 消息平台调用失败
    #[error("Messaging platform error: {0}")]
    Platform(#[from] reqwest::Error),

    /// 平台响应形态异常
    #[error("Malformed platform response: {0}")]
    MalformedResponse(String),

    /// 凭证签发失败
    #[error("Voucher signing failed: {0}")]
    Signing(String),
}

impl IntoResponse for AvsError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AvsError::NotLoggedIn(_) => (StatusCode::UNAUTHORIZED, "Not logged in"),
            AvsError::InvalidAssertion(_) => (StatusCode::UNAUTHORIZED, "Invalid login payload"),
            AvsError::NoCommitment(_) | AvsError::CommitmentNotMet(_) => {
                (StatusCode::UNAUTHORIZED, "Failed to commit, sorry.")
            }
            AvsError::ChannelNotFound(_) => {
                // 频道缺失是配置问题，细节进日志，响应保持资格失败的形态
                tracing::error!("Audit channel misconfigured: {}", self);
                (StatusCode::UNAUTHORIZED, "Failed to commit, sorry.")
            }
            AvsError::Platform(_) | AvsError::MalformedResponse(_) => {
                tracing::error!("Messaging platform failure: {}", self);
                (StatusCode::BAD_GATEWAY, "Messaging platform unavailable")
            }
            AvsError::Signing(_) => {
                tracing::error!("Voucher signing failure: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// AVS 结果类型别名
pub type AvsResult<T> = Result<T, AvsError>;
