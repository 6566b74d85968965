//! 账本服务错误定义

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pledge_common::VoucherError;
use serde_json::json;
use thiserror::Error;

/// 账本与注册表错误类型
///
/// 守卫失败的文案沿用合约的 revert 语义，直接面向调用方
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 地址已有锁定中的资金
    #[error("You already have funds locked.")]
    AlreadyLocked,

    /// 锁定金额为零
    #[error("You must lock more than zero.")]
    ZeroDeposit,

    /// 锁定时长为零
    #[error("Lock duration must be greater than zero.")]
    ZeroDuration,

    /// 没有锁定中的资金
    #[error("You have no locked funds.")]
    NoLockedFunds,

    /// 时间锁尚未到期
    #[error("You cannot withdraw yet.")]
    StillLocked,

    /// 未持有纪念代币
    #[error("You do not own a commemorative token.")]
    NoToken,

    /// 凭证校验失败
    #[error("Invalid voucher: {0}")]
    InvalidVoucher(#[from] VoucherError),

    /// 凭证已被消费
    #[error("Voucher has already been used.")]
    VoucherReplayed,
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LedgerError::VoucherReplayed => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
