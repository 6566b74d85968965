//! 账本服务 HTTP Handler
//!
//! 链上交互不在本系统范围内，这里暴露账本与注册表的模拟面，
//! 让端到端流程（锁定 → 凭证 → 铸造 → 取回）无需真实链即可驱动。

use crate::error::LedgerError;
use crate::registry::TokenRegistry;
use crate::vault::{CommitmentLedger, LockRecord};
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
};
use pledge_common::{Address, MintingVoucher};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// 账本服务状态
#[derive(Clone)]
pub struct LedgerState {
    pub vault: Arc<CommitmentLedger>,
    pub registry: Arc<TokenRegistry>,
}

impl LedgerState {
    pub fn new(vault: Arc<CommitmentLedger>, registry: Arc<TokenRegistry>) -> Self {
        Self { vault, registry }
    }
}

/// 创建账本服务的路由
pub fn create_ledger_router(state: LedgerState) -> Router {
    Router::new()
        .route("/lock", post(lock_funds))
        .route("/withdraw", post(withdraw))
        .route("/mint", post(mint))
        .route("/funds/{address}", get(locked_funds))
        .route("/health", get(health_check))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LockRequest {
    address: Address,
    amount: u128,
    duration_secs: u64,
}

#[derive(Debug, Serialize)]
struct LockResponse {
    locked_at: u64,
}

async fn lock_funds(
    State(state): State<LedgerState>,
    Json(request): Json<LockRequest>,
) -> Result<Json<LockResponse>, LedgerError> {
    debug!(
        "Lock request: {} units for {} over {}s",
        request.amount, request.address, request.duration_secs
    );
    let record = state
        .vault
        .lock_funds(request.address, request.amount, request.duration_secs)
        .await?;
    Ok(Json(LockResponse {
        locked_at: record.locked_at,
    }))
}

#[derive(Debug, Deserialize)]
struct WithdrawRequest {
    address: Address,
}

#[derive(Debug, Serialize)]
struct WithdrawResponse {
    amount: u128,
}

async fn withdraw(
    State(state): State<LedgerState>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, LedgerError> {
    let amount = state.vault.withdraw(request.address).await?;
    Ok(Json(WithdrawResponse { amount }))
}

#[derive(Debug, Deserialize)]
struct MintRequest {
    voucher: MintingVoucher,
}

#[derive(Debug, Serialize)]
struct MintResponse {
    token_id: u64,
}

async fn mint(
    State(state): State<LedgerState>,
    Json(request): Json<MintRequest>,
) -> Result<Json<MintResponse>, LedgerError> {
    let token = state.registry.mint(&request.voucher).await?;
    Ok(Json(MintResponse {
        token_id: token.token_id,
    }))
}

/// 查询锁定记录
///
/// 与合约 mapping 的读取语义一致：不存在的地址返回全零记录
async fn locked_funds(
    State(state): State<LedgerState>,
    Path(address): Path<Address>,
) -> Json<LockRecord> {
    let record = state
        .vault
        .locked_funds(&address)
        .await
        .unwrap_or(LockRecord {
            amount: 0,
            duration_secs: 0,
            locked_at: 0,
        });
    Json(record)
}

/// 健康检查端点
async fn health_check() -> Json<Value> {
    Json(json!({
        "service": "ledger",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy"
    }))
}
