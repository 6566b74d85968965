//! AVS HTTP Handler
//!
//! `POST /withdraw` 是整条资格链路的入口：
//! 会话校验 → 登录断言校验 → 承诺审计 → 凭证签发。
//! 任何一环失败都以结构化错误返回，见 [`crate::error::AvsError`]。

use crate::auditor::CommitmentAuditor;
use crate::courier::CourierApi;
use crate::error::AvsError;
use crate::identity::IdentityVerifier;
use crate::issuer::VoucherIssuer;
use crate::ratelimit::ip_rate_limiter;
use crate::session::SessionValidator;
use axum::{
    Router,
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::{get, post},
};
use pledge_common::{LoginAssertion, MintingVoucher};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// 会话令牌请求头
pub const SESSION_HEADER: &str = "x-pledge-session";

/// AVS 服务状态
#[derive(Clone)]
pub struct AvsState {
    pub auditor: Arc<CommitmentAuditor>,
    pub issuer: Arc<VoucherIssuer>,
    pub sessions: Arc<SessionValidator>,
    pub identity: Arc<IdentityVerifier>,
    /// 健康检查直接探测平台连通性
    pub courier: Arc<dyn CourierApi>,
    pub community_id: String,
}

/// 创建 AVS 服务的路由
///
/// 应用限流中间件，防止审计路径被刷
pub fn create_router(state: AvsState) -> Router {
    Router::new()
        .route("/withdraw", post(withdraw))
        .route("/health", get(health_check))
        .layer(ip_rate_limiter())
        .with_state(state)
}

/// 取回资格请求
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    /// 登录断言（不透明的签名载荷）
    pub login_payload: LoginAssertion,
}

/// 取回资格响应
#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    /// 签发的铸造凭证
    pub signature: MintingVoucher,
}

/// 资格校验与凭证签发处理器
async fn withdraw(
    State(state): State<AvsState>,
    headers: HeaderMap,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, AvsError> {
    let now = now_unix();

    // 会话身份：平台用户标识与显示名的唯一来源
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AvsError::NotLoggedIn("missing session header".to_string()))?;
    let claims = state.sessions.verify(token, now)?;
    debug!("Session verified for platform user {}", claims.user_id);

    // 钱包身份：从登录断言恢复
    let wallet = state.identity.verify(&request.login_payload, now)?;

    // 审计承诺履行情况
    let verdict = state.auditor.audit(wallet, &claims.user_id).await?;

    // 签发凭证
    let voucher = state
        .issuer
        .issue(wallet, &claims.display_name, verdict.days_committed)?;

    info!(
        "Withdraw eligibility granted to {} ({} check-ins / {} days)",
        wallet, verdict.qualifying_checkins, verdict.days_committed
    );
    Ok(Json(WithdrawResponse { signature: voucher }))
}

/// 健康检查端点
///
/// 除进程自身状态外，探测一次消息平台连通性
async fn health_check(State(state): State<AvsState>) -> Json<Value> {
    let mut checks = json!({
        "service": "avs",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy"
    });

    let platform_status = match state.courier.list_channels(&state.community_id).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Platform health check failed: {}", e);
            checks["status"] = json!("degraded");
            "failed"
        }
    };
    checks["platform"] = json!(platform_status);

    Json(checks)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
