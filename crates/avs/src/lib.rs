//! Accountability Verification Service (AVS) - 承诺审计与凭证签发服务
//!
//! # 功能概述
//!
//! AVS 是套件的资格裁决服务，负责：
//! - 会话校验：确认请求方持有平台身份（用户标识 + 显示名）
//! - 身份校验：从登录断言恢复钱包地址
//! - 承诺审计：对照账本承诺，核对平台频道里的每日打卡记录
//! - 凭证签发：审计通过后签出一张绑定地址与部署的铸造凭证
//!
//! # 架构设计
//!
//! ```text
//! ┌──────────────┐
//! │   Client     │
//! └──────┬───────┘
//!        │ POST /withdraw { login_payload }  (x-pledge-session)
//!        ▼
//! ┌──────────────────────────────────────────────┐
//! │  AVS                                         │
//! │  ┌──────────┐   ┌──────────────┐             │
//! │  │ Handlers │──▶│ Session +    │             │
//! │  └────┬─────┘   │ Identity     │             │
//! │       │         └──────────────┘             │
//! │  ┌────▼─────────────┐   ┌─────────────────┐  │
//! │  │ CommitmentAuditor│──▶│ VoucherIssuer   │  │
//! │  └────┬──────┬──────┘   └─────────────────┘  │
//! └───────┼──────┼───────────────────────────────┘
//!         │      │ Courier (REST)
//!         ▼      ▼
//!   承诺账本    消息平台 API
//! ```
//!
//! # 失败面
//!
//! 认证与资格失败以 401 返回，文案面向用户；平台故障与签发失败
//! 以 502/500 返回，与资格失败严格区分，避免把瞬时故障说成
//! "你没有坚持打卡"。

pub mod auditor;
pub mod courier;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod issuer;
pub mod ratelimit;
pub mod session;

pub use auditor::{
    AuditVerdict, CommitmentAuditor, LedgerView, LockedFunds, MIN_CHECKIN_GAP_SECS,
    SECONDS_PER_DAY,
};
pub use courier::{Channel, Courier, CourierApi, MessageAuthor, MessageRecord};
pub use error::{AvsError, AvsResult};
pub use handlers::{AvsState, SESSION_HEADER, WithdrawRequest, WithdrawResponse, create_router};
pub use identity::IdentityVerifier;
pub use issuer::VoucherIssuer;
pub use session::{SessionClaims, SessionValidator};

use anyhow::Result;
use ed25519_dalek::SigningKey;
use pledge_common::{AvsConfig, DeploymentConfig, Secrets};
use std::sync::Arc;
use tracing::info;

/// 创建 AVS 路由器
///
/// 账本视图由调用方注入：进程内部署桥接到 ledger crate，
/// 真实链部署替换为链上查询的实现。
pub fn create_avs_router(
    config: &AvsConfig,
    deployment: &DeploymentConfig,
    secrets: &Secrets,
    ledger: Arc<dyn LedgerView>,
) -> Result<axum::Router> {
    let courier: Arc<dyn CourierApi> =
        Arc::new(Courier::new(&config.courier, secrets.bot_token.clone()));

    let auditor = Arc::new(CommitmentAuditor::new(
        ledger,
        courier.clone(),
        config.community_id.clone(),
        config.channel_id.clone(),
    ));

    let signing_key = SigningKey::from_bytes(&secrets.signing_seed);
    let issuer = Arc::new(VoucherIssuer::new(
        signing_key,
        deployment,
        config.artwork_uri.clone(),
    ));

    let state = AvsState {
        auditor,
        issuer,
        sessions: Arc::new(SessionValidator::new(secrets.session_key.clone())),
        identity: Arc::new(IdentityVerifier::new(config.verification_domain.clone())),
        courier,
        community_id: config.community_id.clone(),
    };

    info!("AVS router created (audit channel {})", config.channel_id);
    Ok(create_router(state))
}
