//! 承诺账本与纪念代币注册表
//!
//! # 功能概述
//!
//! 本 crate 是链上合约的进程内替身，承载两类状态：
//! - 承诺账本（vault）：每地址一条锁定记录，带时间锁与代币门禁的取回守卫
//! - 代币注册表（registry）：校验铸造凭证并记录纪念代币归属，按凭证标识去重
//!
//! # 状态机
//!
//! ```text
//! 每地址：Empty ──lock_funds──▶ Locked ──withdraw──▶ Empty
//!
//! withdraw 守卫（按序检查）：
//! 1. 存在锁定记录且金额 > 0      否则 "You have no locked funds."
//! 2. 当前时间 ≥ 锁定时间 + 时长   否则 "You cannot withdraw yet."
//! 3. 注册表中持有纪念代币         否则 "You do not own a commemorative token."
//! ```
//!
//! 真实部署中这些守卫由链上交易排序串行化；这里用 `tokio::sync::RwLock`
//! 承担同样的职责。时间通过 [`Clock`] 注入，测试无需等待真实时间流逝。

pub mod clock;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LedgerError;
pub use handlers::{LedgerState, create_ledger_router};
pub use registry::{MintedToken, TokenRegistry};
pub use vault::{CommitmentLedger, LockRecord};
