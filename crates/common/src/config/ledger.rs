//! 承诺账本服务配置

use serde::{Deserialize, Serialize};

/// 账本服务配置
///
/// 账本是链上合约的进程内替身，没有持久化配置；
/// 这里只保留服务开关，便于与其他服务统一管理。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LedgerConfig {
    /// 是否启用账本服务
    #[serde(default)]
    pub enabled: bool,
}
