//! 账本桥接
//!
//! AVS 审计器通过 `LedgerView` 读取锁定资金；进程内部署时
//! 直接桥接到 ledger crate 的账本实例。

use async_trait::async_trait;
use avs::{LedgerView, LockedFunds};
use ledger::CommitmentLedger;
use pledge_common::Address;
use std::sync::Arc;

/// 进程内账本视图
pub struct LedgerBridge {
    vault: Arc<CommitmentLedger>,
}

impl LedgerBridge {
    pub fn new(vault: Arc<CommitmentLedger>) -> Self {
        Self { vault }
    }
}

#[async_trait]
impl LedgerView for LedgerBridge {
    async fn locked_funds(&self, owner: &Address) -> Option<LockedFunds> {
        self.vault
            .locked_funds(owner)
            .await
            .map(|record| LockedFunds {
                amount: record.amount,
                duration_secs: record.duration_secs,
                locked_at: record.locked_at,
            })
    }
}
