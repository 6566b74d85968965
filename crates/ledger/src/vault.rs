//! 承诺账本
//!
//! 每地址一条锁定记录。锁定与取回的守卫条件见 crate 文档的状态机。

use crate::clock::Clock;
use crate::error::LedgerError;
use crate::registry::TokenRegistry;
use pledge_common::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 锁定记录
///
/// 不变量：`amount > 0` 时 `duration_secs > 0` 且 `locked_at > 0`，
/// 由 [`CommitmentLedger::lock_funds`] 的守卫保证。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// 锁定金额（原生货币最小单位）
    pub amount: u128,

    /// 承诺时长（秒）
    pub duration_secs: u64,

    /// 锁定时刻（Unix 秒）
    pub locked_at: u64,
}

/// 承诺账本
///
/// 取回守卫需要确认调用方持有纪念代币，因此持有注册表的引用。
pub struct CommitmentLedger {
    records: RwLock<HashMap<Address, LockRecord>>,
    registry: Arc<TokenRegistry>,
    clock: Arc<dyn Clock>,
}

impl CommitmentLedger {
    /// 创建新的账本
    pub fn new(registry: Arc<TokenRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            registry,
            clock,
        }
    }

    /// 锁定资金
    ///
    /// 仅在地址没有锁定中的资金时有效；重复锁定会破坏
    /// 每地址单记录的不变量，直接拒绝。
    pub async fn lock_funds(
        &self,
        owner: Address,
        amount: u128,
        duration_secs: u64,
    ) -> Result<LockRecord, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroDeposit);
        }
        if duration_secs == 0 {
            return Err(LedgerError::ZeroDuration);
        }

        let mut records = self.records.write().await;
        if records.get(&owner).is_some_and(|r| r.amount > 0) {
            return Err(LedgerError::AlreadyLocked);
        }

        let record = LockRecord {
            amount,
            duration_secs,
            locked_at: self.clock.now_unix(),
        };
        records.insert(owner, record);

        info!(
            "Locked {} units for {} over {}s (locked_at={})",
            amount, owner, duration_secs, record.locked_at
        );
        Ok(record)
    }

    /// 取回资金
    ///
    /// 守卫顺序：有锁定资金 → 时间锁到期 → 持有纪念代币。
    /// 成功后记录归零，返回取回金额。
    pub async fn withdraw(&self, owner: Address) -> Result<u128, LedgerError> {
        let mut records = self.records.write().await;

        let record = match records.get(&owner) {
            Some(r) if r.amount > 0 => *r,
            _ => return Err(LedgerError::NoLockedFunds),
        };

        let now = self.clock.now_unix();
        if now < record.locked_at + record.duration_secs {
            debug!(
                "Withdraw rejected for {}: {}s remaining",
                owner,
                record.locked_at + record.duration_secs - now
            );
            return Err(LedgerError::StillLocked);
        }

        if !self.registry.owns_token(&owner).await {
            return Err(LedgerError::NoToken);
        }

        records.remove(&owner);
        info!("Withdrew {} units for {}", record.amount, owner);
        Ok(record.amount)
    }

    /// 查询锁定记录
    pub async fn locked_funds(&self, owner: &Address) -> Option<LockRecord> {
        self.records.read().await.get(owner).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::registry::tests::{registry_with_key, signed_voucher};
    use ed25519_dalek::SigningKey;

    fn test_address() -> Address {
        Address::from_bytes([0x11; 20])
    }

    struct Setup {
        ledger: CommitmentLedger,
        registry: Arc<TokenRegistry>,
        clock: Arc<ManualClock>,
        key: SigningKey,
    }

    fn ledger_setup() -> Setup {
        let (registry, key) = registry_with_key();
        let registry = Arc::new(registry);
        let clock = ManualClock::starting_at(1_700_000_000);
        let ledger = CommitmentLedger::new(registry.clone(), clock.clone());
        Setup {
            ledger,
            registry,
            clock,
            key,
        }
    }

    #[tokio::test]
    async fn test_lock_records_funds() {
        let s = ledger_setup();
        let record = s.ledger.lock_funds(test_address(), 1000, 60).await.unwrap();

        assert_eq!(record.amount, 1000);
        assert_eq!(record.duration_secs, 60);
        assert_eq!(record.locked_at, 1_700_000_000);
        assert_eq!(
            s.ledger.locked_funds(&test_address()).await,
            Some(record),
            "lock record must be queryable"
        );
    }

    #[tokio::test]
    async fn test_rejects_zero_amount_and_duration() {
        let s = ledger_setup();

        assert!(matches!(
            s.ledger.lock_funds(test_address(), 0, 60).await,
            Err(LedgerError::ZeroDeposit)
        ));
        assert!(matches!(
            s.ledger.lock_funds(test_address(), 1000, 0).await,
            Err(LedgerError::ZeroDuration)
        ));
    }

    #[tokio::test]
    async fn test_rejects_double_lock() {
        let s = ledger_setup();
        s.ledger.lock_funds(test_address(), 1000, 60).await.unwrap();

        assert!(matches!(
            s.ledger.lock_funds(test_address(), 500, 120).await,
            Err(LedgerError::AlreadyLocked)
        ));
    }

    #[tokio::test]
    async fn test_withdraw_before_expiry_fails() {
        let s = ledger_setup();
        s.ledger.lock_funds(test_address(), 1000, 60).await.unwrap();
        s.clock.advance(59);

        assert!(matches!(
            s.ledger.withdraw(test_address()).await,
            Err(LedgerError::StillLocked)
        ));
    }

    #[tokio::test]
    async fn test_withdraw_without_token_fails() {
        let s = ledger_setup();
        s.ledger.lock_funds(test_address(), 1000, 60).await.unwrap();
        s.clock.advance(60);

        assert!(matches!(
            s.ledger.withdraw(test_address()).await,
            Err(LedgerError::NoToken)
        ));
    }

    #[tokio::test]
    async fn test_withdraw_on_empty_record_fails() {
        let s = ledger_setup();

        assert!(matches!(
            s.ledger.withdraw(test_address()).await,
            Err(LedgerError::NoLockedFunds)
        ));
    }

    #[tokio::test]
    async fn test_full_withdraw_flow() {
        let s = ledger_setup();
        let owner = test_address();

        s.ledger.lock_funds(owner, 1000, 60).await.unwrap();
        s.registry
            .mint(&signed_voucher(&s.key, owner))
            .await
            .unwrap();
        s.clock.advance(60);

        assert_eq!(s.ledger.withdraw(owner).await.unwrap(), 1000);
        assert_eq!(
            s.ledger.locked_funds(&owner).await,
            None,
            "record must be cleared after withdrawal"
        );

        // 取回后再次取回，回到 Empty 状态的守卫
        assert!(matches!(
            s.ledger.withdraw(owner).await,
            Err(LedgerError::NoLockedFunds)
        ));
    }
}
