//! 承诺审计器
//!
//! 回答一个问题：这个钱包的主人是否按承诺的天数坚持了每日打卡？
//!
//! 审计流程：
//! 1. 从账本读取锁定记录，换算承诺天数（整除 86400，向下取整）
//! 2. 在配置的社区中定位审计频道
//! 3. 拉取频道消息，过滤出该平台用户的打卡，按时间升序排序
//! 4. 校验打卡节奏：相邻两次打卡的间隔必须严格大于 8 小时
//! 5. 节奏成立且打卡次数 ≥ 承诺天数，审计通过

use crate::courier::CourierApi;
use crate::error::AvsError;
use async_trait::async_trait;
use pledge_common::Address;
use std::sync::Arc;
use tracing::{debug, info};

/// 每个承诺日的秒数
pub const SECONDS_PER_DAY: u64 = 86_400;

/// 相邻打卡之间必须超过的最小间隔（秒），严格大于
///
/// 86400 / 3 = 8 小时。这是"每个日历日至少打卡一次"的启发式近似，
/// 容忍时钟偏差与平台延迟，不是严格的每 24 小时一次。
pub const MIN_CHECKIN_GAP_SECS: i64 = (SECONDS_PER_DAY / 3) as i64;

/// 账本中的锁定资金视图
///
/// 审计器只需要读取，真实部署中这是一次链上查询
#[derive(Debug, Clone, Copy)]
pub struct LockedFunds {
    /// 锁定金额
    pub amount: u128,

    /// 承诺时长（秒）
    pub duration_secs: u64,

    /// 锁定时刻（Unix 秒）
    pub locked_at: u64,
}

/// 账本只读视图
#[async_trait]
pub trait LedgerView: Send + Sync {
    /// 查询地址的锁定资金
    async fn locked_funds(&self, owner: &Address) -> Option<LockedFunds>;
}

/// 审计结论
#[derive(Debug, Clone, Copy)]
pub struct AuditVerdict {
    /// 承诺天数
    pub days_committed: u64,

    /// 合格打卡次数
    pub qualifying_checkins: usize,
}

/// 承诺审计器
pub struct CommitmentAuditor {
    ledger: Arc<dyn LedgerView>,
    courier: Arc<dyn CourierApi>,
    community_id: String,
    channel_id: String,
}

impl CommitmentAuditor {
    /// 创建新的审计器
    pub fn new(
        ledger: Arc<dyn LedgerView>,
        courier: Arc<dyn CourierApi>,
        community_id: String,
        channel_id: String,
    ) -> Self {
        Self {
            ledger,
            courier,
            community_id,
            channel_id,
        }
    }

    /// 审计一个钱包地址与平台身份的承诺履行情况
    ///
    /// 平台身份来自已校验的会话声明，由调用方显式传入。
    pub async fn audit(
        &self,
        owner: Address,
        platform_user_id: &str,
    ) -> Result<AuditVerdict, AvsError> {
        let funds = self
            .ledger
            .locked_funds(&owner)
            .await
            .filter(|f| f.amount > 0)
            .ok_or(AvsError::NoCommitment(owner))?;
        let days_committed = funds.duration_secs / SECONDS_PER_DAY;
        debug!(
            "Auditing {} ({} units locked, {} days committed)",
            owner, funds.amount, days_committed
        );

        let channels = self.courier.list_channels(&self.community_id).await?;
        let channel = channels
            .into_iter()
            .find(|c| c.id == self.channel_id)
            .ok_or_else(|| AvsError::ChannelNotFound(self.channel_id.clone()))?;

        let messages = self.courier.list_messages(&channel.id).await?;
        let mut checkins: Vec<i64> = messages
            .iter()
            .filter(|m| m.author.id == platform_user_id)
            .map(|m| m.timestamp.timestamp())
            .collect();
        // 平台返回的顺序不可靠（通常最新在前），升序排序后再验节奏
        checkins.sort_unstable();

        if !cadence_holds(&checkins) {
            return Err(AvsError::CommitmentNotMet(format!(
                "check-in cadence violated for user {platform_user_id}"
            )));
        }

        if (checkins.len() as u64) < days_committed {
            return Err(AvsError::CommitmentNotMet(format!(
                "{} check-ins for {} committed days",
                checkins.len(),
                days_committed
            )));
        }

        info!(
            "Audit passed for {}: {} check-ins over {} committed days",
            owner,
            checkins.len(),
            days_committed
        );
        Ok(AuditVerdict {
            days_committed,
            qualifying_checkins: checkins.len(),
        })
    }
}

/// 打卡节奏是否成立
///
/// 输入必须已按时间升序排序。相邻两次打卡的间隔必须严格大于
/// [`MIN_CHECKIN_GAP_SECS`]；首条打卡天然成立，空列表同理。
fn cadence_holds(sorted_checkins: &[i64]) -> bool {
    sorted_checkins
        .windows(2)
        .all(|pair| pair[1] - pair[0] > MIN_CHECKIN_GAP_SECS)
}
