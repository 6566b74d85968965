//! 服务管理模块
//!
//! 管理各个 HTTP 路由服务的组装与生命周期
//!
//! ## 核心概念
//!
//! - `HttpRouterService`: HTTP 路由服务的核心 trait，提供 axum 路由器
//! - `ServiceManager`: 服务管理器，把多个路由服务合并到一个 HTTP 服务器
//! - `LedgerBridge`: 进程内账本到 AVS 账本视图的桥接

mod bridge;
pub mod manager;

pub use bridge::LedgerBridge;
pub use manager::ServiceManager;

use anyhow::Result;
use async_trait::async_trait;
use avs::LedgerView;
use axum::Router;
use ledger::{LedgerState, create_ledger_router};
use pledge_common::{AvsConfig, DeploymentConfig, Secrets};
use std::sync::Arc;
use tracing::info;

/// HTTP路由服务的核心 trait - 为 axum 提供路由器
#[async_trait]
pub trait HttpRouterService: Send + Sync {
    /// 服务名称
    fn name(&self) -> &str;

    /// 路由前缀（如 "/ledger", "/avs"）
    fn route_prefix(&self) -> &str;

    /// 构建 axum 路由器
    async fn build_router(&mut self) -> Result<Router>;
}

/// 账本 HTTP 服务实现
pub struct LedgerService {
    state: LedgerState,
}

impl LedgerService {
    pub fn new(state: LedgerState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl HttpRouterService for LedgerService {
    fn name(&self) -> &str {
        "Ledger Service"
    }

    fn route_prefix(&self) -> &str {
        "/ledger"
    }

    async fn build_router(&mut self) -> Result<Router> {
        info!("Building ledger router");
        Ok(create_ledger_router(self.state.clone()))
    }
}

/// AVS HTTP 服务实现
pub struct AvsService {
    config: AvsConfig,
    deployment: DeploymentConfig,
    secrets: Secrets,
    ledger: Arc<dyn LedgerView>,
}

impl AvsService {
    pub fn new(
        config: AvsConfig,
        deployment: DeploymentConfig,
        secrets: Secrets,
        ledger: Arc<dyn LedgerView>,
    ) -> Self {
        Self {
            config,
            deployment,
            secrets,
            ledger,
        }
    }
}

#[async_trait]
impl HttpRouterService for AvsService {
    fn name(&self) -> &str {
        "AVS"
    }

    fn route_prefix(&self) -> &str {
        "/avs"
    }

    async fn build_router(&mut self) -> Result<Router> {
        info!("Building AVS router");
        avs::create_avs_router(
            &self.config,
            &self.deployment,
            &self.secrets,
            self.ledger.clone(),
        )
    }
}
