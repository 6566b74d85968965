//! Rate limiting middleware for AVS
//!
//! 审计是本服务最贵的路径（两次平台调用 + 一次签名），
//! 对 `/withdraw` 施加 IP 级限流，防止单个来源刷爆平台配额。

use axum::body::Body;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// IP 级别限流配置
///
/// - 每秒补充 1 个请求额度
/// - 突发允许 30 个请求
/// - 基于客户端 IP 地址限流
pub fn ip_rate_limiter() -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(30)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("static rate limit config is valid"),
    );

    GovernorLayer::new(governor_conf)
}
