//! 服务管理器模块 - 负责管理多个服务的生命周期
//!
//! 把各路由服务按前缀合并到一个 axum 应用，统一加全局中间件，
//! 在单个 HTTP 服务器上对外提供，并响应关停广播。

use super::HttpRouterService;
use crate::error::{Error, Result};
use axum::Router;
use pledge_common::BindConfig;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// 服务管理器，负责管理多个服务的生命周期
pub struct ServiceManager {
    services: Vec<Box<dyn HttpRouterService>>,
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
}

impl ServiceManager {
    /// 创建新的服务管理器
    pub fn new(shutdown_tx: tokio::sync::broadcast::Sender<()>) -> Self {
        Self {
            services: Vec::new(),
            shutdown_tx,
        }
    }

    /// 添加服务到管理器
    pub fn add_service(&mut self, service: Box<dyn HttpRouterService>) {
        info!("Adding service '{}' to manager", service.name());
        self.services.push(service);
    }

    /// 启动 HTTP 服务器，合并所有路由服务
    pub async fn start_http(&mut self, bind: &BindConfig) -> Result<JoinHandle<()>> {
        if self.services.is_empty() {
            return Err(Error::startup("no services enabled"));
        }

        info!(
            "Starting HTTP server with {} route services",
            self.services.len()
        );

        let mut app = Router::new();
        for service in &mut self.services {
            let prefix = service.route_prefix().to_string();
            let name = service.name().to_string();
            let router = service
                .build_router()
                .await
                .map_err(|e| Error::startup(format!("failed to build router for '{name}': {e}")))?;

            info!("Adding route '{}' for service '{}'", prefix, name);
            app = app.nest(&prefix, router);
        }

        // 全局中间件：请求追踪 + CORS
        let app = app
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr: SocketAddr = format!("{}:{}", bind.ip, bind.port)
            .parse()
            .map_err(|e| Error::startup(format!("invalid bind address: {e}")))?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("HTTP server listening on {}", addr);

        let shutdown_tx = self.shutdown_tx.clone();
        let handle = tokio::spawn(async move {
            let mut shutdown_rx = shutdown_tx.subscribe();
            let server = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server received shutdown signal");
            });

            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
                let _ = shutdown_tx.send(());
            }
        });

        Ok(handle)
    }
}
