//! Stub Device Server
//!
//! 模拟设备的 Axum HTTP 服务器，用于联调与测试

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::create_routes;
use super::state::{DeviceState, StubDeviceConfig, StubState};

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 构建 Router
fn build_router(state: Arc<StubState>) -> Router {
    create_routes(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 桩设备 HTTP 服务器
pub struct StubDeviceServer {
    config: ServerConfig,
    state: Arc<StubState>,
}

impl StubDeviceServer {
    pub fn new(config: ServerConfig, stub: StubDeviceConfig) -> Self {
        Self {
            config,
            state: StubState::new(stub).arc(),
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state.clone());
        let addr = self.config.addr();

        info!("Starting stub device on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

/// 后台运行中的桩设备
pub struct StubDeviceHandle {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubDeviceHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// 设备当前状态
    pub fn state(&self) -> DeviceState {
        self.state.snapshot()
    }
}

/// 在 127.0.0.1 的随机端口上后台启动桩设备
pub async fn spawn_stub_device(config: StubDeviceConfig) -> Result<StubDeviceHandle, std::io::Error> {
    let state = StubState::new(config).arc();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = build_router(state.clone());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Stub device stopped");
        }
    });

    info!(addr = %addr, "Stub device spawned");
    Ok(StubDeviceHandle { addr, state })
}
