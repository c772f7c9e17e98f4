//! Vyz Device Stub - 在没有真实设备时提供同样的 HTTP API

use vyz::config::{init_logging, load_config};
use vyz::infrastructure::http::{ServerConfig, StubDeviceConfig, StubDeviceServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config.log, "vyz");

    let server = StubDeviceServer::new(
        ServerConfig::new(config.stub.host.clone(), config.stub.port),
        StubDeviceConfig {
            latency_ms: config.stub.latency_ms,
            reject_status: None,
        },
    );

    server
        .run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
