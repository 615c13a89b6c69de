//! HTTP API over a running `Node`.
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/health` | GET | `{status, service, network, contract}` |
//! | `/supply` | GET | `{total_supply, formatted, fetched_at}` |
//! | `/balance/:address` | GET | `{address, balance, formatted}` |
//! | `/owner` | GET | `{owner}` |
//! | `/wallet/connect` | POST | Connect wallet, returns status with balance |
//! | `/wallet/status` | GET | Current binding |
//! | `/transfer` | POST | `{amount, to}` → `{message, success}` |

mod routes;

pub use routes::{create_router, NodeState};

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::runtime::Shutdown;
use crate::Node;

/// Serve until `shutdown` fires.
pub async fn serve(node: Arc<Node>, listener: TcpListener, shutdown: Shutdown) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("wbtc-node listening on http://{}", addr);
    }
    axum::serve(listener, create_router(node))
        .with_graceful_shutdown(async move {
            shutdown.wait().await;
            tracing::info!("Shutdown signal received, stopping server...");
        })
        .await
}
