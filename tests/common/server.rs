//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own quota counter and
//! in-memory gateway, listening on a random port.

use std::sync::Arc;

use thumbgrab_server::fetcher::BatchOrchestrator;
use thumbgrab_server::gateway::{HistoryFolderGateway, InMemoryGateway};
use thumbgrab_server::quota::{DailyGuestQuota, GuestQuotaConfig};
use thumbgrab_server::server::server::make_app;
use thumbgrab_server::server::{RequestsLoggingLevel, ServerConfig};

use super::fixtures::StubFetcher;

/// Test server instance with isolated state.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The in-memory gateway, for asserting persisted state directly.
    pub gateway: Arc<InMemoryGateway>,
}

impl TestServer {
    /// Spawns a new test server on a random port with the default guest
    /// quota (10 per day).
    pub async fn spawn() -> Self {
        Self::spawn_with_quota(GuestQuotaConfig::default()).await
    }

    /// Spawns a new test server with a custom guest quota configuration.
    pub async fn spawn_with_quota(quota_config: GuestQuotaConfig) -> Self {
        let gateway = Arc::new(InMemoryGateway::new());
        let orchestrator = Arc::new(BatchOrchestrator::new(Arc::new(StubFetcher::default())));
        let quota = Arc::new(DailyGuestQuota::new(quota_config));

        let app = make_app(
            ServerConfig {
                requests_logging_level: RequestsLoggingLevel::None,
                port: 0,
                frontend_dir_path: None,
            },
            orchestrator,
            quota,
            Some(gateway.clone() as Arc<dyn HistoryFolderGateway>),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server died");
        });

        Self {
            base_url: format!("http://{}", addr),
            gateway,
        }
    }
}
