use std::sync::Arc;
use std::time::Instant;

use crate::fetcher::BatchOrchestrator;
use crate::gateway::HistoryFolderGateway;
use crate::quota::GuestQuota;

use super::ServerConfig;

pub type SharedOrchestrator = Arc<BatchOrchestrator>;
pub type SharedQuota = Arc<dyn GuestQuota>;
pub type OptionalGateway = Option<Arc<dyn HistoryFolderGateway>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub orchestrator: SharedOrchestrator,
    pub quota: SharedQuota,
    pub gateway: OptionalGateway,
}
