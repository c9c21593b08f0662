//! Boundary to the external persistence service.
//!
//! History entries, folders and uploaded thumbnails live in a remote
//! user/auth/storage service; the core only ever talks to it through the
//! [`HistoryFolderGateway`] trait so the backing store can be swapped
//! without touching batch or packaging logic.

mod http_gateway;
mod memory;
mod models;
mod trait_def;

pub use http_gateway::HttpGateway;
pub use memory::InMemoryGateway;
pub use models::{
    AddVideoOutcome, Folder, FolderVideo, GatewayError, HistoryEntry, HistoryWindow, NewFolder,
    NewFolderVideo, NewHistoryEntry,
};
pub use trait_def::{thumbnail_storage_path, HistoryFolderGateway};
