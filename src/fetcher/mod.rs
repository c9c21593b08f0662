//! Thumbnail retrieval: the network seam and the batch orchestrator.

mod client;
mod models;
mod orchestrator;

pub use client::CdnFetcher;
pub use models::{BatchResolveReport, FetchError, FetchedImage, ThumbnailFetcher};
pub use orchestrator::{
    BatchOrchestrator, DOWNLOAD_BATCH_SIZE, DOWNLOAD_FALLBACK_CHAIN, PLACEHOLDER_TITLE,
};
