//! # catalog-dl
//!
//! Concurrent catalog listing with progressively loaded thumbnails.
//!
//! ## Design Philosophy
//!
//! catalog-dl is designed to be:
//! - **Single-writer** - one coordinator owns the item collection; every
//!   mutation is serialized, readers never see a half-applied update
//! - **Streaming** - thumbnails arrive one at a time, in completion order
//! - **Library-first** - no UI; the presentation layer drives the coordinator
//! - **Event-driven** - consumers register an observer or subscribe to events
//!
//! ## Quick Start
//!
//! ```no_run
//! use catalog_dl::{CollectionCoordinator, Config};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = CollectionCoordinator::new(Config::default())?;
//!
//!     // Fetch the catalog, stored alphabetically
//!     coordinator.populate_collection().await?;
//!
//!     // Stream thumbnails as they finish and apply each one
//!     let mut thumbnails = coordinator.populate_images().await;
//!     while let Some(outcome) = thumbnails.next().await {
//!         if let Some(result) = outcome? {
//!             if let Some(index) = coordinator.apply_thumbnail(result).await {
//!                 println!("row {index} ready");
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Collection ownership and notifications
pub mod coordinator;
/// Error types
pub mod error;
/// Remote catalog access
pub mod gateway;
/// Concurrent thumbnail fan-out
pub mod orchestrator;
/// Core types and events
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, EndpointConfig, FetchConfig, HttpConfig};
pub use coordinator::{CollectionCoordinator, ThumbnailObserver};
pub use error::{Error, Result};
pub use gateway::{HttpGateway, RemoteGateway};
pub use orchestrator::{FetchOrchestrator, ThumbnailOutcome, ThumbnailStream};
pub use types::{Collection, Event, Item, ItemDetail, ItemId, Thumbnail, ThumbnailResult};
