//! Remote catalog access.
//!
//! The [`RemoteGateway`] trait is the seam between the concurrency core and
//! the network. [`HttpGateway`] is the production implementation; tests and
//! embedders can supply their own.

mod http;
mod wire;


pub use http::HttpGateway;

use crate::error::Result;
use crate::types::{Collection, ItemDetail, Thumbnail};
use async_trait::async_trait;

/// Trait for fetching catalog data
///
/// Each call is independent: the orchestrator may issue any number of
/// `fetch_image` calls concurrently. Implementations do not retry or cache.
///
/// `Ok(None)` means the request succeeded but carried nothing usable. That is
/// never an error.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch and decode the item collection at `url`
    ///
    /// # Errors
    /// [`Error::Transport`](crate::Error::Transport) if the request fails,
    /// [`Error::Decode`](crate::Error::Decode) if the payload has the wrong shape.
    async fn fetch_collection(&self, url: &str) -> Result<Option<Collection>>;

    /// Fetch the image at `url` and decode it
    ///
    /// Empty or undecodable bytes yield `Ok(None)`.
    ///
    /// # Errors
    /// [`Error::Transport`](crate::Error::Transport) if the request fails.
    async fn fetch_image(&self, url: &str) -> Result<Option<Thumbnail>>;

    /// Fetch the detail record at `url`
    ///
    /// An empty record list yields `Ok(None)`.
    ///
    /// # Errors
    /// Same as [`fetch_collection`](RemoteGateway::fetch_collection).
    async fn fetch_details(&self, url: &str) -> Result<Option<ItemDetail>>;
}
