//! reqwest-backed gateway.

use super::{RemoteGateway, wire};
use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::types::{Collection, ItemDetail, Thumbnail};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Gateway performing plain HTTP GETs
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway from HTTP settings
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {}", e),
            key: Some("http".to_string()),
        })?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the body, treating any non-2xx status as a transport failure
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(url, format!("HTTP {}", status.as_u16())));
        }

        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|e| Error::transport(url, e))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_collection(&self, url: &str) -> Result<Option<Collection>> {
        let body = self.get_bytes(url).await?;
        let collection = wire::decode_collection(url, &body)?;
        debug!(
            url = %url,
            count = collection.as_ref().map_or(0, Collection::len),
            "Decoded collection"
        );
        Ok(collection)
    }

    async fn fetch_image(&self, url: &str) -> Result<Option<Thumbnail>> {
        let body = self.get_bytes(url).await?;
        let size = body.len();

        // Decoding is CPU-bound; keep it off the async workers driving sibling fetches.
        let thumbnail = tokio::task::spawn_blocking(move || Thumbnail::decode(&body))
            .await
            .map_err(|e| Error::Other(format!("image decode task failed: {}", e)))?;

        if thumbnail.is_none() {
            warn!(url = %url, bytes = size, "Image body could not be decoded, skipping");
        }
        Ok(thumbnail)
    }

    async fn fetch_details(&self, url: &str) -> Result<Option<ItemDetail>> {
        let body = self.get_bytes(url).await?;
        wire::decode_details(url, &body)
    }
}
