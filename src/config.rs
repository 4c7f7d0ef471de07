//! Configuration types for catalog-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote endpoints consumed by the gateway
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Catalog filter endpoint returning the item collection
    #[serde(default = "default_collection_url")]
    pub collection_url: String,

    /// Detail lookup endpoint, keyed by item id through `detail_id_param`
    #[serde(default = "default_detail_url")]
    pub detail_url: String,

    /// Query parameter carrying the item id on detail lookups (default: "i")
    #[serde(default = "default_detail_id_param")]
    pub detail_id_param: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            collection_url: default_collection_url(),
            detail_url: default_detail_url(),
            detail_id_param: default_detail_id_param(),
        }
    }
}

/// HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (None = no timeout)
    ///
    /// A hung request only stalls its own fan-out slot, so the default leaves
    /// requests unbounded.
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout: None,
        }
    }
}

/// Image fan-out and event delivery settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on concurrent image requests (None = one slot per item)
    #[serde(default)]
    pub max_concurrent_images: Option<usize>,

    /// Capacity of the broadcast event channel (default: 256)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_images: None,
            event_capacity: default_event_capacity(),
        }
    }
}

/// Main configuration for [`CollectionCoordinator`](crate::CollectionCoordinator)
///
/// Fields are organized into sub-configs:
/// - [`endpoints`](EndpointConfig) — catalog and detail URLs
/// - [`http`](HttpConfig) — client identity and timeouts
/// - [`fetch`](FetchConfig) — image fan-out width, event buffering
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Remote endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Fan-out and event settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Check that the configuration is usable
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the offending key when an endpoint URL
    /// does not parse or a capacity is zero.
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.endpoints.collection_url, "endpoints.collection_url")?;
        validate_url(&self.endpoints.detail_url, "endpoints.detail_url")?;

        if self.endpoints.detail_id_param.trim().is_empty() {
            return Err(Error::Config {
                message: "detail id parameter must not be empty".to_string(),
                key: Some("endpoints.detail_id_param".to_string()),
            });
        }
        if self.fetch.max_concurrent_images == Some(0) {
            return Err(Error::Config {
                message: "max_concurrent_images must be at least 1".to_string(),
                key: Some("fetch.max_concurrent_images".to_string()),
            });
        }
        if self.fetch.event_capacity == 0 {
            return Err(Error::Config {
                message: "event_capacity must be at least 1".to_string(),
                key: Some("fetch.event_capacity".to_string()),
            });
        }
        Ok(())
    }

    /// Build the detail lookup URL for an item id
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `endpoints.detail_url` is not a valid URL.
    pub fn detail_url_for(&self, id: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.endpoints.detail_url,
            &[(self.endpoints.detail_id_param.as_str(), id)],
        )
        .map_err(|e| Error::Config {
            message: format!("invalid detail url: {}", e),
            key: Some("endpoints.detail_url".to_string()),
        })?;
        Ok(url.into())
    }
}

fn validate_url(value: &str, key: &str) -> Result<()> {
    url::Url::parse(value).map_err(|e| Error::Config {
        message: format!("invalid url '{}': {}", value, e),
        key: Some(key.to_string()),
    })?;
    Ok(())
}

fn default_collection_url() -> String {
    "https://themealdb.com/api/json/v1/1/filter.php?c=Dessert".to_string()
}

fn default_detail_url() -> String {
    "https://themealdb.com/api/json/v1/1/lookup.php".to_string()
}

fn default_detail_id_param() -> String {
    "i".to_string()
}

fn default_user_agent() -> String {
    concat!("catalog-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_event_capacity() -> usize {
    256
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
