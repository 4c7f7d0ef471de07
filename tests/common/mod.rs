//! Common test utilities for catalog-dl integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use catalog_dl::{CollectionCoordinator, Config};
use wiremock::MockServer;

/// Config whose endpoints point at the mock server
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.endpoints.collection_url = format!("{}/api/filter.php?c=Dessert", server.uri());
    config.endpoints.detail_url = format!("{}/api/lookup.php", server.uri());
    config
}

/// HTTP-backed coordinator talking to the mock server
pub fn mock_coordinator(server: &MockServer) -> CollectionCoordinator {
    CollectionCoordinator::new(mock_config(server)).expect("Failed to create coordinator")
}
