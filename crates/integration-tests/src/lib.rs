//! Integration tests for StorePulse.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p storepulse-cli -- migrate
//!
//! # Start the server
//! cargo run -p storepulse-server
//!
//! # Run integration tests
//! cargo test -p storepulse-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `sync_pipeline` - Store connection, bulk sync, ledger, metrics
//! - `webhooks` - Push-path ingestion
//!
//! Most tests require a running server, a migrated database, and a real
//! connected Shopify store, so they are `#[ignore]`d by default.

/// Base URL for the server (configurable via environment).
#[must_use]
pub fn server_base_url() -> String {
    std::env::var("SERVER_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Shop domain of the test store (set `TEST_SHOP_DOMAIN` to override).
#[must_use]
pub fn test_shop_domain() -> String {
    std::env::var("TEST_SHOP_DOMAIN").unwrap_or_else(|_| "test-store.myshopify.com".to_string())
}

/// Access token for the test store.
#[must_use]
pub fn test_access_token() -> String {
    std::env::var("TEST_ACCESS_TOKEN").unwrap_or_default()
}
