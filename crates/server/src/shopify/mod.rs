//! Shopify Admin REST API client.
//!
//! # Architecture
//!
//! - [`client::ShopifyClient`] issues single authenticated reads against a
//!   store's `/admin/api/{version}/` REST endpoints and surfaces the raw JSON
//!   body plus the response `Link` header. It never retries; retry policy
//!   belongs to callers.
//! - [`pagination`] drains a whole resource collection by following the
//!   `rel="next"` cursor from the `Link` header, bounded by a hard page cap.
//! - [`types`] holds the raw record shapes the platform returns. The same
//!   shapes arrive one-at-a-time in webhook payloads.
//!
//! # Example
//!
//! ```rust,ignore
//! use storepulse_server::shopify::{CollectionFetcher, Resource, ShopifyClient};
//! use storepulse_server::shopify::pagination::fetch_all;
//!
//! let client = ShopifyClient::new(&config.shopify);
//! let fetcher = CollectionFetcher::new(&client, &store.shop_domain, &store.access_token, Resource::Products);
//! let records = fetch_all(&fetcher).await?;
//! ```

pub mod client;
pub mod pagination;
pub mod types;

pub use client::{ApiPage, ShopifyClient};
pub use pagination::{CollectionFetcher, PageFetcher, RemotePage, fetch_all};
pub use types::{
    RemoteCustomer, RemoteCustomerRef, RemoteOrder, RemoteProduct, RemoteVariant, Resource,
    WebhookTopic,
};

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin REST API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Request was rejected locally before any network call.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The platform answered with a non-2xx status.
    #[error("Shopify API error: {status} - {body}")]
    Api {
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body, when one was received.
        body: String,
    },

    /// No response was received (connect, timeout, TLS, ...).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShopifyError::Api {
            status: 429,
            body: "{\"errors\":\"throttled\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Shopify API error: 429 - {\"errors\":\"throttled\"}"
        );

        let err = ShopifyError::Invalid("shop domain must not be empty".to_string());
        assert_eq!(err.to_string(), "invalid request: shop domain must not be empty");
    }
}
