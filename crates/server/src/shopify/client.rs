//! Low-level HTTP access to the Shopify Admin REST API.

use reqwest::header::{HeaderMap, HeaderValue, LINK};
use storepulse_core::AccessToken;

use super::ShopifyError;
use crate::config::ShopifyConfig;

/// Header carrying the per-store access credential.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// One page of a REST response: the parsed body plus the pagination metadata
/// the platform puts in the `Link` response header.
#[derive(Debug, Clone)]
pub struct ApiPage {
    /// Parsed JSON body. Collections live under a resource-named key.
    pub body: serde_json::Value,
    /// Raw `Link` header, when present.
    pub link: Option<String>,
}

/// Client for authenticated reads against a store's Admin REST API.
///
/// The client is store-agnostic: the shop domain and credential are passed
/// per call because one process serves many tenants. It performs exactly one
/// request per call and surfaces failures as typed errors; retrying is a
/// policy decision left to callers.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    http: reqwest::Client,
    api_version: String,
}

impl ShopifyClient {
    /// Create a new Admin REST client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_version: config.api_version.clone(),
        }
    }

    /// Issue one authenticated GET against `https://{shop}/admin/api/{version}/{path}`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Invalid`] if the domain or credential is blank
    ///   (rejected before any network call)
    /// - [`ShopifyError::Api`] for any non-2xx response, carrying the
    ///   upstream status and body
    /// - [`ShopifyError::Network`] when no response was received
    /// - [`ShopifyError::Parse`] when the body is not valid JSON
    pub async fn get(
        &self,
        shop_domain: &str,
        access_token: &AccessToken,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiPage, ShopifyError> {
        if shop_domain.trim().is_empty() {
            return Err(ShopifyError::Invalid(
                "shop domain must not be empty".to_string(),
            ));
        }
        if access_token.is_blank() {
            return Err(ShopifyError::Invalid(
                "access token must not be empty".to_string(),
            ));
        }

        let url = endpoint_url(shop_domain, &self.api_version, path);
        tracing::debug!(%url, "Shopify API request");

        let token_value = HeaderValue::from_str(access_token.expose())
            .map_err(|e| ShopifyError::Invalid(format!("invalid access token: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token_value);

        let response = self
            .http
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await
            .map_err(ShopifyError::Network)?;

        let status = response.status();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %url, "Shopify API error response");
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;

        Ok(ApiPage { body, link })
    }
}

/// Build the versioned Admin REST endpoint URL for a shop.
fn endpoint_url(shop_domain: &str, api_version: &str, path: &str) -> String {
    format!("https://{shop_domain}/admin/api/{api_version}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShopifyClient {
        ShopifyClient::new(&ShopifyConfig {
            api_version: "2024-10".to_string(),
        })
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("acme.myshopify.com", "2024-10", "products.json"),
            "https://acme.myshopify.com/admin/api/2024-10/products.json"
        );
    }

    #[tokio::test]
    async fn test_blank_domain_is_rejected_before_network() {
        let token = AccessToken::new("shpat_x".to_string());
        let err = client()
            .get("  ", &token, "products.json", &[])
            .await
            .expect_err("blank domain must fail");
        assert!(matches!(err, ShopifyError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected_before_network() {
        let token = AccessToken::new(String::new());
        let err = client()
            .get("acme.myshopify.com", &token, "products.json", &[])
            .await
            .expect_err("blank token must fail");
        assert!(matches!(err, ShopifyError::Invalid(_)));
    }
}
