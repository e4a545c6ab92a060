//! Raw record shapes returned by the Shopify Admin REST API.
//!
//! These are deliberately tolerant: every field the pipeline does not need is
//! ignored, and fields the platform sometimes omits are `Option`s. The same
//! shapes arrive as single-record webhook payloads.

use serde::Deserialize;

/// A syncable remote resource collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Customers,
    Orders,
}

impl Resource {
    /// REST path of the collection endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "products.json",
            Self::Customers => "customers.json",
            Self::Orders => "orders.json",
        }
    }

    /// Key under which the response body nests the records, also the
    /// lower-case noun used in operator-facing messages.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Orders => "orders",
        }
    }

    /// Capitalized noun for response messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Customers => "Customers",
            Self::Orders => "Orders",
        }
    }

    /// Query parameters the first page of this collection needs. Orders are
    /// fetched with `status=any` so closed and cancelled orders are included.
    #[must_use]
    pub const fn base_query(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Orders => &[("status", "any")],
            Self::Products | Self::Customers => &[],
        }
    }
}

/// A product record with its variants.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    /// Platform-assigned product id.
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variants: Vec<RemoteVariant>,
}

/// A product variant. Only the price is mapped locally.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVariant {
    pub price: Option<String>,
}

/// A customer record.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCustomer {
    /// Platform-assigned customer id.
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// An order record.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    /// Platform-assigned order id.
    pub id: i64,
    /// Decimal amount as string; missing or malformed maps to zero.
    pub total_price: Option<String>,
    pub currency: Option<String>,
    /// Embedded reference to the ordering customer, when the platform knows
    /// one. The referenced customer may not have been synced locally yet.
    pub customer: Option<RemoteCustomerRef>,
}

/// The customer reference embedded in an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCustomerRef {
    pub id: i64,
}

/// Webhook event topic from the `X-Shopify-Topic` header.
///
/// Unrecognized topics are accepted and acknowledged without action so new
/// upstream event types never break delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTopic {
    CustomersCreate,
    OrdersCreate,
    Other,
}

impl WebhookTopic {
    /// Parse a topic header value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "customers/create" => Self::CustomersCreate,
            "orders/create" => Self::OrdersCreate,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths_and_keys() {
        assert_eq!(Resource::Products.path(), "products.json");
        assert_eq!(Resource::Orders.key(), "orders");
        assert_eq!(Resource::Orders.base_query(), &[("status", "any")]);
        assert!(Resource::Customers.base_query().is_empty());
    }

    #[test]
    fn test_topic_parse() {
        assert_eq!(
            WebhookTopic::parse("customers/create"),
            WebhookTopic::CustomersCreate
        );
        assert_eq!(WebhookTopic::parse("orders/create"), WebhookTopic::OrdersCreate);
        assert_eq!(WebhookTopic::parse("products/delete"), WebhookTopic::Other);
        assert_eq!(WebhookTopic::parse(""), WebhookTopic::Other);
    }

    #[test]
    fn test_product_deserializes_from_platform_payload() {
        let record: RemoteProduct = serde_json::from_value(serde_json::json!({
            "id": 632_910_392,
            "title": "IPod Nano - 8GB",
            "vendor": "Apple",
            "variants": [
                {"id": 808_950_810, "price": "199.00", "sku": "IPOD2008PINK"},
                {"id": 49_148_385, "price": "249.00"}
            ]
        }))
        .expect("deserialize product");

        assert_eq!(record.id, 632_910_392);
        assert_eq!(record.title, "IPod Nano - 8GB");
        assert_eq!(record.variants.len(), 2);
        assert_eq!(record.variants[0].price.as_deref(), Some("199.00"));
    }

    #[test]
    fn test_product_tolerates_missing_variants() {
        let record: RemoteProduct =
            serde_json::from_value(serde_json::json!({"id": 1, "title": "Bare"}))
                .expect("deserialize product");
        assert!(record.variants.is_empty());
    }

    #[test]
    fn test_customer_nullable_fields_stay_none() {
        let record: RemoteCustomer = serde_json::from_value(serde_json::json!({
            "id": 207_119_551,
            "email": null,
            "first_name": "Bob"
        }))
        .expect("deserialize customer");
        assert!(record.email.is_none());
        assert_eq!(record.first_name.as_deref(), Some("Bob"));
        assert!(record.last_name.is_none());
    }

    #[test]
    fn test_order_with_embedded_customer() {
        let record: RemoteOrder = serde_json::from_value(serde_json::json!({
            "id": 450_789_469,
            "total_price": "409.94",
            "currency": "EUR",
            "customer": {"id": 207_119_551, "email": "bob@example.com"}
        }))
        .expect("deserialize order");
        assert_eq!(record.total_price.as_deref(), Some("409.94"));
        assert_eq!(record.customer.map(|c| c.id), Some(207_119_551));
    }

    #[test]
    fn test_order_without_customer() {
        let record: RemoteOrder =
            serde_json::from_value(serde_json::json!({"id": 1, "currency": "USD"}))
                .expect("deserialize order");
        assert!(record.customer.is_none());
        assert!(record.total_price.is_none());
    }
}
