//! Webhook ingestion route handler (push path).
//!
//! State-free single-event handling: the shop is resolved from a header, the
//! body is one raw remote record, and the record flows through the same
//! reconciliation functions as bulk sync. Webhook transports deliver
//! duplicates; the upsert key makes replays harmless, so no deduplication
//! happens here.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use tracing::instrument;

use crate::error::AppError;
use crate::shopify::WebhookTopic;
use crate::state::AppState;
use crate::sync::WebhookOutcome;

/// Header identifying the shop the event belongs to.
const SHOP_DOMAIN_HEADER: &str = "X-Shopify-Shop-Domain";

/// Header identifying the event topic.
const TOPIC_HEADER: &str = "X-Shopify-Topic";

/// Handle one Shopify webhook delivery.
///
/// Unrecognized topics are acknowledged without action so the platform does
/// not retry or disable the subscription.
#[instrument(skip_all)]
pub async fn shopify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<&'static str, AppError> {
    let Some(shop_domain) = headers
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return Err(AppError::BadRequest(
            "Webhook is missing the shop domain header.".to_string(),
        ));
    };

    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or(WebhookTopic::Other, WebhookTopic::parse);

    tracing::info!(shop = shop_domain, ?topic, "webhook received");

    match state
        .sync()
        .ingest_webhook(shop_domain, topic, payload)
        .await?
    {
        WebhookOutcome::Processed(entity) => {
            tracing::debug!(%entity, "webhook record reconciled");
        }
        WebhookOutcome::Ignored => {
            tracing::debug!("webhook topic ignored");
        }
    }

    Ok("Webhook received successfully.")
}
