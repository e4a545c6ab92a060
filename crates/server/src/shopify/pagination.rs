//! Cursor-based pagination over Admin REST collections.
//!
//! Shopify paginates collections with an opaque `page_info` cursor carried in
//! the response `Link` header (`rel="next"`). Pages must be fetched strictly
//! sequentially: the cursor for page N+1 is only known after page N's
//! response.
//!
//! Termination is guaranteed three ways:
//! - no `rel="next"` cursor in the `Link` header,
//! - a short page (fewer records than requested), which also covers a
//!   missing or malformed cursor on the last page,
//! - a hard cap of [`MAX_PAGES`] pages against a looping upstream, which
//!   logs a warning instead of failing.
//!
//! Any page-level fetch failure aborts the whole drain with the underlying
//! error; no partial result is returned.

use storepulse_core::AccessToken;

use super::client::ShopifyClient;
use super::types::Resource;
use super::ShopifyError;

/// Maximum records per page (platform ceiling).
pub const MAX_PAGE_SIZE: u32 = 250;

/// Hard upper bound on pages fetched per collection.
pub const MAX_PAGES: u32 = 100;

/// One fetched page: its records plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default)]
pub struct RemotePage {
    pub records: Vec<serde_json::Value>,
    pub next_page_info: Option<String>,
}

/// Source of collection pages.
///
/// The production implementation is [`CollectionFetcher`]; tests drive
/// [`fetch_all`] with scripted fakes.
pub trait PageFetcher {
    /// Fetch one page, optionally positioned at an opaque cursor.
    fn fetch_page(
        &self,
        page_info: Option<&str>,
        limit: u32,
    ) -> impl Future<Output = Result<RemotePage, ShopifyError>> + Send;
}

/// Drain a whole collection into memory, in page order.
///
/// Returns the concatenation of all page records, or an empty collection if
/// the store has none.
///
/// # Errors
///
/// Returns the first page-level fetch error; records from earlier pages are
/// discarded.
pub async fn fetch_all<F: PageFetcher>(fetcher: &F) -> Result<Vec<serde_json::Value>, ShopifyError> {
    let mut records: Vec<serde_json::Value> = Vec::new();
    let mut page_info: Option<String> = None;

    for page_number in 1..=MAX_PAGES {
        let page = fetcher.fetch_page(page_info.as_deref(), MAX_PAGE_SIZE).await?;
        let fetched = page.records.len();
        records.extend(page.records);
        tracing::debug!(
            page = page_number,
            fetched,
            total = records.len(),
            "fetched collection page"
        );

        // A short page means the collection is exhausted even if the
        // upstream still advertises a next cursor.
        if page.next_page_info.is_none() || fetched < MAX_PAGE_SIZE as usize {
            return Ok(records);
        }

        page_info = page.next_page_info;
    }

    tracing::warn!(
        pages = MAX_PAGES,
        total = records.len(),
        "reached page cap; remote collection may hold more records"
    );
    Ok(records)
}

/// Extract the `rel="next"` cursor from a `Link` header.
///
/// Header form:
/// `<https://shop/admin/api/...?page_info=TOKEN&limit=250>; rel="next"`,
/// possibly alongside a `rel="previous"` entry.
#[must_use]
pub fn next_page_info(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        if !part.contains(r#"rel="next""#) {
            continue;
        }
        let Some(rest) = part.split("page_info=").nth(1) else {
            continue;
        };
        let token: String = rest
            .chars()
            .take_while(|c| !matches!(c, '&' | '>'))
            .collect();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// [`PageFetcher`] backed by the real Admin REST client, bound to one store
/// and one resource collection.
#[derive(Debug, Clone, Copy)]
pub struct CollectionFetcher<'a> {
    client: &'a ShopifyClient,
    shop_domain: &'a str,
    access_token: &'a AccessToken,
    resource: Resource,
}

impl<'a> CollectionFetcher<'a> {
    /// Bind the client to one store's collection.
    #[must_use]
    pub const fn new(
        client: &'a ShopifyClient,
        shop_domain: &'a str,
        access_token: &'a AccessToken,
        resource: Resource,
    ) -> Self {
        Self {
            client,
            shop_domain,
            access_token,
            resource,
        }
    }
}

impl PageFetcher for CollectionFetcher<'_> {
    async fn fetch_page(
        &self,
        page_info: Option<&str>,
        limit: u32,
    ) -> Result<RemotePage, ShopifyError> {
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        match page_info {
            // Filter parameters are only valid on the first request; cursor
            // pages carry the filters inside the opaque token.
            None => {
                for &(key, value) in self.resource.base_query() {
                    query.push((key, value.to_string()));
                }
            }
            Some(cursor) => query.push(("page_info", cursor.to_string())),
        }

        let page = self
            .client
            .get(self.shop_domain, self.access_token, self.resource.path(), &query)
            .await?;

        let records = page
            .body
            .get(self.resource.key())
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next = page.link.as_deref().and_then(next_page_info);

        Ok(RemotePage {
            records,
            next_page_info: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Replays a fixed page sequence and records the cursors it was asked for.
    struct ScriptedFetcher {
        pages: Vec<Result<RemotePage, ShopifyError>>,
        calls: AtomicU32,
        seen_cursors: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Result<RemotePage, ShopifyError>>) -> Self {
            Self {
                pages,
                calls: AtomicU32::new(0),
                seen_cursors: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(
            &self,
            page_info: Option<&str>,
            _limit: u32,
        ) -> Result<RemotePage, ShopifyError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            self.seen_cursors
                .lock()
                .expect("cursor log")
                .push(page_info.map(ToString::to_string));
            match self.pages.get(call) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(_)) => Err(ShopifyError::Api {
                    status: 500,
                    body: "scripted failure".to_string(),
                }),
                None => panic!("fetched past the scripted sequence"),
            }
        }
    }

    fn full_page(start: usize, next: &str) -> RemotePage {
        RemotePage {
            records: (start..start + MAX_PAGE_SIZE as usize)
                .map(|n| serde_json::json!({"id": n}))
                .collect(),
            next_page_info: Some(next.to_string()),
        }
    }

    fn short_page(start: usize, len: usize) -> RemotePage {
        RemotePage {
            records: (start..start + len).map(|n| serde_json::json!({"id": n})).collect(),
            next_page_info: None,
        }
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(full_page(0, "cursor-2")),
            Ok(short_page(MAX_PAGE_SIZE as usize, 10)),
        ]);

        let records = fetch_all(&fetcher).await.expect("drain");

        assert_eq!(records.len(), 260);
        assert_eq!(records[0]["id"], 0);
        assert_eq!(records[259]["id"], 259);
        assert_eq!(fetcher.calls(), 2);
        let cursors = fetcher.seen_cursors.lock().expect("cursor log").clone();
        assert_eq!(cursors, vec![None, Some("cursor-2".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_collection_yields_empty_result() {
        let fetcher = ScriptedFetcher::new(vec![Ok(short_page(0, 0))]);
        let records = fetch_all(&fetcher).await.expect("drain");
        assert!(records.is_empty());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_full_page_without_cursor_stops() {
        let mut page = full_page(0, "unused");
        page.next_page_info = None;
        let fetcher = ScriptedFetcher::new(vec![Ok(page)]);

        let records = fetch_all(&fetcher).await.expect("drain");

        assert_eq!(records.len(), MAX_PAGE_SIZE as usize);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_page_with_cursor_stops() {
        let mut page = short_page(0, 3);
        page.next_page_info = Some("bogus".to_string());
        let fetcher = ScriptedFetcher::new(vec![Ok(page)]);

        let records = fetch_all(&fetcher).await.expect("drain");

        assert_eq!(records.len(), 3);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_cap_terminates_looping_upstream() {
        /// Always returns a full page with a next cursor.
        struct LoopingFetcher {
            calls: AtomicU32,
        }

        impl PageFetcher for LoopingFetcher {
            async fn fetch_page(
                &self,
                _page_info: Option<&str>,
                limit: u32,
            ) -> Result<RemotePage, ShopifyError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(RemotePage {
                    records: (0..limit).map(|n| serde_json::json!(n)).collect(),
                    next_page_info: Some("again".to_string()),
                })
            }
        }

        let fetcher = LoopingFetcher {
            calls: AtomicU32::new(0),
        };
        let records = fetch_all(&fetcher).await.expect("drain");

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), MAX_PAGES);
        assert_eq!(records.len(), (MAX_PAGES * MAX_PAGE_SIZE) as usize);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_whole_drain() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(full_page(0, "cursor-2")),
            Err(ShopifyError::Api {
                status: 500,
                body: String::new(),
            }),
        ]);

        let err = fetch_all(&fetcher).await.expect_err("must abort");
        assert!(matches!(err, ShopifyError::Api { status: 500, .. }));
    }

    #[test]
    fn test_next_page_info_parses_next_relation() {
        let link = "<https://acme.myshopify.com/admin/api/2024-10/products.json?page_info=eyJsYXN0X2lkIjo0fQ&limit=250>; rel=\"next\"";
        assert_eq!(next_page_info(link).as_deref(), Some("eyJsYXN0X2lkIjo0fQ"));
    }

    #[test]
    fn test_next_page_info_skips_previous_relation() {
        let link = "<https://acme.myshopify.com/admin/api/2024-10/products.json?page_info=prevtok&limit=250>; rel=\"previous\", <https://acme.myshopify.com/admin/api/2024-10/products.json?page_info=nexttok&limit=250>; rel=\"next\"";
        assert_eq!(next_page_info(link).as_deref(), Some("nexttok"));
    }

    #[test]
    fn test_next_page_info_absent() {
        let link = "<https://acme.myshopify.com/admin/api/2024-10/products.json?page_info=prevtok>; rel=\"previous\"";
        assert_eq!(next_page_info(link), None);
        assert_eq!(next_page_info(""), None);
    }

    #[test]
    fn test_next_page_info_without_token_is_none() {
        let link = "<https://acme.myshopify.com/admin/api/2024-10/products.json>; rel=\"next\"";
        assert_eq!(next_page_info(link), None);
    }
}
