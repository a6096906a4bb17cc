//! Paginated listing driver
//!
//! The platform list endpoints return bounded pages linked by an opaque
//! `start` token carried in a `next_url`. [`Pager`] drives a [`PageFetcher`]
//! through the has-next/get-next protocol until the service stops
//! advertising further pages.

use async_trait::async_trait;

use crate::error::{IbmCloudError, Result};

/// One page of results plus the start token for the page after it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// A source of pages, usually a service client bound to one list endpoint.
///
/// This is the seam for exercising pagination without a live service: tests
/// drive [`Pager`] with scripted in-memory fetchers.
#[async_trait]
pub trait PageFetcher {
    type Item;

    /// Fetch a single page. `start` is `None` for the first page.
    async fn fetch_page(&self, start: Option<&str>) -> Result<Page<Self::Item>>;
}

/// Drives a [`PageFetcher`] to exhaustion.
pub struct Pager<F: PageFetcher> {
    fetcher: F,
    next_start: Option<String>,
    started: bool,
}

impl<F: PageFetcher> Pager<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            next_start: None,
            started: false,
        }
    }

    /// Whether another page can be requested.
    pub fn has_next(&self) -> bool {
        !self.started || self.next_start.is_some()
    }

    /// Fetch the next page of items.
    ///
    /// Calling this on an exhausted pager is an error, not an empty result.
    pub async fn get_next(&mut self) -> Result<Vec<F::Item>> {
        if !self.has_next() {
            return Err(IbmCloudError::PagerExhausted);
        }
        let page = self.fetcher.fetch_page(self.next_start.as_deref()).await?;
        self.started = true;
        self.next_start = page.next;
        Ok(page.items)
    }

    /// Drain every remaining page, preserving service page order.
    pub async fn get_all(&mut self) -> Result<Vec<F::Item>> {
        let mut all = Vec::new();
        while self.has_next() {
            all.extend(self.get_next().await?);
        }
        Ok(all)
    }
}

/// Extract the `start` token from a `next_url` link.
pub(crate) fn start_token(next_url: &str) -> Option<String> {
    let (_, query) = next_url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "start" && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedFetcher {
        pages: Mutex<VecDeque<Page<u32>>>,
        starts: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<Page<u32>>) -> (Self, Arc<Mutex<Vec<Option<String>>>>) {
            let starts = Arc::new(Mutex::new(Vec::new()));
            let fetcher = Self {
                pages: Mutex::new(pages.into()),
                starts: starts.clone(),
            };
            (fetcher, starts)
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        type Item = u32;

        async fn fetch_page(&self, start: Option<&str>) -> Result<Page<u32>> {
            self.starts.lock().unwrap().push(start.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| IbmCloudError::ProtocolViolation("no page scripted".to_string()))
        }
    }

    #[tokio::test]
    async fn test_get_all_concatenates_pages_in_order() {
        let (fetcher, starts) = ScriptedFetcher::new(vec![
            Page {
                items: vec![1, 2],
                next: Some("p2".to_string()),
            },
            Page {
                items: vec![3],
                next: Some("p3".to_string()),
            },
            Page {
                items: vec![4, 5],
                next: None,
            },
        ]);
        let mut pager = Pager::new(fetcher);

        let all = pager.get_all().await.unwrap();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert!(!pager.has_next());

        // Exactly three requests, threading the start tokens through.
        let starts = starts.lock().unwrap();
        assert_eq!(
            *starts,
            vec![None, Some("p2".to_string()), Some("p3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stops_exactly_when_no_next_page() {
        let (fetcher, starts) = ScriptedFetcher::new(vec![Page {
            items: vec![7],
            next: None,
        }]);
        let mut pager = Pager::new(fetcher);

        assert!(pager.has_next());
        assert_eq!(pager.get_next().await.unwrap(), vec![7]);
        assert!(!pager.has_next());
        assert_eq!(starts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_next_past_exhaustion_is_an_error() {
        let (fetcher, _) = ScriptedFetcher::new(vec![Page {
            items: vec![1],
            next: None,
        }]);
        let mut pager = Pager::new(fetcher);

        pager.get_next().await.unwrap();
        let err = pager.get_next().await.unwrap_err();
        assert!(matches!(err, IbmCloudError::PagerExhausted));
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_get_all() {
        // Second fetch has no scripted page and fails; no partial result
        // leaks out.
        let (fetcher, _) = ScriptedFetcher::new(vec![Page {
            items: vec![1, 2],
            next: Some("p2".to_string()),
        }]);
        let mut pager = Pager::new(fetcher);

        let err = pager.get_all().await.unwrap_err();
        assert!(matches!(err, IbmCloudError::ProtocolViolation(_)));
    }

    #[test]
    fn test_start_token_extraction() {
        assert_eq!(
            start_token("/v2/resource_instances?limit=100&start=AG1hcmtlcg"),
            Some("AG1hcmtlcg".to_string())
        );
        assert_eq!(
            start_token("https://resource-controller.cloud.ibm.com/v2/resource_instances?start=abc"),
            Some("abc".to_string())
        );
        assert_eq!(start_token("/v2/resource_instances"), None);
        assert_eq!(start_token("/v2/resource_instances?limit=100"), None);
        assert_eq!(start_token("/v2/resource_instances?start="), None);
    }
}
