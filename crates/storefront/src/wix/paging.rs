//! Cursor paging loops.

use std::future::Future;

use tracing::warn;

use super::WixError;
use super::types::{CursorQuery, PagingMetadata};

/// Hard cap on pages fetched by one loop.
pub const MAX_PAGES: usize = 1000;

/// Items collected across pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<T> {
    pub items: Vec<T>,
    /// Number of pages requested.
    pub pages: usize,
    /// Whether the loop stopped at the page cap with more pages left.
    pub truncated: bool,
}

/// Fetch every page of `first` until Wix reports no next page.
///
/// # Errors
///
/// Returns the first page error; items from earlier pages are discarded.
pub async fn collect_all<T, F, Fut>(first: CursorQuery, fetch: F) -> Result<Collected<T>, WixError>
where
    F: FnMut(CursorQuery) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, PagingMetadata), WixError>>,
{
    collect_all_capped(first, MAX_PAGES, fetch).await
}

/// [`collect_all`] with an explicit page cap.
///
/// # Errors
///
/// Returns the first page error.
pub async fn collect_all_capped<T, F, Fut>(
    first: CursorQuery,
    max_pages: usize,
    mut fetch: F,
) -> Result<Collected<T>, WixError>
where
    F: FnMut(CursorQuery) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, PagingMetadata), WixError>>,
{
    let mut items = Vec::new();
    let mut pages = 0;
    let mut query = first.clone();

    loop {
        let (page, meta) = fetch(query).await?;
        pages += 1;
        items.extend(page);

        let Some(cursor) = meta.next_cursor() else {
            return Ok(Collected {
                items,
                pages,
                truncated: false,
            });
        };

        if pages >= max_pages {
            warn!(pages, "Reached page cap, returning partial results");
            return Ok(Collected {
                items,
                pages,
                truncated: true,
            });
        }

        query = first.next_page(cursor);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::wix::types::Cursors;

    fn meta(next: Option<&str>, has_next: Option<bool>) -> PagingMetadata {
        PagingMetadata {
            count: None,
            cursors: Some(Cursors {
                next: next.map(str::to_string),
                prev: None,
            }),
            has_next,
        }
    }

    #[tokio::test]
    async fn test_collects_until_no_cursor() {
        let mut seen = Vec::new();
        let result = collect_all(CursorQuery::with_limit(2), |q| {
            let cursor = q.cursor_paging.and_then(|p| p.cursor);
            seen.push(cursor.clone());
            async move {
                match cursor.as_deref() {
                    None => Ok((vec![1, 2], meta(Some("c2"), Some(true)))),
                    Some("c2") => Ok((vec![3], meta(None, Some(false)))),
                    Some(other) => panic!("unexpected cursor {other}"),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3]);
        assert_eq!(result.pages, 2);
        assert!(!result.truncated);
        assert_eq!(seen, vec![None, Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn test_stops_at_cap() {
        let result = collect_all_capped(CursorQuery::with_limit(1), 3, |_| async {
            Ok((vec!["x"], meta(Some("again"), Some(true))))
        })
        .await
        .unwrap();

        assert_eq!(result.pages, 3);
        assert_eq!(result.items.len(), 3);
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let result: Result<Collected<u8>, _> =
            collect_all(CursorQuery::default(), |_| async {
                Err(WixError::NotFound("page".to_string()))
            })
            .await;
        assert!(result.unwrap_err().is_not_found());
    }
}
