// ABOUTME: Integration tests for materializing paged listings.
// ABOUTME: Covers token chaining, page caps, page failures, and the in-memory backend.

mod support;

use assetship::listing::*;
use assetship::store::{BlobStore, ContinuationToken, ListPage, StorageEntry};
use std::collections::VecDeque;
use support::TestStore;

fn page(names: &[&str], next: Option<&str>) -> ListPage {
    ListPage {
        entries: names.iter().map(|n| StorageEntry::new(*n, 1)).collect(),
        next_token: next.map(ContinuationToken::new),
    }
}

mod token_tests {
    use super::*;

    #[tokio::test]
    async fn concatenates_pages_and_passes_tokens_through() {
        let mut pages = VecDeque::from([
            page(&["a/1", "a/2"], Some("t1")),
            page(&["b/1", "b/2"], Some("t2")),
            page(&["c/1", "c/2"], None),
        ]);
        let mut seen_tokens = Vec::new();

        let entries = PaginatedLister::new(10)
            .list_all("", |token| {
                seen_tokens.push(token.map(|t| t.as_str().to_string()));
                let next = pages.pop_front();
                async move { next.ok_or("no more pages") }
            })
            .await
            .unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a/1", "a/2", "b/1", "b/2", "c/1", "c/2"]);
        assert_eq!(
            seen_tokens,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn single_page_without_token_stops_after_one_call() {
        let mut calls = 0;
        let entries = PaginatedLister::default()
            .list_all("", |_| {
                calls += 1;
                async { Ok::<_, String>(page(&["index.html"], None)) }
            })
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn empty_container_lists_nothing() {
        let entries = PaginatedLister::default()
            .list_all("", |_| async { Ok::<_, String>(ListPage::default()) })
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn listing_that_never_ends_hits_the_page_cap() {
        let mut calls = 0;
        let err = PaginatedLister::new(3)
            .list_all("", |_| {
                calls += 1;
                async { Ok::<_, String>(page(&["x/1"], Some("again"))) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ListingError::TooManyPages { limit: 3 }));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn listing_needing_exactly_the_cap_succeeds() {
        let mut pages = VecDeque::from([page(&["a/1"], Some("t1")), page(&["b/1"], None)]);
        let entries = PaginatedLister::new(2)
            .list_all("", |_| {
                let next = pages.pop_front();
                async move { next.ok_or("no more pages") }
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn failed_page_fails_the_whole_listing() {
        let mut calls = 0;
        let err = PaginatedLister::new(10)
            .list_all("site", |token| {
                calls += 1;
                let result = match token {
                    None => Ok(page(&["a/1"], Some("t1"))),
                    Some(_) => Err("throttled"),
                };
                async move { result }
            })
            .await
            .unwrap_err();

        match err {
            ListingError::Page {
                prefix,
                page,
                source,
            } => {
                assert_eq!(prefix, "site");
                assert_eq!(page, 2);
                assert_eq!(source, "throttled");
            }
            other => panic!("expected a page failure, got {other:?}"),
        }
        assert_eq!(calls, 2);
    }
}

mod backend_tests {
    use super::*;

    #[tokio::test]
    async fn pages_through_every_stored_object() {
        let store = TestStore::with_page_size(2);
        for name in ["1.0.0/a", "1.0.0/b", "1.0.1/a", "1.0.1/b", "1.0.2/a"] {
            store.seed(name, 3).await;
        }

        let entries = PaginatedLister::new(10)
            .list_all("", |token| {
                let store = &store;
                async move { store.list_page("", token.as_ref()).await }
            })
            .await
            .unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["1.0.0/a", "1.0.0/b", "1.0.1/a", "1.0.1/b", "1.0.2/a"]
        );
        assert!(entries.iter().all(|e| e.content_length == 3));
        assert_eq!(
            store.calls_for(assetship::store::Operation::List),
            vec!["", "1.0.0/b", "1.0.1/b"]
        );
    }
}
