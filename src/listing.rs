// ABOUTME: Materializes a continuation-token paged listing into one inventory.
// ABOUTME: Caps the number of pages so a runaway listing cannot loop forever.

use crate::store::{ContinuationToken, ListPage, StorageEntry};
use std::future::Future;
use thiserror::Error;

/// Default cap on listing pages fetched during cleanup.
pub const DEFAULT_MAX_PAGES: usize = 50;

#[derive(Debug, Error)]
pub enum ListingError<E> {
    #[error("failed to load page {page} of '{prefix}': {source}")]
    Page {
        prefix: String,
        page: usize,
        #[source]
        source: E,
    },

    #[error("listing exceeded {limit} pages")]
    TooManyPages { limit: usize },
}

/// Walks a paged listing until no continuation token remains.
#[derive(Debug, Clone, Copy)]
pub struct PaginatedLister {
    max_pages: usize,
}

impl PaginatedLister {
    /// A lister that fails once more than `max_pages` pages would be needed.
    /// Zero is treated as one.
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Fetch every page under `prefix`, concatenating entries in page order.
    ///
    /// A failed page fails the whole listing; a partial inventory is never
    /// returned.
    pub async fn list_all<F, Fut, E>(
        &self,
        prefix: &str,
        mut fetch_page: F,
    ) -> Result<Vec<StorageEntry>, ListingError<E>>
    where
        F: FnMut(Option<ContinuationToken>) -> Fut,
        Fut: Future<Output = Result<ListPage, E>>,
    {
        let mut entries = Vec::new();
        let mut token: Option<ContinuationToken> = None;
        let mut page = 0;

        loop {
            if page == self.max_pages {
                return Err(ListingError::TooManyPages {
                    limit: self.max_pages,
                });
            }
            page += 1;

            tracing::debug!("loading page {page} of existing files");
            let ListPage {
                entries: page_entries,
                next_token,
            } = fetch_page(token.take())
                .await
                .map_err(|source| ListingError::Page {
                    prefix: prefix.to_string(),
                    page,
                    source,
                })?;

            entries.extend(page_entries);

            match next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        tracing::debug!("loaded {page} pages");
        Ok(entries)
    }
}

impl Default for PaginatedLister {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}
