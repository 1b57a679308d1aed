// ABOUTME: Bounded-concurrency executor for independent remote operations.
// ABOUTME: Results keep their input positions and failures stay per item.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Default number of operations in flight against the store.
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Per-item outcomes, in input order.
pub type BatchResult<R, E> = Vec<Result<R, E>>;

/// Run `op` over `items` with at most `concurrency` invocations outstanding.
///
/// The i-th result belongs to the i-th item whatever order the operations
/// complete in. A failed item never cancels its siblings; every item's
/// outcome is returned. A `concurrency` of zero is treated as one.
pub async fn run_bounded<T, R, E, F, Fut>(
    items: Vec<T>,
    concurrency: usize,
    op: F,
) -> BatchResult<R, E>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let concurrency = concurrency.clamp(1, items.len().max(1));

    stream::iter(items)
        .map(op)
        .buffered(concurrency)
        .collect()
        .await
}

/// Indices and errors of the failed items in a batch.
pub fn failures<R, E>(results: &BatchResult<R, E>) -> impl Iterator<Item = (usize, &E)> {
    results
        .iter()
        .enumerate()
        .filter_map(|(index, result)| result.as_ref().err().map(|e| (index, e)))
}
