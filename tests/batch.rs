// ABOUTME: Integration tests for the bounded-concurrency batch executor.
// ABOUTME: Checks the in-flight ceiling, result ordering, and failure isolation.

use assetship::batch::*;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Run `n` sleeping operations and report the most seen in flight at once.
async fn peak_in_flight(n: usize, concurrency: usize) -> usize {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let results = run_bounded((0..n).collect(), concurrency, |i| {
        let active = Arc::clone(&active);
        let peak = Arc::clone(&peak);
        async move {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1 + (i * 7 % 5) as u64)).await;
            active.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, ()>(i)
        }
    })
    .await;

    assert_eq!(results.len(), n);
    peak.load(Ordering::SeqCst)
}

mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn never_exceeds_the_limit() {
        assert_eq!(peak_in_flight(100, 10).await, 10);
    }

    #[tokio::test]
    async fn limit_larger_than_batch_runs_everything_at_once() {
        assert_eq!(peak_in_flight(4, 50).await, 4);
    }

    #[tokio::test]
    async fn zero_limit_runs_one_at_a_time() {
        assert_eq!(peak_in_flight(5, 0).await, 1);
    }

    #[tokio::test]
    async fn empty_batch_returns_no_results() {
        let results: BatchResult<(), ()> =
            run_bounded(Vec::<u32>::new(), 3, |_| async { Ok(()) }).await;
        assert!(results.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn peak_is_min_of_limit_and_batch_size(n in 1usize..40, concurrency in 1usize..12) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let peak = runtime.block_on(peak_in_flight(n, concurrency));
            prop_assert_eq!(peak, n.min(concurrency));
        }
    }
}

mod ordering_tests {
    use super::*;

    #[tokio::test]
    async fn results_follow_input_order_despite_completion_order() {
        let results = run_bounded((1..=10).collect(), 4, |x: u64| async move {
            // Earlier items finish later.
            tokio::time::sleep(Duration::from_millis(20 - 2 * x)).await;
            Ok::<_, String>(x + 1)
        })
        .await;

        let values: Vec<u64> = results.into_iter().map(Result::unwrap).collect();
        assert_eq!(values, (2..=11).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn failures_stay_in_place_and_do_not_cancel_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));

        let results = run_bounded((0..6).collect(), 2, |i: usize| {
            let completed = Arc::clone(&completed);
            async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                if i % 3 == 0 {
                    Err(format!("item {i} failed"))
                } else {
                    Ok(i)
                }
            }
        })
        .await;

        assert_eq!(completed.load(Ordering::SeqCst), 6);
        let failed: Vec<(usize, &String)> = failures(&results).collect();
        assert_eq!(
            failed,
            vec![(0, &"item 0 failed".to_string()), (3, &"item 3 failed".to_string())]
        );
        assert_eq!(results[4], Ok(4));
    }
}
