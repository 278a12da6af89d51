//! Two-stage statement pipeline
//!
//! Each stage is a FIFO queue, a wake signal, and one task agent draining
//! the queue. Ordering is total within a stage; across stages the only
//! guarantee is that a descriptor is enqueued downstream after its parse
//! completes.

mod analysis;
mod parsing;
mod queue;
mod sink;

pub use analysis::{AnalysisService, ANALYSIS_AGENT_ID};
pub use parsing::{ParsingService, PARSE_AGENT_ID};
pub use queue::WorkQueue;
pub use sink::{OutputChannel, OutputSink};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Shared consumer loop: drain to empty, then park until woken or cancelled
///
/// Cancellation is observed only between drains, never mid-item.
pub(crate) async fn run_consumer<T>(
    queue: Arc<WorkQueue<T>>,
    cancel: CancellationToken,
    mut handle: impl FnMut(T),
) {
    loop {
        while let Some(item) = queue.pop() {
            handle(item);
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = queue.wait() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn test_consumer_drains_backlog_then_parks() {
        let queue = Arc::new(WorkQueue::new());
        let cancel = CancellationToken::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            queue.push(i);
        }
        let consumer = {
            let queue = queue.clone();
            let cancel = cancel.clone();
            let seen = seen.clone();
            tokio::spawn(run_consumer(queue, cancel, move |item| {
                seen.lock().unwrap().push(item);
            }))
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        queue.push(3);
        tokio::time::sleep(Duration::from_millis(50)).await;

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_cancellation_releases_parked_consumer() {
        let queue: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::new());
        let cancel = CancellationToken::new();
        let consumer = tokio::spawn(run_consumer(queue, cancel.clone(), |_| {}));

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
    }
}
