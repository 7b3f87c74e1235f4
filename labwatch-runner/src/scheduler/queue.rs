//! Result queue
//!
//! Unbounded FIFO between the job runners and the reporter. Results appear
//! in completion order. The receiving half owns a countdown initialised to
//! the number of expected results; once every expected result has been
//! acknowledged with [`ResultReceiver::task_done`], `recv` stops yielding.

use anyhow::{Result, anyhow};
use labwatch_core::domain::result::ScanResult;
use tokio::sync::mpsc;

/// Creates a queue expecting `expected` results
pub fn result_queue(expected: usize) -> (ResultQueue, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ResultQueue { tx },
        ResultReceiver {
            rx,
            remaining: expected,
            processed: 0,
        },
    )
}

/// Producer half, cloned into every job runner
#[derive(Debug, Clone)]
pub struct ResultQueue {
    tx: mpsc::UnboundedSender<ScanResult>,
}

impl ResultQueue {
    /// Hands a finished result over to the consumer
    ///
    /// Fails only when the receiving half is gone.
    pub fn push(&self, result: ScanResult) -> Result<()> {
        self.tx
            .send(result)
            .map_err(|e| anyhow!("result queue closed, dropping result for {}", e.0.host))
    }
}

/// Consumer half, owned by the reporter
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::UnboundedReceiver<ScanResult>,
    remaining: usize,
    processed: usize,
}

impl ResultReceiver {
    /// Waits for the next result
    ///
    /// Returns `None` once the countdown reached zero, or when every producer
    /// has been dropped and the queue is drained.
    pub async fn recv(&mut self) -> Option<ScanResult> {
        if self.remaining == 0 {
            return None;
        }

        self.rx.recv().await
    }

    /// Acknowledges one processed result
    pub fn task_done(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        self.processed += 1;
    }

    /// Results still expected
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Results acknowledged so far
    pub fn processed(&self) -> usize {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_in_push_order() {
        let (queue, mut receiver) = result_queue(2);
        let other = queue.clone();

        other.push(ScanResult::new("second-submitted.example")).unwrap();
        queue.push(ScanResult::new("first-submitted.example")).unwrap();

        assert_eq!(
            receiver.recv().await.unwrap().host,
            "second-submitted.example"
        );
        receiver.task_done();
        assert_eq!(receiver.recv().await.unwrap().host, "first-submitted.example");
        receiver.task_done();
    }

    #[tokio::test]
    async fn test_stops_after_countdown() {
        let (queue, mut receiver) = result_queue(1);
        queue.push(ScanResult::new("a.example")).unwrap();
        queue.push(ScanResult::new("b.example")).unwrap();

        assert!(receiver.recv().await.is_some());
        receiver.task_done();

        assert_eq!(receiver.remaining(), 0);
        assert_eq!(receiver.processed(), 1);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_recv_ends_when_producers_gone() {
        let (queue, mut receiver) = result_queue(3);
        queue.push(ScanResult::new("a.example")).unwrap();
        drop(queue);

        assert!(receiver.recv().await.is_some());
        receiver.task_done();
        assert!(receiver.recv().await.is_none());
        assert_eq!(receiver.remaining(), 2);
    }

    #[tokio::test]
    async fn test_push_fails_without_receiver() {
        let (queue, receiver) = result_queue(1);
        drop(receiver);

        let err = queue.push(ScanResult::new("a.example")).unwrap_err();
        assert!(err.to_string().contains("a.example"));
    }

    #[tokio::test]
    async fn test_recv_waits_for_producer() {
        let (queue, mut receiver) = result_queue(1);

        let producer = tokio::spawn(async move {
            tokio::task::yield_now().await;
            queue.push(ScanResult::new("late.example")).unwrap();
        });

        assert_eq!(receiver.recv().await.unwrap().host, "late.example");
        producer.await.unwrap();
    }
}
