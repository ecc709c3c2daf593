use std::future::Future;

use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

/// Runs requests on the tokio runtime and hands their results back to the
/// UI loop.
///
/// Every request is stamped with the generation current at spawn time.
/// [`Tasks::bump`] starts a new generation; results stamped with an older
/// one are dropped when drained, so a page that was left never sees replies
/// to requests it issued before.
pub(crate) struct Tasks<R> {
    handle: Handle,
    tx: UnboundedSender<(u64, R)>,
    rx: UnboundedReceiver<(u64, R)>,
    generation: u64,
    in_flight: usize,
}

impl<R: Send + 'static> Tasks<R> {
    pub(crate) fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            tx,
            rx,
            generation: 0,
            in_flight: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = R> + Send + 'static,
    {
        let tx = self.tx.clone();
        let generation = self.generation;
        self.in_flight += 1;
        self.handle.spawn(async move {
            let result = future.await;
            // The receiver lives as long as the page; a closed channel means
            // the app is shutting down.
            let _ = tx.send((generation, result));
        });
    }

    /// Results that arrived since the last call, stale ones removed.
    pub(crate) fn drain(&mut self) -> Vec<R> {
        let mut fresh = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            if let Some(result) = self.accept(message) {
                fresh.push(result);
            }
        }
        fresh
    }

    #[cfg(test)]
    /// Waits until every spawned request has reported back.
    pub(crate) async fn settle(&mut self) -> Vec<R> {
        let mut fresh = Vec::new();
        while self.in_flight > 0 {
            let Some(message) = self.rx.recv().await else {
                break;
            };
            if let Some(result) = self.accept(message) {
                fresh.push(result);
            }
        }
        fresh
    }

    fn accept(&mut self, (generation, result): (u64, R)) -> Option<R> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if generation == self.generation {
            Some(result)
        } else {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "dropping result from an earlier generation"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn results_come_back_in_the_ui_loop() {
        let mut tasks = Tasks::new(Handle::current());
        tasks.spawn(async { 7 });
        assert_eq!(tasks.in_flight(), 1);
        assert_eq!(tasks.settle().await, vec![7]);
        assert_eq!(tasks.in_flight(), 0);
    }

    #[tokio::test]
    async fn stale_generation_is_dropped() {
        let mut tasks = Tasks::new(Handle::current());
        tasks.spawn(async { "old" });
        tasks.bump();
        tasks.spawn(async { "new" });
        assert_eq!(tasks.settle().await, vec!["new"]);
        assert_eq!(tasks.generation(), 1);
    }

    #[tokio::test]
    async fn drain_without_results_is_empty() {
        let mut tasks: Tasks<u8> = Tasks::new(Handle::current());
        assert!(tasks.drain().is_empty());
    }
}
