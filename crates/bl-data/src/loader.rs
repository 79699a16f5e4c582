//! Async dataset loading with a stale-result guard
//!
//! Exactly one load matters at a time: the most recently requested one.
//! Every request gets a monotonically increasing ticket; a finished load
//! hands its result back with that ticket, and anything that is not the
//! latest ticket is dropped. Cancellation is "ignore late", never "abort
//! in flight".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use bl_core::data::{DataSource, Dataset};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Result of a finished load, ready to be applied on the UI thread.
pub struct LoadOutcome {
    pub source_name: String,
    pub result: anyhow::Result<Dataset>,
}

/// Coordinates in-flight dataset loads.
pub struct DatasetLoader {
    latest: AtomicU64,
    delivered: AtomicU64,
    ready: Mutex<Option<(u64, LoadOutcome)>>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            ready: Mutex::new(None),
        }
    }

    /// Register a new load request, superseding all earlier ones.
    pub fn begin(&self) -> LoadTicket {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        // A pending result from an older request is stale by definition.
        self.ready.lock().take();
        LoadTicket(ticket)
    }

    /// Hand back a finished load. Dropped unless `ticket` is still the
    /// latest request.
    pub fn deliver(&self, ticket: LoadTicket, outcome: LoadOutcome) {
        self.delivered.fetch_max(ticket.0, Ordering::SeqCst);
        if ticket.0 == self.latest.load(Ordering::SeqCst) {
            *self.ready.lock() = Some((ticket.0, outcome));
        } else {
            tracing::debug!(
                source = %outcome.source_name,
                "discarding superseded dataset load"
            );
        }
    }

    /// Take the result of the latest request, if it has arrived.
    pub fn take_ready(&self) -> Option<LoadOutcome> {
        let mut slot = self.ready.lock();
        match slot.take() {
            Some((ticket, outcome)) if ticket == self.latest.load(Ordering::SeqCst) => {
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Whether the latest request has not finished yet.
    pub fn in_flight(&self) -> bool {
        self.delivered.load(Ordering::SeqCst) < self.latest.load(Ordering::SeqCst)
    }

    /// Begin a request and spawn the load onto the runtime. The result is
    /// picked up later via [`take_ready`](Self::take_ready).
    pub fn spawn(
        self: &Arc<Self>,
        handle: &tokio::runtime::Handle,
        source: Arc<dyn DataSource>,
    ) -> LoadTicket {
        let ticket = self.begin();
        let loader = Arc::clone(self);
        handle.spawn(async move {
            let source_name = source.source_name().to_string();
            let result = source.load().await;
            loader.deliver(
                ticket,
                LoadOutcome {
                    source_name,
                    result,
                },
            );
        });
        ticket
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::data::Record;
    use std::time::Duration;

    fn dataset(tag: &str) -> Dataset {
        Dataset::new(
            vec!["tag".into()],
            vec![Record::new(vec![tag.to_string()])],
        )
    }

    fn outcome(tag: &str) -> LoadOutcome {
        LoadOutcome {
            source_name: tag.to_string(),
            result: Ok(dataset(tag)),
        }
    }

    #[test]
    fn stale_result_arriving_first_is_ignored() {
        let loader = DatasetLoader::new();
        let a = loader.begin();
        let b = loader.begin();

        loader.deliver(a, outcome("a"));
        assert!(loader.take_ready().is_none());

        loader.deliver(b, outcome("b"));
        let ready = loader.take_ready().expect("latest result kept");
        assert_eq!(ready.source_name, "b");
    }

    #[test]
    fn stale_result_arriving_last_is_ignored() {
        let loader = DatasetLoader::new();
        let a = loader.begin();
        let b = loader.begin();

        loader.deliver(b, outcome("b"));
        loader.deliver(a, outcome("a"));

        let ready = loader.take_ready().expect("latest result kept");
        assert_eq!(ready.source_name, "b");
        assert!(loader.take_ready().is_none());
    }

    #[test]
    fn new_request_clears_a_pending_result() {
        let loader = DatasetLoader::new();
        let a = loader.begin();
        loader.deliver(a, outcome("a"));

        let _b = loader.begin();
        assert!(loader.take_ready().is_none());
        assert!(loader.in_flight());
    }

    #[test]
    fn in_flight_tracks_latest_request() {
        let loader = DatasetLoader::new();
        assert!(!loader.in_flight());

        let a = loader.begin();
        assert!(loader.in_flight());

        loader.deliver(a, outcome("a"));
        assert!(!loader.in_flight());
    }

    struct SlowSource {
        name: String,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl DataSource for SlowSource {
        async fn load(&self) -> anyhow::Result<Dataset> {
            tokio::time::sleep(self.delay).await;
            Ok(dataset(&self.name))
        }

        fn source_name(&self) -> &str {
            &self.name
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn spawned_loads_resolve_to_the_latest_request_only() {
        let loader = Arc::new(DatasetLoader::new());
        let handle = tokio::runtime::Handle::current();

        // A is slower than B, so it resolves after B despite being
        // requested first.
        loader.spawn(
            &handle,
            Arc::new(SlowSource {
                name: "a".into(),
                delay: Duration::from_millis(80),
            }),
        );
        loader.spawn(
            &handle,
            Arc::new(SlowSource {
                name: "b".into(),
                delay: Duration::from_millis(10),
            }),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;

        let ready = loader.take_ready().expect("latest load arrived");
        assert_eq!(ready.source_name, "b");
        assert!(loader.take_ready().is_none());
    }
}
