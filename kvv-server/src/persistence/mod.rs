//! Best-effort persistence of discovered stops.
//!
//! Every successful stop search hands its stops to a [`StopSink`]. The
//! sink runs on its own task after the response has been produced, and
//! its failures are logged and dropped. With no database configured the
//! [`NoopSink`] is used.

mod error;
mod postgis;

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::StopRecord;

pub use error::PersistenceError;
pub use postgis::{PostgisConfig, PostgisSink};

/// A destination for discovered stops.
pub trait StopSink: Send + Sync {
    /// Upsert `stops`, recording the search text that found them.
    ///
    /// Returns the number of stops written.
    fn upsert<'a>(
        &'a self,
        stops: &'a [StopRecord],
        query: &'a str,
    ) -> BoxFuture<'a, Result<usize, PersistenceError>>;
}

/// Sink used when no store is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StopSink for NoopSink {
    fn upsert<'a>(
        &'a self,
        _stops: &'a [StopRecord],
        _query: &'a str,
    ) -> BoxFuture<'a, Result<usize, PersistenceError>> {
        Box::pin(async { Ok(0) })
    }
}

/// Persist `stops` in the background.
///
/// The returned handle is only useful to tests; callers normally drop it.
pub fn spawn_upsert(
    sink: Arc<dyn StopSink>,
    stops: Vec<StopRecord>,
    query: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if stops.is_empty() {
            return;
        }
        match sink.upsert(&stops, &query).await {
            Ok(written) => debug!(written, query = %query, "persisted stops"),
            Err(e) => warn!(query = %query, "failed to persist stops: {e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<(Vec<String>, String)>>,
    }

    impl StopSink for RecordingSink {
        fn upsert<'a>(
            &'a self,
            stops: &'a [StopRecord],
            query: &'a str,
        ) -> BoxFuture<'a, Result<usize, PersistenceError>> {
            Box::pin(async move {
                let ids = stops.iter().map(|s| s.id.clone()).collect();
                self.calls.lock().unwrap().push((ids, query.to_string()));
                Ok(stops.len())
            })
        }
    }

    struct FailingSink;

    impl StopSink for FailingSink {
        fn upsert<'a>(
            &'a self,
            _stops: &'a [StopRecord],
            _query: &'a str,
        ) -> BoxFuture<'a, Result<usize, PersistenceError>> {
            Box::pin(async { Err(PersistenceError::NotConfigured) })
        }
    }

    fn stop(id: &str) -> StopRecord {
        StopRecord {
            id: id.to_string(),
            name: format!("Stop {id}"),
            city: None,
            mot_codes: vec![4],
            coordinates: Coordinates::new(49.0, 8.4).unwrap(),
            match_quality: None,
            is_best: None,
        }
    }

    #[tokio::test]
    async fn noop_writes_nothing() {
        let written = NoopSink.upsert(&[stop("1")], "Haupt").await.unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn background_upsert_reaches_sink() {
        let sink = Arc::new(RecordingSink::default());
        spawn_upsert(sink.clone(), vec![stop("1"), stop("2")], "Haupt".into())
            .await
            .unwrap();

        let calls = sink.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["1", "2"]);
        assert_eq!(calls[0].1, "Haupt");
    }

    #[tokio::test]
    async fn empty_batches_are_skipped() {
        let sink = Arc::new(RecordingSink::default());
        spawn_upsert(sink.clone(), Vec::new(), "nothing".into())
            .await
            .unwrap();
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let handle = spawn_upsert(Arc::new(FailingSink), vec![stop("1")], "Haupt".into());
        assert!(handle.await.is_ok());
    }
}
