//! Ingest loop
//!
//! Reads dispatch frames, one JSON object per line, and hands each decoded
//! event to the handler on its own task. At most [`MAX_IN_FLIGHT_EVENTS`]
//! events are handled at once; reading pauses while the limit is reached.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use crate::events::decode_frame;
use crate::handler::EventHandler;

/// Events handled concurrently, kept below the database pool size
pub const MAX_IN_FLIGHT_EVENTS: usize = 8;

/// Totals of one ingest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Frames decoded and handled, ignored frames included
    pub handled: usize,
    /// Events whose handling failed
    pub failed: usize,
    /// Lines that did not decode
    pub malformed: usize,
}

impl IngestReport {
    fn record(&mut self, result: Result<bool, JoinError>) {
        match result {
            Ok(true) => self.handled += 1,
            Ok(false) => self.failed += 1,
            Err(e) => {
                error!(error = %e, "Event task panicked");
                self.failed += 1;
            }
        }
    }
}

/// Consume `reader` to the end.
///
/// Failures are logged as each event finishes, so a stream that never ends
/// still reports them. Returns once every event has been handled and every
/// background task they spawned has finished.
pub async fn run_ingest<R>(handler: &EventHandler, reader: R) -> io::Result<IngestReport>
where
    R: AsyncBufRead + Unpin,
{
    let mut report = IngestReport::default();
    let permits = Arc::new(Semaphore::new(MAX_IN_FLIGHT_EVENTS));
    let mut tasks = JoinSet::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match decode_frame(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Skipping malformed frame");
                report.malformed += 1;
                continue;
            }
        };

        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .map_err(io::Error::other)?;
        let handler = handler.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match handler.handle(event).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "Event failed");
                    false
                }
            }
        });

        while let Some(result) = tasks.try_join_next() {
            report.record(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        report.record(result);
    }

    handler.context().background().drain().await;
    info!(
        handled = report.handled,
        failed = report.failed,
        malformed = report.malformed,
        "Input exhausted"
    );
    Ok(report)
}
