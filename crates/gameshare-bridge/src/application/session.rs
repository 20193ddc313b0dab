//! BridgeSession: per-transport session state and batch dispatch.
//!
//! One session exists per streaming connection and one for the lifetime of
//! the polling loop.  A session moves through
//!
//! ```text
//! Idle --batch received--> Active --all records dispatched--> Draining
//!   ^                                                            |
//!   +------------------------ batch finished --------------------+
//! ```
//!
//! Records within a batch are dispatched strictly in order.  A record that
//! fails at any stage is logged and skipped; the rest of the batch is still
//! dispatched.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::dispatch_events::EventBridge;

/// Lifecycle phase of a transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the next batch.
    Idle,
    /// Dispatching the records of a batch.
    Active,
    /// Every record of the batch has been dispatched; the transport is
    /// finalizing it (e.g. marking the mailbox file consumed).
    Draining,
}

/// Outcome counts for one batch, or accumulated over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records injected successfully.
    pub dispatched: usize,
    /// Records discarded before any side effect (parse, validation or
    /// unknown key/button).
    pub rejected: usize,
    /// Records whose injection failed at the OS.
    pub failed: usize,
}

impl BatchReport {
    /// Number of records seen.
    pub fn total(&self) -> usize {
        self.dispatched + self.rejected + self.failed
    }

    /// Number of records not fully applied.
    pub fn discarded(&self) -> usize {
        self.rejected + self.failed
    }

    fn absorb(&mut self, other: BatchReport) {
        self.dispatched += other.dispatched;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }
}

/// A transport session feeding records to the shared [`EventBridge`].
pub struct BridgeSession {
    label: String,
    bridge: Arc<EventBridge>,
    phase: SessionPhase,
    totals: BatchReport,
}

impl BridgeSession {
    /// Creates an idle session.  `label` prefixes every log line.
    pub fn new(label: impl Into<String>, bridge: Arc<EventBridge>) -> Self {
        Self {
            label: label.into(),
            bridge,
            phase: SessionPhase::Idle,
            totals: BatchReport::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Counts accumulated over every finished batch.
    pub fn totals(&self) -> BatchReport {
        self.totals
    }

    /// Dispatches every record of a batch in order and leaves the session in
    /// [`SessionPhase::Draining`].
    ///
    /// The caller finalizes the batch with [`BridgeSession::finish_batch`].
    pub fn process_batch<'a, I>(&mut self, records: I) -> BatchReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.phase != SessionPhase::Idle {
            // The previous batch was never finished; settle it first.
            self.finish_batch();
        }
        self.phase = SessionPhase::Active;

        let mut report = BatchReport::default();
        for raw in records {
            match self.bridge.dispatch_record(raw) {
                Ok(_) => report.dispatched += 1,
                Err(e) if e.is_injection_failure() => {
                    error!("{}: {e}", self.label);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("{}: discarding record: {e}", self.label);
                    report.rejected += 1;
                }
            }
        }

        self.totals.absorb(report);
        self.phase = SessionPhase::Draining;
        debug!(
            "{}: batch of {} dispatched ({} discarded)",
            self.label,
            report.total(),
            report.discarded()
        );
        report
    }

    /// Returns a draining session to [`SessionPhase::Idle`].
    pub fn finish_batch(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Ends the session and logs its totals.
    pub fn close(mut self) -> BatchReport {
        self.finish_batch();
        info!(
            "{}: session ended; {} dispatched, {} rejected, {} failed",
            self.label, self.totals.dispatched, self.totals.rejected, self.totals.failed
        );
        self.totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::screen_geometry::ScreenGeometryProvider;
    use crate::infrastructure::input_injection::mock::{InjectorCall, MockInputInjector};
    use crate::infrastructure::screen_info::MockDisplayMetrics;
    use gameshare_core::{ScreenGeometry, VirtualKey};

    fn session_with(injector: Arc<MockInputInjector>) -> BridgeSession {
        let geometry = ScreenGeometryProvider::new(
            Arc::new(MockDisplayMetrics::fixed(1920, 1080)),
            ScreenGeometry::new(1920, 1080).unwrap(),
        );
        let bridge = EventBridge::new(injector, Arc::new(geometry));
        BridgeSession::new("test", Arc::new(bridge))
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session_with(Arc::new(MockInputInjector::new()));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.totals(), BatchReport::default());
    }

    #[test]
    fn test_batch_moves_session_to_draining_then_idle() {
        // Arrange
        let mut session = session_with(Arc::new(MockInputInjector::new()));

        // Act
        session.process_batch([r#"{"type":"keydown","key":"a"}"#]);
        let after_batch = session.phase();
        session.finish_batch();

        // Assert
        assert_eq!(after_batch, SessionPhase::Draining);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_malformed_record_does_not_abort_batch() {
        // Arrange
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session_with(Arc::clone(&injector));
        let batch = [
            r#"{"type":"keydown","key":"a"}"#,
            r#"{"type":"keydown","#,
            r#"{"type":"keyup","key":"a"}"#,
            r#"{"type":"mousemove","movementX":5,"movementY":-5}"#,
        ];

        // Act
        let report = session.process_batch(batch);

        // Assert
        assert_eq!(report, BatchReport { dispatched: 3, rejected: 1, failed: 0 });
        assert_eq!(
            injector.calls(),
            vec![
                InjectorCall::PressKey(VirtualKey(0x41)),
                InjectorCall::ReleaseKey(VirtualKey(0x41)),
                InjectorCall::MoveRelative(5, -5),
            ]
        );
    }

    #[test]
    fn test_invalid_and_unknown_records_count_as_rejected() {
        let mut session = session_with(Arc::new(MockInputInjector::new()));

        let report = session.process_batch([
            r#"{"type":"mousemove","movementX":1,"key":"a"}"#,
            r#"{"type":"keydown","key":"Unidentified"}"#,
            r#"{"type":"mousedown","button":9}"#,
        ]);

        assert_eq!(report.rejected, 3);
        assert_eq!(report.dispatched, 0);
    }

    #[test]
    fn test_injection_failures_count_as_failed_and_batch_continues() {
        let mut session = session_with(Arc::new(MockInputInjector::failing()));

        let report = session.process_batch([
            r#"{"type":"keydown","key":"a"}"#,
            r#"{"type":"keyup","key":"a"}"#,
        ]);

        assert_eq!(report, BatchReport { dispatched: 0, rejected: 0, failed: 2 });
    }

    #[test]
    fn test_totals_accumulate_across_batches() {
        // Arrange
        let mut session = session_with(Arc::new(MockInputInjector::new()));

        // Act
        session.process_batch([r#"{"type":"keydown","key":"b"}"#, "garbage"]);
        session.finish_batch();
        session.process_batch([r#"{"type":"keyup","key":"b"}"#]);
        let totals = session.close();

        // Assert
        assert_eq!(totals.dispatched, 2);
        assert_eq!(totals.rejected, 1);
        assert_eq!(totals.total(), 3);
    }

    #[test]
    fn test_unfinished_batch_is_settled_by_next_batch() {
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session_with(Arc::clone(&injector));

        session.process_batch([r#"{"type":"keydown","key":"c"}"#]);
        session.process_batch([r#"{"type":"keyup","key":"c"}"#]);

        assert_eq!(session.phase(), SessionPhase::Draining);
        assert_eq!(injector.calls().len(), 2);
    }

    #[test]
    fn test_empty_batch_reports_nothing() {
        let mut session = session_with(Arc::new(MockInputInjector::new()));
        let report = session.process_batch(std::iter::empty());
        assert_eq!(report.total(), 0);
    }
}
