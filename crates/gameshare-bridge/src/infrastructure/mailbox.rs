//! Polling transport: a file mailbox drained on a fixed interval.
//!
//! A writer appends newline-delimited JSON records to
//! `<input_dir>/commands.<ext>`.  Each tick the bridge checks for that file,
//! reads it whole, dispatches every record in order, then renames it to
//! `<input_dir>/processed.<ext>`.  The rename is the only state transition;
//! once it happens the writer starts a fresh commands file.
//!
//! # Failure handling
//!
//! - Reading or renaming fails: the pending file is deleted so the next tick
//!   starts clean, and polling continues at the normal interval.
//! - Anything else (the existence probe or that deletion fails): the loop
//!   backs off before polling again.
//!
//! Records appended between the read and the rename are lost with the
//! renamed file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::session::{BatchReport, BridgeSession};
use crate::infrastructure::storage::config::PollingConfig;

const PENDING_STEM: &str = "commands";
const PROCESSED_STEM: &str = "processed";

/// Error type for mailbox operations.
#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("failed to prepare mailbox directory {path}: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to check for {path}: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MailboxError {
    /// `true` for failures the loop recovers from by backing off rather than
    /// by discarding the pending file.
    pub fn needs_backoff(&self) -> bool {
        !matches!(self, MailboxError::Read { .. } | MailboxError::Rename { .. })
    }
}

/// The pair of mailbox files inside one input directory.
#[derive(Debug, Clone)]
pub struct Mailbox {
    dir: PathBuf,
    pending: PathBuf,
    processed: PathBuf,
}

impl Mailbox {
    /// Creates a mailbox for `dir` whose files use `extension` (no dot).
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        let dir = dir.into();
        Self {
            pending: dir.join(format!("{PENDING_STEM}.{extension}")),
            processed: dir.join(format!("{PROCESSED_STEM}.{extension}")),
            dir,
        }
    }

    /// Creates the mailbox described by the polling configuration.
    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(&config.input_dir, &config.file_extension)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the commands file the writer appends to.
    pub fn pending_path(&self) -> &Path {
        &self.pending
    }

    /// Path the commands file is renamed to once consumed.
    pub fn processed_path(&self) -> &Path {
        &self.processed
    }

    /// Creates the input directory and, when `reset` is set, deletes stale
    /// pending and processed files left by a previous run.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Prepare`] if the directory cannot be created
    /// and [`MailboxError::Cleanup`] if a stale file cannot be deleted.
    pub async fn prepare(&self, reset: bool) -> Result<(), MailboxError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| MailboxError::Prepare {
                path: self.dir.clone(),
                source,
            })?;

        if reset {
            remove_if_present(&self.pending).await?;
            remove_if_present(&self.processed).await?;
        }
        info!("mailbox ready at {}", self.pending.display());
        Ok(())
    }

    /// Runs one poll cycle.
    ///
    /// Returns `Ok(None)` when there is no pending file, or the batch report
    /// once its records were dispatched and the file was marked consumed.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError`] describing the failed step.  On a read or
    /// rename failure the pending file has already been deleted; if that
    /// deletion fails as well, [`MailboxError::Cleanup`] is returned.
    pub async fn poll_once(
        &self,
        session: &mut BridgeSession,
    ) -> Result<Option<BatchReport>, MailboxError> {
        let present = tokio::fs::try_exists(&self.pending)
            .await
            .map_err(|source| MailboxError::Probe {
                path: self.pending.clone(),
                source,
            })?;
        if !present {
            return Ok(None);
        }

        let content = match read_utf8(&self.pending).await {
            Ok(content) => content,
            Err(source) => {
                let cause = MailboxError::Read {
                    path: self.pending.clone(),
                    source,
                };
                return Err(self.discard_after(cause).await);
            }
        };

        let records = content.lines().map(str::trim).filter(|line| !line.is_empty());
        let report = session.process_batch(records);

        let renamed = tokio::fs::rename(&self.pending, &self.processed).await;
        session.finish_batch();
        if let Err(source) = renamed {
            let cause = MailboxError::Rename {
                from: self.pending.clone(),
                to: self.processed.clone(),
                source,
            };
            return Err(self.discard_after(cause).await);
        }
        Ok(Some(report))
    }

    /// Deletes the pending file after `cause`.  Returns `cause`, or the
    /// cleanup error if the deletion fails too (`cause` is logged then).
    async fn discard_after(&self, cause: MailboxError) -> MailboxError {
        warn!("discarding {}", self.pending.display());
        match remove_if_present(&self.pending).await {
            Ok(()) => cause,
            Err(cleanup) => {
                error!("{cause}");
                cleanup
            }
        }
    }
}

/// Polls `mailbox` until `running` is cleared, then closes the session.
///
/// The flag is checked between cycles only, so a drained batch is always
/// dispatched in full.
pub async fn run_poll_loop(
    mailbox: Mailbox,
    mut session: BridgeSession,
    interval: Duration,
    backoff: Duration,
    running: Arc<AtomicBool>,
) -> BatchReport {
    info!(
        "polling {} every {interval:?}",
        mailbox.pending_path().display()
    );

    while running.load(Ordering::Relaxed) {
        let pause = match mailbox.poll_once(&mut session).await {
            Ok(Some(report)) => {
                debug!(
                    "mailbox batch: {} dispatched, {} discarded",
                    report.dispatched,
                    report.discarded()
                );
                interval
            }
            Ok(None) => interval,
            Err(e) if e.needs_backoff() => {
                error!("mailbox error: {e}; retrying in {backoff:?}");
                backoff
            }
            Err(e) => {
                warn!("mailbox error: {e}");
                interval
            }
        };
        tokio::time::sleep(pause).await;
    }

    info!("shutdown flag set; stopping mailbox polling");
    session.close()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn read_utf8(path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

async fn remove_if_present(path: &Path) -> Result<(), MailboxError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(MailboxError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatch_events::EventBridge;
    use crate::application::screen_geometry::ScreenGeometryProvider;
    use crate::application::session::SessionPhase;
    use crate::infrastructure::input_injection::mock::{InjectorCall, MockInputInjector};
    use crate::infrastructure::screen_info::MockDisplayMetrics;
    use gameshare_core::{ScreenGeometry, VirtualKey};
    use uuid::Uuid;

    fn temp_mailbox() -> Mailbox {
        let dir = std::env::temp_dir().join(format!("gameshare_mailbox_test_{}", Uuid::new_v4()));
        Mailbox::new(dir, "txt")
    }

    fn session(injector: Arc<MockInputInjector>) -> BridgeSession {
        let geometry = ScreenGeometryProvider::new(
            Arc::new(MockDisplayMetrics::fixed(1920, 1080)),
            ScreenGeometry::new(1920, 1080).unwrap(),
        );
        BridgeSession::new("poll", Arc::new(EventBridge::new(injector, Arc::new(geometry))))
    }

    #[test]
    fn test_paths_use_stems_and_extension() {
        let mailbox = Mailbox::new("inbox", "json");
        assert_eq!(mailbox.pending_path(), Path::new("inbox/commands.json"));
        assert_eq!(mailbox.processed_path(), Path::new("inbox/processed.json"));
    }

    #[test]
    fn test_only_read_and_rename_skip_backoff() {
        let path = PathBuf::from("x");
        let io_err = || io::Error::other("boom");
        assert!(!MailboxError::Read { path: path.clone(), source: io_err() }.needs_backoff());
        assert!(!MailboxError::Rename { from: path.clone(), to: path.clone(), source: io_err() }
            .needs_backoff());
        assert!(MailboxError::Probe { path: path.clone(), source: io_err() }.needs_backoff());
        assert!(MailboxError::Cleanup { path, source: io_err() }.needs_backoff());
    }

    #[tokio::test]
    async fn test_prepare_creates_dir_and_clears_stale_files() {
        // Arrange
        let mailbox = temp_mailbox();
        std::fs::create_dir_all(mailbox.dir()).unwrap();
        std::fs::write(mailbox.pending_path(), "stale\n").unwrap();
        std::fs::write(mailbox.processed_path(), "old\n").unwrap();

        // Act
        mailbox.prepare(true).await.expect("prepare");

        // Assert
        assert!(mailbox.dir().is_dir());
        assert!(!mailbox.pending_path().exists());
        assert!(!mailbox.processed_path().exists());
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_prepare_without_reset_keeps_pending_file() {
        let mailbox = temp_mailbox();
        std::fs::create_dir_all(mailbox.dir()).unwrap();
        std::fs::write(mailbox.pending_path(), "{}\n").unwrap();

        mailbox.prepare(false).await.expect("prepare");

        assert!(mailbox.pending_path().exists());
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_poll_without_pending_file_is_noop() {
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session(Arc::clone(&injector));

        let outcome = mailbox.poll_once(&mut session).await.expect("poll");

        assert!(outcome.is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(injector.calls().is_empty());
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_poll_dispatches_and_renames() {
        // Arrange
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        let content = "{\"type\":\"keydown\",\"key\":\"a\"}\r\n\n  {\"type\":\"keyup\",\"key\":\"a\"}\n";
        std::fs::write(mailbox.pending_path(), content).unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session(Arc::clone(&injector));

        // Act
        let report = mailbox.poll_once(&mut session).await.expect("poll").expect("batch");

        // Assert
        assert_eq!(report.dispatched, 2);
        assert_eq!(report.discarded(), 0);
        assert_eq!(
            injector.calls(),
            vec![
                InjectorCall::PressKey(VirtualKey(0x41)),
                InjectorCall::ReleaseKey(VirtualKey(0x41)),
            ]
        );
        assert!(!mailbox.pending_path().exists());
        assert_eq!(std::fs::read_to_string(mailbox.processed_path()).unwrap(), content);
        assert_eq!(session.phase(), SessionPhase::Idle);
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_unreadable_pending_file_is_removed() {
        // Arrange
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        std::fs::write(mailbox.pending_path(), [0xFF, 0xFE, b'\n']).unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session(Arc::clone(&injector));

        // Act
        let result = mailbox.poll_once(&mut session).await;

        // Assert
        assert!(matches!(result, Err(MailboxError::Read { .. })));
        assert!(!mailbox.pending_path().exists());
        assert!(!mailbox.processed_path().exists());
        assert!(injector.calls().is_empty());

        // The next cycle starts clean.
        std::fs::write(mailbox.pending_path(), "{\"type\":\"keydown\",\"key\":\"b\"}\n").unwrap();
        let report = mailbox.poll_once(&mut session).await.unwrap().unwrap();
        assert_eq!(report.dispatched, 1);
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_rename_failure_removes_pending_file_after_dispatch() {
        // Arrange: a non-empty directory in the processed slot blocks the rename.
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        std::fs::create_dir_all(mailbox.processed_path()).unwrap();
        std::fs::write(mailbox.processed_path().join("occupied"), "x").unwrap();
        std::fs::write(mailbox.pending_path(), "{\"type\":\"keydown\",\"key\":\"a\"}\n").unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session(Arc::clone(&injector));

        // Act
        let result = mailbox.poll_once(&mut session).await;

        // Assert
        assert!(matches!(result, Err(MailboxError::Rename { .. })));
        assert!(!mailbox.pending_path().exists());
        assert_eq!(injector.calls(), vec![InjectorCall::PressKey(VirtualKey(0x41))]);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // The next cycle starts clean.
        let outcome = mailbox.poll_once(&mut session).await.expect("poll");
        assert!(outcome.is_none());
        assert_eq!(injector.calls().len(), 1);
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_failed_discard_reports_cleanup_error() {
        // Arrange: a directory in the pending slot can be neither read nor
        // removed as a file.
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        std::fs::create_dir_all(mailbox.pending_path()).unwrap();
        std::fs::write(mailbox.pending_path().join("occupied"), "x").unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let mut session = session(Arc::clone(&injector));

        // Act
        let result = mailbox.poll_once(&mut session).await;

        // Assert
        let err = result.expect_err("directory cannot be drained");
        assert!(matches!(err, MailboxError::Cleanup { .. }));
        assert!(err.needs_backoff());
        assert!(injector.calls().is_empty());
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }

    #[tokio::test]
    async fn test_run_poll_loop_stops_when_flag_cleared() {
        // Arrange
        let mailbox = temp_mailbox();
        mailbox.prepare(true).await.unwrap();
        std::fs::write(
            mailbox.pending_path(),
            "{\"type\":\"mousemove\",\"movementX\":2,\"movementY\":3}\n",
        )
        .unwrap();
        let injector = Arc::new(MockInputInjector::new());
        let running = Arc::new(AtomicBool::new(true));

        // Act
        let handle = tokio::spawn(run_poll_loop(
            mailbox.clone(),
            session(Arc::clone(&injector)),
            Duration::from_millis(5),
            Duration::from_millis(50),
            Arc::clone(&running),
        ));
        for _ in 0..200 {
            if !injector.calls().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        running.store(false, Ordering::Relaxed);
        let totals = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("loop stops")
            .expect("task completes");

        // Assert
        assert_eq!(totals.dispatched, 1);
        assert_eq!(injector.calls(), vec![InjectorCall::MoveRelative(2, 3)]);
        let _ = std::fs::remove_dir_all(mailbox.dir());
    }
}
