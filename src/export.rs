//! Background export with completion events.
//!
//! Writing a track-log file can take a while on slow flash storage, so it
//! runs on a worker thread while the UI shows an indeterminate spinner.
//! Completion is marshaled back over a channel: the UI thread polls
//! [`ExportHandle::try_event`] (or blocks on [`ExportHandle::wait`]) and
//! turns the event into a share sheet or an error dialog. Fire-and-forget:
//! no cancellation, no retry, no progress reporting.
//!
//! The file format itself (GPX) is an external collaborator implementing
//! [`TrackExporter`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::error::Result;
use crate::{Workout, WorkoutSample};

/// Writes one workout to a track-log file. Implemented by the GPX writer;
/// the core does not validate the output format.
pub trait TrackExporter: Send + 'static {
    fn export_workout(
        &self,
        workout: &Workout,
        samples: &[WorkoutSample],
        destination: &Path,
    ) -> Result<()>;
}

/// Completion event delivered from the worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// File written; ready to hand to the share sheet
    Finished { destination: PathBuf },
    /// Export failed; show the error dialog
    Failed { message: String },
}

/// Handle to a running export.
pub struct ExportHandle {
    rx: Receiver<ExportEvent>,
    worker: Option<JoinHandle<()>>,
}

impl ExportHandle {
    /// Non-blocking poll for the completion event, for UI-thread loops.
    pub fn try_event(&self) -> Option<ExportEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the export completes.
    ///
    /// If the worker panicked the channel closes without an event; that is
    /// reported as a failure rather than propagating the panic.
    pub fn wait(mut self) -> ExportEvent {
        let event = self.rx.recv().unwrap_or_else(|_| ExportEvent::Failed {
            message: "export worker terminated unexpectedly".to_string(),
        });
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        event
    }
}

/// Run an export on a worker thread.
///
/// The workout and samples are moved to the worker; the returned handle
/// delivers exactly one [`ExportEvent`].
pub fn export_in_background<E: TrackExporter>(
    exporter: E,
    workout: Workout,
    samples: Vec<WorkoutSample>,
    destination: PathBuf,
) -> ExportHandle {
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        info!(
            "[Export] Exporting workout '{}' ({} samples) to {}",
            workout.id,
            samples.len(),
            destination.display()
        );
        let event = match exporter.export_workout(&workout, &samples, &destination) {
            Ok(()) => ExportEvent::Finished { destination },
            Err(e) => {
                warn!("[Export] Workout '{}' failed: {}", workout.id, e);
                ExportEvent::Failed {
                    message: e.to_string(),
                }
            }
        };
        // The receiver may already be gone if the screen closed; nothing
        // left to notify then
        let _ = tx.send(event);
    });

    ExportHandle {
        rx,
        worker: Some(worker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackViewError;
    use crate::summary::{compute_summary, SummaryConfig};
    use crate::{GeoPoint, SportKind};
    use chrono::TimeZone;

    struct WritingExporter;

    impl TrackExporter for WritingExporter {
        fn export_workout(
            &self,
            workout: &Workout,
            samples: &[WorkoutSample],
            destination: &Path,
        ) -> Result<()> {
            let body = format!("{} {}", workout.id, samples.len());
            std::fs::write(destination, body).map_err(|e| TrackViewError::Export {
                message: e.to_string(),
            })
        }
    }

    struct FailingExporter;

    impl TrackExporter for FailingExporter {
        fn export_workout(
            &self,
            _workout: &Workout,
            _samples: &[WorkoutSample],
            _destination: &Path,
        ) -> Result<()> {
            Err(TrackViewError::Export {
                message: "disk full".to_string(),
            })
        }
    }

    fn fixture() -> (Workout, Vec<WorkoutSample>) {
        let samples: Vec<WorkoutSample> = (0..4)
            .map(|i| {
                WorkoutSample::new(
                    i as u64 * 4_000,
                    GeoPoint::new(51.5 + i as f64 * 0.0001, -0.12),
                    100.0,
                    2.5,
                )
            })
            .collect();
        let summary =
            compute_summary(&samples, &SummaryConfig::for_kind(SportKind::Cycling)).unwrap();
        let workout = Workout {
            id: "workout-1".to_string(),
            kind: SportKind::Cycling,
            comment: String::new(),
            start: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            end: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
            summary,
        };
        (workout, samples)
    }

    #[test]
    fn test_successful_export() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("workout.gpx");
        let (workout, samples) = fixture();

        let handle = export_in_background(WritingExporter, workout, samples, destination.clone());
        let event = handle.wait();

        assert_eq!(
            event,
            ExportEvent::Finished {
                destination: destination.clone()
            }
        );
        assert_eq!(std::fs::read_to_string(destination).unwrap(), "workout-1 4");
    }

    #[test]
    fn test_failed_export_crosses_thread_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let (workout, samples) = fixture();

        let handle =
            export_in_background(FailingExporter, workout, samples, dir.path().join("x.gpx"));
        match handle.wait() {
            ExportEvent::Failed { message } => assert!(message.contains("disk full")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_try_event_polls() {
        let dir = tempfile::tempdir().unwrap();
        let (workout, samples) = fixture();
        let handle = export_in_background(
            WritingExporter,
            workout,
            samples,
            dir.path().join("workout.gpx"),
        );

        // Spin until the worker delivers; each poll is non-blocking
        let mut event = None;
        for _ in 0..500 {
            if let Some(e) = handle.try_event() {
                event = Some(e);
                break;
            }
            thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(matches!(event, Some(ExportEvent::Finished { .. })));
    }
}
