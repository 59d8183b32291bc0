//! # Capture Module
//!
//! Session discipline for acquiring a product photo from a live frame
//! source.
//!
//! The device itself lives behind the [`FrameSource`] trait; this module
//! owns the poll/confirm/cancel loop, JPEG persistence of the confirmed
//! frame, and the guarantee that the source is dropped (device handle
//! released) on every exit path. Each image slot runs its own session;
//! the device is held exclusively while the session is alive.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::CaptureError;
use crate::events::{null_sender, CaptureEvent, Event, EventSender};

/// One RGB frame from a live source
pub type Frame = RgbImage;

/// A live source of frames.
///
/// Implementations own the device handle; dropping the source releases
/// it. Backend constructors fail with
/// [`CaptureError::DeviceUnavailable`] when no device exists.
pub trait FrameSource {
    /// Grab the next frame, blocking until one is available
    fn grab(&mut self) -> Result<Frame, CaptureError>;
}

/// Caller decision after previewing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureControl {
    /// Keep polling
    Continue,
    /// Persist the frame just previewed and end the session
    Confirm,
    /// End the session without persisting anything
    Cancel,
}

/// Default capture output name for an image slot
/// (`reference` becomes `reference_product.jpg`)
pub fn default_output_name(slot: &str) -> PathBuf {
    PathBuf::from(format!("{slot}_product.jpg"))
}

/// A single capture interaction.
///
/// Transient: exists only for the duration of one capture. `run` consumes
/// the session, so the source is dropped whether the capture was
/// confirmed, cancelled, or failed.
pub struct CaptureSession<S: FrameSource> {
    source: S,
    events: EventSender,
}

impl<S: FrameSource> CaptureSession<S> {
    /// Wrap an opened source
    pub fn new(source: S) -> Self {
        Self::with_events(source, null_sender())
    }

    /// Wrap an opened source, emitting [`CaptureEvent`]s on `events`
    pub fn with_events(source: S, events: EventSender) -> Self {
        events.send(Event::Capture(CaptureEvent::Opened));
        Self { source, events }
    }

    /// Poll frames until the preview callback confirms or cancels.
    ///
    /// Every grabbed frame is handed to `preview`; on
    /// [`CaptureControl::Confirm`] the frame just previewed is encoded as
    /// JPEG to `output` (overwriting any existing file) and its path is
    /// returned. On [`CaptureControl::Cancel`] nothing is written and
    /// `None` is returned. A grab or persist failure ends the session
    /// with an error.
    pub fn run<F>(mut self, output: &Path, mut preview: F) -> Result<Option<PathBuf>, CaptureError>
    where
        F: FnMut(&Frame) -> CaptureControl,
    {
        let mut index = 0usize;
        loop {
            let frame = match self.source.grab() {
                Ok(frame) => frame,
                Err(error) => {
                    self.events.send(Event::Capture(CaptureEvent::Error {
                        message: error.to_string(),
                    }));
                    return Err(error);
                }
            };
            self.events
                .send(Event::Capture(CaptureEvent::FrameReady { index }));

            match preview(&frame) {
                CaptureControl::Continue => index += 1,
                CaptureControl::Confirm => {
                    if let Err(error) = save_frame(&frame, output) {
                        self.events.send(Event::Capture(CaptureEvent::Error {
                            message: error.to_string(),
                        }));
                        return Err(error);
                    }
                    tracing::info!("Captured frame saved to {}", output.display());
                    self.events.send(Event::Capture(CaptureEvent::Saved {
                        path: output.to_path_buf(),
                    }));
                    return Ok(Some(output.to_path_buf()));
                }
                CaptureControl::Cancel => {
                    tracing::info!("Capture cancelled");
                    self.events.send(Event::Capture(CaptureEvent::Cancelled));
                    return Ok(None);
                }
            }
        }
    }
}

/// Encode a frame as JPEG at `path`, overwriting any existing file
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), CaptureError> {
    frame
        .save_with_format(path, image::ImageFormat::Jpeg)
        .map_err(|e| CaptureError::Persist {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Fake source that serves a fixed frame and records its release
    struct ScriptedSource {
        frame: Frame,
        grabs_before_failure: usize,
        released: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(grabs_before_failure: usize) -> (Self, Arc<AtomicBool>) {
            let released = Arc::new(AtomicBool::new(false));
            let source = Self {
                frame: RgbImage::from_pixel(64, 48, Rgb([90, 120, 150])),
                grabs_before_failure,
                released: released.clone(),
            };
            (source, released)
        }
    }

    impl FrameSource for ScriptedSource {
        fn grab(&mut self) -> Result<Frame, CaptureError> {
            if self.grabs_before_failure == 0 {
                return Err(CaptureError::FrameGrab {
                    reason: "stream ended".to_string(),
                });
            }
            self.grabs_before_failure -= 1;
            Ok(self.frame.clone())
        }
    }

    impl Drop for ScriptedSource {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn confirm_saves_jpeg_and_returns_path() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("current_product.jpg");
        let (source, released) = ScriptedSource::new(10);

        let session = CaptureSession::new(source);
        let result = session.run(&output, |_| CaptureControl::Confirm).unwrap();

        assert_eq!(result, Some(output.clone()));
        assert!(output.exists());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("current_product.jpg");
        let (source, released) = ScriptedSource::new(10);

        let session = CaptureSession::new(source);
        let result = session.run(&output, |_| CaptureControl::Cancel).unwrap();

        assert_eq!(result, None);
        assert!(!output.exists());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn preview_sees_every_frame_until_confirm() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("reference_product.jpg");
        let (source, _released) = ScriptedSource::new(10);

        let mut seen = 0;
        let session = CaptureSession::new(source);
        let result = session
            .run(&output, |_| {
                seen += 1;
                if seen < 4 {
                    CaptureControl::Continue
                } else {
                    CaptureControl::Confirm
                }
            })
            .unwrap();

        assert_eq!(seen, 4);
        assert!(result.is_some());
    }

    #[test]
    fn grab_failure_releases_source() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("current_product.jpg");
        let (source, released) = ScriptedSource::new(0);

        let session = CaptureSession::new(source);
        let result = session.run(&output, |_| CaptureControl::Continue);

        assert!(matches!(result, Err(CaptureError::FrameGrab { .. })));
        assert!(!output.exists());
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn session_emits_lifecycle_events() {
        use crate::events::EventChannel;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("reference_product.jpg");
        let (source, _released) = ScriptedSource::new(10);
        let (sender, receiver) = EventChannel::new();

        let session = CaptureSession::with_events(source, sender);
        session.run(&output, |_| CaptureControl::Confirm).unwrap();

        assert!(matches!(
            receiver.try_recv(),
            Some(Event::Capture(CaptureEvent::Opened))
        ));
        assert!(matches!(
            receiver.try_recv(),
            Some(Event::Capture(CaptureEvent::FrameReady { index: 0 }))
        ));
        assert!(matches!(
            receiver.try_recv(),
            Some(Event::Capture(CaptureEvent::Saved { .. }))
        ));
    }

    #[test]
    fn default_output_names_follow_slot_convention() {
        assert_eq!(
            default_output_name("reference"),
            PathBuf::from("reference_product.jpg")
        );
        assert_eq!(
            default_output_name("current"),
            PathBuf::from("current_product.jpg")
        );
    }
}
