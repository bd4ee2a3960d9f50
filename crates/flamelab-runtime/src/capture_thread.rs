//! Dedicated capture thread: decodes the next frame while the current one is
//! being processed.
//!
//! The channel holds a single frame, so capture never runs more than one
//! frame ahead of the simulator and stale frames never queue up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use flamelab_core::{FrameSource, PortError};
use image::RgbImage;

use crate::error::RuntimeError;

type FrameResult = Result<Option<RgbImage>, PortError>;

/// [`FrameSource`] proxy for a source running on its own thread.
///
/// Dropping the handle stops the thread and joins it.
pub struct CaptureThreadHandle {
    rx: Option<mpsc::Receiver<FrameResult>>,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    name: String,
    size: (u32, u32),
    finished: bool,
}

impl std::fmt::Debug for CaptureThreadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureThreadHandle")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl CaptureThreadHandle {
    /// Move `source` onto a new capture thread.
    pub fn spawn(mut source: Box<dyn FrameSource>) -> Result<Self, RuntimeError> {
        let (tx, rx) = mpsc::sync_channel::<FrameResult>(1);
        let stop = Arc::new(AtomicBool::new(false));
        let name = source.name().to_owned();
        let size = source.frame_size();

        let stop_flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("flamelab-capture".into())
            .spawn(move || {
                let mut captured = 0u64;
                while !stop_flag.load(Ordering::Relaxed) {
                    let item = source.next_frame();
                    let last = !matches!(item, Ok(Some(_)));
                    if tx.send(item).is_err() || last {
                        break;
                    }
                    captured += 1;
                }
                tracing::debug!(source = source.name(), captured, "Capture thread exiting");
            })
            .map_err(RuntimeError::Spawn)?;

        tracing::debug!(source = %name, "Capture thread started");
        Ok(Self {
            rx: Some(rx),
            stop,
            thread: Some(thread),
            name,
            size,
            finished: false,
        })
    }
}

impl FrameSource for CaptureThreadHandle {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PortError> {
        if self.finished {
            return Ok(None);
        }
        let Some(rx) = &self.rx else {
            return Ok(None);
        };
        match rx.recv() {
            Ok(Ok(Some(frame))) => Ok(Some(frame)),
            Ok(other) => {
                self.finished = true;
                other
            }
            Err(mpsc::RecvError) => {
                self.finished = true;
                Err(RuntimeError::CaptureThreadDied.into())
            }
        }
    }

    fn frame_size(&self) -> (u32, u32) {
        self.size
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for CaptureThreadHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Unblocks a send waiting on the full channel.
        drop(self.rx.take());
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!(source = %self.name, "Capture thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Backdrop, BackdropSource};
    use flamelab_core::Rgb;

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> Result<Option<RgbImage>, PortError> {
            Err(PortError::Source("lens cap on".into()))
        }
        fn frame_size(&self) -> (u32, u32) {
            (1, 1)
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn frames_arrive_in_order_then_end() {
        let source = BackdropSource::new(4, 4, Backdrop::Solid(Rgb::gray(9)), Some(3), false);
        let mut handle = CaptureThreadHandle::spawn(Box::new(source)).unwrap();
        assert_eq!(handle.frame_size(), (4, 4));
        assert_eq!(handle.name(), "backdrop");
        for _ in 0..3 {
            assert!(handle.next_frame().unwrap().is_some());
        }
        assert!(handle.next_frame().unwrap().is_none());
        assert!(handle.next_frame().unwrap().is_none());
    }

    #[test]
    fn source_errors_are_forwarded_once() {
        let mut handle = CaptureThreadHandle::spawn(Box::new(FailingSource)).unwrap();
        assert!(matches!(handle.next_frame(), Err(PortError::Source(_))));
        assert!(handle.next_frame().unwrap().is_none());
    }

    #[test]
    fn dropping_an_endless_source_joins() {
        let source = BackdropSource::new(2, 2, Backdrop::default(), None, false);
        let mut handle = CaptureThreadHandle::spawn(Box::new(source)).unwrap();
        assert!(handle.next_frame().unwrap().is_some());
        drop(handle);
    }
}
