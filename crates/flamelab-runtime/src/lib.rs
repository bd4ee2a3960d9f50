#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod capture;
pub mod capture_thread;
pub mod error;
pub mod fps;
pub mod monitor;
pub mod simulator;
pub mod sink;
pub mod trace;

pub use capture::{Backdrop, BackdropSource, ImageSequenceSource};
pub use capture_thread::CaptureThreadHandle;
pub use error::RuntimeError;
pub use fps::FpsCounter;
pub use monitor::{SystemMonitor, SystemStats};
pub use simulator::{
    FlameTestSimulator, FrameClock, KeyAction, RunOptions, RunSummary, StopReason, help_text,
};
pub use sink::{FrameSink, NullSink, PngSequenceSink};
pub use trace::{HandPose, ScriptedKeys, Trace, TraceDetector, TraceFrame, TraceHand};
