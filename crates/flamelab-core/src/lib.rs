#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod chemicals;
pub mod color;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hands;
pub mod layout;
pub mod ports;
pub mod settings;
pub mod state;

// Re-export commonly used types for convenience
pub use chemicals::{Chemical, Element, FLAME_TEST_THEORY, Mixture};
pub use color::{MixMode, Rgb};
pub use error::{LabError, PortError};
pub use events::{IgnitionSource, LabEvent};
pub use geometry::{Point, Rect};
pub use hands::{Finger, FingerId, HandObservation, Handedness, Landmark, finger_position};
pub use layout::{BenchBeaker, BenchSlot, LabSettings, RatioPoint, RatioRect};
pub use ports::{FrameSource, HandDetector, KeySource, NoHands, NoKeys};
pub use settings::{
    CameraSettings, ParticleSettings, Settings, SettingsError, TrackerSettings, UiSettings,
    default_settings_path, validate_settings,
};
pub use state::{DipRecord, FingerState, LabState, LogEntry};
