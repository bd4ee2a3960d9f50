//! Settings domain types, validation and JSON persistence.
//!
//! Every section carries `#[serde(default)]`, so a settings file only needs
//! the keys it wants to override.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use crate::layout::LabSettings;

/// Default capture width in pixels.
pub const DEFAULT_FRAME_WIDTH: u32 = 1280;

/// Default capture height in pixels.
pub const DEFAULT_FRAME_HEIGHT: u32 = 720;

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub camera: CameraSettings,
    pub tracker: TrackerSettings,
    pub lab: LabSettings,
    pub particles: ParticleSettings,
    pub ui: UiSettings,
}

/// Frame source parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera device index, for adapters that open a physical camera.
    pub device: u32,
    pub width: u32,
    pub height: u32,
    /// Requested capture rate.
    pub target_fps: u32,
    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: 0,
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            target_fps: 120,
            mirror: true,
        }
    }
}

/// Hand detector parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerSettings {
    pub max_hands: usize,
    /// Score a newly appearing hand needs to be accepted.
    pub min_detection_confidence: f32,
    /// Score an already tracked hand needs to stay accepted.
    pub min_tracking_confidence: f32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
        }
    }
}

/// Particle effect budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParticleSettings {
    /// Frames a particle lives for.
    pub lifetime: u32,
    /// Oldest particles are dropped beyond this count.
    pub max_particles: usize,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            lifetime: 40,
            max_particles: 150,
            seed: None,
        }
    }
}

/// Overlay parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub sidebar_width: u32,
    /// TrueType font used for overlay text. Without one, text is skipped.
    pub font_path: Option<PathBuf>,
    pub show_fps: bool,
    /// Show CPU and memory usage under the FPS counter.
    pub show_system_stats: bool,
    /// Seconds a safety popup stays up after a dip. Zero disables popups.
    pub safety_popup_secs: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sidebar_width: 320,
            font_path: None,
            show_fps: true,
            show_system_stats: false,
            safety_popup_secs: 0.0,
        }
    }
}

/// Longest accepted safety popup, in seconds.
pub const MAX_SAFETY_POPUP_SECS: f32 = 3600.0;

/// Settings loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Frame size must be at least 160x120, got {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },

    #[error("Target FPS must be between 1 and 480, got {0}")]
    InvalidFps(u32),

    #[error("max_hands must be between 1 and 4, got {0}")]
    InvalidMaxHands(usize),

    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidConfidence { name: &'static str, value: f32 },

    #[error("{name} ratio must be between 0.0 and 1.0, got {value}")]
    InvalidRatio { name: String, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("safety_popup_secs must be between 0 and 3600, got {0}")]
    InvalidPopupDuration(f32),

    #[error("The bench must hold at least one beaker")]
    EmptyBench,

    #[error("max_particles must be at least 1")]
    InvalidParticleBudget,

    #[error("Sidebar width {sidebar} leaves no room in a {width}px frame")]
    SidebarTooWide { sidebar: u32, width: u32 },

    #[error("Cannot determine the user configuration directory")]
    NoConfigDir,

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Default settings location: `<config dir>/flamelab/settings.json`.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join("flamelab").join("settings.json"))
        .ok_or(SettingsError::NoConfigDir)
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)
    }
}

fn check_unit(name: &str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::InvalidRatio {
            name: name.to_string(),
            value,
        })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NonPositive { name, value })
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    let camera = &settings.camera;
    if camera.width < 160 || camera.height < 120 {
        return Err(SettingsError::InvalidFrameSize {
            width: camera.width,
            height: camera.height,
        });
    }
    if !(1..=480).contains(&camera.target_fps) {
        return Err(SettingsError::InvalidFps(camera.target_fps));
    }

    let tracker = &settings.tracker;
    if !(1..=4).contains(&tracker.max_hands) {
        return Err(SettingsError::InvalidMaxHands(tracker.max_hands));
    }
    for (name, value) in [
        ("min_detection_confidence", tracker.min_detection_confidence),
        ("min_tracking_confidence", tracker.min_tracking_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SettingsError::InvalidConfidence { name, value });
        }
    }

    let lab = &settings.lab;
    if lab.bench.is_empty() {
        return Err(SettingsError::EmptyBench);
    }
    for slot in &lab.bench {
        check_unit(&format!("bench.{}", slot.element), slot.x_ratio)?;
    }
    check_unit("water.x_ratio", lab.water.x_ratio)?;
    check_unit("water.y_ratio", lab.water.y_ratio)?;
    check_unit("ignition.x", lab.ignition.x)?;
    check_unit("ignition.y", lab.ignition.y)?;
    check_unit("ignition.width", lab.ignition.width)?;
    check_unit("ignition.height", lab.ignition.height)?;
    check_positive("interaction_radius", lab.interaction_radius)?;
    check_positive("mix_distance", lab.mix_distance)?;
    check_positive("transfer_distance", lab.transfer_distance)?;
    check_positive("beaker_size", lab.beaker_size as f32)?;
    check_positive("message_capacity", lab.message_capacity as f32)?;

    if settings.particles.max_particles == 0 {
        return Err(SettingsError::InvalidParticleBudget);
    }
    check_positive("particles.lifetime", settings.particles.lifetime as f32)?;

    if settings.ui.sidebar_width >= camera.width {
        return Err(SettingsError::SidebarTooWide {
            sidebar: settings.ui.sidebar_width,
            width: camera.width,
        });
    }
    let popup = settings.ui.safety_popup_secs;
    if !(0.0..=MAX_SAFETY_POPUP_SECS).contains(&popup) {
        return Err(SettingsError::InvalidPopupDuration(popup));
    }

    Ok(())
}
