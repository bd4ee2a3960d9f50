//! Recorded hand traces.
//!
//! A trace is a JSON Lines file with one record per frame that has hands or
//! key presses:
//!
//! ```json
//! {"frame": 12, "hands": [{"handedness": "Left", "score": 0.93, "tips": {"index": [0.08, 0.8]}}], "keys": "r"}
//! ```
//!
//! `frame` is optional and defaults to one after the previous record. A hand
//! carries either the full 21-point `landmarks` skeleton or a `tips` map from
//! finger name to a normalised `[x, y]`. Blank lines and lines starting with
//! `#` are skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use flamelab_core::hands::normalized_to_pixel;
use flamelab_core::{
    Finger, HandDetector, HandObservation, Handedness, KeySource, LabError, Landmark, PortError,
    TrackerSettings,
};
use serde::Deserialize;

use crate::error::RuntimeError;

const fn full_confidence() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TraceRecord {
    frame: Option<u64>,
    #[serde(default)]
    hands: Vec<TraceHandRecord>,
    #[serde(default)]
    keys: String,
}

#[derive(Debug, Deserialize)]
struct TraceHandRecord {
    handedness: Handedness,
    #[serde(default = "full_confidence")]
    score: f32,
    landmarks: Option<Vec<Landmark>>,
    tips: Option<BTreeMap<String, [f32; 2]>>,
}

/// A hand pose in normalised coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum HandPose {
    Landmarks(Vec<Landmark>),
    Tips(BTreeMap<Finger, [f32; 2]>),
}

/// One recorded hand.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceHand {
    pub handedness: Handedness,
    pub score: f32,
    pub pose: HandPose,
}

impl TraceHand {
    fn from_record(record: TraceHandRecord) -> Result<Self, LabError> {
        let pose = match (record.landmarks, record.tips) {
            (Some(landmarks), _) => {
                // Validates the skeleton length.
                HandObservation::from_landmarks(record.handedness, record.score, &landmarks, 1, 1)?;
                HandPose::Landmarks(landmarks)
            }
            (None, Some(tips)) => HandPose::Tips(
                tips.into_iter()
                    .map(|(name, xy)| Finger::from_str(&name).map(|finger| (finger, xy)))
                    .collect::<Result<_, LabError>>()?,
            ),
            (None, None) => HandPose::Tips(BTreeMap::new()),
        };
        Ok(Self {
            handedness: record.handedness,
            score: record.score,
            pose,
        })
    }

    /// Resolve to pixel fingertips on a `width` x `height` frame.
    pub fn observe(&self, width: u32, height: u32) -> Result<HandObservation, LabError> {
        match &self.pose {
            HandPose::Landmarks(landmarks) => {
                HandObservation::from_landmarks(self.handedness, self.score, landmarks, width, height)
            }
            HandPose::Tips(tips) => Ok(tips.iter().fold(
                HandObservation::new(self.handedness, self.score),
                |hand, (&finger, &[x, y])| {
                    hand.with_tip(finger, normalized_to_pixel(x, y, width, height))
                },
            )),
        }
    }
}

/// Everything recorded for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceFrame {
    pub hands: Vec<TraceHand>,
    pub keys: Vec<char>,
}

/// A parsed trace, keyed by frame index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    frames: BTreeMap<u64, TraceFrame>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        let text = fs::read_to_string(path).map_err(|source| RuntimeError::TraceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trace = Self::parse(&text, path)?;
        tracing::info!(
            path = %path.display(),
            records = trace.len(),
            last_frame = ?trace.last_frame(),
            "Loaded hand trace"
        );
        Ok(trace)
    }

    /// Parse trace text. `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, RuntimeError> {
        let mut frames = BTreeMap::new();
        let mut previous: Option<u64> = None;

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }

            let record: TraceRecord =
                serde_json::from_str(raw).map_err(|source| RuntimeError::TraceParse {
                    path: origin.to_path_buf(),
                    line,
                    source,
                })?;

            let frame = match (record.frame, previous) {
                (Some(frame), _) => frame,
                (None, None) => 0,
                (None, Some(previous)) => {
                    previous
                        .checked_add(1)
                        .ok_or_else(|| RuntimeError::TraceFrameOverflow {
                            path: origin.to_path_buf(),
                            line,
                            previous,
                        })?
                }
            };
            if let Some(previous) = previous
                && frame <= previous
            {
                return Err(RuntimeError::TraceOrder {
                    path: origin.to_path_buf(),
                    line,
                    frame,
                    previous,
                });
            }
            previous = Some(frame);

            let hands = record
                .hands
                .into_iter()
                .map(TraceHand::from_record)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| RuntimeError::TraceHand {
                    path: origin.to_path_buf(),
                    line,
                    source,
                })?;
            frames.insert(
                frame,
                TraceFrame {
                    hands,
                    keys: record.keys.chars().collect(),
                },
            );
        }

        Ok(Self { frames })
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }

    #[must_use]
    pub fn frame(&self, index: u64) -> Option<&TraceFrame> {
        self.frames.get(&index)
    }

    /// Split into a detector and a key source.
    #[must_use]
    pub fn into_parts(self, tracker: &TrackerSettings) -> (TraceDetector, ScriptedKeys) {
        let mut hands = BTreeMap::new();
        let mut keys = BTreeMap::new();
        for (index, frame) in self.frames {
            if !frame.hands.is_empty() {
                hands.insert(index, frame.hands);
            }
            if !frame.keys.is_empty() {
                keys.insert(index, frame.keys);
            }
        }
        (TraceDetector::new(hands, tracker), ScriptedKeys { keys })
    }
}

/// Replays recorded hands as a [`HandDetector`].
///
/// A hand that was not seen on the previous frame must reach
/// `min_detection_confidence` to be reported; once tracked it is kept while
/// its score stays at or above `min_tracking_confidence`. At most
/// `max_hands` hands are reported per frame.
#[derive(Debug, Clone)]
pub struct TraceDetector {
    frames: BTreeMap<u64, Vec<TraceHand>>,
    min_detection: f32,
    min_tracking: f32,
    max_hands: usize,
    tracked: BTreeSet<Handedness>,
    last_frame: Option<u64>,
}

impl TraceDetector {
    #[must_use]
    pub fn new(frames: BTreeMap<u64, Vec<TraceHand>>, tracker: &TrackerSettings) -> Self {
        Self {
            frames,
            min_detection: tracker.min_detection_confidence,
            min_tracking: tracker.min_tracking_confidence,
            max_hands: tracker.max_hands,
            tracked: BTreeSet::new(),
            last_frame: None,
        }
    }

    /// Index of the last frame with recorded hands.
    #[must_use]
    pub fn last_recorded_frame(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }
}

impl HandDetector for TraceDetector {
    fn detect(
        &mut self,
        frame_index: u64,
        width: u32,
        height: u32,
    ) -> Result<Vec<HandObservation>, PortError> {
        // Tracking only carries over between consecutive frames.
        if self.last_frame.is_none_or(|last| last + 1 != frame_index) {
            self.tracked.clear();
        }
        self.last_frame = Some(frame_index);

        let Some(recorded) = self.frames.get(&frame_index) else {
            self.tracked.clear();
            return Ok(Vec::new());
        };

        let mut hands = Vec::with_capacity(self.max_hands);
        let mut tracked = BTreeSet::new();
        for hand in recorded {
            if hands.len() >= self.max_hands {
                break;
            }
            let threshold = if self.tracked.contains(&hand.handedness) {
                self.min_tracking
            } else {
                self.min_detection
            };
            if hand.score < threshold {
                continue;
            }
            hands.push(hand.observe(width, height)?);
            tracked.insert(hand.handedness);
        }
        self.tracked = tracked;
        Ok(hands)
    }
}

/// Replays recorded key presses as a [`KeySource`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: BTreeMap<u64, Vec<char>>,
}

impl ScriptedKeys {
    /// Press `keys` on `frame`.
    #[must_use]
    pub fn with(mut self, frame: u64, keys: &str) -> Self {
        self.keys.entry(frame).or_default().extend(keys.chars());
        self
    }
}

impl KeySource for ScriptedKeys {
    fn keys_for(&mut self, frame_index: u64) -> Vec<char> {
        self.keys.remove(&frame_index).unwrap_or_default()
    }
}
