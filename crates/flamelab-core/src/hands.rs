//! Hand observations produced by a hand-landmark detector.
//!
//! Detectors report 21 normalised landmarks per hand. The lab only cares
//! about the five fingertips, which are resolved to pixel positions once
//! per frame.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LabError;
use crate::geometry::Point;

/// Number of landmarks in a full hand skeleton.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Which hand an observation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(LabError::UnknownHand(s.to_string())),
        }
    }
}

/// A finger, identified by its tip landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Self; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Index of the fingertip in the 21-point hand skeleton.
    #[must_use]
    pub const fn tip_landmark(self) -> usize {
        match self {
            Self::Thumb => 4,
            Self::Index => 8,
            Self::Middle => 12,
            Self::Ring => 16,
            Self::Pinky => 20,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finger {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LabError::UnknownFinger(s.to_string()))
    }
}

/// A specific finger on a specific hand, e.g. `Left_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FingerId {
    pub hand: Handedness,
    pub finger: Finger,
}

impl FingerId {
    #[must_use]
    pub const fn new(hand: Handedness, finger: Finger) -> Self {
        Self { hand, finger }
    }

    /// Every finger on both hands, left hand first.
    pub fn all() -> impl Iterator<Item = Self> {
        Handedness::ALL
            .into_iter()
            .flat_map(|hand| Finger::ALL.into_iter().map(move |finger| Self { hand, finger }))
    }

    /// Human-readable label, e.g. `Left Index`.
    #[must_use]
    pub fn label(&self) -> String {
        let name = self.finger.as_str();
        let mut chars = name.chars();
        let capitalised: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();
        format!("{} {capitalised}", self.hand)
    }
}

impl fmt::Display for FingerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.hand, self.finger)
    }
}

impl FromStr for FingerId {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hand, finger) = s
            .split_once('_')
            .ok_or_else(|| LabError::UnknownFinger(s.to_string()))?;
        Ok(Self {
            hand: hand.parse()?,
            finger: finger.parse()?,
        })
    }
}

/// A normalised landmark: `x`, `y` in `[0, 1]` relative to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// One detected hand with its fingertips resolved to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub handedness: Handedness,
    /// Detector confidence in `[0, 1]`.
    pub score: f32,
    pub fingertips: BTreeMap<Finger, Point>,
}

impl HandObservation {
    #[must_use]
    pub const fn new(handedness: Handedness, score: f32) -> Self {
        Self {
            handedness,
            score,
            fingertips: BTreeMap::new(),
        }
    }

    /// Builder-style fingertip insertion.
    #[must_use]
    pub fn with_tip(mut self, finger: Finger, at: Point) -> Self {
        self.fingertips.insert(finger, at);
        self
    }

    /// Resolve fingertips from a full landmark skeleton.
    pub fn from_landmarks(
        handedness: Handedness,
        score: f32,
        landmarks: &[Landmark],
        width: u32,
        height: u32,
    ) -> Result<Self, LabError> {
        if landmarks.len() < HAND_LANDMARK_COUNT {
            return Err(LabError::TooFewLandmarks {
                expected: HAND_LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }

        let fingertips = Finger::ALL
            .into_iter()
            .map(|finger| {
                let lm = landmarks[finger.tip_landmark()];
                (finger, normalized_to_pixel(lm.x, lm.y, width, height))
            })
            .collect();

        Ok(Self {
            handedness,
            score,
            fingertips,
        })
    }

    #[must_use]
    pub fn tip(&self, finger: Finger) -> Option<Point> {
        self.fingertips.get(&finger).copied()
    }

    /// Fingertips paired with their full finger ids.
    pub fn tips(&self) -> impl Iterator<Item = (FingerId, Point)> + '_ {
        self.fingertips
            .iter()
            .map(|(&finger, &p)| (FingerId::new(self.handedness, finger), p))
    }
}

/// Scale normalised coordinates to pixels, truncating like the detector does.
#[must_use]
pub fn normalized_to_pixel(x: f32, y: f32, width: u32, height: u32) -> Point {
    Point::new((x * width as f32) as i32, (y * height as f32) as i32)
}

/// Position of `id` in the first hand with matching handedness.
#[must_use]
pub fn finger_position(hands: &[HandObservation], id: FingerId) -> Option<Point> {
    hands
        .iter()
        .find(|h| h.handedness == id.hand)
        .and_then(|h| h.tip(id.finger))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> Vec<Landmark> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| Landmark {
                x: i as f32 / 40.0,
                y: 0.5,
                z: 0.0,
            })
            .collect()
    }

    #[test]
    fn finger_id_display_and_parse() {
        let id = FingerId::new(Handedness::Left, Finger::Index);
        assert_eq!(id.to_string(), "Left_index");
        assert_eq!("Left_index".parse::<FingerId>().unwrap(), id);
        assert_eq!("right_PINKY".parse::<FingerId>().unwrap().finger, Finger::Pinky);
        assert!("Left-index".parse::<FingerId>().is_err());
        assert!("Middle_index".parse::<FingerId>().is_err());
    }

    #[test]
    fn finger_label_is_title_case() {
        assert_eq!(FingerId::new(Handedness::Right, Finger::Thumb).label(), "Right Thumb");
    }

    #[test]
    fn all_fingers_left_first() {
        let ids: Vec<_> = FingerId::all().collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids[0], FingerId::new(Handedness::Left, Finger::Thumb));
        assert_eq!(ids[9], FingerId::new(Handedness::Right, Finger::Pinky));
    }

    #[test]
    fn landmarks_resolve_to_tip_pixels() {
        let hand =
            HandObservation::from_landmarks(Handedness::Right, 0.9, &skeleton(), 400, 200).unwrap();
        assert_eq!(hand.fingertips.len(), 5);
        // landmark 8: x = 8/40 = 0.2 → 80 px
        assert_eq!(hand.tip(Finger::Index), Some(Point::new(80, 100)));
        assert_eq!(hand.tip(Finger::Pinky), Some(Point::new(200, 100)));
    }

    #[test]
    fn short_skeleton_is_rejected() {
        let err = HandObservation::from_landmarks(Handedness::Left, 1.0, &skeleton()[..20], 10, 10)
            .unwrap_err();
        assert!(matches!(
            err,
            LabError::TooFewLandmarks {
                expected: 21,
                actual: 20
            }
        ));
    }

    #[test]
    fn finger_position_uses_first_matching_hand() {
        let hands = vec![
            HandObservation::new(Handedness::Right, 1.0).with_tip(Finger::Index, Point::new(1, 1)),
            HandObservation::new(Handedness::Right, 1.0).with_tip(Finger::Index, Point::new(2, 2)),
        ];
        let id = FingerId::new(Handedness::Right, Finger::Index);
        assert_eq!(finger_position(&hands, id), Some(Point::new(1, 1)));
        assert_eq!(
            finger_position(&hands, FingerId::new(Handedness::Left, Finger::Index)),
            None
        );
    }
}
