//! Events emitted by the lab state machine.
//!
//! `LabState::update` returns these for every real state change so that
//! renderers can spawn particle effects and the runtime can broadcast them.

use crate::chemicals::Element;
use crate::color::Rgb;
use crate::geometry::Point;
use crate::hands::FingerId;

/// How a finger caught fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionSource {
    /// Held in the ignition area.
    Burner,
    /// Touched another burning finger.
    Transfer { from: FingerId },
}

/// A state change in the lab.
#[derive(Debug, Clone, PartialEq)]
pub enum LabEvent {
    /// A finger picked up a chemical from a bench beaker.
    Dipped {
        finger: FingerId,
        element: Element,
        at: Point,
        /// The dip put out a flame the finger was carrying.
        extinguished: bool,
    },

    /// A finger was washed in the water beaker.
    Cleaned { finger: FingerId, at: Point },

    /// A chemical-coated finger ignited.
    Ignited {
        finger: FingerId,
        element: Element,
        at: Point,
        source: IgnitionSource,
    },

    /// Two burning fingers came into contact.
    Mixed {
        a: FingerId,
        b: FingerId,
        elements: (Element, Element),
        midpoint: Point,
        /// Registered mixture colour, or the average of both flames.
        color: Rgb,
        /// Whether the pair has a registered mixture.
        known: bool,
    },

    /// Every finger was reset.
    Reset,
}

impl LabEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Dipped { .. } => "dipped",
            Self::Cleaned { .. } => "cleaned",
            Self::Ignited { .. } => "ignited",
            Self::Mixed { .. } => "mixed",
            Self::Reset => "reset",
        }
    }

    /// Where the event happened, if it has a location.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::Dipped { at, .. } | Self::Cleaned { at, .. } | Self::Ignited { at, .. } => {
                Some(*at)
            }
            Self::Mixed { midpoint, .. } => Some(*midpoint),
            Self::Reset => None,
        }
    }
}
