//! Flame-test chemical catalog and mixture table.
//!
//! Each metal salt imparts a characteristic colour to a flame: heated
//! electrons drop back to their ground state and emit light at wavelengths
//! specific to the element.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::LabError;

/// Background shown in the explanation panel and by `flamelab explain`.
pub const FLAME_TEST_THEORY: &str = "Flame tests work because when metal atoms are heated, \
their electrons absorb energy and move to higher energy levels. When these electrons return \
to their ground state, they emit light at specific wavelengths, creating characteristic colors. \
Each element has a unique electron configuration, resulting in unique flame colors.";

/// A metal whose salt can be flame-tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Na,
    K,
    Li,
    Cu,
    Ca,
    Ba,
}

impl Element {
    /// Catalog order.
    pub const ALL: [Self; 6] = [Self::Na, Self::K, Self::Li, Self::Cu, Self::Ca, Self::Ba];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Na => "Na",
            Self::K => "K",
            Self::Li => "Li",
            Self::Cu => "Cu",
            Self::Ca => "Ca",
            Self::Ba => "Ba",
        }
    }

    #[must_use]
    pub fn chemical(self) -> &'static Chemical {
        chemical(self)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.symbol().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LabError::UnknownElement(s.to_string()))
    }
}

/// Static properties of a flame-test salt.
#[derive(Debug, Clone, PartialEq)]
pub struct Chemical {
    pub element: Element,
    pub name: &'static str,
    pub formula: &'static str,
    /// Flame colour.
    pub color: Rgb,
    /// Colour of sparks and embers thrown by the flame.
    pub particle_color: Rgb,
    pub description: &'static str,
    pub safety_warning: &'static str,
    /// Dominant emission wavelength in nanometres.
    pub wavelength_nm: u32,
    /// Relative flame brightness and size in `(0, 1]`.
    pub intensity: f32,
}

static CATALOG: [Chemical; 6] = [
    Chemical {
        element: Element::Na,
        name: "Sodium",
        formula: "NaCl",
        color: Rgb::new(255, 255, 0),
        particle_color: Rgb::new(255, 200, 0),
        description: "Sodium produces a bright yellow flame due to electron transitions in the D-line",
        safety_warning: "Sodium compounds are generally safe but can be irritating. Always wear safety goggles.",
        wavelength_nm: 589,
        intensity: 0.9,
    },
    Chemical {
        element: Element::K,
        name: "Potassium",
        formula: "KCl",
        color: Rgb::new(128, 0, 255),
        particle_color: Rgb::new(255, 0, 200),
        description: "Potassium creates a lilac flame due to multiple electron transitions",
        safety_warning: "Potassium compounds can be reactive. Handle with care and use proper ventilation.",
        wavelength_nm: 766,
        intensity: 0.7,
    },
    Chemical {
        element: Element::Li,
        name: "Lithium",
        formula: "LiCl",
        color: Rgb::new(255, 0, 0),
        particle_color: Rgb::new(255, 100, 0),
        description: "Lithium produces a crimson red flame from electron transitions in the metal atom",
        safety_warning: "Lithium compounds are generally safe but can cause skin irritation.",
        wavelength_nm: 670,
        intensity: 0.8,
    },
    Chemical {
        element: Element::Cu,
        name: "Copper",
        formula: "CuSO\u{2084}",
        color: Rgb::new(0, 255, 128),
        particle_color: Rgb::new(100, 255, 200),
        description: "Copper produces blue-green flames due to electron transitions in copper ions",
        safety_warning: "Copper compounds can be toxic. Avoid inhalation and skin contact.",
        wavelength_nm: 515,
        intensity: 0.85,
    },
    Chemical {
        element: Element::Ca,
        name: "Calcium",
        formula: "CaCl\u{2082}",
        color: Rgb::new(255, 127, 0),
        particle_color: Rgb::new(255, 150, 0),
        description: "Calcium creates an orange-red flame from electron transitions in calcium atoms",
        safety_warning: "Calcium compounds are generally safe but can cause eye irritation.",
        wavelength_nm: 622,
        intensity: 0.75,
    },
    Chemical {
        element: Element::Ba,
        name: "Barium",
        formula: "BaCl\u{2082}",
        color: Rgb::new(128, 255, 0),
        particle_color: Rgb::new(200, 255, 100),
        description: "Barium produces a pale green flame due to electron transitions in barium ions",
        safety_warning: "CAUTION: Barium compounds are toxic. Avoid inhalation and ingestion.",
        wavelength_nm: 554,
        intensity: 0.6,
    },
];

/// The full catalog in display order.
#[must_use]
pub fn catalog() -> &'static [Chemical] {
    &CATALOG
}

#[must_use]
pub fn chemical(element: Element) -> &'static Chemical {
    &CATALOG[element as usize]
}

/// What happens when two burning salts meet.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    pub pair: (Element, Element),
    pub result_color: Rgb,
    pub description: &'static str,
    pub explanation: &'static str,
    pub realistic_note: &'static str,
}

impl Mixture {
    /// Text shown in the explanation panel.
    #[must_use]
    pub fn explanation_text(&self) -> String {
        format!(
            "Chemical Reaction: {}\n\nRealistic Note: {}",
            self.explanation, self.realistic_note
        )
    }
}

static MIXTURES: [Mixture; 6] = [
    Mixture {
        pair: (Element::Na, Element::K),
        result_color: Rgb::new(255, 128, 128),
        description: "Sodium and Potassium create a mixed yellow-purple flame with alternating colors",
        explanation: "Both elements emit simultaneously, creating a flickering effect between yellow and purple",
        realistic_note: "In reality, the stronger sodium yellow often dominates the weaker potassium purple",
    },
    Mixture {
        pair: (Element::Li, Element::Cu),
        result_color: Rgb::new(255, 128, 64),
        description: "Lithium and Copper create a reddish-blue flame with purple tints",
        explanation: "The combination creates intermediate wavelengths between red and blue-green",
        realistic_note: "Real mixtures often show both colors distinctly rather than blending",
    },
    Mixture {
        pair: (Element::Ca, Element::Ba),
        result_color: Rgb::new(191, 191, 0),
        description: "Calcium and Barium create a yellow-green flame with orange highlights",
        explanation: "The orange-red of calcium blends with the pale green of barium",
        realistic_note: "Mixed flames often flicker between the two distinct colors",
    },
    Mixture {
        pair: (Element::Na, Element::Cu),
        result_color: Rgb::new(128, 255, 64),
        description: "Sodium and Copper create a bright green flame with yellow edges",
        explanation: "Yellow sodium light combines with blue-green copper to create green",
        realistic_note: "This is one of the more visually appealing realistic mixtures",
    },
    Mixture {
        pair: (Element::K, Element::Ca),
        result_color: Rgb::new(191, 64, 128),
        description: "Potassium and Calcium create a reddish-purple flame",
        explanation: "The lilac of potassium blends with the orange-red of calcium",
        realistic_note: "Mixed flame often shows distinct regions of each color",
    },
    Mixture {
        pair: (Element::Li, Element::Ba),
        result_color: Rgb::new(255, 128, 0),
        description: "Lithium and Barium create a unique brownish-red flame with green tinges",
        explanation: "Red lithium mixed with green barium creates intermediate brown colors",
        realistic_note: "This mixture often appears muddy in real flame tests",
    },
];

#[must_use]
pub fn mixtures() -> &'static [Mixture] {
    &MIXTURES
}

/// Look up a mixture regardless of the order the pair is given in.
#[must_use]
pub fn mixture(a: Element, b: Element) -> Option<&'static Mixture> {
    MIXTURES
        .iter()
        .find(|m| m.pair == (a, b) || m.pair == (b, a))
}

/// Long-form explanation shown when a salt ignites.
#[must_use]
pub fn explanation(element: Element) -> String {
    let c = chemical(element);
    format!(
        "Chemical: {name} ({formula})\n\n\
         Description: {description}\n\n\
         Wavelength: {nm} nm\n\n\
         Scientific Background: When {name} atoms are heated in a flame, electrons absorb energy \
         and jump to higher energy levels. When they return to ground state, they emit light at \
         characteristic wavelengths, producing the distinctive {name} flame color.\n\n\
         Safety: {safety}",
        name = c.name,
        formula = c.formula,
        description = c.description,
        nm = c.wavelength_nm,
        safety = c.safety_warning,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_element() {
        for e in Element::ALL {
            assert_eq!(chemical(e).element, e);
        }
    }

    #[test]
    fn symbols_parse_case_insensitively() {
        assert_eq!("na".parse::<Element>().unwrap(), Element::Na);
        assert_eq!(" Cu ".parse::<Element>().unwrap(), Element::Cu);
        assert!(matches!(
            "Xx".parse::<Element>(),
            Err(LabError::UnknownElement(s)) if s == "Xx"
        ));
    }

    #[test]
    fn mixture_lookup_is_order_independent() {
        let m = mixture(Element::K, Element::Na).expect("Na+K is registered");
        assert_eq!(m.pair, (Element::Na, Element::K));
        assert_eq!(mixture(Element::Na, Element::K), Some(m));
        assert!(mixture(Element::Na, Element::Li).is_none());
        for m in mixtures() {
            assert_eq!(mixture(m.pair.1, m.pair.0), Some(m));
        }
    }

    #[test]
    fn explanation_mentions_wavelength_and_safety() {
        let text = explanation(Element::Na);
        assert!(text.starts_with("Chemical: Sodium (NaCl)"));
        assert!(text.contains("Wavelength: 589 nm"));
        assert!(text.contains("Safety: Sodium compounds"));
    }

    #[test]
    fn mixture_explanation_format() {
        let m = mixture(Element::Na, Element::Cu).unwrap();
        let text = m.explanation_text();
        assert!(text.starts_with("Chemical Reaction: Yellow sodium"));
        assert!(text.contains("\n\nRealistic Note: This is one"));
    }
}
