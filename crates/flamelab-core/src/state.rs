//! Lab state machine.
//!
//! Tracks what each of the ten fingers is carrying and advances that state
//! from one frame of hand observations. Time is passed in by the caller as
//! the elapsed run time, so the machine itself never reads a clock.
//!
//! State changes are edge-triggered: holding a finger in a beaker or two
//! flames against each other reports once, not once per frame.

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use crate::chemicals::{self, Element};
use crate::color::{self, MixMode};
use crate::events::{IgnitionSource, LabEvent};
use crate::geometry::{Point, distance, point_in_circle};
use crate::hands::{Finger, FingerId, HandObservation, Handedness};
use crate::layout::LabSettings;

const FINGER_COUNT: usize = Handedness::ALL.len() * Finger::ALL.len();

const NO_CHANGE_EXPLANATION: &str =
    "These chemicals don't produce a notable flame color change when mixed.";

/// What a single finger is carrying.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerState {
    pub chemical: Option<Element>,
    pub has_flame: bool,
    /// When the current chemical was picked up.
    pub dipped_at: Option<Duration>,
    /// Current flame brightness in `[0, 1]`, zero when not burning.
    pub flame_intensity: f32,
    pub ignited_at: Option<Duration>,
}

impl FingerState {
    /// Carries a chemical but is not burning.
    #[must_use]
    pub const fn is_primed(&self) -> bool {
        self.chemical.is_some() && !self.has_flame
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub at: Duration,
}

/// The most recent dip, for safety popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DipRecord {
    pub finger: FingerId,
    pub element: Element,
    pub at: Duration,
}

const fn slot(id: FingerId) -> usize {
    id.hand as usize * Finger::ALL.len() + id.finger as usize
}

/// Per-finger chemistry state plus the activity log and explanation panel.
#[derive(Debug, Clone)]
pub struct LabState {
    settings: LabSettings,
    fingers: [FingerState; FINGER_COUNT],
    messages: VecDeque<LogEntry>,
    explanation: String,
    /// Flame pairs in contact during the previous update.
    contacts: BTreeSet<(FingerId, FingerId)>,
    last_dip: Option<DipRecord>,
}

impl Default for LabState {
    fn default() -> Self {
        Self::new(LabSettings::default())
    }
}

impl LabState {
    #[must_use]
    pub fn new(settings: LabSettings) -> Self {
        Self {
            messages: VecDeque::with_capacity(settings.message_capacity),
            settings,
            fingers: [FingerState::default(); FINGER_COUNT],
            explanation: String::new(),
            contacts: BTreeSet::new(),
            last_dip: None,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &LabSettings {
        &self.settings
    }

    #[must_use]
    pub const fn finger(&self, id: FingerId) -> &FingerState {
        &self.fingers[slot(id)]
    }

    fn finger_mut(&mut self, id: FingerId) -> &mut FingerState {
        &mut self.fingers[slot(id)]
    }

    /// All ten fingers, left hand first.
    pub fn fingers(&self) -> impl Iterator<Item = (FingerId, &FingerState)> {
        FingerId::all().map(|id| (id, self.finger(id)))
    }

    /// Activity log, oldest first.
    #[must_use]
    pub const fn messages(&self) -> &VecDeque<LogEntry> {
        &self.messages
    }

    /// Text for the explanation panel; empty until something ignites or mixes.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub const fn last_dip(&self) -> Option<DipRecord> {
        self.last_dip
    }

    /// Distinct chemicals on any finger, in catalog order.
    #[must_use]
    pub fn active_chemicals(&self) -> Vec<Element> {
        let present: BTreeSet<Element> = self.fingers.iter().filter_map(|f| f.chemical).collect();
        Element::ALL
            .into_iter()
            .filter(|e| present.contains(e))
            .collect()
    }

    #[must_use]
    pub fn flaming_fingers(&self) -> Vec<FingerId> {
        self.fingers()
            .filter(|(_, f)| f.has_flame)
            .map(|(id, _)| id)
            .collect()
    }

    /// Advance the lab by one frame.
    ///
    /// `now` is the elapsed run time. Returns the state changes this frame
    /// caused, in the order they happened.
    pub fn update(
        &mut self,
        hands: &[HandObservation],
        width: u32,
        height: u32,
        now: Duration,
    ) -> Vec<LabEvent> {
        let mut events = Vec::new();
        let beakers = self.settings.bench_beakers(width, height);
        let water = self.settings.water_center(width, height);
        let ignition = self.settings.ignition_area(width, height);
        let radius = self.settings.interaction_radius;

        for hand in hands {
            for (id, pos) in hand.tips() {
                // Overlapping beakers: only the closest one takes the dip.
                let nearest = beakers
                    .iter()
                    .filter(|beaker| point_in_circle(pos, beaker.center, radius))
                    .min_by(|a, b| {
                        distance(pos, a.center).total_cmp(&distance(pos, b.center))
                    });
                if let Some(beaker) = nearest {
                    self.dip(id, beaker.element, pos, now, &mut events);
                }

                if point_in_circle(pos, water, radius) {
                    self.clean(id, pos, now, &mut events);
                }

                if ignition.contains(pos) && self.finger(id).is_primed() {
                    self.ignite(id, pos, IgnitionSource::Burner, now, &mut events);
                }
            }
        }

        self.check_contacts(hands, now, &mut events);
        self.update_intensities(now);
        events
    }

    fn dip(
        &mut self,
        id: FingerId,
        element: Element,
        at: Point,
        now: Duration,
        events: &mut Vec<LabEvent>,
    ) {
        let state = self.finger_mut(id);
        let extinguished = state.has_flame;
        if state.chemical == Some(element) && !extinguished {
            return;
        }

        *state = FingerState {
            chemical: Some(element),
            has_flame: false,
            dipped_at: Some(now),
            flame_intensity: 0.0,
            ignited_at: None,
        };
        self.last_dip = Some(DipRecord {
            finger: id,
            element,
            at: now,
        });

        let chem = chemicals::chemical(element);
        tracing::debug!(finger = %id, element = %element, extinguished, "Finger dipped");
        self.log(format!("{id} dipped in {} ({element})", chem.name), now);
        self.log(format!("Safety: {}", chem.safety_warning), now);
        events.push(LabEvent::Dipped {
            finger: id,
            element,
            at,
            extinguished,
        });
    }

    fn clean(&mut self, id: FingerId, at: Point, now: Duration, events: &mut Vec<LabEvent>) {
        let state = self.finger(id);
        if state.chemical.is_none() && !state.has_flame {
            return;
        }

        self.reset_finger(id);
        tracing::debug!(finger = %id, "Finger cleaned");
        self.log(format!("{id} cleaned with water"), now);
        events.push(LabEvent::Cleaned { finger: id, at });
    }

    fn ignite(
        &mut self,
        id: FingerId,
        at: Point,
        source: IgnitionSource,
        now: Duration,
        events: &mut Vec<LabEvent>,
    ) {
        let state = self.finger_mut(id);
        let Some(element) = state.chemical else {
            return;
        };
        state.has_flame = true;
        state.flame_intensity = 1.0;
        state.ignited_at = Some(now);

        let chem = chemicals::chemical(element);
        let details = chemicals::explanation(element);
        match source {
            IgnitionSource::Burner => {
                self.log(format!("{id} ignited with {}!", chem.name), now);
                self.explanation = details;
            }
            IgnitionSource::Transfer { .. } => {
                self.log(
                    format!("{id} ignited by flame transfer with {}!", chem.name),
                    now,
                );
                self.explanation = format!(
                    "Flame Transfer: {id} was ignited by touching another flame. {details}"
                );
            }
        }

        tracing::debug!(finger = %id, element = %element, ?source, "Finger ignited");
        events.push(LabEvent::Ignited {
            finger: id,
            element,
            at,
            source,
        });
    }

    fn check_contacts(&mut self, hands: &[HandObservation], now: Duration, events: &mut Vec<LabEvent>) {
        let mut flaming: Vec<(FingerId, Point)> = Vec::new();
        let mut primed: Vec<(FingerId, Point)> = Vec::new();
        let mut seen = BTreeSet::new();

        for hand in hands {
            for (id, pos) in hand.tips() {
                // A duplicated hand label resolves to its first observation.
                if !seen.insert(id) {
                    continue;
                }
                let state = self.finger(id);
                if state.has_flame {
                    flaming.push((id, pos));
                } else if state.chemical.is_some() {
                    primed.push((id, pos));
                }
            }
        }

        let mut contacts = BTreeSet::new();
        for (i, &(a, pa)) in flaming.iter().enumerate() {
            for &(b, pb) in &flaming[i + 1..] {
                if distance(pa, pb) > self.settings.mix_distance {
                    continue;
                }
                let pair = if a < b { (a, b) } else { (b, a) };
                contacts.insert(pair);
                if !self.contacts.contains(&pair) {
                    self.mix(a, b, pa.midpoint(pb), now, events);
                }
            }
        }
        self.contacts = contacts;

        for &(source, flame_pos) in &flaming {
            for &(target, target_pos) in &primed {
                if self.finger(target).has_flame {
                    continue;
                }
                if distance(flame_pos, target_pos) <= self.settings.transfer_distance {
                    self.ignite(
                        target,
                        target_pos,
                        IgnitionSource::Transfer { from: source },
                        now,
                        events,
                    );
                }
            }
        }
    }

    fn mix(
        &mut self,
        a: FingerId,
        b: FingerId,
        midpoint: Point,
        now: Duration,
        events: &mut Vec<LabEvent>,
    ) {
        let (Some(ea), Some(eb)) = (self.finger(a).chemical, self.finger(b).chemical) else {
            return;
        };
        if ea == eb {
            return;
        }

        let (color, known) = if let Some(mixture) = chemicals::mixture(ea, eb) {
            self.log(format!("Mixing {ea} + {eb}: {}", mixture.description), now);
            self.explanation = mixture.explanation_text();
            (mixture.result_color, true)
        } else {
            self.log(
                format!("Mixing {ea} + {eb}: No significant color change observed"),
                now,
            );
            self.explanation = NO_CHANGE_EXPLANATION.to_string();
            let color = color::mix(
                chemicals::chemical(ea).color,
                chemicals::chemical(eb).color,
                MixMode::Average,
            );
            (color, false)
        };

        tracing::debug!(%a, %b, known, "Flames mixed");
        events.push(LabEvent::Mixed {
            a,
            b,
            elements: (ea, eb),
            midpoint,
            color,
            known,
        });
    }

    fn update_intensities(&mut self, now: Duration) {
        let flicker = 0.1 * (now.as_secs_f32() * 10.0).sin();
        for state in self.fingers.iter_mut().filter(|f| f.has_flame) {
            let since = state
                .ignited_at
                .map_or(0.0, |t| now.saturating_sub(t).as_secs_f32());
            let base = 0.1f32.mul_add(-since, 1.0).max(0.5);
            state.flame_intensity = (base + flicker).min(1.0);
        }
    }

    /// Clear one finger back to bare skin.
    pub fn reset_finger(&mut self, id: FingerId) {
        *self.finger_mut(id) = FingerState::default();
        self.contacts.retain(|(a, b)| *a != id && *b != id);
    }

    /// Clear every finger, the activity log and the explanation panel.
    pub fn reset_all(&mut self) {
        self.fingers = [FingerState::default(); FINGER_COUNT];
        self.contacts.clear();
        self.messages.clear();
        self.explanation.clear();
        self.last_dip = None;
        tracing::info!("Lab reset");
    }

    fn log(&mut self, message: String, at: Duration) {
        while self.messages.len() >= self.settings.message_capacity.max(1) {
            self.messages.pop_front();
        }
        self.messages.push_back(LogEntry { message, at });
    }
}
