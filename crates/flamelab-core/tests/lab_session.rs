//! Integration tests for a full `LabState` session.
//!
//! A two-handed demonstration is driven frame by frame through the public
//! API: dip, ignite, transfer, mix, clean and reset. Positions are resolved
//! from the layout rather than hard-coded, so the tests follow the default
//! bench configuration.

use std::time::Duration;

use flamelab_core::{
    Element, Finger, FingerId, HandObservation, Handedness, IgnitionSource, LabEvent, LabSettings,
    LabState, Point,
};

const W: u32 = 1280;
const H: u32 = 720;

// ── Helpers ────────────────────────────────────────────────────────

fn beaker(lab: &LabState, element: Element) -> Point {
    lab.settings()
        .bench_beakers(W, H)
        .into_iter()
        .find(|b| b.element == element)
        .map(|b| b.center)
        .expect("element is on the bench")
}

fn burner(lab: &LabState) -> Point {
    lab.settings().ignition_area(W, H).center()
}

fn tip(hand: Handedness, finger: Finger, at: Point) -> HandObservation {
    HandObservation::new(hand, 0.95).with_tip(finger, at)
}

fn at(frame: u32) -> Duration {
    Duration::from_millis(u64::from(frame) * 33)
}

// ── Tests ──────────────────────────────────────────────────────────

#[test]
fn two_handed_demonstration() {
    let mut lab = LabState::default();
    let left = FingerId::new(Handedness::Left, Finger::Index);
    let right = FingerId::new(Handedness::Right, Finger::Middle);

    // Left index: sodium, then the burner.
    let events = lab.update(
        &[tip(Handedness::Left, Finger::Index, beaker(&lab, Element::Na))],
        W,
        H,
        at(0),
    );
    assert!(matches!(events.as_slice(), [LabEvent::Dipped { .. }]));
    let events = lab.update(
        &[tip(Handedness::Left, Finger::Index, burner(&lab))],
        W,
        H,
        at(10),
    );
    assert!(matches!(
        events.as_slice(),
        [LabEvent::Ignited {
            source: IgnitionSource::Burner,
            ..
        }]
    ));

    // Right middle: potassium, lit from the left flame.
    lab.update(
        &[tip(Handedness::Right, Finger::Middle, beaker(&lab, Element::K))],
        W,
        H,
        at(20),
    );
    let hands = [
        tip(Handedness::Left, Finger::Index, Point::new(700, 300)),
        tip(Handedness::Right, Finger::Middle, Point::new(730, 300)),
    ];
    let events = lab.update(&hands, W, H, at(30));
    assert!(matches!(
        events.as_slice(),
        [LabEvent::Ignited {
            source: IgnitionSource::Transfer { .. },
            ..
        }]
    ));
    assert_eq!(lab.flaming_fingers(), vec![left, right]);

    // Both burning and still touching: the contact starts now and mixes once.
    let events = lab.update(&hands, W, H, at(31));
    assert!(matches!(
        events.as_slice(),
        [LabEvent::Mixed { known: true, elements: (Element::Na, Element::K), .. }]
    ));
    assert!(lab.update(&hands, W, H, at(32)).is_empty());
    assert!(lab.explanation().contains("Realistic Note:"));

    // Wash the left hand.
    let water = lab.settings().water_center(W, H);
    let events = lab.update(&[tip(Handedness::Left, Finger::Index, water)], W, H, at(40));
    assert!(matches!(events.as_slice(), [LabEvent::Cleaned { .. }]));
    assert_eq!(lab.active_chemicals(), vec![Element::K]);

    lab.reset_all();
    assert!(lab.flaming_fingers().is_empty());
    assert!(lab.messages().is_empty());
}

#[test]
fn custom_layout_moves_interaction_targets() {
    let mut settings = LabSettings::default();
    settings.bench_offset = 300;
    settings.interaction_radius = 10.0;
    let mut lab = LabState::new(settings);

    // The default bench row is no longer a target.
    let events = lab.update(
        &[tip(Handedness::Right, Finger::Thumb, Point::new(102, 580))],
        W,
        H,
        Duration::ZERO,
    );
    assert!(events.is_empty());

    let events = lab.update(
        &[tip(Handedness::Right, Finger::Thumb, Point::new(105, 420))],
        W,
        H,
        Duration::ZERO,
    );
    assert!(matches!(
        events.as_slice(),
        [LabEvent::Dipped {
            element: Element::Na,
            ..
        }]
    ));
}

#[test]
fn fingers_outside_any_target_change_nothing() {
    let mut lab = LabState::default();
    let hands: Vec<_> = (0..20)
        .map(|i| tip(Handedness::Left, Finger::Ring, Point::new(900 + i, 400)))
        .collect();
    for (i, hand) in hands.iter().enumerate() {
        let events = lab.update(std::slice::from_ref(hand), W, H, at(i as u32));
        assert!(events.is_empty());
    }
    assert!(lab.fingers().all(|(_, f)| f.chemical.is_none()));
}
