//! One-line descriptions of lab events for the run log.

use flamelab_core::{IgnitionSource, LabEvent};

/// Describe `event` the way the activity log would.
pub fn describe_event(event: &LabEvent) -> String {
    match event {
        LabEvent::Dipped {
            finger,
            element,
            extinguished,
            ..
        } => {
            let name = element.chemical().name;
            if *extinguished {
                format!("{} dipped in {name}, flame put out", finger.label())
            } else {
                format!("{} dipped in {name}", finger.label())
            }
        }
        LabEvent::Cleaned { finger, .. } => format!("{} washed", finger.label()),
        LabEvent::Ignited {
            finger,
            element,
            source,
            ..
        } => match source {
            IgnitionSource::Burner => {
                format!("{} ignited: {} flame", finger.label(), element.chemical().name)
            }
            IgnitionSource::Transfer { from } => format!(
                "{} caught a {} flame from {}",
                finger.label(),
                element.chemical().name,
                from.label()
            ),
        },
        LabEvent::Mixed {
            a,
            b,
            elements: (x, y),
            known,
            ..
        } => {
            let suffix = if *known { "" } else { " (no known mixture)" };
            format!("{} + {} mixed {x}/{y}{suffix}", a.label(), b.label())
        }
        LabEvent::Reset => "All fingers reset".to_string(),
    }
}
