use std::collections::BTreeSet;

use serde::Serialize;

use crate::graph::EventType;

/// Marker hues (degrees) handed out to event types in order, wrapping around.
pub const MARKER_HUES: [f32; 10] = [
    120.0, // green
    270.0, // violet
    60.0,  // yellow
    0.0,   // red
    210.0, // azure
    300.0, // magenta
    180.0, // cyan
    30.0,  // orange
    240.0, // blue
    330.0, // rose
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeHue {
    pub event_type: String,
    pub hue: f32,
}

#[derive(Debug, Clone, Default)]
pub struct EventPalette {
    entries: Vec<EventTypeHue>,
}

impl EventPalette {
    pub fn new(event_types: &BTreeSet<EventType>) -> Self {
        let entries = event_types
            .iter()
            .zip(MARKER_HUES.iter().cycle())
            .map(|(event_type, hue)| EventTypeHue {
                event_type: event_type.to_string(),
                hue: *hue,
            })
            .collect();
        Self { entries }
    }

    /// One entry per event type, in sorted type order.
    pub fn entries(&self) -> &[EventTypeHue] {
        &self.entries
    }
}
