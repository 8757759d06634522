use std::cell::Cell;

use web_time::Instant;

/// An event delivered to listeners bound through `on*` props.
#[derive(Debug)]
pub struct Event {
    kind: String,
    time_stamp: Instant,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub fn new(kind: impl Into<String>, time_stamp: Instant) -> Self {
        Self {
            kind: kind.into(),
            time_stamp,
            propagation_stopped: Cell::new(false),
        }
    }

    /// Event name, lowercase (`"click"`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn time_stamp(&self) -> Instant {
        self.time_stamp
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// `onClick` → `click`. `None` for keys that do not bind an event.
pub fn event_name(key: &str) -> Option<String> {
    let rest = key.strip_prefix("on")?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase())
}
