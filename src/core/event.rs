//! Event identifiers.

use std::fmt;

/// Identifier of the event a behavior is bound to.
///
/// Event-bound activities close over one of these so that the execution
/// context reports which event is being handled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    name: String,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_displays_its_name() {
        let event = Event::new("OrderSubmitted");
        assert_eq!(event.name(), "OrderSubmitted");
        assert_eq!(event.to_string(), "OrderSubmitted");
    }

    #[test]
    fn events_compare_by_name() {
        assert_eq!(Event::new("A"), Event::new("A"));
        assert_ne!(Event::new("A"), Event::new("B"));
    }
}
