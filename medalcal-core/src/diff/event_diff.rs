use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::DiffKind;
use crate::event::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiff {
    pub kind: DiffKind,
    pub old: Event,
    pub new: Option<Event>,
}

impl fmt::Display for EventDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.event())
    }
}

impl EventDiff {
    pub fn update(old: Event, new: Event) -> Self {
        EventDiff {
            kind: DiffKind::Update,
            old,
            new: Some(new),
        }
    }

    pub fn delete(old: Event) -> Self {
        EventDiff {
            kind: DiffKind::Delete,
            old,
            new: None,
        }
    }

    /// Get the event (prefer new, fallback to old)
    pub fn event(&self) -> &Event {
        self.new.as_ref().unwrap_or(&self.old)
    }
}
