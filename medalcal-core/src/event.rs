//! Typed calendar event records.
//!
//! The shape follows the Google Calendar v3 `Event` resource. Only the fields
//! the reconciler reads or writes are typed; everything else is carried in
//! `extra` so a full-replacement update sends it back untouched.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::palette::Color;

/// A calendar event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
    /// Absent means the calendar's default color
    #[serde(rename = "colorId", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub reminders: Reminders,

    /// Wire fields the reconciler never touches (attendees, etag, creator, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Whether the event is running at `now`. All-day events never are.
    pub fn is_in_progress(&self, now: DateTime<Utc>) -> bool {
        match (self.start.instant(), self.end.instant()) {
            (Some(start), Some(end)) => start <= now && now < end,
            _ => false,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

/// Start or end of an event. Timed events carry `date_time`, all-day events `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn at(instant: DateTime<Utc>) -> Self {
        EventDateTime {
            date_time: Some(instant.fixed_offset()),
            date: None,
            time_zone: None,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.date_time.map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Display for EventDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.date_time, &self.date) {
            (Some(dt), _) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            (None, Some(d)) => write!(f, "{}", d.format("%Y-%m-%d")),
            (None, None) => write!(f, "(no time)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Popup,
    Email,
}

/// A (method, minutes-before-start) notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub minutes: i64,
    pub method: ReminderMethod,
}

impl ReminderOverride {
    pub fn popup(minutes: i64) -> Self {
        ReminderOverride {
            minutes,
            method: ReminderMethod::Popup,
        }
    }
}

/// Reminder configuration of an event.
///
/// Overrides are held as a set, so duplicates from the wire collapse on read
/// and list order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RemindersWire", into = "RemindersWire")]
pub enum Reminders {
    /// `{useDefault: true}`
    #[default]
    Default,
    /// `{useDefault: false, overrides: [...]}`
    Overrides(BTreeSet<ReminderOverride>),
}

impl Reminders {
    pub fn with_minutes(minutes: impl IntoIterator<Item = i64>) -> Self {
        let mut reminders = Reminders::Default;
        for m in minutes {
            reminders.add_minutes(m);
        }
        reminders
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Reminders::Default)
    }

    /// Add a popup reminder unless one already fires at `minutes`.
    pub fn add_minutes(&mut self, minutes: i64) {
        if let Reminders::Default = self {
            *self = Reminders::Overrides(BTreeSet::new());
        }

        if let Reminders::Overrides(overrides) = self {
            if !overrides.iter().any(|o| o.minutes == minutes) {
                overrides.insert(ReminderOverride::popup(minutes));
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Reminders::Default;
    }

    pub fn minutes(&self) -> BTreeSet<i64> {
        match self {
            Reminders::Default => BTreeSet::new(),
            Reminders::Overrides(overrides) => overrides.iter().map(|o| o.minutes).collect(),
        }
    }
}

impl fmt::Display for Reminders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reminders::Default => write!(f, "default"),
            Reminders::Overrides(overrides) if overrides.is_empty() => write!(f, "none"),
            Reminders::Overrides(overrides) => {
                let parts: Vec<String> = overrides
                    .iter()
                    .map(|o| match o.method {
                        ReminderMethod::Popup => format!("{}m", o.minutes),
                        ReminderMethod::Email => format!("{}m (email)", o.minutes),
                    })
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemindersWire {
    #[serde(default)]
    use_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overrides: Option<Vec<ReminderOverride>>,
}

impl From<RemindersWire> for Reminders {
    fn from(wire: RemindersWire) -> Self {
        if wire.use_default {
            Reminders::Default
        } else {
            Reminders::Overrides(wire.overrides.unwrap_or_default().into_iter().collect())
        }
    }
}

impl From<Reminders> for RemindersWire {
    fn from(reminders: Reminders) -> Self {
        match reminders {
            Reminders::Default => RemindersWire {
                use_default: true,
                overrides: None,
            },
            Reminders::Overrides(overrides) => RemindersWire {
                use_default: false,
                overrides: Some(overrides.into_iter().collect()),
            },
        }
    }
}
