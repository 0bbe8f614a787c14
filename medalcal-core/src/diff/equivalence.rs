//! Whether an event still matches its baseline.
//!
//! This is the only gate deciding if an event needs a remote write. It may
//! report a difference that doesn't matter (a wasted write) but must never
//! report two different states as equal (a lost change).

use crate::event::{Event, EventDateTime, Reminders};

pub fn events_equivalent(a: &Event, b: &Event) -> bool {
    a.id == b.id
        && a.summary == b.summary
        && times_equivalent(&a.start, &b.start)
        && times_equivalent(&a.end, &b.end)
        && a.location == b.location
        && a.description == b.description
        && a.color.map(|c| c.id()) == b.color.map(|c| c.id())
        && reminders_equivalent(&a.reminders, &b.reminders)
}

/// Same use-default flag and, for overrides, the same set of (method, minutes).
pub fn reminders_equivalent(a: &Reminders, b: &Reminders) -> bool {
    match (a, b) {
        (Reminders::Default, Reminders::Default) => true,
        (Reminders::Overrides(x), Reminders::Overrides(y)) => x == y,
        _ => false,
    }
}

fn times_equivalent(a: &EventDateTime, b: &EventDateTime) -> bool {
    a.instant() == b.instant() && a.date == b.date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReminderOverride;
    use crate::palette::Color;
    use crate::testing::event;
    use serde_json::json;

    #[test]
    fn override_order_does_not_matter() {
        let a: Event = serde_json::from_value(json!({
            "id": "1",
            "summary": "Gold 🏅",
            "reminders": { "useDefault": false, "overrides": [
                { "method": "popup", "minutes": 5 },
                { "method": "popup", "minutes": 1440 }
            ]}
        }))
        .unwrap();
        let b: Event = serde_json::from_value(json!({
            "id": "1",
            "summary": "Gold 🏅",
            "reminders": { "useDefault": false, "overrides": [
                { "method": "popup", "minutes": 1440 },
                { "method": "popup", "minutes": 5 },
                { "method": "popup", "minutes": 1440 }
            ]}
        }))
        .unwrap();

        assert!(events_equivalent(&a, &b));
    }

    #[test]
    fn color_change_is_a_difference() {
        let a = event("1", "x");
        let mut b = a.clone();
        b.color = Some(Color::Gray);

        assert!(!events_equivalent(&a, &b));
    }

    #[test]
    fn default_and_empty_overrides_differ() {
        let empty = Reminders::Overrides(Default::default());
        assert!(!reminders_equivalent(&Reminders::Default, &empty));
    }

    #[test]
    fn method_is_part_of_the_identity() {
        let popup = Reminders::with_minutes([10]);
        let email = Reminders::Overrides(
            [ReminderOverride {
                minutes: 10,
                method: crate::event::ReminderMethod::Email,
            }]
            .into(),
        );

        assert!(!reminders_equivalent(&popup, &email));
    }

    #[test]
    fn same_instant_in_another_offset_is_equal() {
        let a: Event = serde_json::from_value(json!({
            "id": "1",
            "start": { "dateTime": "2022-02-10T01:05:00-05:00" }
        }))
        .unwrap();
        let b: Event = serde_json::from_value(json!({
            "id": "1",
            "start": { "dateTime": "2022-02-10T06:05:00Z" }
        }))
        .unwrap();

        assert!(events_equivalent(&a, &b));
    }

    #[test]
    fn untouched_fields_still_count() {
        let a = event("1", "x");
        let mut b = a.clone();
        b.location = Some("Beijing".into());

        assert!(!events_equivalent(&a, &b));
    }
}
