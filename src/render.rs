//! TUI rendering traits for medalcal types.
//!
//! Extension traits that add colored terminal rendering to medalcal-core
//! types using owo_colors.

use medalcal_core::diff::{DiffKind, EventDiff, MutationBatch};
use medalcal_core::remote::CalendarInfo;
use medalcal_core::{Color, Event};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

impl Render for EventDiff {
    fn render(&self) -> String {
        let event = self.event();
        let summary = match self.kind {
            DiffKind::Update => event.summary.yellow().to_string(),
            DiffKind::Delete => event.summary.red().to_string(),
        };

        format!("{} {} {}", self.kind.render(), summary, event.start.to_string().dimmed())
    }
}

impl Render for CalendarInfo {
    fn render(&self) -> String {
        if self.primary {
            format!("📅 {} {}", self.name, "(primary)".dimmed())
        } else {
            format!("📅 {}", self.name)
        }
    }
}

fn render_color(color: Option<Color>) -> String {
    match color {
        Some(color) => format!("{} ({})", color, color.id()),
        None => "calendar default".to_string(),
    }
}

/// Show individual events up to this many, counts beyond
const COMPACT_THRESHOLD: usize = 10;

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Field-by-field differences of an update. Rules only touch color and
/// reminders, so those are the only fields shown.
pub fn render_field_diffs(diff: &EventDiff) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(new) = &diff.new {
        let old = &diff.old;
        if old.color.map(Color::id) != new.color.map(Color::id) {
            lines.push(format!(
                "{}: {} → {}",
                "color".dimmed(),
                render_color(old.color).red(),
                render_color(new.color).green()
            ));
        }
        if old.reminders.minutes() != new.reminders.minutes()
            || old.reminders.is_default() != new.reminders.is_default()
        {
            lines.push(format!(
                "{}: {} → {}",
                "reminders".dimmed(),
                old.reminders.to_string().red(),
                new.reminders.to_string().green()
            ));
        }
    }

    lines
}

pub fn render_batch(batch: &MutationBatch, verbose: bool) -> String {
    if batch.is_empty() {
        return "   No changes".dimmed().to_string();
    }

    let mut lines = Vec::new();

    if verbose || batch.len() <= COMPACT_THRESHOLD {
        for diff in batch.iter() {
            lines.push(format!("   {}", diff.render()));
            lines.extend(render_field_diffs(diff).into_iter().map(|l| format!("      {}", l)));
        }
    } else {
        let label = format!("({} changed {})", batch.len(), pluralize("event", batch.len()));
        lines.push(format!("   {} {}", "~".yellow(), label.yellow()));
    }

    lines.join("\n")
}

/// Events the filter removes, rendered as deletions.
pub fn render_unwanted(events: &[Event]) -> String {
    events
        .iter()
        .map(|e| format!("   {}", EventDiff::delete(e.clone()).render()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use medalcal_core::Reminders;

    fn event(summary: &str) -> Event {
        Event {
            id: "e".into(),
            summary: summary.into(),
            ..Default::default()
        }
    }

    #[test]
    fn field_diffs_show_color_and_reminders() {
        let old = event("Speed Skating 🏅");
        let mut new = old.clone();
        new.color = Some(Color::Yellow);
        new.reminders = Reminders::with_minutes([1440, 5]);

        let lines = render_field_diffs(&EventDiff::update(old, new));

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("calendar default"));
        assert!(lines[0].contains("yellow (5)"));
        assert!(lines[1].contains("5m, 1440m"));
    }

    #[test]
    fn unchanged_fields_are_not_listed() {
        let mut old = event("Hockey");
        old.color = Some(Color::Gray);
        let mut new = old.clone();
        new.reminders = Reminders::with_minutes([5]);

        let lines = render_field_diffs(&EventDiff::update(old, new));

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("reminders"));
    }

    #[test]
    fn large_batches_are_compacted() {
        let diffs = (0..12)
            .map(|i| {
                let old = event(&format!("Event {i}"));
                let mut new = old.clone();
                new.color = Some(Color::Green);
                EventDiff::update(old, new)
            })
            .collect();

        let rendered = render_batch(&MutationBatch(diffs), false);

        assert!(rendered.contains("12 changed events"));
        assert!(!rendered.contains("Event 3"));
    }

    #[test]
    fn unwanted_events_render_as_deletions() {
        let rendered = render_unwanted(&[event("Re-Air: Curling"), event("Encore: Luge")]);

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(DiffKind::Delete.symbol()));
        assert!(lines[0].contains("Re-Air: Curling"));
        assert!(lines[1].contains("Encore: Luge"));
    }

    #[test]
    fn delete_diff_shows_the_old_event() {
        let diff = EventDiff::delete(event("Re-Air: Curling"));

        assert!(diff.new.is_none());
        assert_eq!(diff.event().summary, "Re-Air: Curling");
        assert!(diff.render().contains("Re-Air: Curling"));
    }
}
