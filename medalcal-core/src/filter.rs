//! Removal of re-airs and one-off announcement events.

use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::event::Event;
use crate::remote::CalendarRemote;
use crate::rules::Matcher;

/// Asks a human whether an unwanted event should be deleted.
pub trait Confirm {
    fn confirm_delete(&self, event: &Event) -> CoreResult<bool>;
}

/// Answers yes to everything (`--force`).
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm_delete(&self, _event: &Event) -> CoreResult<bool> {
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct Partition {
    pub keep: Vec<Event>,
    pub unwanted: Vec<Event>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub deleted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct UnwantedFilter {
    matcher: Matcher,
}

impl Default for UnwantedFilter {
    fn default() -> Self {
        UnwantedFilter::new(Matcher::Any(vec![
            Matcher::contains_ignore_case("re-air"),
            Matcher::contains("Success! You're connected to NBC Olympics"),
            Matcher::contains("The 2022 Olympic Winter Games are here!"),
        ]))
    }
}

impl UnwantedFilter {
    pub fn new(matcher: Matcher) -> Self {
        UnwantedFilter { matcher }
    }

    pub fn is_unwanted(&self, event: &Event) -> bool {
        self.matcher.matches(&event.summary)
    }

    /// Split `events` into the ones rules should see and the ones to remove.
    /// Fetch order is kept on both sides.
    pub fn partition(&self, events: Vec<Event>) -> Partition {
        let (unwanted, keep): (Vec<Event>, Vec<Event>) =
            events.into_iter().partition(|e| self.is_unwanted(e));
        Partition { keep, unwanted }
    }

    /// Delete each unwanted event the confirmer agrees to. Declined events are
    /// left alone on the remote.
    pub async fn remove<R: CalendarRemote, P: Confirm>(
        &self,
        remote: &R,
        calendar_id: &str,
        unwanted: &[Event],
        confirm: &P,
    ) -> CoreResult<RemovalOutcome> {
        let mut outcome = RemovalOutcome::default();

        if unwanted.is_empty() {
            info!("No events to remove");
            return Ok(outcome);
        }

        for event in unwanted {
            if confirm.confirm_delete(event)? {
                remote
                    .delete_event(calendar_id, &event.id)
                    .await
                    .map_err(CoreError::from)?;
                info!("Removed event: {}", event.summary);
                outcome.deleted += 1;
            } else {
                warn!("Skipped removal of: {}", event.summary);
                outcome.skipped += 1;
            }
        }

        Ok(outcome)
    }
}
