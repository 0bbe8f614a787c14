//! The ordered set of events that need a remote write.

use std::collections::HashMap;

use crate::diff::{EventDiff, events_equivalent};
use crate::error::{CoreError, CoreResult};
use crate::event::Event;
use crate::palette::Color;

#[derive(Debug, Clone, Default)]
pub struct MutationBatch(pub Vec<EventDiff>);

impl MutationBatch {
    /// Diff rule-applied `current` events against their `baseline` copies.
    ///
    /// Output follows the order of `current`. Every current event must have
    /// exactly one baseline entry with the same id.
    pub fn build(current: &[Event], baseline: &[Event]) -> CoreResult<Self> {
        let mut baseline_by_id: HashMap<&str, &Event> = HashMap::with_capacity(baseline.len());
        for event in baseline {
            if baseline_by_id.insert(event.id.as_str(), event).is_some() {
                return Err(CoreError::DuplicateBaseline(event.id.clone()));
            }
        }

        let mut diffs = Vec::new();
        for event in current {
            let old = baseline_by_id
                .get(event.id.as_str())
                .ok_or_else(|| CoreError::MissingBaseline(event.id.clone()))?;

            if !events_equivalent(old, event) {
                diffs.push(EventDiff::update((*old).clone(), event.clone()));
            }
        }

        Ok(MutationBatch(diffs))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDiff> {
        self.0.iter()
    }

    /// The post-rule events, in update order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.0.iter().map(|d| d.event())
    }

    /// Keep only the updates that leave an event with `color`.
    pub fn retain_color(&mut self, color: Color) {
        self.0.retain(|d| d.event().color == Some(color));
    }
}
