//! The fetched events plus the baseline copy they converge from.

use crate::diff::MutationBatch;
use crate::error::CoreResult;
use crate::event::Event;
use crate::rules::RuleSet;

pub struct Snapshot {
    events: Vec<Event>,
    baseline: Vec<Event>,
}

impl Snapshot {
    /// Take the baseline copy. Call this after filtering and before rules run.
    pub fn capture(events: Vec<Event>) -> Self {
        let baseline = events.clone();
        Snapshot { events, baseline }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn baseline(&self) -> &[Event] {
        &self.baseline
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Run the rule set over every event in place. The baseline is untouched.
    pub fn apply_rules(&mut self, rules: &RuleSet) {
        for event in &mut self.events {
            rules.apply(event);
        }
    }

    pub fn mutation_batch(&self) -> CoreResult<MutationBatch> {
        MutationBatch::build(&self.events, &self.baseline)
    }
}
