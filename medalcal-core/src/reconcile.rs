//! One reconciliation run: fetch, filter, apply rules, diff, update.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::diff::MutationBatch;
use crate::error::CoreResult;
use crate::event::Event;
use crate::executor::UpdateExecutor;
use crate::filter::{Confirm, Partition, RemovalOutcome, UnwantedFilter};
use crate::remote::{CalendarInfo, CalendarRemote};
use crate::retry::RetryPolicy;
use crate::rules::RuleSet;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute the batch but don't delete or update anything
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub calendar: CalendarInfo,
    pub fetched: usize,
    pub unwanted: Vec<Event>,
    pub removal: RemovalOutcome,
    pub batch: MutationBatch,
    pub updated: usize,
}

pub struct Reconciler<'a, R> {
    remote: &'a R,
    rules: &'a RuleSet,
    filter: &'a UnwantedFilter,
    policy: RetryPolicy,
}

impl<'a, R: CalendarRemote> Reconciler<'a, R> {
    pub fn new(
        remote: &'a R,
        rules: &'a RuleSet,
        filter: &'a UnwantedFilter,
        policy: RetryPolicy,
    ) -> Self {
        Reconciler {
            remote,
            rules,
            filter,
            policy,
        }
    }

    pub async fn run<P: Confirm>(
        &self,
        calendar_name: &str,
        time_min: DateTime<Utc>,
        confirm: &P,
        options: RunOptions,
    ) -> CoreResult<RunReport> {
        let calendar = self.remote.find_calendar(calendar_name).await?;
        info!("Getting events from calendar: {} ({})", calendar.name, calendar.id);

        let events = self.remote.list_events(&calendar.id, time_min).await?;
        let fetched = events.len();

        let Partition { keep, unwanted } = self.filter.partition(events);
        info!("Fetched {} events, {} unwanted", fetched, unwanted.len());

        let removal = if options.dry_run {
            RemovalOutcome::default()
        } else {
            self.filter
                .remove(self.remote, &calendar.id, &unwanted, confirm)
                .await?
        };

        let mut snapshot = Snapshot::capture(keep);
        snapshot.apply_rules(self.rules);
        let batch = snapshot.mutation_batch()?;
        info!("{} of {} events need updating", batch.len(), snapshot.len());

        let updated = if options.dry_run || batch.is_empty() {
            0
        } else {
            UpdateExecutor::new(self.remote, &calendar.id, self.policy.clone())
                .execute(&batch)
                .await?
        };

        info!("Run complete: {} events updated", updated);

        Ok(RunReport {
            calendar,
            fetched,
            unwanted,
            removal,
            batch,
            updated,
        })
    }
}
