//! Applies mutations to the remote calendar, one event at a time.

use tracing::{error, info, warn};

use crate::diff::MutationBatch;
use crate::error::{CoreResult, RemoteError};
use crate::event::Event;
use crate::remote::CalendarRemote;
use crate::retry::RetryPolicy;

pub struct UpdateExecutor<'a, R> {
    remote: &'a R,
    calendar_id: String,
    policy: RetryPolicy,
}

impl<'a, R: CalendarRemote> UpdateExecutor<'a, R> {
    pub fn new(remote: &'a R, calendar_id: &str, policy: RetryPolicy) -> Self {
        UpdateExecutor {
            remote,
            calendar_id: calendar_id.to_string(),
            policy,
        }
    }

    /// Send the full event to the remote.
    ///
    /// Only `RateLimited` is retried; any other error is returned as-is. When
    /// the retry budget runs out the last rate-limit error is returned.
    pub async fn update(&self, event: &Event) -> Result<Event, RemoteError> {
        info!("Updating event: {}", event.summary);

        let max_retries = self.policy.max_retries();
        let mut retries = 0;

        loop {
            match self.remote.update_event(&self.calendar_id, event).await {
                Ok(updated) => {
                    info!("Event updated successfully: {}", event.summary);
                    return Ok(updated);
                }
                Err(e) if e.is_rate_limited() && retries < max_retries => {
                    let delay = self.policy.delay(retries, &mut rand::thread_rng());
                    retries += 1;
                    warn!(
                        "Rate limited (retry {}/{}), retrying in {:.2} seconds",
                        retries,
                        max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_rate_limited() {
                        error!("Exceeded maximum number of retries for: {}", event.summary);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Apply every diff in order. The first failure aborts the rest.
    pub async fn execute(&self, batch: &MutationBatch) -> CoreResult<usize> {
        let mut updated = 0;

        for event in batch.events() {
            self.update(event).await?;
            updated += 1;
        }

        Ok(updated)
    }
}
