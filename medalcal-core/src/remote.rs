//! Transport boundaries for the remote calendar and the lights.
//!
//! Concrete transports live in the provider crates. The core only sees these
//! traits, so every component receives its client explicitly.

#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::event::Event;
use crate::light::LightState;

/// A calendar visible to the authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

pub trait CalendarRemote {
    /// All calendars on the account's calendar list.
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>, RemoteError>;

    /// Resolve a calendar by its exact (case-sensitive) display name.
    async fn find_calendar(&self, name: &str) -> Result<CalendarInfo, RemoteError> {
        self.list_calendars()
            .await?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RemoteError::NotFound(format!("calendar '{}'", name)))
    }

    /// Single-occurrence events starting from `time_min`, ordered by start time.
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<Event>, RemoteError>;

    /// Replace the remote event with `event` (matched by id).
    async fn update_event(&self, calendar_id: &str, event: &Event) -> Result<Event, RemoteError>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), RemoteError>;
}

pub trait LightRemote {
    /// Set every light to `state`. Zero brightness turns them off.
    async fn set_all(&self, state: &LightState) -> Result<(), RemoteError>;
}
