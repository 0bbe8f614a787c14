//! In-memory transports and event builders for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{CoreResult, RemoteError};
use crate::event::{Event, EventDateTime};
use crate::filter::Confirm;
use crate::light::LightState;
use crate::remote::{CalendarInfo, CalendarRemote, LightRemote};

pub fn event(id: &str, summary: &str) -> Event {
    Event {
        id: id.to_string(),
        summary: summary.to_string(),
        ..Default::default()
    }
}

pub fn timed_event(id: &str, summary: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
    Event {
        start: EventDateTime::at(start),
        end: EventDateTime::at(end),
        ..event(id, summary)
    }
}

pub fn rate_limited() -> RemoteError {
    RemoteError::RateLimited("Rate Limit Exceeded".to_string())
}

#[derive(Default)]
struct CalendarState {
    calendars: Vec<CalendarInfo>,
    events: Vec<Event>,
    update_script: VecDeque<Result<(), RemoteError>>,
    update_calls: usize,
    updated_ids: Vec<String>,
    deleted: Vec<String>,
}

pub struct FakeCalendar {
    state: Mutex<CalendarState>,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<Event>) -> Self {
        FakeCalendar {
            state: Mutex::new(CalendarState {
                calendars: vec![
                    CalendarInfo {
                        id: "primary@example.com".into(),
                        name: "Personal".into(),
                        primary: true,
                    },
                    CalendarInfo {
                        id: "cal".into(),
                        name: "NBC Sports".into(),
                        primary: false,
                    },
                ],
                events,
                ..Default::default()
            }),
        }
    }

    /// Queue responses for upcoming `update_event` calls. `Ok(())` lets the
    /// call through; once the queue is empty every call succeeds.
    pub fn script_updates(&self, script: impl IntoIterator<Item = Result<(), RemoteError>>) {
        self.state.lock().unwrap().update_script.extend(script);
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().updated_ids.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn remote_event(&self, id: &str) -> Option<Event> {
        let state = self.state.lock().unwrap();
        state.events.iter().find(|e| e.id == id).cloned()
    }
}

impl CalendarRemote for FakeCalendar {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>, RemoteError> {
        Ok(self.state.lock().unwrap().calendars.clone())
    }

    async fn list_events(
        &self,
        _calendar_id: &str,
        _time_min: DateTime<Utc>,
    ) -> Result<Vec<Event>, RemoteError> {
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn update_event(&self, _calendar_id: &str, event: &Event) -> Result<Event, RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;

        if let Some(Err(e)) = state.update_script.pop_front() {
            return Err(e);
        }

        let slot = state
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| RemoteError::NotFound(event.id.clone()))?;
        *slot = event.clone();
        state.updated_ids.push(event.id.clone());

        Ok(event.clone())
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.events.retain(|e| e.id != event_id);
        state.deleted.push(event_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLights {
    states: Mutex<Vec<LightState>>,
    failure: Option<RemoteError>,
}

impl FakeLights {
    /// Lights that reject every update with `err`.
    pub fn failing(err: RemoteError) -> Self {
        FakeLights {
            failure: Some(err),
            ..Default::default()
        }
    }

    pub fn states(&self) -> Vec<LightState> {
        self.states.lock().unwrap().clone()
    }
}

impl LightRemote for FakeLights {
    async fn set_all(&self, state: &LightState) -> Result<(), RemoteError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.states.lock().unwrap().push(*state);
        Ok(())
    }
}

/// Replies with the given answers in order, then "no".
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        ScriptedConfirm {
            answers: Mutex::new(answers.iter().copied().collect()),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm_delete(&self, _event: &Event) -> CoreResult<bool> {
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}
