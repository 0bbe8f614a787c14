//! Light color selection for in-progress events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::event::Event;
use crate::filter::UnwantedFilter;
use crate::remote::{CalendarRemote, LightRemote};
use crate::rules::RuleSet;

/// A light color in HSBK terms (brightness lives on [`LightState`])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightColor {
    /// Degrees, 0..360
    pub hue: f64,
    /// 0.0..=1.0
    pub saturation: f64,
    pub kelvin: u16,
}

impl LightColor {
    pub const GOLD: LightColor = LightColor::hue(45.0);
    pub const BLUE: LightColor = LightColor::hue(210.0);
    pub const DEEP_BLUE: LightColor = LightColor::hue(240.0);
    pub const GREEN: LightColor = LightColor::hue(120.0);

    pub const fn hue(hue: f64) -> Self {
        LightColor {
            hue,
            saturation: 1.0,
            kelvin: 3500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub color: Option<LightColor>,
    /// 0.0 means off
    pub brightness: f64,
}

impl LightState {
    pub fn off() -> Self {
        LightState {
            color: None,
            brightness: 0.0,
        }
    }

    pub fn on(color: LightColor, brightness: f64) -> Self {
        LightState {
            color: Some(color),
            brightness: brightness.clamp(0.0, 1.0),
        }
    }

    pub fn is_on(&self) -> bool {
        self.brightness > 0.0
    }
}

pub fn in_progress(events: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    events.iter().filter(|e| e.is_in_progress(now)).collect()
}

/// Pick the light of the highest-priority rule matching any running event.
pub fn select_light<'a>(
    rules: &RuleSet,
    running: impl IntoIterator<Item = &'a Event>,
) -> Option<LightColor> {
    running
        .into_iter()
        .filter_map(|e| rules.light_for(&e.summary))
        .max_by_key(|(index, _)| *index)
        .map(|(_, color)| color)
}

/// One polling iteration of the color-driving variant.
pub struct LightDriver<'a, C, L> {
    calendar: &'a C,
    lights: &'a L,
    rules: &'a RuleSet,
    filter: &'a UnwantedFilter,
    calendar_id: String,
    time_min: DateTime<Utc>,
    brightness: f64,
}

impl<'a, C: CalendarRemote, L: LightRemote> LightDriver<'a, C, L> {
    pub fn new(
        calendar: &'a C,
        lights: &'a L,
        rules: &'a RuleSet,
        filter: &'a UnwantedFilter,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        brightness: f64,
    ) -> Self {
        LightDriver {
            calendar,
            lights,
            rules,
            filter,
            calendar_id: calendar_id.to_string(),
            time_min,
            brightness,
        }
    }

    /// Fetch fresh events, pick a light for `now` and push it.
    pub async fn tick(&self, now: DateTime<Utc>) -> CoreResult<LightState> {
        let events = self
            .calendar
            .list_events(&self.calendar_id, self.time_min)
            .await?;
        let partition = self.filter.partition(events);

        let running = in_progress(&partition.keep, now);
        debug!("{} event(s) in progress", running.len());

        let state = match select_light(self.rules, running) {
            Some(color) => LightState::on(color, self.brightness),
            None => LightState::off(),
        };

        if state.is_on() {
            info!("Setting lights to hue {:.0}", state.color.map(|c| c.hue).unwrap_or(0.0));
        } else {
            info!("No matching event in progress, lights off");
        }

        self.lights.set_all(&state).await.map_err(CoreError::Lights)?;
        Ok(state)
    }
}
