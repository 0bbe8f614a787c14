//! Google Calendar v3 REST calls.

use chrono::{DateTime, SecondsFormat, Utc};
use medalcal_core::remote::{CalendarInfo, CalendarRemote};
use medalcal_core::{Event, RemoteError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{classify, transport};

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Page size for events.list (Google caps it at 2500).
const MAX_RESULTS: &str = "999";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListEntry {
    id: String,
    /// The calendar's own title. `summaryOverride` is a per-user label and
    /// is not used for lookup.
    #[serde(default)]
    summary: String,
    #[serde(default)]
    primary: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<Event>,
    next_page_token: Option<String>,
}

pub struct GoogleCalendar {
    http: reqwest::Client,
    access_token: String,
    base_url: Url,
}

impl GoogleCalendar {
    pub fn new(
        http: reqwest::Client,
        access_token: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        Self::with_base_url(http, access_token, GOOGLE_CALENDAR_API)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        access_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::Transport(format!("invalid base URL {base_url}: {e}")))?;

        Ok(GoogleCalendar {
            http,
            access_token: access_token.into(),
            base_url,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RemoteError::Transport(format!("base URL {} cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify(status.as_u16(), &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let response = self.send(self.http.get(url).query(query)).await?;
        response.json().await.map_err(transport)
    }
}

impl CalendarRemote for GoogleCalendar {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>, RemoteError> {
        let url = self.url(&["users", "me", "calendarList"])?;
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = Vec::new();
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: CalendarListPage = self.get_json(url.clone(), &query).await?;
            calendars.extend(page.items.into_iter().map(|entry| CalendarInfo {
                name: entry.summary,
                id: entry.id,
                primary: entry.primary,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<Event>, RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events"])?;
        let time_min = time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", time_min.clone()),
                ("maxResults", MAX_RESULTS.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: EventsPage = self.get_json(url.clone(), &query).await?;
            debug!("Fetched page of {} events", page.items.len());
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }

    async fn update_event(&self, calendar_id: &str, event: &Event) -> Result<Event, RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events", &event.id])?;
        let response = self.send(self.http.put(url).json(event)).await?;
        response.json().await.map_err(transport)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), RemoteError> {
        let url = self.url(&["calendars", calendar_id, "events", event_id])?;
        match self.send(self.http.delete(url)).await {
            Ok(_) => Ok(()),
            // Already gone
            Err(RemoteError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_ids_are_percent_encoded() {
        let api = GoogleCalendar::with_base_url(
            reqwest::Client::new(),
            "token",
            "https://example.test/calendar/v3/",
        )
        .unwrap();

        let url = api
            .url(&["calendars", "abc#sports@group.v.calendar.google.com", "events"])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://example.test/calendar/v3/calendars/abc%23sports@group.v.calendar.google.com/events"
        );
    }
}
