//! LIFX HTTP transport for medalcal.
//!
//! Drives lights through `PUT /v1/lights/{selector}/state` on the LIFX cloud
//! API, authenticated with a personal access token.

use std::path::Path;

use anyhow::{Context, Result};
use medalcal_core::RemoteError;
use medalcal_core::light::{LightColor, LightState};
use medalcal_core::remote::LightRemote;
use serde::Serialize;
use tracing::debug;
use url::Url;

pub const LIFX_API: &str = "https://api.lifx.com/v1";

#[derive(Debug, Serialize, PartialEq)]
struct StateRequest {
    power: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brightness: Option<f64>,
}

impl StateRequest {
    fn from_state(state: &LightState) -> Self {
        match state.color {
            Some(color) if state.is_on() => StateRequest {
                power: "on",
                color: Some(color_string(&color)),
                brightness: Some(state.brightness),
            },
            _ => StateRequest {
                power: "off",
                color: None,
                brightness: None,
            },
        }
    }
}

/// LIFX color string, e.g. `hue:45 saturation:1 kelvin:3500`
fn color_string(color: &LightColor) -> String {
    format!(
        "hue:{} saturation:{} kelvin:{}",
        color.hue, color.saturation, color.kelvin
    )
}

pub struct LifxClient {
    http: reqwest::Client,
    token: String,
    base_url: Url,
    selector: String,
}

impl LifxClient {
    pub fn new(http: reqwest::Client, token: impl Into<String>, selector: &str) -> Result<Self> {
        Self::with_base_url(http, token, selector, LIFX_API)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        token: impl Into<String>,
        selector: &str,
        base_url: &str,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid LIFX base URL {}", base_url))?;

        Ok(LifxClient {
            http,
            token: token.into(),
            base_url,
            selector: selector.to_string(),
        })
    }

    /// Build a client from a file holding the personal access token.
    pub fn from_token_file(path: &Path, selector: &str) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "LIFX token not found.\n\n\
                Generate a personal access token at https://cloud.lifx.com/settings\n\
                and save it to {}",
                path.display()
            );
        }

        let token = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read LIFX token from {}", path.display()))?;
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("LIFX token file {} is empty", path.display());
        }

        Self::new(reqwest::Client::new(), token, selector)
    }

    fn state_url(&self) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RemoteError::Transport(format!("base URL {} cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["lights", self.selector.as_str(), "state"]);
        Ok(url)
    }
}

fn classify(status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        429 => RemoteError::RateLimited(message),
        401 => RemoteError::Unauthorized(message),
        403 => RemoteError::Forbidden(message),
        404 => RemoteError::NotFound(message),
        _ => RemoteError::Http { status, message },
    }
}

impl LightRemote for LifxClient {
    async fn set_all(&self, state: &LightState) -> Result<(), RemoteError> {
        let body = StateRequest::from_state(state);
        debug!("LIFX {} -> {:?}", self.selector, body);

        let response = self
            .http
            .put(self.state_url()?)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(classify(status.as_u16(), &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_state_carries_color_and_brightness() {
        let request = StateRequest::from_state(&LightState::on(LightColor::GOLD, 0.5));

        assert_eq!(request.power, "on");
        assert_eq!(request.color.as_deref(), Some("hue:45 saturation:1 kelvin:3500"));
        assert_eq!(request.brightness, Some(0.5));
    }

    #[test]
    fn zero_brightness_powers_off() {
        let off = StateRequest::from_state(&LightState::on(LightColor::BLUE, 0.0));
        assert_eq!(off, StateRequest::from_state(&LightState::off()));
        assert_eq!(off.power, "off");
    }

    #[test]
    fn selector_is_a_single_path_segment() {
        let client = LifxClient::with_base_url(
            reqwest::Client::new(),
            "t",
            "group:Living Room",
            "https://api.lifx.com/v1",
        )
        .unwrap();

        assert_eq!(
            client.state_url().unwrap().as_str(),
            "https://api.lifx.com/v1/lights/group:Living%20Room/state"
        );
    }

    #[test]
    fn empty_token_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifx_token");
        std::fs::write(&path, "\n").unwrap();

        assert!(LifxClient::from_token_file(&path, "all").is_err());
    }

    #[test]
    fn statuses_map_to_remote_errors() {
        assert!(classify(429, "").is_rate_limited());
        assert_eq!(
            classify(401, r#"{"error":"Invalid token"}"#),
            RemoteError::Unauthorized("Invalid token".into())
        );
    }
}
