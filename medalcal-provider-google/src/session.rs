//! Loads a stored Google OAuth session and refreshes it when expired.
//!
//! The consent flow that produces the token file is out of scope here; any
//! tool that writes `access_token`/`refresh_token` (or the `token`/`expiry`
//! keys used by google-auth's `token.json`) works.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::app_config::Credentials;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the recorded expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "expiry")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Session {
    path: PathBuf,
    data: SessionData,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth session not found at {}.\n\
                Authorize the calendar scope and save the token file there first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Session {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Load a session and refresh it if expired.
    pub async fn load_valid(
        path: &Path,
        credentials: impl FnOnce() -> Result<Credentials>,
        http: &reqwest::Client,
    ) -> Result<Self> {
        let mut session = Self::load(path)?;

        if session.is_expired(Utc::now()) {
            info!("Access token expired, refreshing...");
            let creds = session.embedded_credentials().map_or_else(credentials, Ok)?;
            session.refresh(http, GOOGLE_TOKEN_URL, &creds).await?;
        }

        Ok(session)
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.data.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }

    /// Client id/secret stored alongside the token, as google-auth does.
    fn embedded_credentials(&self) -> Option<Credentials> {
        match (&self.data.client_id, &self.data.client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Credentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        }
    }

    pub async fn refresh(
        &mut self,
        http: &reqwest::Client,
        token_url: &str,
        creds: &Credentials,
    ) -> Result<()> {
        let refresh_token = self
            .data
            .refresh_token
            .clone()
            .context("Session has no refresh token; re-authorize to create a new one")?;

        let response = http
            .post(token_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send token refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to refresh token (HTTP {}): {}", status, error_text);
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        self.data.access_token = refreshed.access_token;
        self.data.expires_at = Some(Utc::now() + Duration::seconds(refreshed.expires_in));
        // Google typically doesn't return a new refresh_token on refresh
        if let Some(token) = refreshed.refresh_token {
            self.data.refresh_token = Some(token);
        }

        self.save()?;
        debug!("Saved refreshed session to {}", self.path.display());

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }
}
