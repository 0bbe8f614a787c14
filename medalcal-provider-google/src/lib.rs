//! Google Calendar transport for medalcal.
//!
//! Talks to the Calendar v3 REST API directly so every failure can be mapped
//! onto a typed [`medalcal_core::RemoteError`]; rate limiting in particular has
//! to be recognizable for the update retry loop.

pub mod api;
pub mod app_config;
mod error;
pub mod session;

use anyhow::Result;
use medalcal_core::config::{GoogleConfig, expand_path};

pub use api::GoogleCalendar;
pub use app_config::Credentials;
pub use session::Session;

/// Load (and refresh if needed) the stored session, then build a client.
pub async fn connect(config: &GoogleConfig) -> Result<GoogleCalendar> {
    let http = reqwest::Client::new();
    let token_path = expand_path(&config.token_path);
    let credentials_path = expand_path(&config.credentials_path);

    let session =
        Session::load_valid(&token_path, || app_config::load(&credentials_path), &http).await?;

    Ok(GoogleCalendar::new(http, session.access_token())?)
}
