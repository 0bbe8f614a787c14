use anyhow::Result;
use chrono::{DateTime, Utc};
use medalcal_core::config::{Config, expand_path};
use medalcal_core::filter::UnwantedFilter;
use medalcal_core::light::LightDriver;
use medalcal_core::remote::CalendarRemote;
use medalcal_core::rules::RuleSet;
use medalcal_core::{CoreError, RemoteError};
use medalcal_provider_lifx::LifxClient;
use tracing::{info, warn};

/// What the poll loop does after a failed tick.
#[derive(Debug, PartialEq, Eq)]
enum Recovery {
    /// Skip to the next tick.
    Retry,
    /// Reload the Google session and tick again right away.
    Reconnect,
    Fail,
}

/// `--once` runs fail on any error. Otherwise an expired calendar session
/// gets one reconnect per successful tick, and rate limits or dropped
/// connections on either side wait for the next tick.
fn recovery(err: &CoreError, once: bool, reconnected: bool) -> Recovery {
    if once {
        return Recovery::Fail;
    }

    match err {
        CoreError::Remote(RemoteError::Unauthorized(_)) if !reconnected => Recovery::Reconnect,
        CoreError::Remote(e) | CoreError::Lights(e) if e.is_transient() => Recovery::Retry,
        _ => Recovery::Fail,
    }
}

pub async fn run(config: &Config, time_min: DateTime<Utc>, once: bool) -> Result<()> {
    let interval = config.lights.poll_interval()?;
    let lights = LifxClient::from_token_file(
        &expand_path(&config.lights.token_path),
        &config.lights.selector,
    )?;

    let mut calendar = medalcal_provider_google::connect(&config.google).await?;
    let calendar_id = calendar.find_calendar(&config.calendar_name).await?.id;
    info!("Driving lights '{}' from {}", config.lights.selector, config.calendar_name);

    let rules = RuleSet::olympics();
    let filter = UnwantedFilter::default();
    let mut reconnected = false;

    loop {
        let driver = LightDriver::new(
            &calendar,
            &lights,
            &rules,
            &filter,
            &calendar_id,
            time_min,
            config.lights.brightness,
        );

        match driver.tick(Utc::now()).await {
            Ok(_) => reconnected = false,
            Err(e) => match recovery(&e, once, reconnected) {
                Recovery::Reconnect => {
                    // Access tokens last about an hour
                    warn!("{}, reconnecting", e);
                    calendar = medalcal_provider_google::connect(&config.google).await?;
                    reconnected = true;
                    continue;
                }
                Recovery::Retry => warn!("Light update failed: {}", e),
                Recovery::Fail => return Err(e.into()),
            },
        }

        if once {
            return Ok(());
        }

        tokio::time::sleep(interval).await;
    }
}
