use anyhow::Result;
use medalcal_core::config::Config;
use medalcal_core::remote::CalendarRemote;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config: &Config) -> Result<()> {
    let spinner = tui::create_spinner("Fetching calendars");
    let calendars = match medalcal_provider_google::connect(&config.google).await {
        Ok(api) => api.list_calendars().await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    for calendar in calendars? {
        if calendar.name == config.calendar_name {
            println!("{} {}", calendar.render(), "← configured".green());
        } else {
            println!("{}", calendar.render());
        }
    }

    Ok(())
}
