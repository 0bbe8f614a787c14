use anyhow::Result;
use chrono::{DateTime, Utc};
use medalcal_core::Color;
use medalcal_core::config::Config;

use super::reconcile;

/// What a reconcile run would change, without writing anything.
pub async fn run(config: &Config, time_min: DateTime<Utc>, color: Option<Color>) -> Result<()> {
    let mut report = reconcile::execute(config, time_min, true, true).await?;

    if let Some(color) = color {
        report.batch.retain_color(color);
    }

    reconcile::print_report(&report, true);
    Ok(())
}
