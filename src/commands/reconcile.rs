use anyhow::Result;
use chrono::{DateTime, Utc};
use medalcal_core::config::Config;
use medalcal_core::filter::{AlwaysConfirm, UnwantedFilter};
use medalcal_core::reconcile::{Reconciler, RunOptions, RunReport};
use medalcal_core::rules::RuleSet;
use owo_colors::OwoColorize;

use crate::prompt::PromptConfirm;
use crate::render::{Render, render_batch, render_unwanted};
use crate::utils::tui;

pub async fn run(
    config: &Config,
    time_min: DateTime<Utc>,
    dry_run: bool,
    force: bool,
) -> Result<()> {
    let report = execute(config, time_min, dry_run, force).await?;
    print_report(&report, dry_run);

    Ok(())
}

/// Connect and run the pipeline, prompting for removals unless `force`.
pub async fn execute(
    config: &Config,
    time_min: DateTime<Utc>,
    dry_run: bool,
    force: bool,
) -> Result<RunReport> {
    let policy = config.retry.policy()?;

    let spinner = tui::create_spinner("Connecting to Google Calendar");
    let calendar = medalcal_provider_google::connect(&config.google).await;
    spinner.finish_and_clear();
    let calendar = calendar?;

    let rules = RuleSet::olympics();
    let filter = UnwantedFilter::default();
    let reconciler = Reconciler::new(&calendar, &rules, &filter, policy);
    let options = RunOptions { dry_run };

    let report = if force || dry_run {
        reconciler
            .run(&config.calendar_name, time_min, &AlwaysConfirm, options)
            .await?
    } else {
        reconciler
            .run(&config.calendar_name, time_min, &PromptConfirm, options)
            .await?
    };

    Ok(report)
}

pub fn print_report(report: &RunReport, dry_run: bool) {
    println!("{}", report.calendar.render());

    if !report.unwanted.is_empty() {
        let heading = if dry_run { "   Unwanted (to remove):" } else { "   Unwanted:" };
        println!("{}", heading.dimmed());
        println!("{}", render_unwanted(&report.unwanted));
    }

    if dry_run && !report.batch.is_empty() {
        println!("{}", "   Pending updates:".dimmed());
    }
    println!("{}", render_batch(&report.batch, dry_run));

    if !dry_run {
        println!(
            "\nUpdated: {}, removed: {}, skipped: {}",
            report.updated, report.removal.deleted, report.removal.skipped
        );
    }
}
