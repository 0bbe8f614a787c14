use std::path::{Path, PathBuf};

use anyhow::Result;
use medalcal_core::config::{Config, expand_path};
use owo_colors::OwoColorize;

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(Config::config_path()?),
    }
}

pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve(path)?;

    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    Config::create_default_config(&path)?;
    println!("Wrote {}", path.display().green());

    Ok(())
}

pub fn show(path: Option<&Path>, config: &Config) -> Result<()> {
    let path = resolve(path)?;

    println!("{}", "Paths".bold());
    println!("  Config:       {}", path.display());
    println!("  Logs:         {}", config.log_dir().display());
    println!("  Credentials:  {}", expand_path(&config.google.credentials_path).display());
    println!("  Google token: {}", expand_path(&config.google.token_path).display());
    println!("  LIFX token:   {}", expand_path(&config.lights.token_path).display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Calendar:     {}", config.calendar_name);
    println!("  From:         {}", config.time_min.format("%Y-%m-%d %H:%M UTC"));
    println!("  Lights:       {} every {}", config.lights.selector, config.lights.poll_interval);

    Ok(())
}
