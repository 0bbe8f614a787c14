//! User-provided OAuth client credentials.
//!
//! Accepts either the JSON file downloaded from the Google Cloud console
//! (`{"installed": {...}}`) or a flat `{"client_id", "client_secret"}` object.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

pub fn load(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Create {} with:\n\n\
            {{\n  \
              \"client_id\": \"your-client-id.apps.googleusercontent.com\",\n  \
              \"client_secret\": \"your-client-secret\"\n\
            }}\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    parse(&contents).with_context(|| format!("Failed to parse credentials from {}", path.display()))
}

fn parse(contents: &str) -> Result<Credentials> {
    let file: CredentialsFile = serde_json::from_str(contents)?;

    Ok(match file {
        CredentialsFile::Installed { installed } => installed,
        CredentialsFile::Web { web } => web,
        CredentialsFile::Flat(creds) => creds,
    })
}
