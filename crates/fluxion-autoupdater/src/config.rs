// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Configuration module for the autoupdater

use crate::error::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest location used when the caller does not supply one
pub const DEFAULT_MANIFEST_URL: &str = "http://borjadev.me/aurora/update.xml";

fn default_manifest_url() -> String {
    DEFAULT_MANIFEST_URL.to_owned()
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_30() -> u64 {
    30
}

fn default_500() -> u64 {
    500
}

fn default_user_agent() -> String {
    format!("fluxion-autoupdater/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Update manifest fetched when no explicit source is given
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,

    /// Scratch directory the package is downloaded into; removed after every update
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Extraction target (defaults to the parent of the absolute staging directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// HTTP timeout in seconds, 0 disables it
    #[serde(default = "default_30")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause before applying an update so the status display stays readable
    #[serde(default = "default_500")]
    pub status_display_delay_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            manifest_url: default_manifest_url(),
            staging_dir: default_staging_dir(),
            install_dir: None,
            timeout_secs: 30,
            user_agent: default_user_agent(),
            status_display_delay_ms: 500,
        }
    }
}

/// Load config from `path`, falling back to defaults when the file is absent
pub fn load_config(path: &Path) -> Result<UpdaterConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(UpdaterConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        UpdateError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| UpdateError::Config(format!("Failed to parse config: {e}")))
}

pub fn save_config(path: &Path, config: &UpdaterConfig) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let content = serde_json::to_string_pretty(config)?;

    // Atomic write
    std::fs::write(&temp_path, content)
        .and_then(|()| std::fs::rename(&temp_path, path))
        .map_err(|e| UpdateError::Config(format!("Failed to write {}: {e}", path.display())))?;

    Ok(())
}
