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

//! FluxION AutoUpdater - launcher binary
//!
//! Started by an application with its own name, version and manifest URL.
//! Always exits with status 0 so the calling application can carry on
//! whether or not an update happened.

use anyhow::{Context, Result};
use clap::Parser;
use fluxion_autoupdater::{
    AutoUpdater, ExtractOutcome, TracingObserver, UpdateError, UpdateEvent, UpdateObserver,
    UpdateOutcome, UpdateSession, load_config,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "fluxion-autoupdater")]
#[command(about = "Check an XML update manifest and apply a newer package", long_about = None)]
struct Cli {
    /// Name of the program entry in the update manifest
    program_name: Option<String>,

    /// Version currently installed
    current_version: Option<String>,

    /// URL or path of the update manifest
    manifest_url: Option<String>,

    /// Path to the JSON config file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "autoupdater.json")]
    config: PathBuf,
}

/// Terminal replacement for the old "UPDATING..." window
#[derive(Debug, Default)]
struct StatusDisplay {
    logger: TracingObserver,
}

impl StatusDisplay {
    fn announce(&self, session: &UpdateSession) {
        println!("UPDATING...");
        println!("Please don't close this window");
        println!("It will close automatically");
        if let Some(version) = session.update_version() {
            println!("  {} -> {version}", session.current_version());
        }
        if let Some(changelog) = session.changelog() {
            println!("  {changelog}");
        }
    }
}

impl UpdateObserver for StatusDisplay {
    fn on_event(&mut self, event: &UpdateEvent) {
        self.logger.on_event(event);
        match event {
            UpdateEvent::Downloading { url, .. } => println!("Downloading {url}"),
            UpdateEvent::Extracting { target, .. } => {
                println!("Installing into {}", target.display());
            }
            UpdateEvent::CleaningUp { .. } => println!("Cleaning up"),
            UpdateEvent::Completed { version, .. } => println!("Updated to {version}"),
            UpdateEvent::Failed { error, .. } => println!("Update failed: {error}"),
            UpdateEvent::Started { .. } | UpdateEvent::ExtractionSkipped { .. } => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fluxion_autoupdater=debug".parse()?),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return Ok(());
        }
    };

    let (Some(program_name), Some(current_version), Some(manifest_url)) = (
        cli.program_name.as_deref(),
        cli.current_version.as_deref(),
        cli.manifest_url.as_deref(),
    ) else {
        error!("Usage: fluxion-autoupdater <program-name> <current-version> <manifest-url>");
        return Ok(());
    };

    if let Err(e) = run(&cli.config, program_name, current_version, manifest_url) {
        let kind = e
            .downcast_ref::<UpdateError>()
            .map_or("internal", UpdateError::kind);
        error!("No update performed [{kind}]: {e:#}");
    }

    Ok(())
}

fn run(
    config_path: &Path,
    program_name: &str,
    current_version: &str,
    manifest_url: &str,
) -> Result<()> {
    let config = load_config(config_path)?;
    let delay = Duration::from_millis(config.status_display_delay_ms);
    let updater = AutoUpdater::new(config)?;

    let session = updater.check(program_name, current_version, manifest_url)?;
    if !session.update_available() {
        info!("Nothing to update");
        return Ok(());
    }

    let mut display = StatusDisplay::default();
    display.announce(&session);
    std::thread::sleep(delay);

    match updater
        .update_application(session, &mut display)
        .context("update could not be applied")?
    {
        UpdateOutcome::Updated(report) => {
            if let ExtractOutcome::Failed(e) = &report.extraction {
                warn!("Package was downloaded but not extracted: {e}");
            }
            info!("Update to {} complete", report.version);
        }
        UpdateOutcome::UpToDate { version } => info!("Already on {version}"),
    }

    Ok(())
}
