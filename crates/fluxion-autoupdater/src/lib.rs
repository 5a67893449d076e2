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

//! FluxION AutoUpdater - manifest-driven self-update client
//!
//! Reads an XML update manifest, compares the published version with the
//! running one and, when they differ, downloads the package, extracts it
//! into the install directory if it is a zip, and removes the staging files.

pub mod applier;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod manifest;
pub mod progress;
pub mod session;
pub mod updater;
pub mod version;

pub use applier::{StagingLayout, UpdateApplier, UpdateReport};
pub use config::{UpdaterConfig, load_config};
pub use error::UpdateError;
pub use extract::ExtractOutcome;
pub use manifest::UpdateManifest;
pub use progress::{NoopObserver, TracingObserver, UpdateEvent, UpdateObserver};
pub use session::{ResolutionStatus, UpdateSession};
pub use updater::{AutoUpdater, UpdateOutcome};
pub use version::update_available;
