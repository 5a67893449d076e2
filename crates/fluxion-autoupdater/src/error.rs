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

//! Error types for the autoupdater crate

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("manifest unreachable at {location}: {reason}")]
    ManifestUnreachable { location: String, reason: String },

    #[error("malformed manifest: {0}")]
    ManifestMalformed(String),

    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Never aborts an update; surfaces through `ExtractOutcome::Failed`.
    #[error("extraction failed: {0}")]
    ExtractFailed(String),

    #[error("failed to remove staging directory {}: {source}", path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("config serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpdateError {
    /// Stable short name of the error kind, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ManifestUnreachable { .. } => "manifest_unreachable",
            Self::ManifestMalformed(_) => "manifest_malformed",
            Self::DownloadFailed { .. } => "download_failed",
            Self::ExtractFailed(_) => "extract_failed",
            Self::CleanupFailed { .. } => "cleanup_failed",
            Self::Config(_) => "config",
            Self::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
