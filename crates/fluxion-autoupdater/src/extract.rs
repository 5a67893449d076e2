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

//! Update package extraction

use crate::error::UpdateError;
use std::fs::{self, File};
use std::path::Path;
use zip::ZipArchive;

const ZIP_EXTENSION: &str = "zip";

/// Result of the extraction step. Failures here never abort an update.
#[derive(Debug)]
pub enum ExtractOutcome {
    Extracted { entries: usize },
    Skipped { reason: String },
    Failed(UpdateError),
}

impl ExtractOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// Segment between the first and second `.` of `file_name`.
///
/// `app.zip` gives `zip`, `app.v2.zip` gives `v2`. Names without a dot, or
/// with nothing after it, have no extension.
pub fn archive_extension(file_name: &str) -> Option<&str> {
    file_name.split('.').nth(1).filter(|ext| !ext.is_empty())
}

pub fn is_zip_package(file_name: &str) -> bool {
    archive_extension(file_name) == Some(ZIP_EXTENSION)
}

/// Extract `archive` into `target` if the package is a zip
pub fn extract_package(file_name: &str, archive: &Path, target: &Path) -> ExtractOutcome {
    if !is_zip_package(file_name) {
        let reason = match archive_extension(file_name) {
            Some(ext) => format!("{file_name} has extension {ext}, not {ZIP_EXTENSION}"),
            None => format!("{file_name} has no extension"),
        };
        tracing::debug!("Skipping extraction: {reason}");
        return ExtractOutcome::Skipped { reason };
    }

    match extract_zip(archive, target) {
        Ok(entries) => {
            tracing::info!("Extracted {entries} entries into {}", target.display());
            ExtractOutcome::Extracted { entries }
        }
        Err(e) => {
            tracing::warn!("Extraction of {} failed, continuing: {e}", archive.display());
            ExtractOutcome::Failed(e)
        }
    }
}

/// Extract every entry of a zip archive into `destination`.
/// Returns the number of entries written.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize, UpdateError> {
    let file = File::open(archive_path)
        .map_err(|e| extract_error(archive_path, "cannot open archive", e))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| extract_error(archive_path, "not a zip archive", e))?;
    fs::create_dir_all(destination)
        .map_err(|e| extract_error(archive_path, "cannot create target", e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extract_error(archive_path, "unreadable entry", e))?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let outpath = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| extract_error(archive_path, "cannot create directory", e))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| extract_error(archive_path, "cannot create directory", e))?;
            }
            let mut outfile = File::create(&outpath)
                .map_err(|e| extract_error(archive_path, "cannot create file", e))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| extract_error(archive_path, "cannot write file", e))?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))
                    .map_err(|e| extract_error(archive_path, "cannot set permissions", e))?;
            }
        }

        tracing::debug!("Extracted {}", outpath.display());
        written += 1;
    }

    Ok(written)
}

fn extract_error(archive_path: &Path, what: &str, e: impl std::fmt::Display) -> UpdateError {
    UpdateError::ExtractFailed(format!("{what} ({}): {e}", archive_path.display()))
}
