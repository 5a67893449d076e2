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

//! Update application: download, conditional extraction, cleanup
//!
//! The sequence is linear and never rolls back:
//! 1. Download the package into the staging directory (fatal on error)
//! 2. Extract it into the install directory if it is a zip (errors are logged and kept in the report)
//! 3. Remove the staging directory (fatal on error)

use crate::config::UpdaterConfig;
use crate::error::{Result, UpdateError};
use crate::extract::{ExtractOutcome, extract_package, is_zip_package};
use crate::fetch::Fetcher;
use crate::manifest::UpdateManifest;
use crate::progress::{UpdateEvent, UpdateObserver};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Staging and install directories for one update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    staging_root: PathBuf,
    install_dir: PathBuf,
}

impl StagingLayout {
    pub fn new(staging_root: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            install_dir: install_dir.into(),
        }
    }

    /// Resolve both directories against the working directory. Unless
    /// overridden, packages are extracted into the staging parent.
    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        let staging_root = std::path::absolute(&config.staging_dir).map_err(|e| {
            UpdateError::Config(format!(
                "Invalid staging directory {}: {e}",
                config.staging_dir.display()
            ))
        })?;

        let install_dir = match &config.install_dir {
            Some(dir) => std::path::absolute(dir).map_err(|e| {
                UpdateError::Config(format!(
                    "Invalid install directory {}: {e}",
                    dir.display()
                ))
            })?,
            None => staging_root.parent().map(Path::to_path_buf).ok_or_else(|| {
                UpdateError::Config(format!(
                    "Staging directory {} has no parent to install into",
                    staging_root.display()
                ))
            })?,
        };

        // The staging root is deleted after every update
        if install_dir.starts_with(&staging_root) {
            return Err(UpdateError::Config(format!(
                "Install directory {} lies inside staging directory {}",
                install_dir.display(),
                staging_root.display()
            )));
        }

        Ok(Self {
            staging_root,
            install_dir,
        })
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn staged_file(&self, file_name: &str) -> PathBuf {
        self.staging_root.join(file_name)
    }
}

#[derive(Debug)]
pub struct UpdateReport {
    pub version: String,
    pub staged_file: PathBuf,
    pub downloaded_bytes: u64,
    pub extraction: ExtractOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl UpdateReport {
    pub fn duration_ms(&self) -> u64 {
        u64::try_from((self.finished_at - self.started_at).num_milliseconds()).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateApplier {
    fetcher: Fetcher,
    layout: StagingLayout,
}

impl UpdateApplier {
    pub fn new(fetcher: Fetcher, layout: StagingLayout) -> Self {
        Self { fetcher, layout }
    }

    pub fn layout(&self) -> &StagingLayout {
        &self.layout
    }

    pub fn apply(
        &self,
        manifest: &UpdateManifest,
        observer: &mut dyn UpdateObserver,
    ) -> Result<UpdateReport> {
        let started_at = Utc::now();
        let staged_file = self.layout.staged_file(&manifest.file_name);

        // Download
        tracing::info!(
            "Downloading {} to {}",
            manifest.download_link,
            staged_file.display()
        );
        observer.on_event(&UpdateEvent::Downloading {
            url: manifest.download_link.clone(),
            destination: staged_file.clone(),
        });
        let downloaded_bytes = self
            .fetcher
            .download_to(&manifest.download_link, &staged_file)?;
        tracing::info!("Downloaded {downloaded_bytes} bytes");

        // Extract
        if is_zip_package(&manifest.file_name) {
            observer.on_event(&UpdateEvent::Extracting {
                archive: staged_file.clone(),
                target: self.layout.install_dir.clone(),
            });
        } else {
            observer.on_event(&UpdateEvent::ExtractionSkipped {
                file_name: manifest.file_name.clone(),
            });
        }
        let extraction = extract_package(
            &manifest.file_name,
            &staged_file,
            &self.layout.install_dir,
        );

        // Cleanup
        observer.on_event(&UpdateEvent::CleaningUp {
            staging_dir: self.layout.staging_root.clone(),
        });
        self.cleanup()?;

        Ok(UpdateReport {
            version: manifest.version.clone(),
            staged_file,
            downloaded_bytes,
            extraction,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Remove the staging directory and everything in it
    pub fn cleanup(&self) -> Result<()> {
        let root = &self.layout.staging_root;
        if !root.exists() {
            return Ok(());
        }

        tracing::info!("Removing staging directory {}", root.display());
        std::fs::remove_dir_all(root).map_err(|source| UpdateError::CleanupFailed {
            path: root.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopObserver;
    use mockito::Server;
    use std::fs;
    use tempfile::TempDir;

    fn applier(dir: &Path) -> UpdateApplier {
        let fetcher = Fetcher::new(&UpdaterConfig::default()).unwrap();
        UpdateApplier::new(fetcher, StagingLayout::new(dir.join("temp"), dir))
    }

    #[test]
    fn test_layout_defaults_to_staging_parent() {
        let config = UpdaterConfig::default();
        let layout = StagingLayout::from_config(&config).unwrap();

        assert!(layout.staging_root().is_absolute());
        assert!(layout.staging_root().ends_with("temp"));
        assert_eq!(Some(layout.install_dir()), layout.staging_root().parent());
    }

    #[test]
    fn test_layout_rejects_install_inside_staging() {
        let dir = TempDir::new().unwrap();
        let config = UpdaterConfig {
            staging_dir: dir.path().to_path_buf(),
            install_dir: Some(dir.path().join("app")),
            ..Default::default()
        };

        assert!(matches!(
            StagingLayout::from_config(&config),
            Err(UpdateError::Config(_))
        ));
    }

    #[test]
    fn test_layout_rejects_relative_install_inside_staging() {
        let config = UpdaterConfig {
            staging_dir: PathBuf::from("temp"),
            install_dir: Some(PathBuf::from("temp/app")),
            ..Default::default()
        };

        assert!(matches!(
            StagingLayout::from_config(&config),
            Err(UpdateError::Config(_))
        ));
    }

    #[test]
    fn test_layout_resolves_relative_install_dir() {
        let config = UpdaterConfig {
            staging_dir: PathBuf::from("temp"),
            install_dir: Some(PathBuf::from("app")),
            ..Default::default()
        };
        let layout = StagingLayout::from_config(&config).unwrap();

        assert!(layout.install_dir().is_absolute());
        assert!(layout.install_dir().ends_with("app"));
    }

    #[test]
    fn test_staged_file() {
        let layout = StagingLayout::new("/opt/app/temp", "/opt/app");
        assert_eq!(
            layout.staged_file("app.zip"),
            PathBuf::from("/opt/app/temp/app.zip")
        );
    }

    #[test]
    fn test_cleanup_missing_dir_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(applier(dir.path()).cleanup().is_ok());
    }

    #[test]
    fn test_apply_plain_file() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/tool")
            .with_status(200)
            .with_body("binary")
            .create();
        let dir = TempDir::new().unwrap();
        let manifest = UpdateManifest {
            version: "2.0".to_owned(),
            changelog: "fixes".to_owned(),
            file_name: "tool".to_owned(),
            download_link: format!("{}/tool", server.url()),
        };

        let report = applier(dir.path())
            .apply(&manifest, &mut NoopObserver)
            .unwrap();

        assert_eq!(report.version, "2.0");
        assert_eq!(report.downloaded_bytes, 6);
        assert!(matches!(report.extraction, ExtractOutcome::Skipped { .. }));
        assert!(!dir.path().join("temp").exists());
        mock.assert();
    }

    #[test]
    fn test_apply_download_failure_is_terminal() {
        let mut server = Server::new();
        let mock = server.mock("GET", "/app.zip").with_status(404).create();
        let dir = TempDir::new().unwrap();
        let manifest = UpdateManifest {
            version: "2.0".to_owned(),
            changelog: "fixes".to_owned(),
            file_name: "app.zip".to_owned(),
            download_link: format!("{}/app.zip", server.url()),
        };

        let mut events = Vec::new();
        let mut observer = |event: &UpdateEvent| events.push(event.clone());
        let err = applier(dir.path())
            .apply(&manifest, &mut observer)
            .unwrap_err();

        assert!(matches!(err, UpdateError::DownloadFailed { .. }));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], UpdateEvent::Downloading { .. }));
        mock.assert();
    }

    #[test]
    fn test_cleanup_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A regular file where the staging directory should be
        fs::write(dir.path().join("temp"), "not a directory").unwrap();

        let err = applier(dir.path()).cleanup().unwrap_err();

        assert!(matches!(err, UpdateError::CleanupFailed { .. }));
        assert_eq!(err.kind(), "cleanup_failed");
    }

    #[test]
    fn test_apply_cleanup_failure_is_terminal() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/tool")
            .with_status(200)
            .with_body("binary")
            .create();
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("temp");
        let manifest = UpdateManifest {
            version: "2.0".to_owned(),
            changelog: "fixes".to_owned(),
            file_name: "tool".to_owned(),
            download_link: format!("{}/tool", server.url()),
        };

        // Swap the staging directory for a file right before it is removed
        let mut observer = |event: &UpdateEvent| {
            if let UpdateEvent::CleaningUp { staging_dir } = event {
                fs::remove_dir_all(staging_dir).unwrap();
                fs::write(staging_dir, "not a directory").unwrap();
            }
        };
        let err = applier(dir.path())
            .apply(&manifest, &mut observer)
            .unwrap_err();

        assert!(matches!(err, UpdateError::CleanupFailed { ref path, .. } if *path == staging));
    }
}
