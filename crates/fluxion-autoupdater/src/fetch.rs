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

//! Blocking HTTP/file fetcher for manifests and update packages

use crate::config::UpdaterConfig;
use crate::error::{Result, UpdateError};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a manifest or package lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

impl Location {
    /// Classify `http(s)://` and `file://` URLs; anything that is not a URL is a filesystem path.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|()| format!("not a usable file URL: {raw}")),
                // Windows drive letters parse as one-letter schemes
                scheme if scheme.len() == 1 => Ok(Self::Local(PathBuf::from(raw))),
                scheme => Err(format!("unsupported URL scheme: {scheme}")),
            },
            Err(_) => Ok(Self::Local(PathBuf::from(raw))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &UpdaterConfig) -> Result<Self> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()
            .map_err(|e| UpdateError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Read a manifest document into memory
    pub fn fetch_text(&self, location: &str) -> Result<String> {
        let unreachable = |reason: String| UpdateError::ManifestUnreachable {
            location: location.to_owned(),
            reason,
        };

        match Location::parse(location).map_err(unreachable)? {
            Location::Remote(url) => {
                let response = self.get(url).map_err(unreachable)?;
                response
                    .text()
                    .map_err(|e| unreachable(format!("Failed to read response: {e}")))
            }
            Location::Local(path) => std::fs::read_to_string(&path)
                .map_err(|e| unreachable(format!("Failed to read {}: {e}", path.display()))),
        }
    }

    /// Stream a package to `destination`, creating its parent directories.
    /// Returns the number of bytes written.
    pub fn download_to(&self, url: &str, destination: &Path) -> Result<u64> {
        let failed = |reason: String| UpdateError::DownloadFailed {
            url: url.to_owned(),
            reason,
        };

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| failed(format!("Failed to create {}: {e}", parent.display())))?;
        }

        match Location::parse(url).map_err(failed)? {
            Location::Remote(remote) => {
                let mut response = self.get(remote).map_err(failed)?;
                let mut file = File::create(destination).map_err(|e| {
                    failed(format!("Failed to create {}: {e}", destination.display()))
                })?;
                response
                    .copy_to(&mut file)
                    .map_err(|e| failed(format!("Failed to write response body: {e}")))
            }
            Location::Local(source) => std::fs::copy(&source, destination)
                .map_err(|e| failed(format!("Failed to copy {}: {e}", source.display()))),
        }
    }

    fn get(&self, url: Url) -> std::result::Result<Response, String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| format!("Request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Request failed with status: {}", response.status()));
        }

        Ok(response)
    }
}
