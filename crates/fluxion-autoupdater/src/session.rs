// SPDX-License-Identifier: CC-BY-NC-ND-4.0

//! Update session: program identity plus the resolved manifest

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::manifest::{self, UpdateManifest};
use crate::version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus<'a> {
    Unresolved,
    Resolved(&'a UpdateManifest),
}

/// One update check for one program. Starts unresolved; once the manifest
/// is resolved it never changes.
#[derive(Debug, Clone)]
pub struct UpdateSession {
    program_name: String,
    current_version: String,
    manifest_source: String,
    manifest: Option<UpdateManifest>,
}

impl UpdateSession {
    pub fn new(
        program_name: impl Into<String>,
        current_version: impl Into<String>,
        manifest_source: impl Into<String>,
    ) -> Self {
        Self {
            program_name: program_name.into(),
            current_version: current_version.into(),
            manifest_source: manifest_source.into(),
            manifest: None,
        }
    }

    /// Fetch and parse the manifest. A session that is already resolved
    /// returns its manifest without fetching again.
    pub fn resolve(&mut self, fetcher: &Fetcher) -> Result<&UpdateManifest> {
        let resolved = match self.manifest.take() {
            Some(resolved) => resolved,
            None => manifest::resolve(fetcher, &self.program_name, &self.manifest_source)?,
        };
        Ok(self.manifest.insert(resolved))
    }

    pub fn status(&self) -> ResolutionStatus<'_> {
        match &self.manifest {
            Some(manifest) => ResolutionStatus::Resolved(manifest),
            None => ResolutionStatus::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.manifest.is_some()
    }

    /// False until the manifest is resolved
    pub fn update_available(&self) -> bool {
        self.manifest
            .as_ref()
            .is_some_and(|m| version::update_available(&self.current_version, &m.version))
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn manifest_source(&self) -> &str {
        &self.manifest_source
    }

    pub fn manifest(&self) -> Option<&UpdateManifest> {
        self.manifest.as_ref()
    }

    pub fn update_version(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.version.as_str())
    }

    pub fn changelog(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.changelog.as_str())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.file_name.as_str())
    }

    pub fn download_link(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.download_link.as_str())
    }
}
