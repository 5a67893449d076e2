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

//! Update manifest resolution
//!
//! The manifest is an XML document with one element per program:
//!
//! ```xml
//! <root>
//!   <MyApp>
//!     <version>2.0</version>
//!     <changelog>fixes</changelog>
//!     <file-name>app.zip</file-name>
//!     <download-link>https://example.com/app.zip</download-link>
//!   </MyApp>
//! </root>
//! ```

use crate::error::{Result, UpdateError};
use crate::fetch::Fetcher;
use roxmltree::{Document, Node};
use serde::Serialize;

const VERSION_TAG: &str = "version";
const CHANGELOG_TAG: &str = "changelog";
const FILE_NAME_TAG: &str = "file-name";
const DOWNLOAD_LINK_TAG: &str = "download-link";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateManifest {
    pub version: String,
    pub changelog: String,
    pub file_name: String,
    pub download_link: String,
}

/// Fetch and parse the manifest entry for `program_name`
pub fn resolve(
    fetcher: &Fetcher,
    program_name: &str,
    manifest_source: &str,
) -> Result<UpdateManifest> {
    tracing::info!("Resolving update manifest for {program_name} from {manifest_source}");

    let content = fetcher.fetch_text(manifest_source)?;
    let manifest = parse_manifest(&content, program_name)?;

    tracing::info!(
        "Manifest for {program_name}: version={}, file={}",
        manifest.version,
        manifest.file_name
    );
    Ok(manifest)
}

/// Parse the entry for `program_name` out of a manifest document.
///
/// Every element named `program_name` is read in document order and each one
/// overwrites the previous, so the last entry wins. Publishers that list a
/// program twice get the later block.
pub fn parse_manifest(content: &str, program_name: &str) -> Result<UpdateManifest> {
    let document = Document::parse(content)
        .map_err(|e| UpdateError::ManifestMalformed(format!("invalid XML: {e}")))?;

    let mut resolved = None;
    for entry in document
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == program_name)
    {
        if resolved.is_some() {
            tracing::warn!("Manifest lists <{program_name}> more than once, later entry wins");
        }
        resolved = Some(read_entry(entry, program_name)?);
    }

    let manifest = resolved.ok_or_else(|| {
        UpdateError::ManifestMalformed(format!("no <{program_name}> entry in manifest"))
    })?;
    validate_file_name(&manifest.file_name)?;

    Ok(manifest)
}

fn read_entry(entry: Node<'_, '_>, program_name: &str) -> Result<UpdateManifest> {
    Ok(UpdateManifest {
        version: child_text(entry, program_name, VERSION_TAG)?,
        changelog: child_text(entry, program_name, CHANGELOG_TAG)?,
        file_name: child_text(entry, program_name, FILE_NAME_TAG)?,
        download_link: child_text(entry, program_name, DOWNLOAD_LINK_TAG)?,
    })
}

/// Trimmed text of the first descendant element named `tag`
fn child_text(entry: Node<'_, '_>, program_name: &str, tag: &str) -> Result<String> {
    let child = entry
        .descendants()
        .skip(1)
        .find(|n| n.is_element() && n.tag_name().name() == tag)
        .ok_or_else(|| {
            UpdateError::ManifestMalformed(format!("<{program_name}> is missing <{tag}>"))
        })?;

    let text: String = child
        .descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();

    if text.is_empty() {
        return Err(UpdateError::ManifestMalformed(format!(
            "<{program_name}> has an empty <{tag}>"
        )));
    }

    Ok(text.to_owned())
}

fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.contains(['/', '\\']) || file_name == "." || file_name == ".." {
        return Err(UpdateError::ManifestMalformed(format!(
            "<{FILE_NAME_TAG}> must be a bare file name, got {file_name}"
        )));
    }
    Ok(())
}
