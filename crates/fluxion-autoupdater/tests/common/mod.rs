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

//! Shared helpers for autoupdater integration tests

#![allow(dead_code)]

use fluxion_autoupdater::{UpdateEvent, UpdateObserver, UpdaterConfig};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const PROGRAM: &str = "App";

/// One-entry manifest document
pub fn manifest_xml(version: &str, file_name: &str, download_link: &str) -> String {
    format!(
        "<root>\n  <{PROGRAM}>\n    <version>{version}</version>\n    \
         <changelog>fixes</changelog>\n    <file-name>{file_name}</file-name>\n    \
         <download-link>{download_link}</download-link>\n  </{PROGRAM}>\n</root>"
    )
}

/// In-memory zip with the given (name, content) entries
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Staging under `dir/temp`, so packages land in `dir`
pub fn test_config(dir: &Path) -> UpdaterConfig {
    UpdaterConfig {
        staging_dir: dir.join("temp"),
        timeout_secs: 5,
        status_display_delay_ms: 0,
        ..Default::default()
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<UpdateEvent>,
}

impl RecordingObserver {
    /// Event names in order, e.g. `["started", "downloading"]`
    pub fn names(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| serde_json::to_value(e).unwrap()["event"].as_str().unwrap().to_owned())
            .collect()
    }
}

impl UpdateObserver for RecordingObserver {
    fn on_event(&mut self, event: &UpdateEvent) {
        self.events.push(event.clone());
    }
}
