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

//! Progress events emitted while an update is applied

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UpdateEvent {
    Started {
        from_version: String,
        to_version: String,
    },
    Downloading {
        url: String,
        destination: PathBuf,
    },
    Extracting {
        archive: PathBuf,
        target: PathBuf,
    },
    ExtractionSkipped {
        file_name: String,
    },
    CleaningUp {
        staging_dir: PathBuf,
    },
    Completed {
        version: String,
        duration_ms: u64,
    },
    Failed {
        kind: String,
        error: String,
    },
}

/// Receives progress of the update sequence, e.g. to drive a status display
pub trait UpdateObserver {
    fn on_event(&mut self, event: &UpdateEvent);
}

impl<F> UpdateObserver for F
where
    F: FnMut(&UpdateEvent),
{
    fn on_event(&mut self, event: &UpdateEvent) {
        self(event);
    }
}

/// Logs every event as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl UpdateObserver for TracingObserver {
    fn on_event(&mut self, event: &UpdateEvent) {
        match serde_json::to_string(event) {
            Ok(json) => tracing::info!("Update event: {json}"),
            Err(e) => tracing::warn!("Failed to serialize update event {event:?}: {e}"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl UpdateObserver for NoopObserver {
    fn on_event(&mut self, _event: &UpdateEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_event_serialization() {
        let event = UpdateEvent::Started {
            from_version: "1.0".to_owned(),
            to_version: "2.0".to_owned(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"started""#));
        assert!(json.contains("1.0"));
        assert!(json.contains("2.0"));
    }

    #[test]
    fn test_completed_serialization() {
        let event = UpdateEvent::Completed {
            version: "2.0".to_owned(),
            duration_ms: 120,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("completed"));
        assert!(json.contains("120"));
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |event: &UpdateEvent| seen.push(event.clone());
            observer.on_event(&UpdateEvent::ExtractionSkipped {
                file_name: "app".to_owned(),
            });
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_tracing_observer_does_not_panic() {
        TracingObserver.on_event(&UpdateEvent::CleaningUp {
            staging_dir: PathBuf::from("temp"),
        });
        NoopObserver.on_event(&UpdateEvent::CleaningUp {
            staging_dir: PathBuf::from("temp"),
        });
    }
}
