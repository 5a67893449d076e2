// SPDX-License-Identifier: CC-BY-NC-ND-4.0

//! Main updater that ties manifest resolution to update application

use crate::applier::{StagingLayout, UpdateApplier, UpdateReport};
use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::progress::{UpdateEvent, UpdateObserver};
use crate::session::UpdateSession;
use tracing::{error, info};

#[derive(Debug)]
pub enum UpdateOutcome {
    /// Published version equals the running one; nothing was downloaded
    UpToDate { version: String },
    Updated(UpdateReport),
}

#[derive(Debug)]
pub struct AutoUpdater {
    config: UpdaterConfig,
    fetcher: Fetcher,
    applier: UpdateApplier,
}

impl AutoUpdater {
    pub fn new(config: UpdaterConfig) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        let layout = StagingLayout::from_config(&config)?;
        info!(
            "Updater ready: staging={}, install={}",
            layout.staging_root().display(),
            layout.install_dir().display()
        );

        Ok(Self {
            applier: UpdateApplier::new(fetcher.clone(), layout),
            fetcher,
            config,
        })
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    pub fn layout(&self) -> &StagingLayout {
        self.applier.layout()
    }

    /// Resolve the manifest for `program_name` from `manifest_source`
    pub fn check(
        &self,
        program_name: &str,
        current_version: &str,
        manifest_source: &str,
    ) -> Result<UpdateSession> {
        let mut session = UpdateSession::new(program_name, current_version, manifest_source);
        session.resolve(&self.fetcher)?;

        if session.update_available() {
            info!(
                "Update available for {program_name}: {current_version} -> {}",
                session.update_version().unwrap_or_default()
            );
        } else {
            info!("{program_name} is up to date ({current_version})");
        }

        Ok(session)
    }

    /// Same as [`check`](Self::check) against the configured manifest URL
    pub fn check_default(
        &self,
        program_name: &str,
        current_version: &str,
    ) -> Result<UpdateSession> {
        self.check(program_name, current_version, &self.config.manifest_url)
    }

    /// Apply the session's update if its published version differs from the
    /// running one. Unresolved sessions are resolved first.
    pub fn update_application(
        &self,
        mut session: UpdateSession,
        observer: &mut dyn UpdateObserver,
    ) -> Result<UpdateOutcome> {
        let manifest = session.resolve(&self.fetcher)?.clone();

        if !session.update_available() {
            return Ok(UpdateOutcome::UpToDate {
                version: manifest.version,
            });
        }

        info!(
            "Updating {} from {} to {}",
            session.program_name(),
            session.current_version(),
            manifest.version
        );
        observer.on_event(&UpdateEvent::Started {
            from_version: session.current_version().to_owned(),
            to_version: manifest.version.clone(),
        });

        match self.applier.apply(&manifest, observer) {
            Ok(report) => {
                info!(
                    "Update to {} finished in {}ms",
                    report.version,
                    report.duration_ms()
                );
                observer.on_event(&UpdateEvent::Completed {
                    version: report.version.clone(),
                    duration_ms: report.duration_ms(),
                });
                Ok(UpdateOutcome::Updated(report))
            }
            Err(e) => {
                error!("Update to {} failed: {e}", manifest.version);
                observer.on_event(&UpdateEvent::Failed {
                    kind: e.kind().to_owned(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
