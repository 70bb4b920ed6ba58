//! Tool session
//!
//! Holds everything one tool page needs between user actions: the selected
//! feature, uploaded files, settings and the last artifact. Selecting a
//! feature starts over.

use crate::artifact::ProcessedArtifact;
use crate::command::ProcessMetrics;
use crate::dispatch::{profile, FeatureProfile};
use crate::engine::DocumentEngine;
use crate::error::PdfToolsError;
use crate::feature::FeatureId;
use crate::orchestrator;
use crate::settings::ProcessSettings;
use crate::upload::{InputFile, UploadLimits, UploadRejection, UploadedFileSet};
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

/// A failed run, as reported to the user
#[derive(Error, Debug)]
#[error("{feature} failed: {source}")]
pub struct RunFailure {
    /// Title of the tool, or the raw id when it has none
    pub feature: String,
    #[source]
    pub source: PdfToolsError,
}

pub struct Session<E: DocumentEngine> {
    engine: E,
    limits: UploadLimits,
    selected: String,
    profile: FeatureProfile,
    files: UploadedFileSet,
    settings: ProcessSettings,
    artifact: Option<ProcessedArtifact>,
    metrics: Option<ProcessMetrics>,
}

impl<E: DocumentEngine> Session<E> {
    pub fn new(engine: E, limits: UploadLimits) -> Self {
        Self {
            engine,
            limits,
            selected: String::new(),
            profile: FeatureProfile::generic(),
            files: UploadedFileSet::new(),
            settings: ProcessSettings::default(),
            artifact: None,
            metrics: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Switch tools; files, settings and any artifact are discarded
    pub fn select_feature(&mut self, id: &str) -> &FeatureProfile {
        self.selected = id.trim().to_string();
        self.profile = profile(&self.selected);
        self.files.clear();
        self.settings = ProcessSettings::default();
        self.artifact = None;
        self.metrics = None;
        info!(
            feature = %self.selected,
            known = self.profile.feature.is_some(),
            "feature selected"
        );
        &self.profile
    }

    pub fn feature(&self) -> Option<FeatureId> {
        self.profile.feature
    }

    pub fn profile(&self) -> &FeatureProfile {
        &self.profile
    }

    pub fn add_files(
        &mut self,
        files: impl IntoIterator<Item = InputFile>,
    ) -> Vec<UploadRejection> {
        self.files.add(files, &self.profile, &self.limits)
    }

    pub fn remove_file(&mut self, index: usize) -> Option<InputFile> {
        self.files.remove(index)
    }

    pub fn files(&self) -> &UploadedFileSet {
        &self.files
    }

    pub fn settings(&self) -> &ProcessSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ProcessSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: ProcessSettings) {
        self.settings = settings;
    }

    /// Files are present
    ///
    /// `run` borrows the session mutably, so a second run cannot start while
    /// one is pending.
    pub fn can_execute(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn artifact(&self) -> Option<&ProcessedArtifact> {
        self.artifact.as_ref()
    }

    pub fn metrics(&self) -> Option<&ProcessMetrics> {
        self.metrics.as_ref()
    }

    /// Hand the artifact over for download, leaving the session without one
    pub fn take_artifact(&mut self) -> Option<ProcessedArtifact> {
        self.metrics = None;
        self.artifact.take()
    }

    /// Run the selected tool on the uploaded files
    ///
    /// Any previous artifact is dropped first, so a failed run leaves none.
    pub fn run(&mut self) -> Result<&ProcessedArtifact, RunFailure> {
        let title = self.title();
        self.artifact = None;
        self.metrics = None;
        let started = Utc::now();
        let outcome = self.execute();

        match outcome {
            Ok((artifact, pages)) => {
                let elapsed = (Utc::now() - started).num_milliseconds().max(0) as u64;
                self.metrics = Some(ProcessMetrics {
                    input_size_bytes: self.files.iter().map(InputFile::size).sum(),
                    output_size_bytes: artifact.size(),
                    page_count: pages,
                    processing_time_ms: elapsed,
                });
                info!(file = %artifact.file_name, elapsed_ms = elapsed, "artifact ready");
                let artifact = self.artifact.insert(artifact);
                Ok(&*artifact)
            }
            Err(source) => {
                error!(feature = %title, error = %source, "run failed");
                Err(RunFailure {
                    feature: title,
                    source,
                })
            }
        }
    }

    fn execute(&self) -> crate::Result<(ProcessedArtifact, u32)> {
        let feature = self
            .profile
            .feature
            .ok_or_else(|| PdfToolsError::UnknownFeature(self.selected.clone()))?;
        let settings = self.settings.resolve(feature)?;
        let bytes = orchestrator::run(&self.engine, self.files.as_slice(), &settings)?;

        let pages = match self.engine.load(&bytes) {
            Ok(doc) => self.engine.page_count(&doc),
            Err(e) => {
                warn!(error = %e, "could not count output pages");
                0
            }
        };
        let artifact = ProcessedArtifact::package(bytes, feature, Utc::now().timestamp_millis());
        Ok((artifact, pages))
    }

    fn title(&self) -> String {
        match self.profile.feature {
            Some(id) => id.feature().title.to_string(),
            None => self.selected.clone(),
        }
    }
}
