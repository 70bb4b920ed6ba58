//! Batch orchestration
//!
//! Checks the file count for the selected tool, then hands the files to its
//! operation in input order. The first failure ends the run.

use crate::compress::compress_document;
use crate::convert::{images_to_pdf, word_to_pdf};
use crate::engine::DocumentEngine;
use crate::error::{FileCount, PdfToolsError, Result};
use crate::feature::FeatureId;
use crate::fill_form::fill_form;
use crate::merge::merge_documents;
use crate::settings::FeatureSettings;
use crate::split::{delete_pages, split_document};
use crate::upload::InputFile;
use chrono::{Local, NaiveDateTime};
use tracing::info;

/// How many files a tool takes
pub fn required_files(feature: FeatureId) -> FileCount {
    match feature {
        FeatureId::Merge => FileCount::AtLeast(2),
        FeatureId::ImageToPdf => FileCount::AtLeast(1),
        FeatureId::Split
        | FeatureId::Compress
        | FeatureId::WordToPdf
        | FeatureId::DeletePages
        | FeatureId::FillForm => FileCount::Exactly(1),
    }
}

/// Run the tool described by `settings` against `files`, stamping any dates
/// with the local time
pub fn run<E: DocumentEngine>(
    engine: &E,
    files: &[InputFile],
    settings: &FeatureSettings,
) -> Result<Vec<u8>> {
    run_at(engine, files, settings, Local::now().naive_local())
}

pub fn run_at<E: DocumentEngine>(
    engine: &E,
    files: &[InputFile],
    settings: &FeatureSettings,
    now: NaiveDateTime,
) -> Result<Vec<u8>> {
    let feature = settings.feature();
    let required = required_files(feature);
    if !required.is_satisfied_by(files.len()) {
        return Err(PdfToolsError::Precondition {
            feature: feature.feature().title.to_string(),
            required,
            actual: files.len(),
        });
    }

    info!(%feature, files = files.len(), "processing started");

    let output = match settings {
        FeatureSettings::Merge => merge_documents(engine, files)?,
        FeatureSettings::ImageToPdf => images_to_pdf(engine, files)?,
        FeatureSettings::Split { range } => split_document(engine, &files[0].bytes, range)?,
        FeatureSettings::Compress { level } => compress_document(engine, &files[0].bytes, *level)?,
        FeatureSettings::WordToPdf => word_to_pdf(engine, &files[0], now.date())?,
        FeatureSettings::DeletePages { pages } => delete_pages(engine, &files[0].bytes, pages)?,
        FeatureSettings::FillForm { fields, position } => {
            fill_form(engine, &files[0].bytes, fields, *position, now)?
        }
    };

    info!(%feature, bytes = output.len(), "processing finished");
    Ok(output)
}
