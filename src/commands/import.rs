//! Import command handler.

use anyhow::Context;
use dreamport::Document;
use dreamport::config::ImportSettings;
use dreamport::services::{ImportService, ProgressCallback, RandomIds};

/// Executes the import command.
///
/// Every generated document is echoed to standard output as one JSON line
/// unless `quiet` is set.
pub fn cmd_import(settings: &ImportSettings, quiet: bool) -> anyhow::Result<()> {
    let service = ImportService::from_sample_file(&settings.sample, settings.options())
        .with_context(|| format!("Failed to load templates from {}", settings.sample.display()))?;

    let echo: ProgressCallback = Box::new(|document: &Document| {
        match serde_json::to_string(document) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, id = %document.id(), "failed to echo document"),
        }
    });

    let result = service
        .import_files(
            &settings.entries,
            &settings.labels,
            &settings.output,
            &mut RandomIds,
            if quiet { None } else { Some(&echo) },
        )
        .with_context(|| format!("Failed to import {}", settings.entries.display()))?;

    eprintln!(
        "Wrote {} tags and {} dreams to {}",
        result.tags,
        result.dreams,
        settings.output.display()
    );
    if result.unresolved_labels > 0 {
        eprintln!(
            "{} label references were missing from {}",
            result.unresolved_labels,
            settings.labels.display()
        );
    }
    Ok(())
}
