//! Export command handler.

use anyhow::Context;
use dreamport::config::ExportSettings;
use dreamport::services::ExportService;
use std::path::Path;

/// Executes the export command.
pub fn cmd_export(
    settings: &ExportSettings,
    collection: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let service = ExportService::new(settings.options());
    let result = service
        .export_file(collection, output)
        .with_context(|| format!("Failed to export {}", collection.display()))?;

    if let Some(path) = output {
        eprintln!("Wrote {} rows to {}", result.dreams, path.display());
    }
    Ok(())
}
