//! Decode command handler.

use anyhow::Context;
use dreamport::config::ExportSettings;
use dreamport::io::{CsvRowSource, RowSource};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Executes the decode command, printing one JSON object per row.
pub fn cmd_decode(settings: &ExportSettings, rows: &Path) -> anyhow::Result<()> {
    let file = File::open(rows).with_context(|| format!("Failed to open {}", rows.display()))?;
    let mut source = CsvRowSource::new(BufReader::new(file), settings.encoding());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    while let Some(dream) = source
        .next()
        .with_context(|| format!("Failed to decode {}", rows.display()))?
    {
        serde_json::to_writer(&mut out, &dream)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
