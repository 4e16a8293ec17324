//! Export command handler

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use lectern_core::{ExportFormat, Session};

use crate::output::Output;

/// Write highlights and journal to a file, optionally opening it
pub fn export(
    session: &Session,
    format: ExportFormat,
    path: Option<PathBuf>,
    open_after: bool,
    output: &Output,
) -> Result<()> {
    let path = path.unwrap_or_else(|| {
        session
            .config()
            .export_dir()
            .join(format.default_file_name())
    });

    let document = session.export(format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {:?}", parent))?;
    }
    fs::write(&path, document).with_context(|| format!("Failed to write export: {:?}", path))?;
    info!(%format, path = ?path, "Exported notes");

    output.success(&format!("Exported {} to {}", format, path.display()));

    if open_after {
        open::that(&path).with_context(|| format!("Failed to open {:?}", path))?;
    }
    Ok(())
}
