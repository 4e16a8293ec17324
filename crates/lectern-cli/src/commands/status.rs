//! Status command handler

use anyhow::Result;

use lectern_core::{FileStore, Session};

use crate::output::{Output, OutputFormat};

/// Show reader state and storage information
pub fn show(session: &Session, output: &Output) -> Result<()> {
    let status = session.status();
    let config = session.config();
    let storage_size = FileStore::new(config.data_dir.clone()).total_size();

    match output.format {
        OutputFormat::Json => output.json(&serde_json::json!({
            "status": status,
            "storage": {
                "location": config.data_dir,
                "size": storage_size,
            },
            "content": config.content_path,
        })),
        OutputFormat::Quiet => println!("{}", config.data_dir.display()),
        OutputFormat::Human => {
            println!("Lectern Status");
            println!("==============");
            println!();
            println!("Content:");
            println!(
                "  Source:  {}",
                config
                    .content_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "bundled guide".to_string())
            );
            println!("  Lessons: {}", status.lessons);
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {} bytes", storage_size);
            println!();
            println!("Contents:");
            println!("  Bookmarks:  {}", status.bookmarks);
            if status.stale_bookmarks > 0 {
                println!(
                    "              ({} no longer match any content)",
                    status.stale_bookmarks
                );
            }
            println!("  Highlights: {}", status.highlights);
            println!("  Journal:    {} characters", status.journal_chars);
        }
    }

    Ok(())
}
