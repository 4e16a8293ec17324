//! Command handlers

pub mod bookmark;
pub mod browse;
pub mod config;
pub mod export;
pub mod highlight;
pub mod journal;
pub mod lesson;
pub mod status;

use lectern_core::Session;

use crate::output::Output;

/// Warn when a change from this command could not be written to disk
fn warn_if_unsaved(session: &Session, output: &Output) {
    if session.is_degraded() {
        output.warning(&format!(
            "could not write to {}; this change was not saved",
            session.config().data_dir.display()
        ));
    }
}
