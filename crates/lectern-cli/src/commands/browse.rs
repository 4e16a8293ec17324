//! Browse command handler

use anyhow::Result;

use lectern_core::{BrowseCategory, Session};

use crate::output::Output;

/// List every item of one category across all lessons
pub fn show(session: &Session, category: BrowseCategory, output: &Output) -> Result<()> {
    let items = session.browse(category);
    output.print_flat_items(category.title(), &items, |id| session.is_bookmarked(id));
    Ok(())
}
