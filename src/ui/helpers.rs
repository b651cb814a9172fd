use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::CatalogError;
use crate::models::Artist;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Turn an expected catalog outcome into a status message. Storage failures
/// are passed back up so the shell exits instead of limping on.
pub(crate) fn surface_error(err: CatalogError) -> Result<String> {
    if err.is_recoverable() {
        Ok(err.to_string())
    } else {
        Err(err.into())
    }
}

/// `Name (Genre)` or just the name when no genre is stored.
pub(crate) fn artist_label(artist: &Artist) -> String {
    match &artist.genre {
        Some(genre) => format!("{} ({genre})", artist.name),
        None => artist.name.clone(),
    }
}
