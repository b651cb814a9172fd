use rusqlite::types::Value;
use rusqlite::Row;

use super::store::{Draft, Record, SortField};
use crate::error::CatalogError;
use crate::models::{Song, SongDraft};

/// Filterable and sortable columns of the `songs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongField {
    Id,
    Title,
    ReleaseDate,
    Bpm,
    ArtistId,
}

impl SortField for SongField {
    fn column(self) -> &'static str {
        match self {
            SongField::Id => "id",
            SongField::Title => "title",
            SongField::ReleaseDate => "release_date",
            SongField::Bpm => "bpm",
            SongField::ArtistId => "artist_id",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, SongField::Title | SongField::ReleaseDate)
    }
}

impl Record for Song {
    type Field = SongField;

    const KIND: &'static str = "Song";
    const TABLE: &'static str = "songs";
    const COLUMNS: &'static str = "id, title, release_date, bpm, artist_id";
    const UPDATE_SQL: &'static str = "UPDATE songs
        SET title = ?1, release_date = ?2, bpm = ?3, artist_id = ?4
        WHERE id = ?5";

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        format!("'{}'", self.title)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Song {
            id: row.get(0)?,
            title: row.get(1)?,
            release_date: row.get(2)?,
            bpm: row.get(3)?,
            artist_id: row.get(4)?,
        })
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.release_date.clone().into(),
            self.bpm.into(),
            self.artist_id.into(),
            self.id.into(),
        ]
    }
}

impl Draft for SongDraft {
    type Output = Song;

    const INSERT_SQL: &'static str =
        "INSERT INTO songs (title, release_date, bpm, artist_id) VALUES (?1, ?2, ?3, ?4)";

    fn values(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.release_date.clone().into(),
            self.bpm.into(),
            self.artist_id.into(),
        ]
    }

    fn label(&self) -> String {
        format!("'{}'", self.title)
    }

    fn into_record(self, id: i64) -> Song {
        Song {
            id,
            title: self.title,
            release_date: self.release_date,
            bpm: self.bpm,
            artist_id: self.artist_id,
        }
    }

    fn missing_reference(&self) -> CatalogError {
        CatalogError::ArtistNotFound(self.artist_id.to_string())
    }
}
