use rusqlite::types::Value;
use rusqlite::Row;

use super::store::{Draft, Record, SortField};
use crate::models::{Artist, ArtistDraft};

/// Filterable and sortable columns of the `artists` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistField {
    Id,
    Name,
    Genre,
}

impl SortField for ArtistField {
    fn column(self) -> &'static str {
        match self {
            ArtistField::Id => "id",
            ArtistField::Name => "name",
            ArtistField::Genre => "genre",
        }
    }

    fn is_text(self) -> bool {
        !matches!(self, ArtistField::Id)
    }
}

impl Record for Artist {
    type Field = ArtistField;

    const KIND: &'static str = "Artist";
    const TABLE: &'static str = "artists";
    const COLUMNS: &'static str = "id, name, genre";
    const UPDATE_SQL: &'static str = "UPDATE artists SET name = ?1, genre = ?2 WHERE id = ?3";

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        format!("'{}'", self.name)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            genre: row.get(2)?,
        })
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.genre.clone().into(),
            self.id.into(),
        ]
    }
}

impl Draft for ArtistDraft {
    type Output = Artist;

    const INSERT_SQL: &'static str = "INSERT INTO artists (name, genre) VALUES (?1, ?2)";

    fn values(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.genre.clone().into()]
    }

    fn label(&self) -> String {
        format!("'{}'", self.name)
    }

    fn into_record(self, id: i64) -> Artist {
        Artist {
            id,
            name: self.name,
            genre: self.genre,
        }
    }
}
