//! Domain models that mirror the SQLite schema and get passed between the
//! store, the catalog service, and the terminal shell. They stay light-weight
//! data holders; validation of free-form input happens in the helpers at the
//! bottom of this file.

use std::fmt;

use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A performer in the catalog. `name` is the natural key and is unique
/// (case-sensitive) across all artists.
pub struct Artist {
    /// Surrogate key assigned by SQLite on insert. Never changes afterwards.
    pub id: i64,
    pub name: String,
    pub genre: Option<String>,
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A recording owned by exactly one artist. The `(title, artist_id)` pair is
/// the de-duplication key.
pub struct Song {
    pub id: i64,
    pub title: String,
    /// Free-form text; the catalog never parses it.
    pub release_date: Option<String>,
    pub bpm: Option<u32>,
    /// Back-reference to the owning artist.
    pub artist_id: i64,
}

impl Song {
    /// Short `Title (123 bpm)` label used by list views.
    pub fn display_title(&self) -> String {
        match self.bpm {
            Some(bpm) => format!("{} ({bpm} bpm)", self.title),
            None => self.title.clone(),
        }
    }
}

/// Field values for an artist that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDraft {
    pub name: String,
    pub genre: Option<String>,
}

/// Field values for a song that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub release_date: Option<String>,
    pub bpm: Option<u32>,
    pub artist_id: i64,
}

/// How a caller addresses a record: by surrogate id or by natural key
/// (artist name, song title). Resolved once from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    ById(i64),
    ByName(String),
}

impl RecordKey {
    /// Interpret raw input: anything that parses as an integer is an id,
    /// everything else is a name. Blank input is a validation error.
    pub fn parse(input: &str) -> CatalogResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Validation(
                "Enter an ID or a name.".to_string(),
            ));
        }
        Ok(match trimmed.parse::<i64>() {
            Ok(id) => RecordKey::ById(id),
            Err(_) => RecordKey::ByName(trimmed.to_string()),
        })
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::ById(id) => write!(f, "#{id}"),
            RecordKey::ByName(name) => write!(f, "'{name}'"),
        }
    }
}

/// Normalise user-entered BPM text. Only plain digits that fit a `u32` are
/// accepted; blank, signed, fractional, or otherwise non-numeric input maps
/// to `None` instead of an error.
pub fn parse_bpm(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u32>().ok()
}

/// Trim optional text input, collapsing blank values to `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_input_becomes_id_key() {
        assert_eq!(RecordKey::parse(" 42 ").unwrap(), RecordKey::ById(42));
        assert_eq!(RecordKey::parse("-3").unwrap(), RecordKey::ById(-3));
    }

    #[test]
    fn text_input_becomes_name_key() {
        assert_eq!(
            RecordKey::parse("  Daft Punk ").unwrap(),
            RecordKey::ByName("Daft Punk".to_string())
        );
        assert_eq!(
            RecordKey::parse("Blink 182").unwrap(),
            RecordKey::ByName("Blink 182".to_string())
        );
    }

    #[test]
    fn blank_input_is_a_validation_error() {
        for blank in ["", "   "] {
            let err = RecordKey::parse(blank).unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
            assert_eq!(err.to_string(), "Enter an ID or a name.");
        }
    }

    #[test]
    fn bpm_accepts_plain_digits() {
        assert_eq!(parse_bpm("123"), Some(123));
        assert_eq!(parse_bpm(" 90 "), Some(90));
        assert_eq!(parse_bpm("0"), Some(0));
    }

    #[test]
    fn bpm_rejects_everything_else_as_absent() {
        for raw in ["", "  ", "abc", "12.5", "-80", "+80", "1e3", "99999999999"] {
            assert_eq!(parse_bpm(raw), None, "input {raw:?}");
        }
    }

    #[test]
    fn optional_text_collapses_blanks() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" House "), Some("House".to_string()));
    }

    #[test]
    fn display_title_includes_bpm_when_known() {
        let mut song = Song {
            id: 1,
            title: "One More Time".to_string(),
            release_date: None,
            bpm: Some(123),
            artist_id: 1,
        };
        assert_eq!(song.display_title(), "One More Time (123 bpm)");
        song.bpm = None;
        assert_eq!(song.display_title(), "One More Time");
    }
}
