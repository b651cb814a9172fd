//! Catalog Service: the artist and song operations the shell calls. Each
//! operation runs at most one write against the store, so there is no
//! multi-statement transaction to roll back.

use log::{debug, info, warn};
use rusqlite::ToSql;

use crate::db::{ArtistField, SongField, Store};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{optional_text, parse_bpm, Artist, ArtistDraft, RecordKey, Song, SongDraft};

/// Result of a find-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert<T> {
    Created(T),
    /// A record with the same key was already stored and is returned as-is.
    Existing(T),
}

impl<T> Upsert<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Upsert::Created(record) | Upsert::Existing(record) => record,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Upsert::Created(record) | Upsert::Existing(record) => record,
        }
    }
}

/// What `delete_artist` removed. Songs owned by the artist are deleted with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRemoval {
    pub artist: Artist,
    pub songs_removed: usize,
}

/// Domain operations over an owned `Store`.
pub struct Catalog {
    store: Store,
}

impl Catalog {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Return the artist called `name`, creating it with `genre` when absent.
    /// An existing artist's genre is left untouched.
    pub fn find_or_create_artist(
        &self,
        name: &str,
        genre: &str,
    ) -> CatalogResult<Upsert<Artist>> {
        let name = required(name, "Artist name")?;

        if let Some(artist) = self.store.find_by::<Artist>(ArtistField::Name, &name)? {
            debug!("event=artist_create status=exists id={}", artist.id);
            return Ok(Upsert::Existing(artist));
        }

        let artist = self.store.insert(ArtistDraft {
            name,
            genre: optional_text(genre),
        })?;
        info!("event=artist_create status=ok id={}", artist.id);
        Ok(Upsert::Created(artist))
    }

    /// Return the song `title` by `artist_name`, creating it when absent.
    ///
    /// `bpm` is raw user text: anything that is not a plain non-negative
    /// integer is stored as no value. The song is never created when the
    /// artist does not exist.
    pub fn find_or_create_song(
        &self,
        title: &str,
        artist_name: &str,
        release_date: &str,
        bpm: &str,
    ) -> CatalogResult<Upsert<Song>> {
        let title = required(title, "Song title")?;
        let artist_name = required(artist_name, "Artist name")?;
        let bpm = normalize_bpm(bpm);
        let release_date = optional_text(release_date);
        if release_date.is_none() {
            warn!("event=song_create status=warn reason=missing_release_date");
        }

        let artist = self
            .store
            .find_by::<Artist>(ArtistField::Name, &artist_name)?
            .ok_or(CatalogError::ArtistNotFound(artist_name))?;

        let key: [(SongField, &dyn ToSql); 2] = [
            (SongField::Title, &title),
            (SongField::ArtistId, &artist.id),
        ];
        let existing = self.store.find_where::<Song>(&key)?;
        if let Some(song) = existing {
            debug!("event=song_create status=exists id={}", song.id);
            return Ok(Upsert::Existing(song));
        }

        let song = self.store.insert(SongDraft {
            title,
            release_date,
            bpm,
            artist_id: artist.id,
        })?;
        info!(
            "event=song_create status=ok id={} artist_id={}",
            song.id, song.artist_id
        );
        Ok(Upsert::Created(song))
    }

    /// Resolve an artist by id or exact name.
    pub fn find_artist(&self, key: &RecordKey) -> CatalogResult<Artist> {
        let found = match key {
            RecordKey::ById(id) => self.store.find_by::<Artist>(ArtistField::Id, id)?,
            RecordKey::ByName(name) => self.store.find_by::<Artist>(ArtistField::Name, name)?,
        };
        found.ok_or_else(|| CatalogError::not_found("Artist", key))
    }

    /// Resolve a song by id or exact title. When several artists share a
    /// title the lowest id wins.
    pub fn find_song(&self, key: &RecordKey) -> CatalogResult<Song> {
        let found = match key {
            RecordKey::ById(id) => self.store.find_by::<Song>(SongField::Id, id)?,
            RecordKey::ByName(title) => self.store.find_by::<Song>(SongField::Title, title)?,
        };
        found.ok_or_else(|| CatalogError::not_found("Song", key))
    }

    pub fn artist_for_song(&self, song: &Song) -> CatalogResult<Option<Artist>> {
        self.store.find_by::<Artist>(ArtistField::Id, &song.artist_id)
    }

    /// Replace both mutable fields of the artist currently called `name`.
    pub fn update_artist(
        &self,
        name: &str,
        new_name: &str,
        new_genre: &str,
    ) -> CatalogResult<Artist> {
        let new_name = required(new_name, "Artist name")?;
        let mut artist = self.find_artist(&RecordKey::ByName(name.trim().to_string()))?;

        artist.name = new_name;
        artist.genre = optional_text(new_genre);
        self.store.update(&artist)?;
        info!("event=artist_update status=ok id={}", artist.id);
        Ok(artist)
    }

    /// Replace the mutable fields of a song. The owning artist never changes.
    pub fn update_song(
        &self,
        key: &RecordKey,
        title: &str,
        release_date: &str,
        bpm: &str,
    ) -> CatalogResult<Song> {
        let title = required(title, "Song title")?;
        let mut song = self.find_song(key)?;

        song.title = title;
        song.release_date = optional_text(release_date);
        song.bpm = normalize_bpm(bpm);
        self.store.update(&song)?;
        info!("event=song_update status=ok id={}", song.id);
        Ok(song)
    }

    /// Delete an artist together with every song that references it.
    pub fn delete_artist(&self, key: &RecordKey) -> CatalogResult<ArtistRemoval> {
        let artist = self.find_artist(key)?;
        let songs_removed = self
            .store
            .count_where::<Song>(SongField::ArtistId, &artist.id)?;

        self.store.delete(&artist)?;
        info!(
            "event=artist_delete status=ok id={} songs_removed={songs_removed}",
            artist.id
        );
        Ok(ArtistRemoval {
            artist,
            songs_removed,
        })
    }

    pub fn delete_song(&self, key: &RecordKey) -> CatalogResult<Song> {
        let song = self.find_song(key)?;
        self.store.delete(&song)?;
        info!("event=song_delete status=ok id={}", song.id);
        Ok(song)
    }

    pub fn list_artists_ordered(&self) -> CatalogResult<Vec<Artist>> {
        self.store.list_ordered::<Artist>(ArtistField::Name)
    }

    pub fn list_songs_ordered(&self) -> CatalogResult<Vec<Song>> {
        self.store.list_ordered::<Song>(SongField::Title)
    }

    /// Songs by ascending bpm. Songs without a bpm come last, by id.
    pub fn list_songs_by_bpm(&self) -> CatalogResult<Vec<Song>> {
        self.store.list_ordered::<Song>(SongField::Bpm)
    }

    /// Songs owned by `artist`, oldest first.
    pub fn list_songs_for_artist(&self, artist: &Artist) -> CatalogResult<Vec<Song>> {
        self.store.list_where::<Song>(SongField::ArtistId, &artist.id)
    }
}

fn required(value: &str, field: &str) -> CatalogResult<String> {
    optional_text(value)
        .ok_or_else(|| CatalogError::Validation(format!("{field} cannot be empty.")))
}

fn normalize_bpm(raw: &str) -> Option<u32> {
    let bpm = parse_bpm(raw);
    if bpm.is_none() && !raw.trim().is_empty() {
        warn!("event=bpm_normalize status=warn reason=not_numeric");
    }
    bpm
}
