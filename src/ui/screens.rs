use std::collections::HashMap;

use crate::models::{Artist, Song};

/// A list of records plus the highlighted row. Selection is clamped whenever
/// the backing items change.
pub(crate) struct SelectableList<T> {
    pub(crate) items: Vec<T>,
    pub(crate) selected: usize,
}

impl<T> SelectableList<T> {
    pub(crate) fn new(items: Vec<T>) -> Self {
        let mut list = Self { items, selected: 0 };
        list.ensure_in_bounds();
        list
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub(crate) fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.ensure_in_bounds();
    }

    /// Move the highlight to the first item matching `matches`, if any.
    pub(crate) fn focus(&mut self, matches: impl Fn(&T) -> bool) {
        if let Some(idx) = self.items.iter().position(|item| matches(item)) {
            self.selected = idx;
        }
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len() - 1;
        }
    }
}

/// Sort order of the global song list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SongOrder {
    Title,
    Bpm,
}

impl SongOrder {
    pub(crate) fn toggle(self) -> Self {
        match self {
            SongOrder::Title => SongOrder::Bpm,
            SongOrder::Bpm => SongOrder::Title,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            SongOrder::Title => "by title",
            SongOrder::Bpm => "by bpm",
        }
    }
}

/// Every song in the catalog with the artist names needed to display them.
pub(crate) struct SongsScreen {
    pub(crate) list: SelectableList<Song>,
    pub(crate) order: SongOrder,
    pub(crate) artist_names: HashMap<i64, String>,
}

impl SongsScreen {
    pub(crate) fn new(songs: Vec<Song>, order: SongOrder, artists: &[Artist]) -> Self {
        Self {
            list: SelectableList::new(songs),
            order,
            artist_names: artist_names(artists),
        }
    }

    /// Artist name for a song, or a placeholder for orphaned rows.
    pub(crate) fn artist_name(&self, song: &Song) -> &str {
        self.artist_names
            .get(&song.artist_id)
            .map(String::as_str)
            .unwrap_or("<unknown artist>")
    }

    pub(crate) fn set_artists(&mut self, artists: &[Artist]) {
        self.artist_names = artist_names(artists);
    }
}

/// Songs belonging to one artist.
pub(crate) struct ArtistSongsScreen {
    pub(crate) artist: Artist,
    pub(crate) list: SelectableList<Song>,
}

impl ArtistSongsScreen {
    pub(crate) fn new(artist: Artist, songs: Vec<Song>) -> Self {
        Self {
            artist,
            list: SelectableList::new(songs),
        }
    }
}

fn artist_names(artists: &[Artist]) -> HashMap<i64, String> {
    artists
        .iter()
        .map(|artist| (artist.id, artist.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_inside_the_list() {
        let mut list = SelectableList::new(vec![1, 2, 3]);
        list.move_selection(-5);
        assert_eq!(list.selected, 0);
        list.move_selection(10);
        assert_eq!(list.selected, 2);
        list.set_items(vec![1]);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn focus_moves_to_matching_item() {
        let mut list = SelectableList::new(vec![10, 20, 30]);
        list.set_items(vec![5, 10, 20, 30]);
        list.focus(|item| *item == 20);
        assert_eq!(list.current(), Some(&20));
    }

    #[test]
    fn empty_list_has_no_current_item() {
        let mut list: SelectableList<i32> = SelectableList::new(Vec::new());
        list.move_selection(1);
        list.select_last();
        assert!(list.current().is_none());
    }

    #[test]
    fn orphaned_song_gets_placeholder_artist() {
        let artists = vec![Artist {
            id: 1,
            name: "Daft Punk".to_string(),
            genre: None,
        }];
        let song = Song {
            id: 1,
            title: "Aerodynamic".to_string(),
            release_date: None,
            bpm: None,
            artist_id: 7,
        };
        let screen = SongsScreen::new(vec![song.clone()], SongOrder::Title, &artists);
        assert_eq!(screen.artist_name(&song), "<unknown artist>");
        assert_eq!(SongOrder::Title.toggle(), SongOrder::Bpm);
    }
}
