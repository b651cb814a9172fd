use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Artist, Song};

/// Style a `Label: value` line, dimming placeholders and highlighting the
/// focused field.
fn field_line(field_name: &str, value: &str, placeholder: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

/// Fields available within the artist form.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum ArtistInput {
    #[default]
    Name,
    Genre,
}

/// Text typed into the add/edit artist dialog.
#[derive(Default, Clone)]
pub(crate) struct ArtistForm {
    pub(crate) name: String,
    pub(crate) genre: String,
    pub(crate) active: ArtistInput,
    pub(crate) error: Option<String>,
}

impl ArtistForm {
    /// Populate the form from an existing artist when editing.
    pub(crate) fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            genre: artist.genre.clone().unwrap_or_default(),
            active: ArtistInput::Name,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ArtistInput::Name => ArtistInput::Genre,
            ArtistInput::Genre => ArtistInput::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut().push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut().pop();
    }

    fn value_mut(&mut self) -> &mut String {
        match self.active {
            ArtistInput::Name => &mut self.name,
            ArtistInput::Genre => &mut self.genre,
        }
    }

    pub(crate) fn build_line(&self, field_name: &str, field: ArtistInput) -> Line<'static> {
        let (value, placeholder) = match field {
            ArtistInput::Name => (&self.name, "<required>"),
            ArtistInput::Genre => (&self.genre, "<optional>"),
        };
        field_line(field_name, value, placeholder, self.active == field)
    }

    pub(crate) fn value_len(&self, field: ArtistInput) -> usize {
        match field {
            ArtistInput::Name => self.name.chars().count(),
            ArtistInput::Genre => self.genre.chars().count(),
        }
    }
}

/// Enumerates the fields within the song form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum SongInput {
    #[default]
    Title,
    Artist,
    ReleaseDate,
    Bpm,
}

impl SongInput {
    /// Vertical position of the field inside the dialog.
    pub(crate) fn row(self) -> u16 {
        match self {
            SongInput::Title => 0,
            SongInput::Artist => 1,
            SongInput::ReleaseDate => 2,
            SongInput::Bpm => 3,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            SongInput::Title => "Title",
            SongInput::Artist => "Artist",
            SongInput::ReleaseDate => "Release Date",
            SongInput::Bpm => "BPM",
        }
    }
}

/// Form state for song creation and editing. BPM is kept as raw text; the
/// catalog decides whether it is a number.
#[derive(Default, Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) release_date: String,
    pub(crate) bpm: String,
    pub(crate) active: SongInput,
    /// Editing never moves a song to another artist.
    pub(crate) artist_locked: bool,
    pub(crate) error: Option<String>,
}

impl SongForm {
    /// Start a new song already attached to `artist`.
    pub(crate) fn for_artist(artist: &Artist) -> Self {
        Self {
            artist: artist.name.clone(),
            ..Self::default()
        }
    }

    /// Populate the form from an existing song when entering edit mode.
    pub(crate) fn from_song(song: &Song, artist_name: &str) -> Self {
        Self {
            title: song.title.clone(),
            artist: artist_name.to_string(),
            release_date: song.release_date.clone().unwrap_or_default(),
            bpm: song.bpm.map(|bpm| bpm.to_string()).unwrap_or_default(),
            active: SongInput::Title,
            artist_locked: true,
            error: None,
        }
    }

    /// Cycle focus forward, skipping the artist when it is locked.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            SongInput::Title if self.artist_locked => SongInput::ReleaseDate,
            SongInput::Title => SongInput::Artist,
            SongInput::Artist => SongInput::ReleaseDate,
            SongInput::ReleaseDate => SongInput::Bpm,
            SongInput::Bpm => SongInput::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            SongInput::Title => SongInput::Bpm,
            SongInput::Artist => SongInput::Title,
            SongInput::ReleaseDate if self.artist_locked => SongInput::Title,
            SongInput::ReleaseDate => SongInput::Artist,
            SongInput::Bpm => SongInput::ReleaseDate,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.value_mut() {
            Some(value) => {
                value.push(ch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.value_mut() {
            value.pop();
        }
    }

    fn value_mut(&mut self) -> Option<&mut String> {
        match self.active {
            SongInput::Title => Some(&mut self.title),
            SongInput::Artist if self.artist_locked => None,
            SongInput::Artist => Some(&mut self.artist),
            SongInput::ReleaseDate => Some(&mut self.release_date),
            SongInput::Bpm => Some(&mut self.bpm),
        }
    }

    fn value(&self, field: SongInput) -> &str {
        match field {
            SongInput::Title => &self.title,
            SongInput::Artist => &self.artist,
            SongInput::ReleaseDate => &self.release_date,
            SongInput::Bpm => &self.bpm,
        }
    }

    pub(crate) fn build_line(&self, field: SongInput) -> Line<'static> {
        let placeholder = match field {
            SongInput::Title | SongInput::Artist => "<required>",
            SongInput::ReleaseDate => "<expected>",
            SongInput::Bpm => "<optional>",
        };
        field_line(
            field.label(),
            self.value(field),
            placeholder,
            self.active == field,
        )
    }

    pub(crate) fn value_len(&self, field: SongInput) -> usize {
        self.value(field).chars().count()
    }
}

/// Which table a key prompt deletes from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum KeyTarget {
    Artist,
    Song,
}

impl KeyTarget {
    pub(crate) fn title(self) -> &'static str {
        match self {
            KeyTarget::Artist => "Delete Artist by ID or Name",
            KeyTarget::Song => "Delete Song by ID or Title",
        }
    }
}

/// Single-line prompt for an id or a name.
pub(crate) struct KeyPrompt {
    pub(crate) target: KeyTarget,
    pub(crate) input: String,
    pub(crate) error: Option<String>,
}

impl KeyPrompt {
    pub(crate) fn new(target: KeyTarget) -> Self {
        Self {
            target,
            input: String::new(),
            error: None,
        }
    }
}

/// State for confirming an artist deletion. `song_count` songs go with it.
pub(crate) struct ConfirmArtistDelete {
    pub(crate) artist: Artist,
    pub(crate) song_count: usize,
}

/// State for confirming permanent song deletion.
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}
