use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::catalog::{Catalog, Upsert};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{parse_bpm, Artist, RecordKey, Song};

use super::forms::{
    ArtistForm, ArtistInput, ConfirmArtistDelete, ConfirmSongDelete, KeyPrompt, KeyTarget,
    SongForm, SongInput,
};
use super::helpers::{artist_label, centered_rect, surface_error};
use super::screens::{ArtistSongsScreen, SelectableList, SongOrder, SongsScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Which list fills the main area.
enum Screen {
    Artists,
    Songs(SongsScreen),
    ArtistSongs(ArtistSongsScreen),
}

/// Modal state layered over the current screen.
enum Mode {
    Normal,
    AddingArtist(ArtistForm),
    EditingArtist {
        original_name: String,
        form: ArtistForm,
    },
    ConfirmArtistDelete(ConfirmArtistDelete),
    CreatingSong(SongForm),
    EditingSong {
        song_id: i64,
        form: SongForm,
    },
    ConfirmSongDelete(ConfirmSongDelete),
    DeletingByKey(KeyPrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    artists: SelectableList<Artist>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(catalog: Catalog) -> Result<Self> {
        let artists = catalog.list_artists_ordered()?;
        Ok(Self {
            catalog,
            artists: SelectableList::new(artists),
            screen: Screen::Artists,
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Route one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingArtist(form) => self.handle_artist_form(code, None, form)?,
            Mode::EditingArtist {
                original_name,
                form,
            } => self.handle_artist_form(code, Some(original_name), form)?,
            Mode::ConfirmArtistDelete(confirm) => {
                self.handle_confirm_artist_delete(code, confirm)?
            }
            Mode::CreatingSong(form) => self.handle_song_form(code, None, form)?,
            Mode::EditingSong { song_id, form } => {
                self.handle_song_form(code, Some(song_id), form)?
            }
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm)?,
            Mode::DeletingByKey(prompt) => self.handle_key_prompt(code, prompt)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if self.navigate(code) {
            return Ok(Mode::Normal);
        }

        if let KeyCode::Char('q') = code {
            *exit = true;
            return Ok(Mode::Normal);
        }

        match self.screen {
            Screen::Artists => self.handle_artists_key(code, exit),
            Screen::Songs(_) | Screen::ArtistSongs(_) => self.handle_song_list_key(code),
        }
    }

    /// Apply list navigation keys to whichever list is on screen.
    fn navigate(&mut self, code: KeyCode) -> bool {
        match &mut self.screen {
            Screen::Artists => apply_navigation(&mut self.artists, code),
            Screen::Songs(songs) => apply_navigation(&mut songs.list, code),
            Screen::ArtistSongs(view) => apply_navigation(&mut view.list, code),
        }
    }

    fn handle_artists_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Enter => match self.artists.current().cloned() {
                Some(artist) => {
                    self.clear_status();
                    self.open_artist_songs(artist)?;
                }
                None => self.set_status("No artist selected.", StatusKind::Error),
            },
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.clear_status();
                self.open_songs(SongOrder::Title)?;
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingArtist(ArtistForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => match self.artists.current() {
                Some(artist) => {
                    let mode = Mode::EditingArtist {
                        original_name: artist.name.clone(),
                        form: ArtistForm::from_artist(artist),
                    };
                    self.clear_status();
                    return Ok(mode);
                }
                None => self.set_status("No artist selected to edit.", StatusKind::Error),
            },
            KeyCode::Char('-') => match self.artists.current().cloned() {
                Some(artist) => {
                    self.clear_status();
                    return Ok(self.confirm_artist_delete(artist)?);
                }
                None => self.set_status("No artist selected to remove.", StatusKind::Error),
            },
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                let form = self
                    .artists
                    .current()
                    .map(SongForm::for_artist)
                    .unwrap_or_default();
                return Ok(Mode::CreatingSong(form));
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.clear_status();
                return Ok(Mode::DeletingByKey(KeyPrompt::new(KeyTarget::Artist)));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Keys shared by the global song list and the per-artist song list.
    fn handle_song_list_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Artists;
            }
            KeyCode::Char('s') | KeyCode::Char('S') if matches!(self.screen, Screen::Songs(_)) => {
                self.clear_status();
                self.screen = Screen::Artists;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.clear_status();
                self.open_songs(SongOrder::Title)?;
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if let Screen::Songs(songs) = &self.screen {
                    let order = songs.order.toggle();
                    self.open_songs(order)?;
                    self.set_status(format!("Songs sorted {}.", order.label()), StatusKind::Info);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                let form = match &self.screen {
                    Screen::ArtistSongs(view) => SongForm::for_artist(&view.artist),
                    _ => SongForm::default(),
                };
                return Ok(Mode::CreatingSong(form));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => match self.current_song() {
                Some(song) => {
                    self.clear_status();
                    let artist_name = self.artist_name_for(&song)?;
                    return Ok(Mode::EditingSong {
                        song_id: song.id,
                        form: SongForm::from_song(&song, &artist_name),
                    });
                }
                None => self.set_status("No song selected to edit.", StatusKind::Error),
            },
            KeyCode::Char('-') => match self.current_song() {
                Some(song) => {
                    self.clear_status();
                    return Ok(Mode::ConfirmSongDelete(ConfirmSongDelete { song }));
                }
                None => self.set_status("No song selected to remove.", StatusKind::Error),
            },
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.clear_status();
                return Ok(Mode::DeletingByKey(KeyPrompt::new(KeyTarget::Song)));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_artist_form(
        &mut self,
        code: KeyCode,
        original_name: Option<String>,
        mut form: ArtistForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Artist entry cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let saved = match &original_name {
                    None => self.save_new_artist(&form),
                    Some(name) => self.save_existing_artist(name, &form),
                };
                match saved {
                    Ok(()) => keep_open = false,
                    Err(err) => {
                        let message = surface_error(err)?;
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, original_name) {
            (false, _) => Mode::Normal,
            (true, None) => Mode::AddingArtist(form),
            (true, Some(original_name)) => Mode::EditingArtist {
                original_name,
                form,
            },
        })
    }

    fn handle_song_form(
        &mut self,
        code: KeyCode,
        song_id: Option<i64>,
        mut form: SongForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Song entry cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let saved = match song_id {
                    None => self.save_new_song(&form),
                    Some(id) => self.save_existing_song(id, &form),
                };
                match saved {
                    Ok(()) => keep_open = false,
                    Err(err) => {
                        let message = surface_error(err)?;
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, song_id) {
            (false, _) => Mode::Normal,
            (true, None) => Mode::CreatingSong(form),
            (true, Some(song_id)) => Mode::EditingSong { song_id, form },
        })
    }

    fn handle_confirm_artist_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmArtistDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.delete_artist(&RecordKey::ById(confirm.artist.id))?;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmArtistDelete(confirm)),
        }
    }

    fn handle_confirm_song_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmSongDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.delete_song(&RecordKey::ById(confirm.song.id))?;
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmSongDelete(confirm)),
        }
    }

    fn handle_key_prompt(&mut self, code: KeyCode, mut prompt: KeyPrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                prompt.input.push(ch);
                prompt.error = None;
            }
            KeyCode::Enter => {
                let key = match RecordKey::parse(&prompt.input) {
                    Ok(key) => key,
                    Err(err) => {
                        prompt.error = Some(surface_error(err)?);
                        return Ok(Mode::DeletingByKey(prompt));
                    }
                };
                let deleted = match prompt.target {
                    KeyTarget::Artist => self.delete_artist(&key)?,
                    KeyTarget::Song => self.delete_song(&key)?,
                };
                if deleted {
                    return Ok(Mode::Normal);
                }
                prompt.error = self.status.as_ref().map(|status| status.text.clone());
            }
            _ => {}
        }
        Ok(Mode::DeletingByKey(prompt))
    }

    /// Delete an artist and report the outcome. Returns whether a row was
    /// removed.
    fn delete_artist(&mut self, key: &RecordKey) -> Result<bool> {
        match self.catalog.delete_artist(key) {
            Ok(removal) => {
                let songs = match removal.songs_removed {
                    0 => String::new(),
                    1 => " and 1 song".to_string(),
                    n => format!(" and {n} songs"),
                };
                if let Screen::ArtistSongs(view) = &self.screen {
                    if view.artist.id == removal.artist.id {
                        self.screen = Screen::Artists;
                    }
                }
                self.reload_artists(None)?;
                self.refresh_screen()?;
                self.set_status(
                    format!("Deleted artist '{}'{songs}.", removal.artist.name),
                    StatusKind::Info,
                );
                Ok(true)
            }
            Err(err) => {
                let message = surface_error(err)?;
                self.set_status(message, StatusKind::Error);
                Ok(false)
            }
        }
    }

    fn delete_song(&mut self, key: &RecordKey) -> Result<bool> {
        match self.catalog.delete_song(key) {
            Ok(song) => {
                self.refresh_screen()?;
                self.set_status(format!("Deleted song '{}'.", song.title), StatusKind::Info);
                Ok(true)
            }
            Err(err) => {
                let message = surface_error(err)?;
                self.set_status(message, StatusKind::Error);
                Ok(false)
            }
        }
    }

    fn save_new_artist(&mut self, form: &ArtistForm) -> CatalogResult<()> {
        let outcome = self.catalog.find_or_create_artist(&form.name, &form.genre)?;
        let (text, kind) = match &outcome {
            Upsert::Created(artist) => (
                format!("Artist '{}' added with ID {}", artist.name, artist.id),
                StatusKind::Info,
            ),
            Upsert::Existing(artist) => (
                format!("Artist '{}' already exists with ID {}", artist.name, artist.id),
                StatusKind::Error,
            ),
        };
        self.reload_artists(Some(outcome.record().id))?;
        self.refresh_screen()?;
        self.set_status(text, kind);
        Ok(())
    }

    fn save_existing_artist(
        &mut self,
        original_name: &str,
        form: &ArtistForm,
    ) -> CatalogResult<()> {
        let artist = self
            .catalog
            .update_artist(original_name, &form.name, &form.genre)?;
        self.reload_artists(Some(artist.id))?;
        self.refresh_screen()?;
        self.set_status(format!("Updated artist '{}'.", artist.name), StatusKind::Info);
        Ok(())
    }

    fn save_new_song(&mut self, form: &SongForm) -> CatalogResult<()> {
        let outcome = self.catalog.find_or_create_song(
            &form.title,
            &form.artist,
            &form.release_date,
            &form.bpm,
        )?;
        let (mut text, kind) = match &outcome {
            Upsert::Created(song) => (
                format!("Song '{}' added with ID {}", song.title, song.id),
                StatusKind::Info,
            ),
            Upsert::Existing(song) => (
                format!("Song '{}' already exists with ID {}", song.title, song.id),
                StatusKind::Error,
            ),
        };
        if outcome.was_created() {
            text.push_str(&bpm_note(&form.bpm));
        }
        self.refresh_screen()?;
        self.set_status(text, kind);
        Ok(())
    }

    fn save_existing_song(&mut self, song_id: i64, form: &SongForm) -> CatalogResult<()> {
        let song = self.catalog.update_song(
            &RecordKey::ById(song_id),
            &form.title,
            &form.release_date,
            &form.bpm,
        )?;
        self.refresh_screen()?;
        self.set_status(
            format!("Updated song '{}'.{}", song.title, bpm_note(&form.bpm)),
            StatusKind::Info,
        );
        Ok(())
    }

    fn confirm_artist_delete(&self, artist: Artist) -> CatalogResult<Mode> {
        let song_count = self.catalog.list_songs_for_artist(&artist)?.len();
        Ok(Mode::ConfirmArtistDelete(ConfirmArtistDelete { artist, song_count }))
    }

    fn open_artist_songs(&mut self, artist: Artist) -> CatalogResult<()> {
        let songs = self.catalog.list_songs_for_artist(&artist)?;
        self.screen = Screen::ArtistSongs(ArtistSongsScreen::new(artist, songs));
        Ok(())
    }

    fn open_songs(&mut self, order: SongOrder) -> CatalogResult<()> {
        let songs = load_songs(&self.catalog, order)?;
        self.screen = Screen::Songs(SongsScreen::new(songs, order, &self.artists.items));
        Ok(())
    }

    fn reload_artists(&mut self, focus_id: Option<i64>) -> CatalogResult<()> {
        let artists = self.catalog.list_artists_ordered()?;
        self.artists.set_items(artists);
        if let Some(id) = focus_id {
            self.artists.focus(|artist| artist.id == id);
        }
        Ok(())
    }

    /// Reload whatever song list is on screen after a write.
    fn refresh_screen(&mut self) -> CatalogResult<()> {
        let mut artist_gone = false;
        match &mut self.screen {
            Screen::Artists => {}
            Screen::Songs(songs) => {
                songs.list.set_items(load_songs(&self.catalog, songs.order)?);
                songs.set_artists(&self.artists.items);
            }
            Screen::ArtistSongs(view) => {
                match self.catalog.find_artist(&RecordKey::ById(view.artist.id)) {
                    Ok(artist) => {
                        view.list.set_items(self.catalog.list_songs_for_artist(&artist)?);
                        view.artist = artist;
                    }
                    Err(CatalogError::NotFound { .. }) => artist_gone = true,
                    Err(err) => return Err(err),
                }
            }
        }
        if artist_gone {
            self.screen = Screen::Artists;
        }
        Ok(())
    }

    fn current_song(&self) -> Option<Song> {
        match &self.screen {
            Screen::Artists => None,
            Screen::Songs(songs) => songs.list.current().cloned(),
            Screen::ArtistSongs(view) => view.list.current().cloned(),
        }
    }

    fn artist_name_for(&self, song: &Song) -> CatalogResult<String> {
        Ok(self
            .catalog
            .artist_for_song(song)?
            .map(|artist| artist.name)
            .unwrap_or_default())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Artists => self.draw_artists(frame, content_area),
            Screen::Songs(songs) => self.draw_songs(frame, content_area, songs),
            Screen::ArtistSongs(view) => self.draw_artist_songs(frame, content_area, view),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingArtist(form) => self.draw_artist_form(frame, area, "Add Artist", form),
            Mode::EditingArtist { form, .. } => {
                self.draw_artist_form(frame, area, "Edit Artist", form)
            }
            Mode::ConfirmArtistDelete(confirm) => self.draw_confirm_artist(frame, area, confirm),
            Mode::CreatingSong(form) => self.draw_song_form(frame, area, "Add Song", form),
            Mode::EditingSong { form, .. } => self.draw_song_form(frame, area, "Edit Song", form),
            Mode::ConfirmSongDelete(confirm) => self.draw_confirm_song(frame, area, confirm),
            Mode::DeletingByKey(prompt) => self.draw_key_prompt(frame, area, prompt),
            Mode::Normal => {}
        }
    }

    fn draw_artists(&self, frame: &mut Frame, area: Rect) {
        let items = self
            .artists
            .items
            .iter()
            .map(|artist| ListItem::new(format!("#{:<5}{}", artist.id, artist_label(artist))))
            .collect();
        render_list(
            frame,
            area,
            "Artists • by name",
            items,
            &self.artists,
            "No artists yet. Press '+' to add one.",
        );
    }

    fn draw_songs(&self, frame: &mut Frame, area: Rect, songs: &SongsScreen) {
        let items = songs
            .list
            .items
            .iter()
            .map(|song| song_item(song, Some(songs.artist_name(song))))
            .collect();
        render_list(
            frame,
            area,
            &format!("All Songs • {}", songs.order.label()),
            items,
            &songs.list,
            "No songs yet. Press '+' to add one.",
        );
    }

    fn draw_artist_songs(&self, frame: &mut Frame, area: Rect, view: &ArtistSongsScreen) {
        let items = view
            .list
            .items
            .iter()
            .map(|song| song_item(song, None))
            .collect();
        render_list(
            frame,
            area,
            &format!("Songs by {}", artist_label(&view.artist)),
            items,
            &view.list,
            "This artist has no songs yet. Press '+' to add one.",
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Normal) => match &self.screen {
                Screen::Artists => &[
                    ("[↑↓]", "Navigate"),
                    ("[Enter]", "Songs"),
                    ("[+]", "Add"),
                    ("[e]", "Edit"),
                    ("[-]", "Delete"),
                    ("[d]", "Delete by key"),
                    ("[a]", "Add Song"),
                    ("[s]", "All Songs"),
                    ("[q]", "Quit"),
                ],
                Screen::Songs(_) => &[
                    ("[↑↓]", "Navigate"),
                    ("[o]", "Toggle Order"),
                    ("[+]", "Add"),
                    ("[e]", "Edit"),
                    ("[-]", "Delete"),
                    ("[d]", "Delete by key"),
                    ("[Esc]", "Artists"),
                    ("[q]", "Quit"),
                ],
                Screen::ArtistSongs(_) => &[
                    ("[↑↓]", "Navigate"),
                    ("[+]", "Add"),
                    ("[e]", "Edit"),
                    ("[-]", "Delete"),
                    ("[s]", "All Songs"),
                    ("[Esc]", "Artists"),
                    ("[q]", "Quit"),
                ],
            },
            (_, Mode::ConfirmArtistDelete(_)) | (_, Mode::ConfirmSongDelete(_)) => {
                &[("[y]", "Confirm"), ("[n/Esc]", "Cancel")]
            }
            (_, Mode::DeletingByKey(_)) => &[("[Enter]", "Delete"), ("[Esc]", "Cancel")],
            _ => &[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, action) in keys {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(" {action}   ")));
        }
        Line::from(spans)
    }

    fn draw_artist_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &ArtistForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", ArtistInput::Name),
            form.build_line("Genre", ArtistInput::Genre),
            Line::from(""),
        ];
        lines.push(hint_or_error(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            ArtistInput::Name => ("Name: ", 0),
            ArtistInput::Genre => ("Genre: ", 1),
        };
        frame.set_cursor_position((
            inner.x + prefix.len() as u16 + form.value_len(form.active) as u16,
            inner.y + row,
        ));
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(SongInput::Title),
            form.build_line(SongInput::Artist),
            form.build_line(SongInput::ReleaseDate),
            form.build_line(SongInput::Bpm),
            Line::from(""),
        ];
        lines.push(hint_or_error(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel • non-numeric BPM is left blank",
        ));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = form.active.label().len() as u16 + 2;
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + form.active.row(),
        ));
    }

    fn draw_key_prompt(&self, frame: &mut Frame, area: Rect, prompt: &KeyPrompt) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(prompt.target.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Key: {}", prompt.input)),
            Line::from(""),
            hint_or_error(
                prompt.error.as_deref(),
                "Numbers are treated as IDs, anything else as an exact name.",
            ),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        frame.set_cursor_position((
            inner.x + "Key: ".len() as u16 + prompt.input.chars().count() as u16,
            inner.y,
        ));
    }

    fn draw_confirm_artist(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmArtistDelete) {
        let songs_line = match confirm.song_count {
            0 => "The artist has no songs.".to_string(),
            1 => "Its 1 song will be deleted too.".to_string(),
            n => format!("Its {n} songs will be deleted too."),
        };
        draw_confirm(
            frame,
            area,
            vec![
                Line::from(format!(
                    "Delete artist #{} '{}'?",
                    confirm.artist.id, confirm.artist.name
                )),
                Line::from(songs_line),
            ],
        );
    }

    fn draw_confirm_song(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        draw_confirm(
            frame,
            area,
            vec![Line::from(format!(
                "Delete song #{} '{}'?",
                confirm.song.id, confirm.song.title
            ))],
        );
    }
}

/// Handle arrow/page/home/end keys. Returns `true` when the key was consumed.
fn apply_navigation<T>(list: &mut SelectableList<T>, code: KeyCode) -> bool {
    match code {
        KeyCode::Up => list.move_selection(-1),
        KeyCode::Down => list.move_selection(1),
        KeyCode::PageUp => list.move_selection(-PAGE_STEP),
        KeyCode::PageDown => list.move_selection(PAGE_STEP),
        KeyCode::Home => list.select_first(),
        KeyCode::End => list.select_last(),
        _ => return false,
    }
    true
}

fn load_songs(catalog: &Catalog, order: SongOrder) -> CatalogResult<Vec<Song>> {
    match order {
        SongOrder::Title => catalog.list_songs_ordered(),
        SongOrder::Bpm => catalog.list_songs_by_bpm(),
    }
}

/// Suffix explaining that a typed BPM was not stored.
fn bpm_note(raw_bpm: &str) -> String {
    if !raw_bpm.trim().is_empty() && parse_bpm(raw_bpm).is_none() {
        " Invalid BPM input, BPM left blank.".to_string()
    } else {
        String::new()
    }
}

fn song_item(song: &Song, artist: Option<&str>) -> ListItem<'static> {
    let mut text = format!("#{:<5}{}", song.id, song.title);
    if let Some(artist) = artist {
        text.push_str(&format!("  •  {artist}"));
    }
    text.push_str(&format!(
        "  •  {}  •  {}",
        song.release_date.as_deref().unwrap_or("-"),
        song.bpm
            .map(|bpm| format!("{bpm} bpm"))
            .unwrap_or_else(|| "- bpm".to_string())
    ));
    ListItem::new(text)
}

fn render_list<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'static>>,
    list: &SelectableList<T>,
    empty_message: &str,
) {
    if area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string());

    if list.is_empty() {
        let message = Paragraph::new(empty_message.to_string())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(list.selected));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn hint_or_error(error: Option<&str>, hint: &str) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::Gray),
        )),
    }
}

fn draw_confirm(frame: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title("Confirm Removal")
        .borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Y to confirm or N / Esc to cancel.",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;

    fn app() -> App {
        App::new(Catalog::new(Store::open_in_memory().unwrap())).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn adding_an_artist_through_the_form() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(&mut app, "Daft Punk");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Electronic");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.artists.items.len(), 1);
        assert_eq!(app.artists.items[0].genre.as_deref(), Some("Electronic"));
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.text, "Artist 'Daft Punk' added with ID 1");
    }

    #[test]
    fn song_for_unknown_artist_keeps_form_open() {
        let mut app = app();
        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "Ghost Song");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "Nobody");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::CreatingSong(form) => assert_eq!(
                form.error.as_deref(),
                Some("Artist 'Nobody' not found. Song not created")
            ),
            _ => panic!("song form should stay open"),
        }
        assert!(app.catalog.list_songs_ordered().unwrap().is_empty());
    }

    #[test]
    fn delete_by_key_reports_missing_song() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s')).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        type_text(&mut app, "99");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::DeletingByKey(prompt) => {
                assert_eq!(prompt.error.as_deref(), Some("Song #99 not found"))
            }
            _ => panic!("prompt should stay open"),
        }
    }

    #[test]
    fn blank_delete_key_keeps_prompt_open() {
        let mut app = app();
        app.handle_key(KeyCode::Char('d')).unwrap();
        type_text(&mut app, "  ");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::DeletingByKey(prompt) => {
                assert_eq!(prompt.error.as_deref(), Some("Enter an ID or a name."))
            }
            _ => panic!("prompt should stay open"),
        }
    }

    #[test]
    fn deleting_an_artist_reports_its_removed_songs() {
        let mut app = app();
        app.catalog
            .find_or_create_artist("Madonna", "Pop")
            .unwrap();
        app.catalog
            .find_or_create_song("Vogue", "Madonna", "1990-03-27", "116")
            .unwrap();
        app.reload_artists(None).unwrap();

        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.screen, Screen::ArtistSongs(_)));
        app.handle_key(KeyCode::Esc).unwrap();
        app.handle_key(KeyCode::Char('-')).unwrap();
        match &app.mode {
            Mode::ConfirmArtistDelete(confirm) => assert_eq!(confirm.song_count, 1),
            _ => panic!("expected confirmation"),
        }
        app.handle_key(KeyCode::Char('y')).unwrap();

        assert!(app.artists.is_empty());
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Deleted artist 'Madonna' and 1 song.")
        );
    }

    #[test]
    fn q_quits_from_any_list() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Char('s')).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
