//! Ratatui front-end for the music catalog. `app` owns state and key
//! handling, `forms` and `screens` hold per-view state, `terminal` runs the
//! draw/input loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
