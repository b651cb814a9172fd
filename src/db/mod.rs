//! Catalog Store: persistence split across logical submodules. `store` holds
//! the generic primitives, `artists` and `songs` bind them to their tables.

mod artists;
mod connection;
mod songs;
mod store;

pub use artists::ArtistField;
pub use connection::ensure_schema;
pub use songs::SongField;
pub use store::{Draft, Record, SortField, Store};
