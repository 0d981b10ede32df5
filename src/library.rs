//! Library model: the flat track list fetched from the server and the
//! artist/album hierarchy derived from it.

mod display;
mod index;
mod model;

pub use display::{album_row_label, list_label, title_or_file};
pub use index::{LibraryIndex, UNKNOWN, normalize};
pub use model::Track;
