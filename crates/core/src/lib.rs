//! Crossword Coach domain core.
//!
//! Pure logic shared by the HTTP server and the game client: the entry data
//! model, entries query validation, pointer arithmetic, and progress keys.
//! No I/O lives here.

pub mod error;
pub mod pagination;
pub mod progress;
pub mod query;
pub mod types;
