//! Pointer arithmetic over paged entries.
//!
//! A [`Pointer`] names one entry as `(page, index)`. Both halves always move
//! together; there is no way to update one without the other.

use serde::{Deserialize, Serialize};

/// Position of the displayed entry: page number and index within that page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pointer {
    pub page: u32,
    pub index: u32,
}

impl Pointer {
    pub const START: Pointer = Pointer { page: 0, index: 0 };

    pub fn new(page: u32, index: u32) -> Self {
        Self { page, index }
    }
}

/// Compute the pointer following `current` for pages of `page_size` entries.
///
/// An unset pointer starts from the beginning. The last slot of a page rolls
/// over to the first slot of the next page.
pub fn advance(current: Option<Pointer>, page_size: u32) -> Pointer {
    let Some(Pointer { page, index }) = current else {
        return Pointer::START;
    };

    if index >= page_size.saturating_sub(1) {
        Pointer::new(page.saturating_add(1), 0)
    } else {
        Pointer::new(page, index + 1)
    }
}

/// Whether the page after `pointer` should be fetched ahead of time.
///
/// `current_page_len` is the length of the cached current page, or `None`
/// when that page is not cached yet. Prefetch starts once the pointer is
/// within `buffer` entries of the end of the current page.
pub fn should_prefetch(
    pointer: Pointer,
    current_page_len: Option<usize>,
    buffer: usize,
    next_page_known: bool,
) -> bool {
    let Some(len) = current_page_len else {
        return false;
    };
    !next_page_known && pointer.index as usize >= len.saturating_sub(buffer)
}
