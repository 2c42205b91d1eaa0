//! Errors reported by [`Cursor`](crate::cursor::Cursor).

use core::fmt;

/// Why a [`Cursor`](crate::cursor::Cursor) step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorError {
    /// The map was structurally modified (a key added or removed, or the map
    /// cleared) by something other than this cursor since the cursor last
    /// synchronized with it.
    ConcurrentModification,
    /// Every entry has already been yielded.
    Exhausted,
    /// `remove` was called before any `next`, or twice after one `next`.
    NothingToRemove,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::ConcurrentModification => {
                write!(f, "map was modified outside the cursor")
            }
            CursorError::Exhausted => write!(f, "cursor has no more entries"),
            CursorError::NothingToRemove => {
                write!(f, "no entry to remove: call next first")
            }
        }
    }
}

impl core::error::Error for CursorError {}
