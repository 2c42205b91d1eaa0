#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compact_table;

pub mod cursor;

mod entry_store;

pub mod error;

/// An insertion-ordered HashMap built on [`CompactTable`].
///
/// This module provides [`CompactHashMap`], which wraps the `CompactTable`
/// and provides a standard key-value map interface with configurable hashers.
///
/// [`CompactTable`]: compact_table::CompactTable
pub mod hash_map;

pub mod index_table;

pub mod probe;

pub mod transform;

pub use compact_table::CompactTable;
pub use cursor::Cursor;
pub use error::CursorError;
pub use hash_map::CompactHashMap;
pub use hash_map::Entry;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Default hasher builder: foldhash's randomly seeded fast hasher.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Default hasher builder: the standard library's `RandomState`.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder hasher builder when neither `foldhash` nor `std` is
        /// enabled. It cannot be constructed; supply a hasher builder with
        /// [`CompactHashMap::with_hasher`].
        pub enum DefaultHashBuilder {}
    }
}
