//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`ImdlError`] covers all failure modes including:
//! - Container format errors (bad magic, unsupported version)
//! - Decode overruns (a read past the end of a buffer)
//! - Unknown chunk tags (when the loader is configured to reject them)
//! - Referential integrity errors found by the post-decode validation pass
//!
//! Playback never produces errors: an invalid clip index degrades to the
//! bind pose instead.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ImdlError>`.
//!
//! ```rust,ignore
//! use imdl::errors::{ImdlError, Result};
//!
//! fn load(bytes: &[u8]) -> Result<imdl::Model> {
//!     imdl::ImdlLoader::default().load_from_bytes(bytes)
//! }
//! ```

use thiserror::Error;

use crate::assets::chunk::ChunkTag;

/// The main error type for the IMDL engine.
///
/// Each variant provides enough context to locate the problem in the source
/// file without a hex editor.
#[derive(Error, Debug)]
pub enum ImdlError {
    // ========================================================================
    // Container Format Errors
    // ========================================================================
    /// The file does not start with the `IMDL` magic.
    #[error("Invalid IMDL magic: expected {expected:#010x}, found {found:#010x}")]
    InvalidMagic {
        /// The magic value the loader expects
        expected: u32,
        /// The value actually read from the file
        found: u32,
    },

    /// The file declares a format version newer than this loader understands.
    #[error("Unsupported IMDL version {version} (newest supported: {supported})")]
    UnsupportedVersion {
        /// Version read from the header
        version: u32,
        /// Newest version the loader can decode
        supported: u32,
    },

    /// A chunk tag the loader does not know, with `UnknownChunkPolicy::Reject`.
    #[error("Unknown chunk type '{tag}'")]
    UnknownChunk {
        /// The unrecognised tag
        tag: ChunkTag,
    },

    /// A texture entry with a kind outside `0..=3`.
    #[error("Invalid texture kind {0}")]
    InvalidTextureKind(u32),

    /// A length-prefixed string that is not valid UTF-8.
    #[error("Invalid UTF-8 string: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// A read would run past the end of the buffer.
    #[error(
        "Unexpected end of data at offset {offset}: requested {requested} bytes, {remaining} remaining"
    )]
    UnexpectedEof {
        /// Cursor position when the read was attempted
        offset: usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the buffer
        remaining: usize,
    },

    // ========================================================================
    // Referential Integrity Errors
    // ========================================================================
    /// A table index that does not refer to an existing entry.
    #[error("Dangling index: {context} (index: {index}, table size: {len})")]
    DanglingIndex {
        /// Description of the reference being checked
        context: String,
        /// The invalid index
        index: i64,
        /// Size of the referenced table
        len: usize,
    },

    /// A `[start, start + count)` range that does not fit its table.
    #[error("Range out of bounds: {context} ({start}..{end}, table size: {len})")]
    IndexRangeOutOfBounds {
        /// Description of the range being checked
        context: String,
        /// First element of the range
        start: u64,
        /// One past the last element of the range
        end: u64,
        /// Size of the referenced table
        len: usize,
    },

    /// A node whose parent is stored after it, with `HierarchyPolicy::RequireSorted`.
    #[error("Node {node} refers to parent {parent} which is not stored before it")]
    NodeOrder {
        /// The offending node
        node: usize,
        /// Its parent index
        parent: usize,
    },

    /// The parent links form a cycle.
    #[error("Node hierarchy contains a cycle through node {node}")]
    HierarchyCycle {
        /// A node that is part of the cycle
        node: usize,
    },

    /// An animation channel whose key times and values differ in length.
    #[error(
        "Clip '{clip}': channel for node {node} has {times} key times but {values} values"
    )]
    KeyframeCountMismatch {
        /// Clip name
        clip: String,
        /// Target node of the channel
        node: u32,
        /// Number of key times
        times: usize,
        /// Number of key values
        values: usize,
    },

    /// An animation channel whose key times decrease.
    #[error("Clip '{clip}': channel for node {node} has decreasing key times")]
    UnsortedKeyframes {
        /// Clip name
        clip: String,
        /// Target node of the channel
        node: u32,
    },

    // ========================================================================
    // I/O & Configuration Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Loader settings could not be parsed.
    #[error("Settings parse error: {0}")]
    SettingsError(#[from] serde_json::Error),
}

impl ImdlError {
    /// Returns `true` for errors raised by the post-decode validation pass.
    #[must_use]
    pub fn is_referential(&self) -> bool {
        matches!(
            self,
            Self::DanglingIndex { .. }
                | Self::IndexRangeOutOfBounds { .. }
                | Self::NodeOrder { .. }
                | Self::HierarchyCycle { .. }
                | Self::KeyframeCountMismatch { .. }
                | Self::UnsortedKeyframes { .. }
        )
    }
}

/// Alias for `Result<T, ImdlError>`.
pub type Result<T> = std::result::Result<T, ImdlError>;
