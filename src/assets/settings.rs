//! Loader Settings
//!
//! Controls how strictly [`ImdlLoader`](crate::assets::loaders::ImdlLoader)
//! treats files that are structurally valid but not fully conforming.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use imdl::assets::settings::{LoaderSettings, UnknownChunkPolicy};
//!
//! // Default: skip unknown chunks, validate every table reference,
//! // accept nodes stored in any parent/child order.
//! let settings = LoaderSettings::default();
//!
//! // Strict mode for asset pipelines
//! let settings = LoaderSettings {
//!     unknown_chunks: UnknownChunkPolicy::Reject,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file; missing fields keep their defaults
//! let settings = LoaderSettings::from_json_str(r#"{ "hierarchy": "require_sorted" }"#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// What to do with a chunk whose tag the loader does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownChunkPolicy {
    /// Skip the payload and continue. Chunk sizes are always known, so
    /// newer files with extra chunks still load.
    #[default]
    Skip,
    /// Abort the load with [`ImdlError::UnknownChunk`](crate::errors::ImdlError::UnknownChunk).
    Reject,
}

/// How to handle node tables whose parents are not stored before children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyPolicy {
    /// Derive a parent-first evaluation order once at load time.
    /// Cycles are still rejected.
    #[default]
    Resolve,
    /// Fail with [`ImdlError::NodeOrder`](crate::errors::ImdlError::NodeOrder).
    RequireSorted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub unknown_chunks: UnknownChunkPolicy,

    /// Run the referential-integrity pass after decoding: texture, material,
    /// sub-mesh, mesh-group, vertex and node indices plus keyframe tables.
    ///
    /// Parent indices are always checked because hierarchy composition
    /// depends on them.
    pub validate_references: bool,

    pub hierarchy: HierarchyPolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            unknown_chunks: UnknownChunkPolicy::Skip,
            validate_references: true,
            hierarchy: HierarchyPolicy::Resolve,
        }
    }
}

impl LoaderSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn to_json_string(&self) -> String {
        // Plain enums and bools always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
