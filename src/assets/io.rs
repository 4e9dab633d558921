use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::Result;

/// Source of raw asset bytes.
///
/// The loader only ever sees a complete in-memory buffer; readers decide
/// where that buffer comes from.
pub trait AssetReader: Send + Sync {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Reads files relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    /// Uses `path` as the root, or its parent directory when `path` is a file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetReader for FileAssetReader {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        log::debug!("Reading asset {}", path.display());
        Ok(std::fs::read(&path)?)
    }
}

/// Serves assets from memory; used by tools and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetReader {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.insert(uri.into(), bytes.into());
    }
}

impl AssetReader for MemoryAssetReader {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.files.get(uri).map(|b| b.to_vec()).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no asset named '{uri}'"))
                .into()
        })
    }
}

/// Reader variants, dispatched without a trait object.
///
/// [`ImdlLoader::load_file`](crate::assets::loaders::ImdlLoader::load_file)
/// builds a `File` variant rooted at the model's directory.
#[derive(Debug, Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    Memory(Arc<MemoryAssetReader>),
}

impl AssetReaderVariant {
    /// File reader rooted at the directory containing `source`.
    #[must_use]
    pub fn from_source(source: impl AsRef<Path>) -> Self {
        Self::File(Arc::new(FileAssetReader::new(source)))
    }

    /// File name component of a path, or the whole string if it has none.
    #[must_use]
    pub fn source_filename(source: &str) -> &str {
        Path::new(source)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(source)
    }
}

impl AssetReader for AssetReaderVariant {
    fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri),
            Self::Memory(r) => r.read_bytes(uri),
        }
    }
}
