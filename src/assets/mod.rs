pub mod chunk;
pub mod format;
pub mod io;
pub mod loaders;
pub mod model;
pub mod reader;
pub mod record;
pub mod settings;
pub mod writer;

pub use chunk::{ChunkReader, ChunkTag, ChunkWriter, FORMAT_VERSION, IMDL_MAGIC};
pub use format::{
    MaterialInfo, MeshGroupInfo, NodeInfo, SubMeshInfo, TextureEntry, TextureKind, Vertex,
};
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use loaders::{ImdlLoader, ImdlWriter};
pub use model::{Model, ModelData};
pub use reader::BinaryReader;
pub use settings::{HierarchyPolicy, LoaderSettings, UnknownChunkPolicy};
pub use writer::BinaryWriter;
