//! IMDL chunk container.
//!
//! ```text
//! FileHeader   { magic: u32 = "IMDL", version: u32, chunk_count: u32 }
//! repeated chunk_count times:
//!   ChunkHeader { tag: u32, size: u32 }
//!   payload: size bytes
//! ```
//!
//! All integers are little-endian. The container enforces chunk boundaries:
//! every payload is handed out as an isolated sub-slice, so a payload decoder
//! that under- or over-reads can never shift the position of the next chunk.

use std::fmt;

use crate::assets::reader::BinaryReader;
use crate::assets::writer::BinaryWriter;
use crate::errors::{ImdlError, Result};

/// `"IMDL"` as it appears in the first four bytes of the file.
pub const IMDL_MAGIC: u32 = u32::from_le_bytes(*b"IMDL");

/// Newest container version this crate reads and the version it writes.
pub const FORMAT_VERSION: u32 = 1;

/// Four-character chunk type tag.
///
/// The numeric value is the big-endian packing of the four characters (the
/// value of a C multi-character literal such as `'TXTR'`), which is then
/// stored little-endian like every other integer in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub u32);

impl ChunkTag {
    pub const TEXTURE: Self = Self::from_fourcc(*b"TXTR");
    pub const MATERIAL: Self = Self::from_fourcc(*b"MTRL");
    pub const SUB_MESH: Self = Self::from_fourcc(*b"SMSH");
    /// Older converters wrote the sub-mesh table under this tag.
    pub const LEGACY_MESH: Self = Self::from_fourcc(*b"MESH");
    pub const MESH_GROUP: Self = Self::from_fourcc(*b"MGRP");
    pub const NODE: Self = Self::from_fourcc(*b"NODE");
    pub const VERTEX: Self = Self::from_fourcc(*b"VERT");
    pub const INDEX: Self = Self::from_fourcc(*b"INDX");
    pub const ANIMATION: Self = Self::from_fourcc(*b"ANIM");

    #[must_use]
    pub const fn from_fourcc(code: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(code))
    }

    #[must_use]
    pub const fn fourcc(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.fourcc() {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u32,
    pub version: u32,
    pub chunk_count: u32,
}

impl FileHeader {
    pub const SIZE: usize = 12;

    /// Reads the header and checks magic and version.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let header = Self {
            magic: reader.read_u32()?,
            version: reader.read_u32()?,
            chunk_count: reader.read_u32()?,
        };

        if header.magic != IMDL_MAGIC {
            return Err(ImdlError::InvalidMagic {
                expected: IMDL_MAGIC,
                found: header.magic,
            });
        }
        if header.version > FORMAT_VERSION {
            return Err(ImdlError::UnsupportedVersion {
                version: header.version,
                supported: FORMAT_VERSION,
            });
        }

        Ok(header)
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.magic);
        writer.write_u32(self.version);
        writer.write_u32(self.chunk_count);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: ChunkTag,
    pub size: u32,
}

impl ChunkHeader {
    pub const SIZE: usize = 8;
}

/// One chunk, borrowed from the file buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub tag: ChunkTag,
    /// Offset of the payload from the start of the file.
    pub offset: usize,
    pub payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// A fresh cursor that can only see this chunk's payload.
    #[must_use]
    pub fn reader(&self) -> BinaryReader<'a> {
        BinaryReader::new(self.payload)
    }
}

/// Iterates over the chunks of an IMDL file.
///
/// Iteration stops after `chunk_count` chunks or at the first error.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    reader: BinaryReader<'a>,
    header: FileHeader,
    next_chunk: u32,
}

impl<'a> ChunkReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(bytes);
        let header = FileHeader::read(&mut reader)?;
        log::debug!(
            "IMDL container: version {}, {} chunks, {} bytes",
            header.version,
            header.chunk_count,
            bytes.len()
        );

        Ok(Self {
            reader,
            header,
            next_chunk: 0,
        })
    }

    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Bytes not yet consumed by the container.
    ///
    /// After the last chunk this is the amount of trailing data, which the
    /// container ignores.
    #[must_use]
    pub fn unread_bytes(&self) -> usize {
        self.reader.remaining()
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let header = ChunkHeader {
            tag: ChunkTag(self.reader.read_u32()?),
            size: self.reader.read_u32()?,
        };
        let offset = self.reader.position();
        let payload = self.reader.read_bytes(header.size as usize)?;

        Ok(Chunk {
            tag: header.tag,
            offset,
            payload,
        })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_chunk >= self.header.chunk_count {
            return None;
        }
        self.next_chunk += 1;

        let chunk = self.read_chunk();
        if chunk.is_err() {
            self.next_chunk = self.header.chunk_count;
        }
        Some(chunk)
    }
}

/// Assembles chunk payloads into a complete container.
#[derive(Debug, Default)]
pub struct ChunkWriter {
    chunks: Vec<(ChunkTag, Vec<u8>)>,
}

impl ChunkWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: ChunkTag, payload: Vec<u8>) {
        self.chunks.push((tag, payload));
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let total = FileHeader::SIZE
            + self
                .chunks
                .iter()
                .map(|(_, p)| ChunkHeader::SIZE + p.len())
                .sum::<usize>();
        let mut writer = BinaryWriter::with_capacity(total);

        FileHeader {
            magic: IMDL_MAGIC,
            version: FORMAT_VERSION,
            chunk_count: self.chunks.len() as u32,
        }
        .write(&mut writer);

        for (tag, payload) in &self.chunks {
            writer.write_u32(tag.0);
            writer.write_count(payload.len());
            writer.write_bytes(payload);
        }

        writer.into_inner()
    }
}
