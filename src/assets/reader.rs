//! Bounds-checked little-endian cursor over an in-memory byte buffer.
//!
//! Every read advances the cursor by exactly the decoded width and fails with
//! [`ImdlError::UnexpectedEof`] when fewer bytes remain. A failed read is
//! fatal for the decode that owns the reader; nothing is retried.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::assets::record::Record;
use crate::errors::{ImdlError, Result};

/// Sequential reader over a borrowed byte slice.
///
/// The reader never outlives the buffer it was created from and is not
/// shared: each chunk payload gets its own fresh reader.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buffer),
        }
    }

    /// Current read offset from the start of the buffer.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Number of bytes not yet consumed.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer().len().saturating_sub(self.position())
    }

    /// Whether the whole buffer has been consumed.
    ///
    /// Diagnostic only: chunk and record counts are authoritative, callers
    /// never use this to terminate a loop.
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    /// Borrows the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position();
        let bytes = &self.buffer()[start..start + len];
        self.cursor.set_position((start + len) as u64);
        Ok(bytes)
    }

    /// Reads a `u32` element count and checks that `count` elements of at
    /// least `min_record_size` bytes can still fit in the buffer.
    ///
    /// The check runs before the caller allocates anything, so a corrupt
    /// count fails immediately instead of reserving gigabytes.
    pub fn read_count(&mut self, min_record_size: usize) -> Result<usize> {
        let count_offset = self.position();
        let count = self.read_u32()? as usize;
        let needed = count.saturating_mul(min_record_size);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ImdlError::UnexpectedEof {
                offset: count_offset,
                requested: needed,
                remaining,
            });
        }
        Ok(count)
    }

    /// Reads the canonical array encoding: `u32 count` followed by
    /// `count × T::SIZE` bytes of contiguous fixed-size records.
    pub fn read_counted<T: Record>(&mut self) -> Result<Vec<T>> {
        let count = self.read_count(T::SIZE)?;
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(T::read_from(self)?);
        }
        Ok(out)
    }

    /// Reads a counted sequence of bytes and interprets it as UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_count(1)?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn buffer(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    /// Fails without moving the cursor when fewer than `len` bytes remain.
    fn ensure(&self, len: usize) -> Result<()> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(ImdlError::UnexpectedEof {
                offset: self.position(),
                requested: len,
                remaining,
            });
        }
        Ok(())
    }
}
