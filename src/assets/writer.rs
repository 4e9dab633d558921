//! Little-endian byte sink, the inverse of [`BinaryReader`](crate::assets::reader::BinaryReader).

use byteorder::{ByteOrder, LittleEndian};

use crate::assets::record::Record;

#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_u32(&mut self, v: u32) {
        self.put(|b| LittleEndian::write_u32(b, v));
    }

    pub fn write_i32(&mut self, v: i32) {
        self.put(|b| LittleEndian::write_i32(b, v));
    }

    pub fn write_f32(&mut self, v: f32) {
        self.put(|b| LittleEndian::write_f32(b, v));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a collection length as the `u32` count prefix.
    ///
    /// Lengths beyond `u32::MAX` cannot be represented by the format; the
    /// encoder never produces tables that large.
    pub fn write_count(&mut self, count: usize) {
        debug_assert!(u32::try_from(count).is_ok(), "count {count} exceeds u32");
        self.write_u32(count as u32);
    }

    /// `u32 count` followed by each record.
    pub fn write_counted<T: Record>(&mut self, items: &[T]) {
        self.write_count(items.len());
        for item in items {
            item.write_to(self);
        }
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_count(s.len());
        self.write_bytes(s.as_bytes());
    }

    /// Appends one 4-byte word filled by `encode`.
    fn put(&mut self, encode: impl FnOnce(&mut [u8])) {
        let mut word = [0u8; 4];
        encode(&mut word);
        self.buffer.extend_from_slice(&word);
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::reader::BinaryReader;

    #[test]
    fn words_are_little_endian() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0x0102_0304);
        writer.write_i32(-2);
        writer.write_f32(1.0);
        let bytes = writer.into_inner();

        assert_eq!(&bytes[..4], &[4, 3, 2, 1]);
        assert_eq!(&bytes[4..8], &[0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(&bytes[8..], &1.0_f32.to_le_bytes());
    }

    #[test]
    fn string_reads_back() {
        let mut writer = BinaryWriter::new();
        writer.write_string("walk");
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 8);
        assert_eq!(BinaryReader::new(&bytes).read_string().unwrap(), "walk");
    }
}
