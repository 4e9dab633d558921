use glam::{Quat, Vec3};

use crate::assets::reader::BinaryReader;
use crate::assets::writer::BinaryWriter;
use crate::errors::Result;

/// A fixed-size, positionally encoded record.
///
/// Fields are read and written float-by-float in declaration order, so a
/// record's on-disk layout is independent of host padding and endianness.
pub trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self>;

    fn write_to(&self, writer: &mut BinaryWriter);
}

impl Record for u32 {
    const SIZE: usize = 4;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_u32()
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_u32(*self);
    }
}

impl Record for i32 {
    const SIZE: usize = 4;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_i32()
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_i32(*self);
    }
}

impl Record for f32 {
    const SIZE: usize = 4;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.read_f32()
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_f32(*self);
    }
}

impl<const N: usize> Record for [f32; N] {
    const SIZE: usize = 4 * N;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = reader.read_f32()?;
        }
        Ok(out)
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        for v in self {
            writer.write_f32(*v);
        }
    }
}

impl Record for Vec3 {
    const SIZE: usize = 12;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Vec3::from_array(<[f32; 3]>::read_from(reader)?))
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        self.to_array().write_to(writer);
    }
}

/// Quaternions are stored as `(x, y, z, w)`.
impl Record for Quat {
    const SIZE: usize = 16;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Quat::from_array(<[f32; 4]>::read_from(reader)?))
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        self.to_array().write_to(writer);
    }
}
