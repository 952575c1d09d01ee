use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use glam::{Mat4, Quat, Vec3, Vec4};
use strata_scene::animation::{QuatKey, VectorKey};
use strata_scene::mesh::VertexWeight;

use crate::error::DumpError;

/// Fixed little-endian binary layout for one value. Every multi-field
/// impl goes through the scalar impls so no host padding bytes can ever
/// reach the stream.
pub trait Encode {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError>;
}

impl Encode for bool {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_u8(*self as u8)?;
        Ok(1)
    }
}

impl Encode for u16 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_u16::<LittleEndian>(*self)?;
        Ok(2)
    }
}

impl Encode for u32 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_u32::<LittleEndian>(*self)?;
        Ok(4)
    }
}

impl Encode for i32 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_i32::<LittleEndian>(*self)?;
        Ok(4)
    }
}

impl Encode for u64 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_u64::<LittleEndian>(*self)?;
        Ok(8)
    }
}

impl Encode for f32 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_f32::<LittleEndian>(*self)?;
        Ok(4)
    }
}

impl Encode for f64 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        out.write_f64::<LittleEndian>(*self)?;
        Ok(8)
    }
}

// Length-prefixed, no terminator.
impl Encode for str {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        let prefix = encode_len(out, self.len())?;
        out.write_all(self.as_bytes())?;
        Ok(prefix + self.len())
    }
}

impl Encode for String {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        self.as_str().encode(out)
    }
}

impl Encode for Vec3 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.x.encode(out)? + self.y.encode(out)? + self.z.encode(out)?)
    }
}

impl Encode for Vec4 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.x.encode(out)?
            + self.y.encode(out)?
            + self.z.encode(out)?
            + self.w.encode(out)?)
    }
}

// w first, then x, y, z.
impl Encode for Quat {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.w.encode(out)?
            + self.x.encode(out)?
            + self.y.encode(out)?
            + self.z.encode(out)?)
    }
}

// Row-major, 16 floats.
impl Encode for Mat4 {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        let columns = self.to_cols_array_2d();
        let mut written = 0;
        for row in 0..4 {
            for column in columns.iter() {
                written += column[row].encode(out)?;
            }
        }
        Ok(written)
    }
}

impl Encode for VertexWeight {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.vertex_id.encode(out)? + self.weight.encode(out)?)
    }
}

impl Encode for VectorKey {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.time.encode(out)? + self.value.encode(out)?)
    }
}

impl Encode for QuatKey {
    fn encode<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, DumpError> {
        Ok(self.time.encode(out)? + self.value.encode(out)?)
    }
}

/// Serialize a count or size as exactly 4 bytes. Counts beyond the 32 bit
/// range must fail the dump rather than wrap.
pub fn encode_len<W: Write + ?Sized>(out: &mut W, len: usize) -> Result<usize, DumpError> {
    let value = u32::try_from(len).map_err(|_| DumpError::IntegerOverflow)?;
    value.encode(out)
}

pub fn encode_slice<W: Write + ?Sized, T: Encode>(
    out: &mut W,
    items: &[T],
) -> Result<usize, DumpError> {
    let mut written = 0;
    for item in items {
        written += item.encode(out)?;
    }
    Ok(written)
}

/// Component-wise ordering used to fold an array down to its envelope.
pub trait ComponentBounds: Copy {
    fn min_components(self, other: Self) -> Self;
    fn max_components(self, other: Self) -> Self;
}

impl ComponentBounds for Vec3 {
    fn min_components(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_components(self, other: Self) -> Self {
        self.max(other)
    }
}

impl ComponentBounds for Vec4 {
    fn min_components(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_components(self, other: Self) -> Self {
        self.max(other)
    }
}

impl ComponentBounds for Quat {
    fn min_components(self, other: Self) -> Self {
        Self::from_xyzw(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
            self.w.min(other.w),
        )
    }

    fn max_components(self, other: Self) -> Self {
        Self::from_xyzw(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
            self.w.max(other.w),
        )
    }
}

impl ComponentBounds for VertexWeight {
    fn min_components(self, other: Self) -> Self {
        Self {
            vertex_id: self.vertex_id.min(other.vertex_id),
            weight: self.weight.min(other.weight),
        }
    }

    fn max_components(self, other: Self) -> Self {
        Self {
            vertex_id: self.vertex_id.max(other.vertex_id),
            weight: self.weight.max(other.weight),
        }
    }
}

impl ComponentBounds for VectorKey {
    fn min_components(self, other: Self) -> Self {
        Self {
            time: self.time.min(other.time),
            value: self.value.min_components(other.value),
        }
    }

    fn max_components(self, other: Self) -> Self {
        Self {
            time: self.time.max(other.time),
            value: self.value.max_components(other.value),
        }
    }
}

impl ComponentBounds for QuatKey {
    fn min_components(self, other: Self) -> Self {
        Self {
            time: self.time.min(other.time),
            value: self.value.min_components(other.value),
        }
    }

    fn max_components(self, other: Self) -> Self {
        Self {
            time: self.time.max(other.time),
            value: self.value.max_components(other.value),
        }
    }
}

/// Write the (min, max) envelope of `items` instead of the array itself:
/// always exactly two encoded values, whatever the input length. Lossy by
/// design. An empty array still contributes two (default) values so the
/// record stays structurally intact.
pub fn encode_bounds<W, T>(out: &mut W, items: &[T]) -> Result<usize, DumpError>
where
    W: Write + ?Sized,
    T: Encode + ComponentBounds + Default,
{
    let (min, max) = match items.split_first() {
        Some((&first, rest)) => rest.iter().fold((first, first), |(min, max), item| {
            (min.min_components(*item), max.max_components(*item))
        }),
        None => (T::default(), T::default()),
    };

    Ok(min.encode(out)? + max.encode(out)?)
}
