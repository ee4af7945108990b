//! Leaf readers for wire primitives.

use crate::buffer::BinaryBuffer;
use crate::error::{DecodeError, Result};
use crate::output::{Column, Output};
use crate::reader::{ElementReader, SharedReader, shared};

/// A fixed-width wire scalar that accumulates into a [`Column`].
///
/// Implemented for the ten numeric widths the wire format carries; bool is
/// handled by [`BoolReader`] since it stores a byte per value.
pub trait Scalar: Sized + Copy {
    /// Byte width on the wire.
    const WIDTH: usize;
    /// Read one value at the cursor, big-endian.
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self>;
    /// Wrap an owned vector as a typed column.
    fn into_column(data: Vec<Self>) -> Column;
}

impl Scalar for u8 {
    const WIDTH: usize = 1;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_u8()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::UInt8(data)
    }
}

impl Scalar for u16 {
    const WIDTH: usize = 2;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_u16()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::UInt16(data)
    }
}

impl Scalar for u32 {
    const WIDTH: usize = 4;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_u32()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::UInt32(data)
    }
}

impl Scalar for u64 {
    const WIDTH: usize = 8;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_u64()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::UInt64(data)
    }
}

impl Scalar for i8 {
    const WIDTH: usize = 1;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_i8()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Int8(data)
    }
}

impl Scalar for i16 {
    const WIDTH: usize = 2;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_i16()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Int16(data)
    }
}

impl Scalar for i32 {
    const WIDTH: usize = 4;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_i32()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Int32(data)
    }
}

impl Scalar for i64 {
    const WIDTH: usize = 8;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_i64()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Int64(data)
    }
}

impl Scalar for f32 {
    const WIDTH: usize = 4;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_f32()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Float32(data)
    }
}

impl Scalar for f64 {
    const WIDTH: usize = 8;
    fn read_from(buffer: &mut BinaryBuffer) -> Result<Self> {
        buffer.read_f64()
    }
    fn into_column(data: Vec<Self>) -> Column {
        Column::Float64(data)
    }
}

/// Accumulates one primitive value per occurrence.
pub struct BasicReader<T: Scalar> {
    name: String,
    data: Vec<T>,
}

impl<T: Scalar> BasicReader<T> {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), data: Vec::new() }
    }
}

impl<T: Scalar> ElementReader for BasicReader<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        self.data.push(T::read_from(buffer)?);
        Ok(())
    }

    fn data(&mut self) -> Output {
        Output::Flat(T::into_column(std::mem::take(&mut self.data)))
    }
}

/// Accumulates one-byte bools, truthy iff non-zero.
pub struct BoolReader {
    name: String,
    data: Vec<u8>,
}

impl BoolReader {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), data: Vec::new() }
    }
}

impl ElementReader for BoolReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let v = buffer.read_bool()?;
        self.data.push(v as u8);
        Ok(())
    }

    fn data(&mut self) -> Output {
        Output::Flat(Column::Bool(std::mem::take(&mut self.data)))
    }
}

/// Reads unsigned 8-bit values.
pub type UInt8Reader = BasicReader<u8>;
/// Reads unsigned 16-bit values.
pub type UInt16Reader = BasicReader<u16>;
/// Reads unsigned 32-bit values.
pub type UInt32Reader = BasicReader<u32>;
/// Reads unsigned 64-bit values.
pub type UInt64Reader = BasicReader<u64>;
/// Reads signed 8-bit values.
pub type Int8Reader = BasicReader<i8>;
/// Reads signed 16-bit values.
pub type Int16Reader = BasicReader<i16>;
/// Reads signed 32-bit values.
pub type Int32Reader = BasicReader<i32>;
/// Reads signed 64-bit values.
pub type Int64Reader = BasicReader<i64>;
/// Reads 32-bit floats.
pub type FloatReader = BasicReader<f32>;
/// Reads 64-bit floats.
pub type DoubleReader = BasicReader<f64>;

/// Interpretation of a primitive's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Unsigned integer.
    Unsigned,
    /// Signed integer.
    Signed,
    /// IEEE-754 float.
    Float,
    /// One-byte boolean.
    Bool,
}

/// Build a primitive reader from a wire width and kind.
///
/// This is the planner-facing entry point: streamer information describes
/// members by byte width, and only widths 1/2/4/8 exist on the wire.
/// Anything else fails with [`DecodeError::UnsupportedTypeWidth`] when the
/// tree is built, before any byte is consumed.
pub fn primitive_for(name: &str, width: usize, kind: ScalarKind) -> Result<SharedReader> {
    match (kind, width) {
        (ScalarKind::Unsigned, 1) => Ok(shared(UInt8Reader::new(name))),
        (ScalarKind::Unsigned, 2) => Ok(shared(UInt16Reader::new(name))),
        (ScalarKind::Unsigned, 4) => Ok(shared(UInt32Reader::new(name))),
        (ScalarKind::Unsigned, 8) => Ok(shared(UInt64Reader::new(name))),
        (ScalarKind::Signed, 1) => Ok(shared(Int8Reader::new(name))),
        (ScalarKind::Signed, 2) => Ok(shared(Int16Reader::new(name))),
        (ScalarKind::Signed, 4) => Ok(shared(Int32Reader::new(name))),
        (ScalarKind::Signed, 8) => Ok(shared(Int64Reader::new(name))),
        (ScalarKind::Float, 4) => Ok(shared(FloatReader::new(name))),
        (ScalarKind::Float, 8) => Ok(shared(DoubleReader::new(name))),
        (ScalarKind::Bool, 1) => Ok(shared(BoolReader::new(name))),
        (_, width) => Err(DecodeError::UnsupportedTypeWidth { width }),
    }
}
