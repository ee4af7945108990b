//! Readers for ROOT's `TArray` family.

use crate::buffer::BinaryBuffer;
use crate::error::Result;
use crate::output::Output;
use crate::reader::ElementReader;
use crate::readers::basic::Scalar;

/// Accumulates `TArrayX` payloads: a 32-bit count, then that many
/// elements of the parameter type.
pub struct TArrayReader<T: Scalar> {
    name: String,
    offsets: Vec<i64>,
    data: Vec<T>,
}

impl<T: Scalar> TArrayReader<T> {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), offsets: vec![0], data: Vec::new() }
    }
}

impl<T: Scalar> ElementReader for TArrayReader<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let size = buffer.read_u32()?;
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + size as i64);
        for _ in 0..size {
            self.data.push(T::read_from(buffer)?);
        }
        Ok(())
    }

    fn data(&mut self) -> Output {
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        let data = std::mem::take(&mut self.data);
        Output::Jagged { offsets, items: Box::new(Output::Flat(T::into_column(data))) }
    }
}

/// Reads `TArrayC` (signed 8-bit).
pub type TArrayCReader = TArrayReader<i8>;
/// Reads `TArrayS` (signed 16-bit).
pub type TArraySReader = TArrayReader<i16>;
/// Reads `TArrayI` (signed 32-bit).
pub type TArrayIReader = TArrayReader<i32>;
/// Reads `TArrayL` (signed 64-bit).
pub type TArrayLReader = TArrayReader<i64>;
/// Reads `TArrayF` (32-bit float).
pub type TArrayFReader = TArrayReader<f32>;
/// Reads `TArrayD` (64-bit float).
pub type TArrayDReader = TArrayReader<f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Column;

    #[test]
    fn counts_prefix_each_record() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&7i32.to_be_bytes());
        data.extend_from_slice(&(-8i32).to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&9i32.to_be_bytes());
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);
        let mut r = TArrayIReader::new("a");
        for _ in 0..3 {
            r.read(&mut b).unwrap();
        }
        assert_eq!(
            r.data(),
            Output::Jagged {
                offsets: vec![0, 2, 2, 3],
                items: Box::new(Output::Flat(Column::Int32(vec![7, -8, 9]))),
            }
        );
    }
}
