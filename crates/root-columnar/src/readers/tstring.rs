//! Reader for ROOT's `TString` wire layout.

use crate::buffer::BinaryBuffer;
use crate::error::Result;
use crate::output::{Column, Output};
use crate::reader::ElementReader;

/// Accumulates `TString` payloads into one byte column plus offsets.
///
/// Wire layout: a length byte, with `255` escaping to a 32-bit length,
/// then the raw bytes.
pub struct TStringReader {
    name: String,
    data: Vec<u8>,
    offsets: Vec<i64>,
}

impl TStringReader {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), data: Vec::new(), offsets: vec![0] }
    }
}

impl ElementReader for TStringReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let size = buffer.read_tstring_length()? as usize;
        self.data.extend_from_slice(buffer.read_bytes(size)?);
        self.offsets.push(self.data.len() as i64);
        Ok(())
    }

    fn data(&mut self) -> Output {
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        let data = std::mem::take(&mut self.data);
        Output::Jagged { offsets, items: Box::new(Output::Flat(Column::UInt8(data))) }
    }
}
