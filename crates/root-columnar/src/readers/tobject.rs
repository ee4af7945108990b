//! Reader for the universal `TObject` base header.

use crate::buffer::{BinaryBuffer, IS_REFERENCED};
use crate::error::Result;
use crate::output::Output;
use crate::reader::ElementReader;

/// Consumes a `TObject` header per occurrence.
///
/// By default nothing is stored. With `keep_data`, `fUniqueID`, `fBits`
/// and any PIDF words are retained for hosts that want the reference
/// bookkeeping.
pub struct TObjectReader {
    name: String,
    keep_data: bool,
    unique_id: Vec<i32>,
    bits: Vec<u32>,
    pidf: Vec<u16>,
    pidf_offsets: Vec<i64>,
}

impl TObjectReader {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>, keep_data: bool) -> Self {
        Self {
            name: name.into(),
            keep_data,
            unique_id: Vec::new(),
            bits: Vec::new(),
            pidf: Vec::new(),
            pidf_offsets: vec![0],
        }
    }
}

impl ElementReader for TObjectReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        if !self.keep_data {
            return buffer.skip_tobject();
        }

        buffer.read_fversion()?;
        let unique_id = buffer.read_i32()?;
        let bits = buffer.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.pidf.push(buffer.read_u16()?);
        }

        self.unique_id.push(unique_id);
        self.bits.push(bits);
        self.pidf_offsets.push(self.pidf.len() as i64);
        Ok(())
    }

    fn data(&mut self) -> Output {
        if !self.keep_data {
            return Output::None;
        }
        Output::TObject {
            unique_id: std::mem::take(&mut self.unique_id),
            bits: std::mem::take(&mut self.bits),
            pidf: std::mem::take(&mut self.pidf),
            pidf_offsets: std::mem::take(&mut self.pidf_offsets),
        }
    }
}
