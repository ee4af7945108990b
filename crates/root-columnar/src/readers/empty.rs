//! A reader that consumes and produces nothing.

use crate::buffer::BinaryBuffer;
use crate::error::Result;
use crate::output::Output;
use crate::reader::ElementReader;

/// Stub for streamer elements the plan chooses to ignore.
pub struct EmptyReader {
    name: String,
}

impl EmptyReader {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ElementReader for EmptyReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, _buffer: &mut BinaryBuffer) -> Result<()> {
        Ok(())
    }

    fn data(&mut self) -> Output {
        Output::None
    }
}
