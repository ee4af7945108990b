//! Readers that scope a child to a byte-count-framed region.

use crate::buffer::{BinaryBuffer, NEW_CLASS_TAG};
use crate::error::{DecodeError, Result};
use crate::output::Output;
use crate::reader::{ElementReader, SharedReader};

/// Consumes an `fNBytes` + `fVersion` header, then delegates the framed
/// region to the child.
///
/// The byte count spans from right after the count word to the end of the
/// region, so the child must consume exactly `fNBytes - 2` bytes. Anything
/// else fails with [`DecodeError::FramingLengthMismatch`].
pub struct NBytesVersionReader {
    name: String,
    element: SharedReader,
}

impl NBytesVersionReader {
    /// Create a reader with the given name and child.
    pub fn new(name: impl Into<String>, element: SharedReader) -> Self {
        Self { name: name.into(), element }
    }
}

impl ElementReader for NBytesVersionReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let nbytes = buffer.read_fnbytes()? as usize;
        buffer.read_fversion()?;

        let start = buffer.pos();
        let end = start + nbytes.saturating_sub(2);
        self.element.borrow_mut().read(buffer)?;

        if buffer.pos() != end {
            return Err(DecodeError::FramingLengthMismatch {
                reader: self.element.borrow().name().to_string(),
                expected: nbytes.saturating_sub(2),
                actual: buffer.pos() - start,
            });
        }
        Ok(())
    }

    fn data(&mut self) -> Output {
        self.element.borrow_mut().data()
    }
}

/// Consumes a polymorphic object header, then delegates to the child.
///
/// The header is an `fNBytes` and a 32-bit tag; the new-class tag carries
/// an inline null-terminated class name (not retained). The cursor must
/// land exactly on the declared region end.
pub struct ObjectHeaderReader {
    name: String,
    element: SharedReader,
}

impl ObjectHeaderReader {
    /// Create a reader with the given name and child.
    pub fn new(name: impl Into<String>, element: SharedReader) -> Self {
        Self { name: name.into(), element }
    }
}

impl ElementReader for ObjectHeaderReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let nbytes = buffer.read_fnbytes()? as usize;
        let end = buffer.pos() + nbytes;

        let tag = buffer.read_u32()?;
        if tag == NEW_CLASS_TAG {
            let class_name = buffer.read_null_terminated()?;
            log::trace!("object header '{}': new class {:?}", self.name, class_name);
        }

        let start = buffer.pos();
        self.element.borrow_mut().read(buffer)?;

        if buffer.pos() != end {
            return Err(DecodeError::FramingLengthMismatch {
                reader: self.element.borrow().name().to_string(),
                expected: end - start,
                actual: buffer.pos() - start,
            });
        }
        Ok(())
    }

    fn data(&mut self) -> Output {
        self.element.borrow_mut().data()
    }
}
