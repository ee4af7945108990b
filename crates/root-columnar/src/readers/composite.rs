//! Readers composing multiple children.

use crate::buffer::BinaryBuffer;
use crate::error::{DecodeError, Result};
use crate::output::Output;
use crate::reader::{ElementReader, SharedReader};

/// Invokes an ordered list of children, one occurrence each.
pub struct GroupReader {
    name: String,
    elements: Vec<SharedReader>,
}

impl GroupReader {
    /// Create a reader with the given name and children.
    pub fn new(name: impl Into<String>, elements: Vec<SharedReader>) -> Self {
        Self { name: name.into(), elements }
    }
}

impl ElementReader for GroupReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        for element in &self.elements {
            let mut element = element.borrow_mut();
            log::trace!("group '{}': element '{}' at {}", self.name, element.name(), buffer.pos());
            element.read(buffer)?;
        }
        Ok(())
    }

    fn data(&mut self) -> Output {
        Output::Group(self.elements.iter().map(|e| e.borrow_mut().data()).collect())
    }
}

/// Like [`GroupReader`], but the member list is preceded by an `fNBytes`
/// + `fVersion` header whose byte count is verified after the members are
/// read.
pub struct ObjectReader {
    name: String,
    elements: Vec<SharedReader>,
}

impl ObjectReader {
    /// Create a reader with the given name and children.
    pub fn new(name: impl Into<String>, elements: Vec<SharedReader>) -> Self {
        Self { name: name.into(), elements }
    }
}

impl ElementReader for ObjectReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let nbytes = buffer.read_fnbytes()? as usize;
        let start = buffer.pos();
        let end = start + nbytes;
        buffer.read_fversion()?;

        for element in &self.elements {
            let mut element = element.borrow_mut();
            log::trace!("object '{}': member '{}' at {}", self.name, element.name(), buffer.pos());
            element.read(buffer)?;
        }

        if buffer.pos() != end {
            return Err(DecodeError::FramingLengthMismatch {
                reader: self.name.clone(),
                expected: nbytes,
                actual: buffer.pos() - start,
            });
        }
        Ok(())
    }

    fn data(&mut self) -> Output {
        Output::Group(self.elements.iter().map(|e| e.borrow_mut().data()).collect())
    }
}

/// Models a fixed- or dynamic-size C-style array of a member type.
///
/// With `flat_size > 0` the element reader is bulk-invoked exactly
/// `flat_size` times per occurrence and the output is the element's own.
/// Otherwise the array runs to the end of the current event (discovered
/// from the offset table) and this reader contributes its own jagged
/// offsets around the element payload.
pub struct CArrayReader {
    name: String,
    is_obj: bool,
    flat_size: i64,
    element: SharedReader,
    offsets: Vec<i64>,
}

impl CArrayReader {
    /// Create a reader with the given name and element reader.
    ///
    /// `is_obj` prefixes each occurrence with an `fNBytes` + `fVersion`
    /// header; `flat_size <= 0` selects the dynamic event-bounded mode.
    pub fn new(
        name: impl Into<String>,
        is_obj: bool,
        flat_size: i64,
        element: SharedReader,
    ) -> Self {
        Self { name: name.into(), is_obj, flat_size, element, offsets: vec![0] }
    }
}

impl ElementReader for CArrayReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        if self.is_obj {
            buffer.read_fnbytes()?;
            buffer.read_fversion()?;
        }

        if self.flat_size > 0 {
            self.element.borrow_mut().read_many(buffer, self.flat_size as u32)?;
            return Ok(());
        }

        let end = buffer.event_end_after_cursor();
        log::trace!("c-array '{}': payload runs to {}", self.name, end);
        let count = self.element.borrow_mut().read_until(buffer, end)?;
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + count as i64);
        Ok(())
    }

    fn read_many(&mut self, _buffer: &mut BinaryBuffer, _count: u32) -> Result<u32> {
        Err(DecodeError::UnsupportedOperation {
            reader: self.name.clone(),
            op: "external bulk reads (read_many)",
        })
    }

    fn read_until(&mut self, _buffer: &mut BinaryBuffer, _end: usize) -> Result<u32> {
        Err(DecodeError::UnsupportedOperation {
            reader: self.name.clone(),
            op: "external bulk reads (read_until)",
        })
    }

    fn data(&mut self) -> Output {
        if self.flat_size > 0 {
            return self.element.borrow_mut().data();
        }
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        Output::Jagged { offsets, items: Box::new(self.element.borrow_mut().data()) }
    }
}
