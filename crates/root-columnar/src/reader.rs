//! The element-reader capability and shared-ownership helpers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::BinaryBuffer;
use crate::error::Result;
use crate::output::Output;

/// One node of a reader tree.
///
/// A reader is a stateful accumulator: each [`read`](ElementReader::read)
/// consumes one logical occurrence at the buffer's cursor and appends to
/// the reader's owned columns. Composite readers delegate to child readers
/// held behind [`SharedReader`], so a child may appear under several
/// parents (the tree is a DAG with shared leaves).
pub trait ElementReader {
    /// Name given at construction, used in error messages.
    fn name(&self) -> &str;

    /// Consume one occurrence at the cursor.
    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()>;

    /// Consume `count` occurrences.
    ///
    /// The default reads one occurrence at a time; readers whose batch
    /// layout hoists a shared header override this.
    fn read_many(&mut self, buffer: &mut BinaryBuffer, count: u32) -> Result<u32> {
        for _ in 0..count {
            self.read(buffer)?;
        }
        Ok(count)
    }

    /// Consume occurrences until the cursor reaches `end`, returning how
    /// many were read.
    fn read_until(&mut self, buffer: &mut BinaryBuffer, end: usize) -> Result<u32> {
        let mut count = 0;
        while buffer.pos() < end {
            self.read(buffer)?;
            count += 1;
        }
        Ok(count)
    }

    /// Drain the accumulated columns.
    ///
    /// Ownership of the output vectors transfers to the caller; the reader
    /// is left empty. Call once, after the decode session completes.
    fn data(&mut self) -> Output;
}

/// A reader shared by construction between parents.
///
/// Decode sessions are single-threaded, so plain reference counting with
/// interior mutability is the ownership model.
pub type SharedReader = Rc<RefCell<dyn ElementReader>>;

/// Wrap a reader for shared ownership.
pub fn shared<R: ElementReader + 'static>(reader: R) -> SharedReader {
    Rc::new(RefCell::new(reader))
}
