//! The per-event decode loop.

use crate::buffer::BinaryBuffer;
use crate::error::{DecodeError, Result};
use crate::output::Output;
use crate::reader::SharedReader;

/// Decode every event in `data` with the given root reader and return its
/// accumulated columns.
///
/// `offsets` is the event-offset table: `E + 1` byte positions within
/// `data`, first `0`, last the blob length, non-decreasing. Events are
/// decoded strictly in offset order; after each event the bytes consumed
/// must equal the event's extent in the table, otherwise the session
/// aborts with [`DecodeError::EventLengthMismatch`] and no output is
/// returned.
pub fn read_data(data: &[u8], offsets: &[u32], reader: &SharedReader) -> Result<Output> {
    let mut buffer = BinaryBuffer::new(data, offsets);
    let mut root = reader.borrow_mut();

    for event in 0..buffer.entries() {
        let start = buffer.pos();
        root.read(&mut buffer)?;
        let actual = buffer.pos() - start;

        let expected = offsets[event + 1].saturating_sub(offsets[event]) as usize;
        if actual != expected {
            return Err(DecodeError::EventLengthMismatch {
                event,
                reader: root.name().to_string(),
                expected,
                actual,
            });
        }
    }

    Ok(root.data())
}
