//! Error types for decode sessions.

use thiserror::Error;

/// Errors raised while executing a reader tree over an event buffer.
///
/// Every variant is fatal to the current decode session: the driver loop
/// aborts and no partial output is returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A read would run past the end of the byte blob.
    #[error("buffer underflow at offset {offset}: need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Bytes the read required.
        need: usize,
        /// Bytes remaining in the blob.
        have: usize,
    },

    /// An expected `fNBytes` word lacked the byte-count marker.
    #[error("invalid framing at offset {offset}: 0x{raw:08x} lacks the byte-count marker")]
    InvalidFraming {
        /// Position of the offending word.
        offset: usize,
        /// The raw 32-bit value read.
        raw: u32,
    },

    /// A region-scoped reader's child did not consume the declared region.
    #[error("framing length mismatch for '{reader}': expected {expected} bytes, got {actual}")]
    FramingLengthMismatch {
        /// Name of the reader whose consumption was measured.
        reader: String,
        /// Bytes the framing header declared.
        expected: usize,
        /// Bytes actually consumed.
        actual: usize,
    },

    /// The per-event consumed-length invariant was violated.
    #[error("event {event}: '{reader}' consumed {actual} bytes, expected {expected}")]
    EventLengthMismatch {
        /// Index of the offending event.
        event: usize,
        /// Name of the root reader.
        reader: String,
        /// Event length per the offset table.
        expected: usize,
        /// Bytes actually consumed.
        actual: usize,
    },

    /// A reader was asked for an operation it forbids.
    #[error("'{reader}' does not support {op}")]
    UnsupportedOperation {
        /// Name of the refusing reader.
        reader: String,
        /// The refused operation.
        op: &'static str,
    },

    /// A primitive reader was requested at a width the wire format lacks.
    #[error("unsupported primitive width: {width} bytes")]
    UnsupportedTypeWidth {
        /// The requested byte width.
        width: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DecodeError>;
