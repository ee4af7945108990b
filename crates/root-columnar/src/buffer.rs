//! Cursor over an event blob, using ROOT's big-endian serialization
//! conventions and framing primitives.

use crate::error::{DecodeError, Result};

/// Tag announcing a class whose name follows inline.
pub const NEW_CLASS_TAG: u32 = 0xFFFF_FFFF;
/// Mask OR-ed onto class-index references.
pub const CLASS_MASK: u32 = 0x8000_0000;
/// Mask OR-ed onto `fNBytes` byte counts.
pub const BYTE_COUNT_MASK: u32 = 0x4000_0000;
/// Last valid map count and byte count.
pub const MAX_MAP_COUNT: u32 = 0x3FFF_FFFE;
/// Mask OR-ed onto version words that carry a byte count.
pub const BYTE_COUNT_VMASK: u16 = 0x4000;
/// Highest possible class version.
pub const MAX_VERSION: u16 = 0x3FFF;
/// `TObject::fBits` flag: the object is referenced by a `TRef`.
pub const IS_REFERENCED: u32 = 1 << 4;
/// Version-word flag: an STL container was streamed member-wise.
pub const STREAMED_MEMBERWISE: u16 = 1 << 14;

/// A cursor-based reader over one decode session's byte blob.
///
/// Holds the contiguous blob of concatenated event records and the
/// event-offset table of length `E + 1` (byte positions within the blob,
/// first `0`, last the blob length). Both must outlive the buffer; the
/// buffer itself is created per `read_data` call and is not shared across
/// threads.
pub struct BinaryBuffer<'a> {
    data: &'a [u8],
    offsets: &'a [u32],
    pos: usize,
}

impl<'a> BinaryBuffer<'a> {
    /// Create a new buffer over `data` with its event-offset table.
    pub fn new(data: &'a [u8], offsets: &'a [u32]) -> Self {
        Self { data, offsets, pos: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of events described by the offset table.
    #[inline]
    pub fn entries(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Remaining bytes from the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a sub-slice of `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Read a big-endian i8.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.read_bytes(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        let b = self.read_bytes(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a one-byte bool: truthy iff non-zero.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a class version word (`fVersion`).
    pub fn read_fversion(&mut self) -> Result<i16> {
        self.read_i16()
    }

    /// Read a byte-count word (`fNBytes`).
    ///
    /// The high bit ([`BYTE_COUNT_MASK`]) marks the word as a byte count;
    /// the low bits give the size of the region that follows, excluding
    /// the word itself. A missing marker fails with
    /// [`DecodeError::InvalidFraming`].
    pub fn read_fnbytes(&mut self) -> Result<u32> {
        let offset = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK == 0 {
            return Err(DecodeError::InvalidFraming { offset, raw });
        }
        Ok(raw & !BYTE_COUNT_MASK)
    }

    /// Read a null-terminated string.
    ///
    /// The returned bytes exclude the terminator; the cursor always lands
    /// past it.
    pub fn read_null_terminated(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != 0 {
            self.pos += 1;
        }
        if self.pos == self.data.len() {
            return Err(DecodeError::BufferUnderflow {
                offset: start,
                need: self.pos - start + 1,
                have: self.pos - start,
            });
        }
        let s = &self.data[start..self.pos];
        self.pos += 1;
        Ok(s)
    }

    /// Read a polymorphic object header: `fNBytes`, then a 32-bit tag.
    ///
    /// Returns the class name when the tag is [`NEW_CLASS_TAG`], `None`
    /// otherwise (a back-reference into the streamer map).
    pub fn read_obj_header(&mut self) -> Result<Option<String>> {
        self.read_fnbytes()?;
        let tag = self.read_u32()?;
        if tag == NEW_CLASS_TAG {
            let name = self.read_null_terminated()?;
            Ok(Some(String::from_utf8_lossy(name).into_owned()))
        } else {
            Ok(None)
        }
    }

    /// Read a TString-style length: one byte, or `255` followed by a u32.
    pub fn read_tstring_length(&mut self) -> Result<u32> {
        let first = self.read_u8()?;
        if first == 255 { self.read_u32() } else { Ok(first as u32) }
    }

    /// Skip a standard `TObject` header.
    ///
    /// Consumes `fVersion`, `fUniqueID` and `fBits`; when `fBits` carries
    /// [`IS_REFERENCED`], also consumes the 2-byte process id (PIDF).
    pub fn skip_tobject(&mut self) -> Result<()> {
        self.read_fversion()?;
        self.skip(4)?; // fUniqueID
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?; // pidf
        }
        Ok(())
    }

    /// Byte position where the event containing the cursor ends.
    ///
    /// This is the smallest event offset strictly greater than the cursor
    /// (linear scan), or the blob length when the cursor sits on the final
    /// boundary. Dynamic-size C-style arrays use it to find their payload
    /// end.
    pub fn event_end_after_cursor(&self) -> usize {
        self.offsets
            .iter()
            .map(|&o| o as usize)
            .find(|&o| o > self.pos)
            .unwrap_or(self.data.len())
    }

    // ── internal ────────────────────────────────────────────────

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(DecodeError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.data.len().saturating_sub(self.pos),
            });
        }
        Ok(())
    }
}
