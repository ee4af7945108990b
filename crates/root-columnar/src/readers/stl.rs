//! Readers for persisted STL containers.
//!
//! All three variants take a `with_header` construction flag: when set,
//! each occurrence (or each batch, for the bulk operations) starts with an
//! `fNBytes` + `fVersion` header. The canonical stream layout is
//! object-wise; a version word carrying the member-wise flag is rejected
//! rather than misparsed.

use crate::buffer::{BinaryBuffer, STREAMED_MEMBERWISE};
use crate::error::{DecodeError, Result};
use crate::output::{Column, Output};
use crate::reader::{ElementReader, SharedReader};

fn check_objwise(name: &str, version: i16) -> Result<()> {
    if version as u16 & STREAMED_MEMBERWISE != 0 {
        return Err(DecodeError::UnsupportedOperation {
            reader: name.to_string(),
            op: "member-wise streamed payloads",
        });
    }
    Ok(())
}

/// Reads a length-prefixed STL sequence (`vector`, `list`, `deque`, ...).
///
/// Each occurrence is a 32-bit count followed by that many elements, read
/// through the shared element reader.
pub struct STLSeqReader {
    name: String,
    with_header: bool,
    element: SharedReader,
    offsets: Vec<i64>,
}

impl STLSeqReader {
    /// Create a reader with the given name and element reader.
    pub fn new(name: impl Into<String>, with_header: bool, element: SharedReader) -> Self {
        Self { name: name.into(), with_header, element, offsets: vec![0] }
    }

    fn read_header(&self, buffer: &mut BinaryBuffer) -> Result<()> {
        buffer.read_fnbytes()?;
        let version = buffer.read_fversion()?;
        check_objwise(&self.name, version)
    }

    fn read_body(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let size = buffer.read_u32()?;
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + size as i64);
        log::trace!("seq '{}': {} elements at {}", self.name, size, buffer.pos());

        let mut element = self.element.borrow_mut();
        for _ in 0..size {
            element.read(buffer)?;
        }
        Ok(())
    }
}

impl ElementReader for STLSeqReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        if self.with_header {
            self.read_header(buffer)?;
        }
        self.read_body(buffer)
    }

    fn read_many(&mut self, buffer: &mut BinaryBuffer, count: u32) -> Result<u32> {
        if count == 0 {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        for _ in 0..count {
            self.read_body(buffer)?;
        }
        Ok(count)
    }

    fn read_until(&mut self, buffer: &mut BinaryBuffer, end: usize) -> Result<u32> {
        if buffer.pos() == end {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        let mut count = 0;
        while buffer.pos() < end {
            self.read_body(buffer)?;
            count += 1;
        }
        Ok(count)
    }

    fn data(&mut self) -> Output {
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        Output::Jagged { offsets, items: Box::new(self.element.borrow_mut().data()) }
    }
}

/// Reads a length-prefixed STL associative container, object-wise:
/// each of the `fSize` entries is one key then one value.
pub struct STLMapReader {
    name: String,
    with_header: bool,
    legacy_header: bool,
    key: SharedReader,
    value: SharedReader,
    offsets: Vec<i64>,
}

impl STLMapReader {
    /// Create a reader with the canonical header layout
    /// (`fNBytes` + `fVersion`).
    pub fn new(
        name: impl Into<String>,
        with_header: bool,
        key: SharedReader,
        value: SharedReader,
    ) -> Self {
        Self {
            name: name.into(),
            with_header,
            legacy_header: false,
            key,
            value,
            offsets: vec![0],
        }
    }

    /// Create a reader using the legacy pair header: `fNBytes` followed by
    /// 8 skipped bytes (version word plus class info), as older streams
    /// carry it.
    pub fn with_legacy_header(
        name: impl Into<String>,
        with_header: bool,
        key: SharedReader,
        value: SharedReader,
    ) -> Self {
        let mut reader = Self::new(name, with_header, key, value);
        reader.legacy_header = true;
        reader
    }

    fn read_header(&self, buffer: &mut BinaryBuffer) -> Result<()> {
        buffer.read_fnbytes()?;
        if self.legacy_header {
            return buffer.skip(8);
        }
        let version = buffer.read_fversion()?;
        check_objwise(&self.name, version)
    }

    fn read_body(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let size = buffer.read_u32()?;
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + size as i64);
        log::trace!("map '{}': {} pairs at {}", self.name, size, buffer.pos());

        let mut key = self.key.borrow_mut();
        let mut value = self.value.borrow_mut();
        for _ in 0..size {
            key.read(buffer)?;
            value.read(buffer)?;
        }
        Ok(())
    }
}

impl ElementReader for STLMapReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        if self.with_header {
            self.read_header(buffer)?;
        }
        self.read_body(buffer)
    }

    fn read_many(&mut self, buffer: &mut BinaryBuffer, count: u32) -> Result<u32> {
        if count == 0 {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        for _ in 0..count {
            self.read_body(buffer)?;
        }
        Ok(count)
    }

    fn read_until(&mut self, buffer: &mut BinaryBuffer, end: usize) -> Result<u32> {
        if buffer.pos() == end {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        let mut count = 0;
        while buffer.pos() < end {
            self.read_body(buffer)?;
            count += 1;
        }
        Ok(count)
    }

    fn data(&mut self) -> Output {
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        Output::Map {
            offsets,
            keys: Box::new(self.key.borrow_mut().data()),
            values: Box::new(self.value.borrow_mut().data()),
        }
    }
}

/// Reads a persisted `std::string`: a TString-style length then the raw
/// bytes.
pub struct STLStringReader {
    name: String,
    with_header: bool,
    offsets: Vec<i64>,
    data: Vec<u8>,
}

impl STLStringReader {
    /// Create a reader with the given name.
    pub fn new(name: impl Into<String>, with_header: bool) -> Self {
        Self { name: name.into(), with_header, offsets: vec![0], data: Vec::new() }
    }

    fn read_header(&self, buffer: &mut BinaryBuffer) -> Result<()> {
        buffer.read_fnbytes()?;
        buffer.read_fversion()?;
        Ok(())
    }

    fn read_body(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        let size = buffer.read_tstring_length()? as usize;
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + size as i64);
        self.data.extend_from_slice(buffer.read_bytes(size)?);
        Ok(())
    }
}

impl ElementReader for STLStringReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buffer: &mut BinaryBuffer) -> Result<()> {
        if self.with_header {
            self.read_header(buffer)?;
        }
        self.read_body(buffer)
    }

    fn read_many(&mut self, buffer: &mut BinaryBuffer, count: u32) -> Result<u32> {
        if count == 0 {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        for _ in 0..count {
            self.read_body(buffer)?;
        }
        Ok(count)
    }

    fn read_until(&mut self, buffer: &mut BinaryBuffer, end: usize) -> Result<u32> {
        if buffer.pos() == end {
            return Ok(0);
        }
        if self.with_header {
            self.read_header(buffer)?;
        }
        let mut count = 0;
        while buffer.pos() < end {
            self.read_body(buffer)?;
            count += 1;
        }
        Ok(count)
    }

    fn data(&mut self) -> Output {
        let offsets = std::mem::replace(&mut self.offsets, vec![0]);
        let data = std::mem::take(&mut self.data);
        Output::Jagged { offsets, items: Box::new(Output::Flat(Column::UInt8(data))) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BYTE_COUNT_MASK;
    use crate::reader::shared;
    use crate::readers::basic::{FloatReader, Int16Reader, Int32Reader};

    fn framed(version: i16, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(BYTE_COUNT_MASK | (2 + body.len() as u32)).to_be_bytes());
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn seq_without_header() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&7i32.to_be_bytes());
        data.extend_from_slice(&8i32.to_be_bytes());
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLSeqReader::new("v", false, shared(Int32Reader::new("e")));
        r.read(&mut b).unwrap();
        assert_eq!(
            r.data(),
            Output::Jagged {
                offsets: vec![0, 2],
                items: Box::new(Output::Flat(Column::Int32(vec![7, 8]))),
            }
        );
    }

    #[test]
    fn empty_seq_advances_offsets_without_touching_element() {
        let data = 0u32.to_be_bytes();
        let offsets = [0u32, 4];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLSeqReader::new("v", false, shared(Int32Reader::new("e")));
        r.read(&mut b).unwrap();
        let (offs, items) = match r.data() {
            Output::Jagged { offsets, items } => (offsets, items),
            other => panic!("unexpected output: {other:?}"),
        };
        assert_eq!(offs, vec![0, 0]);
        assert_eq!(*items, Output::Flat(Column::Int32(vec![])));
    }

    #[test]
    fn map_with_canonical_header() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_be_bytes());
        body.extend_from_slice(&42i16.to_be_bytes());
        body.extend_from_slice(&5.0f32.to_be_bytes());
        let data = framed(1, &body);
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLMapReader::new(
            "m",
            true,
            shared(Int16Reader::new("k")),
            shared(FloatReader::new("v")),
        );
        r.read(&mut b).unwrap();
        assert_eq!(
            r.data(),
            Output::Map {
                offsets: vec![0, 1],
                keys: Box::new(Output::Flat(Column::Int16(vec![42]))),
                values: Box::new(Output::Flat(Column::Float32(vec![5.0]))),
            }
        );
    }

    #[test]
    fn map_with_legacy_header() {
        // fNBytes, then 8 opaque header bytes, then the body
        let mut data = Vec::new();
        let mut tail = Vec::new();
        tail.extend_from_slice(&[0u8; 8]);
        tail.extend_from_slice(&1u32.to_be_bytes());
        tail.extend_from_slice(&3i16.to_be_bytes());
        tail.extend_from_slice(&4i16.to_be_bytes());
        data.extend_from_slice(&(BYTE_COUNT_MASK | tail.len() as u32).to_be_bytes());
        data.extend_from_slice(&tail);
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLMapReader::with_legacy_header(
            "m",
            true,
            shared(Int16Reader::new("k")),
            shared(Int16Reader::new("v")),
        );
        r.read(&mut b).unwrap();
        assert_eq!(b.remaining(), 0);
        assert!(matches!(r.data(), Output::Map { .. }));
    }

    #[test]
    fn memberwise_version_word_is_rejected() {
        let data = framed(STREAMED_MEMBERWISE as i16 | 1, &0u32.to_be_bytes());
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLSeqReader::new("v", true, shared(Int32Reader::new("e")));
        match r.read(&mut b) {
            Err(DecodeError::UnsupportedOperation { reader, .. }) => assert_eq!(reader, "v"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn string_batch_shares_one_header() {
        let mut body = Vec::new();
        body.extend_from_slice(&[2, b'h', b'i']);
        body.extend_from_slice(&[0]);
        body.extend_from_slice(&[1, b'!']);
        let data = framed(1, &body);
        let offsets = [0u32, data.len() as u32];
        let mut b = BinaryBuffer::new(&data, &offsets);

        let mut r = STLStringReader::new("s", true);
        assert_eq!(r.read_many(&mut b, 3).unwrap(), 3);
        assert_eq!(b.remaining(), 0);
        let (offs, items) = match r.data() {
            Output::Jagged { offsets, items } => (offsets, items),
            other => panic!("unexpected output: {other:?}"),
        };
        assert_eq!(offs, vec![0, 2, 2, 3]);
        assert_eq!(*items, Output::Flat(Column::UInt8(b"hi!".to_vec())));
    }

    #[test]
    fn read_many_zero_consumes_nothing() {
        let data = [0xAAu8; 4];
        let offsets = [0u32, 4];
        let mut b = BinaryBuffer::new(&data, &offsets);
        let mut r = STLStringReader::new("s", true);
        assert_eq!(r.read_many(&mut b, 0).unwrap(), 0);
        assert_eq!(b.pos(), 0);
    }
}
