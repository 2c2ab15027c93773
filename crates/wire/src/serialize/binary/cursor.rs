// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::marker::PhantomData;

use crate::error::{DecodeError, DecodeResult, ProtoErrorKind, ProtoResult};

use super::Restrict;

/// A position tracked view over a fixed size buffer.
///
/// Reads are available on any buffer, writes only on mutable ones. A write that does not fit in
/// the remaining capacity fails with [`ProtoErrorKind::MaxBufferSizeExceeded`] and leaves both
/// the buffer and the position untouched, see [`crate::ProtoError::is_overflow`].
///
/// The buffer is never resized, for pointer types we need to perform a reverse seek to lookup
/// names and for truncation the header is rewritten in place.
#[derive(Debug)]
pub struct ByteCursor<B> {
    buffer: B,
    offset: usize,
}

/// Decoding view over an immutable message
pub type BinDecoder<'a> = ByteCursor<&'a [u8]>;

/// Encoding view over a caller supplied output buffer
pub type BinEncoder<'a> = ByteCursor<&'a mut [u8]>;

impl<B: AsRef<[u8]>> ByteCursor<B> {
    /// Creates a new cursor positioned at the start of `buffer`
    pub fn new(buffer: B) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Total capacity of the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().len()
    }

    /// Returns the current position in the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves to an absolute position
    ///
    /// Seeking to the end of the buffer is allowed, seeking past it is not.
    pub fn set_offset(&mut self, offset: usize) -> DecodeResult<()> {
        if offset > self.capacity() {
            return Err(DecodeError::InsufficientBytes);
        }
        self.offset = offset;
        Ok(())
    }

    /// Returns the number of bytes left after the current position
    ///
    /// ```
    /// use dnswire::serialize::binary::BinDecoder;
    ///
    /// let deadbeef = b"deadbeef";
    /// let mut decoder = BinDecoder::new(deadbeef);
    /// assert_eq!(decoder.len(), 8);
    /// decoder.read_slice(7).unwrap();
    /// assert_eq!(decoder.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Returns `true` if every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek one byte forward, without moving the current position
    pub fn peek(&self) -> Option<Restrict<u8>> {
        self.buffer
            .as_ref()
            .get(self.offset)
            .map(|b| Restrict::new(*b))
    }

    /// Reads a slice out of the buffer, without allocating
    pub fn read_slice(&mut self, len: usize) -> DecodeResult<Restrict<&[u8]>> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.capacity())
            .ok_or(DecodeError::InsufficientBytes)?;
        let start = self.offset;
        self.offset = end;
        Ok(Restrict::new(&self.buffer.as_ref()[start..end]))
    }

    /// Reads a Vec out of the buffer
    pub fn read_vec(&mut self, len: usize) -> DecodeResult<Restrict<Vec<u8>>> {
        self.read_slice(len).map(|s| s.map(ToOwned::to_owned))
    }

    /// Returns the bytes from a previous position up to the current one
    pub fn slice_from(&self, index: usize) -> DecodeResult<&[u8]> {
        if index > self.offset {
            return Err(DecodeError::InvalidPreviousIndex);
        }

        Ok(&self.buffer.as_ref()[index..self.offset])
    }

    /// Reads a `<character-string>`
    ///
    /// ```text
    /// <character-string> is a single
    /// length octet followed by that number of characters.  <character-string>
    /// is treated as binary information, and can be up to 256 characters in
    /// length (including the length octet).
    /// ```
    pub fn read_character_data(&mut self) -> DecodeResult<Restrict<&[u8]>> {
        let length = self.read_u8()?.unverified() as usize;
        self.read_slice(length)
    }

    /// Reads one byte
    pub fn read_u8(&mut self) -> DecodeResult<Restrict<u8>> {
        Ok(self.read_slice(1)?.map(|s| s[0]))
    }

    /// Reads a big endian u16
    pub fn read_u16(&mut self) -> DecodeResult<Restrict<u16>> {
        Ok(self
            .read_slice(2)?
            .map(|s| u16::from_be_bytes([s[0], s[1]])))
    }

    /// Reads a big endian i32
    pub fn read_i32(&mut self) -> DecodeResult<Restrict<i32>> {
        Ok(self
            .read_slice(4)?
            .map(|s| i32::from_be_bytes([s[0], s[1], s[2], s[3]])))
    }

    /// Reads a big endian u32
    pub fn read_u32(&mut self) -> DecodeResult<Restrict<u32>> {
        Ok(self
            .read_slice(4)?
            .map(|s| u32::from_be_bytes([s[0], s[1], s[2], s[3]])))
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteCursor<B> {
    /// The bytes written so far
    pub fn written(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.offset]
    }

    /// Consumes the cursor and returns the number of bytes written
    pub fn finish(self) -> usize {
        self.offset
    }

    /// Writes all of `data` at the current position or nothing at all
    fn write_slice(&mut self, data: &[u8]) -> ProtoResult<()> {
        let capacity = self.capacity();
        let end = self.offset + data.len();
        if end > capacity {
            return Err(ProtoErrorKind::MaxBufferSizeExceeded(capacity).into());
        }

        self.buffer.as_mut()[self.offset..end].copy_from_slice(data);
        self.offset = end;
        Ok(())
    }

    /// Emit one byte into the buffer
    pub fn emit(&mut self, b: u8) -> ProtoResult<()> {
        self.write_slice(&[b])
    }

    /// Emit one byte into the buffer
    pub fn emit_u8(&mut self, data: u8) -> ProtoResult<()> {
        self.emit(data)
    }

    /// Writes a u16 in network byte order to the buffer
    pub fn emit_u16(&mut self, data: u16) -> ProtoResult<()> {
        self.write_slice(&data.to_be_bytes())
    }

    /// Writes an i32 in network byte order to the buffer
    pub fn emit_i32(&mut self, data: i32) -> ProtoResult<()> {
        self.write_slice(&data.to_be_bytes())
    }

    /// Writes an u32 in network byte order to the buffer
    pub fn emit_u32(&mut self, data: u32) -> ProtoResult<()> {
        self.write_slice(&data.to_be_bytes())
    }

    /// Writes the bytes verbatim
    pub fn emit_vec(&mut self, data: &[u8]) -> ProtoResult<()> {
        self.write_slice(data)
    }

    /// Emit a length prefixed `<character-string>`, at most 255 bytes of data
    pub fn emit_character_data<S: AsRef<[u8]>>(&mut self, char_data: S) -> ProtoResult<()> {
        let char_bytes = char_data.as_ref();
        let len = u8::try_from(char_bytes.len()).map_err(|_| {
            ProtoErrorKind::CharacterDataTooLong {
                max: 255,
                len: char_bytes.len(),
            }
        })?;

        if self.offset + 1 + char_bytes.len() > self.capacity() {
            return Err(ProtoErrorKind::MaxBufferSizeExceeded(self.capacity()).into());
        }
        self.emit(len)?;
        self.write_slice(char_bytes)
    }
}

impl BinEncoder<'_> {
    /// Capture a location to write back to, reserving its bytes
    pub fn place<T: EncodedSize>(&mut self) -> ProtoResult<Place<T>> {
        let start_index = self.offset;
        self.write_slice(&[0; 4][..T::LEN])?;

        Ok(Place {
            start_index,
            phantom: PhantomData,
        })
    }

    /// Number of bytes written since the place was captured, not counting the place itself
    pub fn len_since_place<T: EncodedSize>(&self, place: &Place<T>) -> usize {
        (self.offset - place.start_index) - T::LEN
    }

    /// Write back to a previously captured location
    pub fn emit_at<T: EncodedSize>(&mut self, place: Place<T>, data: T) -> ProtoResult<()> {
        let current_index = self.offset;

        // a place is always behind the cursor, anything else is a programming error
        assert!(place.start_index + T::LEN <= current_index);
        self.offset = place.start_index;
        let emit_result = data.emit(self);
        debug_assert_eq!(self.offset - place.start_index, T::LEN);
        self.offset = current_index;

        emit_result
    }
}

/// Values with a fixed width on the wire that can be written back into a [`Place`]
pub trait EncodedSize {
    /// Number of bytes the value occupies
    const LEN: usize;

    /// Write the value at the encoder's position
    fn emit(self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()>;
}

impl EncodedSize for u16 {
    const LEN: usize = 2;

    fn emit(self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u16(self)
    }
}

impl EncodedSize for u32 {
    const LEN: usize = 4;

    fn emit(self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_u32(self)
    }
}

/// A reserved location in the output, to be filled in once its value is known
#[derive(Debug)]
#[must_use = "data must be written back to the place"]
pub struct Place<T: EncodedSize> {
    start_index: usize,
    phantom: PhantomData<T>,
}

impl<T: EncodedSize> Place<T> {
    /// Write `data` into the reserved location
    pub fn replace(self, encoder: &mut BinEncoder<'_>, data: T) -> ProtoResult<()> {
        encoder.emit_at(self, data)
    }
}
