// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Binary serialization types

mod cursor;
mod restrict;

use std::net::{Ipv4Addr, Ipv6Addr};

pub use self::cursor::{BinDecoder, BinEncoder, ByteCursor, EncodedSize, Place};
pub use self::restrict::{Restrict, RestrictedMath};
pub use crate::error::DecodeError;

#[cfg(test)]
pub(crate) mod bin_tests;

use crate::error::ProtoResult;
use crate::rr::CompressionIndex;

/// A type which can be encoded into a DNS binary format
pub trait BinEncodable {
    /// Write the type to the stream
    ///
    /// Names written through `names` become targets for compression pointers of later names in
    /// the same message.
    fn emit(&self, encoder: &mut BinEncoder<'_>, names: &mut CompressionIndex) -> ProtoResult<()>;

    /// Returns the object in binary form, with a fresh compression index
    fn to_bytes(&self) -> ProtoResult<Vec<u8>> {
        let mut bytes = vec![0; u16::MAX as usize];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        self.emit(&mut encoder, &mut CompressionIndex::default())?;
        let len = encoder.finish();

        bytes.truncate(len);
        Ok(bytes)
    }
}

/// A trait for types which are serializable to and from DNS binary formats
pub trait BinDecodable: Sized {
    /// Read the type from the stream
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self>;

    /// Returns the object in binary form
    fn from_bytes(bytes: &[u8]) -> ProtoResult<Self> {
        let mut decoder = BinDecoder::new(bytes);
        Self::read(&mut decoder)
    }
}

impl BinEncodable for u16 {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        encoder.emit_u16(*self)
    }
}

impl BinDecodable for u16 {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        decoder
            .read_u16()
            .map(Restrict::unverified)
            .map_err(Into::into)
    }
}

impl BinEncodable for Ipv4Addr {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        encoder.emit_vec(&self.octets())
    }
}

impl BinDecodable for Ipv4Addr {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let octets = decoder
            .read_slice(4)?
            .map(|s| [s[0], s[1], s[2], s[3]])
            .unverified(/*any four bytes are an address*/);
        Ok(Self::from(octets))
    }
}

impl BinEncodable for Ipv6Addr {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        for segment in self.segments() {
            encoder.emit_u16(segment)?;
        }

        Ok(())
    }
}

impl BinDecodable for Ipv6Addr {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        // eight 16 bit groups, no zero run handling is involved on the wire
        let mut segments = [0_u16; 8];
        for segment in &mut segments {
            *segment = decoder.read_u16()?.unverified(/*valid as any u16*/);
        }

        Ok(Self::from(segments))
    }
}
