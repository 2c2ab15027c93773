// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! type bit map helper definitions

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict};

/// A collection of record types.
///
/// This represents the "type bit maps" field of NSEC and NSEC3 records, always in type code
/// order.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordTypeSet {
    types: BTreeSet<RecordType>,
}

impl RecordTypeSet {
    /// Construct a new set of record types.
    pub fn new(types: impl IntoIterator<Item = RecordType>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }

    /// The types in code order
    pub fn iter(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.types.iter().copied()
    }

    /// Returns true if the type is part of the set
    pub fn contains(&self, record_type: RecordType) -> bool {
        self.types.contains(&record_type)
    }

    /// Number of types in the set
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if there are no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn emit(&self, encoder: &mut BinEncoder<'_>) -> ProtoResult<()> {
        encoder.emit_vec(&encode_type_bit_maps(self.iter().map(u16::from)))
    }

    /// Reads exactly `length` bytes of bit maps
    pub(crate) fn read(decoder: &mut BinDecoder<'_>, length: Restrict<usize>) -> ProtoResult<Self> {
        let bit_maps = decoder.read_slice(length.unverified(/*bounded by the rdata*/))?;
        let codes = decode_type_bit_maps(bit_maps.unverified())?;

        Ok(Self::new(codes.into_iter().map(RecordType::from)))
    }
}

impl FromIterator<RecordType> for RecordTypeSet {
    fn from_iter<T: IntoIterator<Item = RecordType>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Encodes type codes as windowed bit maps
///
/// Windows come out in ascending order, each only as long as its highest type requires. No
/// codes, no bytes.
///
/// ```
/// use dnswire::rr::type_bit_map::encode_type_bit_maps;
///
/// // A(1), MX(15), RRSIG(46), NSEC(47)
/// let bytes = encode_type_bit_maps([1, 15, 46, 47]);
/// assert_eq!(bytes, [0, 6, 0x40, 0x01, 0x00, 0x00, 0x00, 0x03]);
/// ```
pub fn encode_type_bit_maps(codes: impl IntoIterator<Item = u16>) -> Vec<u8> {
    let mut windows: BTreeMap<u8, Vec<u8>> = BTreeMap::new();

    // collect the bitmaps
    for code in codes {
        let [window, low] = code.to_be_bytes();
        let bit_map = windows.entry(window).or_default();

        let index = (low / 8) as usize;
        if bit_map.len() < index + 1 {
            bit_map.resize(index + 1, 0_u8);
        }
        bit_map[index] |= 0b1000_0000 >> (low % 8);
    }

    let mut bytes = Vec::new();
    for (window, bit_map) in windows {
        bytes.push(window);
        // at most 32 bytes, low / 8 + 1
        bytes.push(bit_map.len() as u8);
        bytes.extend_from_slice(&bit_map);
    }

    bytes
}

/// Decodes windowed bit maps into type codes, in ascending order
///
/// Windows must be strictly ascending, a repeated window is as malformed as one out of order,
/// and each map holds 1 to 32 bytes within the input.
pub fn decode_type_bit_maps(mut bytes: &[u8]) -> DecodeResult<Vec<u16>> {
    // 3.2.1.  Type Bit Maps Encoding
    //
    //  The RR type space is split into 256 window blocks, each representing
    //  the low-order 8 bits of the 16-bit RR type space.  Each block that
    //  has at least one active RR type is encoded using a single octet
    //  window number (from 0 to 255), a single octet bitmap length (from 1
    //  to 32) indicating the number of octets used for the bitmap of the
    //  window block, and up to 32 octets (256 bits) of bitmap.
    //
    //  Blocks are present in the NSEC3 RR RDATA in increasing numerical
    //  order.
    //
    //     Type Bit Maps Field = ( Window Block # | Bitmap Length | Bitmap )+
    let mut codes = Vec::new();
    let mut previous: Option<u8> = None;

    while let Some((&window, rest)) = bytes.split_first() {
        if let Some(previous) = previous.filter(|p| *p >= window) {
            return Err(DecodeError::BitMapWindowOutOfOrder { previous, window });
        }
        previous = Some(window);

        let (&len, rest) = rest.split_first().ok_or(DecodeError::InsufficientBytes)?;
        if len == 0 || len > 32 || len as usize > rest.len() {
            return Err(DecodeError::BitMapLengthInvalid { window, len });
        }

        let (bit_map, rest) = rest.split_at(len as usize);
        for (i, byte) in bit_map.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0b1000_0000 >> bit) != 0 {
                    codes.push(u16::from_be_bytes([window, (i * 8 + bit) as u8]));
                }
            }
        }

        bytes = rest;
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[rustfmt::skip]
    fn test_encode_windows() {
        let bytes = encode_type_bit_maps([1, 2, 6, 1234, 65535]);
        assert_eq!(
            bytes,
            [
                0x00, 1, 0b0110_0010, // A, NS, SOA
                0x04, 27, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0b0010_0000, // 1234 = 0x04D2, 0xD2 = 210 = 26 * 8 + 2
                0xFF, 32, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0b0000_0001,
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let codes = vec![0, 1, 7, 8, 255, 256, 4096, 32768, 65534, 65535];
        assert_eq!(decode_type_bit_maps(&encode_type_bit_maps(codes.clone())).unwrap(), codes);

        assert!(encode_type_bit_maps([]).is_empty());
        assert!(decode_type_bit_maps(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_order_windows() {
        let mut bytes = encode_type_bit_maps([256]);
        bytes.extend(encode_type_bit_maps([1]));
        assert_eq!(
            decode_type_bit_maps(&bytes).unwrap_err(),
            DecodeError::BitMapWindowOutOfOrder {
                previous: 1,
                window: 0
            }
        );
    }

    #[test]
    fn test_duplicate_window() {
        let bytes = [0, 1, 0x40, 0, 1, 0x20];
        assert!(matches!(
            decode_type_bit_maps(&bytes),
            Err(DecodeError::BitMapWindowOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_bad_lengths() {
        // past the end
        assert_eq!(
            decode_type_bit_maps(&[0, 3, 0x40]).unwrap_err(),
            DecodeError::BitMapLengthInvalid { window: 0, len: 3 }
        );
        // empty map
        assert!(decode_type_bit_maps(&[0, 0]).is_err());
        // missing length
        assert_eq!(
            decode_type_bit_maps(&[0]).unwrap_err(),
            DecodeError::InsufficientBytes
        );
    }

    #[test]
    fn test_record_type_set() {
        let set = RecordTypeSet::new([RecordType::NSEC, RecordType::A, RecordType::RRSIG]);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![RecordType::A, RecordType::RRSIG, RecordType::NSEC]
        );

        let mut buf = [0_u8; 64];
        let mut encoder = BinEncoder::new(&mut buf[..]);
        set.emit(&mut encoder).unwrap();
        let len = encoder.finish();

        let mut decoder = BinDecoder::new(&buf[..len]);
        let read = RecordTypeSet::read(&mut decoder, Restrict::new(len)).unwrap();
        assert_eq!(read, set);
        assert!(read.contains(RecordType::RRSIG));
    }
}
