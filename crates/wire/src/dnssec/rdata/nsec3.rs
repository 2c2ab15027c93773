// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! hashed negative cache proof for non-existence

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::{BASE32_DNSSEC, HEXUPPER};

use crate::error::{DecodeError, ProtoResult};
use crate::rr::{RecordType, RecordTypeSet};
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict, RestrictedMath};

/// [RFC 5155, NSEC3, March 2008](https://tools.ietf.org/html/rfc5155#section-3)
///
/// ```text
/// 3.2.  NSEC3 RDATA Wire Format
///
///  The RDATA of the NSEC3 RR is as shown below:
///
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |   Hash Alg.   |     Flags     |          Iterations           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Salt Length  |                     Salt                      /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Hash Length  |             Next Hashed Owner Name            /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  /                         Type Bit Maps                         /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
///  Hash Algorithm is a single octet.
///
///  Flags field is a single octet, the Opt-Out flag is the least
///  significant bit, as shown below:
///
///   0 1 2 3 4 5 6 7
///  +-+-+-+-+-+-+-+-+
///  |             |O|
///  +-+-+-+-+-+-+-+-+
///
///  Iterations is represented as a 16-bit unsigned integer, with the most
///  significant bit first.
///
///  Salt Length is represented as an unsigned octet.  Salt Length
///  represents the length of the Salt field in octets.  If the value is
///  zero, the following Salt field is omitted.
///
///  Salt, if present, is encoded as a sequence of binary octets.  The
///  length of this field is determined by the preceding Salt Length
///  field.
///
///  Hash Length is represented as an unsigned octet.  Hash Length
///  represents the length of the Next Hashed Owner Name field in octets.
///
///  The next hashed owner name is not base32 encoded, unlike the owner
///  name of the NSEC3 RR.  It is the unmodified binary hash value.  It
///  does not include the name of the containing zone.  The length of this
///  field is determined by the preceding Hash Length field.
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct NSEC3 {
    hash_algorithm: u8,
    flags: u8,
    iterations: u16,
    salt: Vec<u8>,
    next_hashed_owner_name: Vec<u8>,
    type_bit_maps: RecordTypeSet,
}

impl NSEC3 {
    /// Constructs a new NSEC3 record
    pub fn new(
        hash_algorithm: u8,
        opt_out: bool,
        iterations: u16,
        salt: Vec<u8>,
        next_hashed_owner_name: Vec<u8>,
        type_bit_maps: impl IntoIterator<Item = RecordType>,
    ) -> Self {
        Self::with_flags(
            hash_algorithm,
            u8::from(opt_out),
            iterations,
            salt,
            next_hashed_owner_name,
            RecordTypeSet::new(type_bit_maps),
        )
    }

    /// Constructs a new NSEC3 record with any flags field
    pub fn with_flags(
        hash_algorithm: u8,
        flags: u8,
        iterations: u16,
        salt: Vec<u8>,
        next_hashed_owner_name: Vec<u8>,
        type_bit_maps: RecordTypeSet,
    ) -> Self {
        Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed_owner_name,
            type_bit_maps,
        }
    }

    /// ```text
    /// 3.1.1.  Hash Algorithm
    ///
    ///    The Hash Algorithm field identifies the cryptographic hash algorithm
    ///    used to construct the hash-value.
    ///
    ///    The values for this field are defined in the NSEC3 hash algorithm
    ///    registry defined in Section 11.
    /// ```
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// The raw flags field, reserved bits included
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// ```text
    /// 3.1.2.1.  Opt-Out Flag
    ///
    ///    If the Opt-Out flag is set, the NSEC3 record covers zero or more
    ///    unsigned delegations.
    /// ```
    pub fn opt_out(&self) -> bool {
        self.flags & 0b0000_0001 != 0
    }

    /// ```text
    /// 3.1.3.  Iterations
    ///
    ///    The Iterations field defines the number of additional times the hash
    ///    function has been performed.
    /// ```
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// ```text
    /// 3.1.5.  Salt
    ///
    ///    The Salt field is appended to the original owner name before hashing
    ///    in order to defend against pre-calculated dictionary attacks.
    /// ```
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// ```text
    /// 3.1.7.  Next Hashed Owner Name
    ///
    ///  The Next Hashed Owner Name field contains the next hashed owner name
    ///  in hash order.
    /// ```
    pub fn next_hashed_owner_name(&self) -> &[u8] {
        &self.next_hashed_owner_name
    }

    /// ```text
    /// 3.1.8.  Type Bit Maps
    ///
    ///  The Type Bit Maps field identifies the RRSet types that exist at the
    ///  original owner name of the NSEC3 RR.
    /// ```
    pub fn type_bit_maps(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.type_bit_maps.iter()
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<NSEC3> {
    let start_idx = decoder.offset();
    let length = rdata_length.map(|u| u as usize);
    let len = length.unverified(/*only compared against*/);

    let hash_algorithm = decoder.read_u8()?.unverified(/*any algorithm number is carried*/);
    let flags = decoder.read_u8()?.unverified(/*reserved flags are carried*/);
    let iterations: u16 = decoder.read_u16()?.unverified(/*valid as any u16*/);

    // read the salt
    let salt_len = decoder.read_u8()?.map(|u| u as usize);
    let salt_len = salt_len
        .verify_unwrap(|salt_len| decoder.offset() - start_idx + *salt_len <= len)
        .map_err(|salt_len| too_short(decoder.offset() - start_idx + salt_len, len))?;
    let salt: Vec<u8> =
        decoder.read_vec(salt_len)?.unverified(/*salt is any valid array of bytes*/);

    // read the hashed_owner_name
    let hash_len = decoder.read_u8()?.map(|u| u as usize);
    let hash_len = hash_len
        .verify_unwrap(|hash_len| decoder.offset() - start_idx + *hash_len <= len)
        .map_err(|hash_len| too_short(decoder.offset() - start_idx + hash_len, len))?;
    let next_hashed_owner_name: Vec<u8> =
        decoder.read_vec(hash_len)?.unverified(/*will fail in usage if invalid*/);

    // read the bitmap
    let bit_map_len = length
        .checked_sub(decoder.offset() - start_idx)
        .map_err(|needed| too_short(needed, len))?;
    let type_bit_maps = RecordTypeSet::read(decoder, bit_map_len)?;

    Ok(NSEC3::with_flags(
        hash_algorithm,
        flags,
        iterations,
        salt,
        next_hashed_owner_name,
        type_bit_maps,
    ))
}

fn too_short(needed: usize, len: usize) -> DecodeError {
    DecodeError::RDataTooShort {
        record_type: RecordType::NSEC3,
        needed,
        len,
    }
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, rdata: &NSEC3) -> ProtoResult<()> {
    encoder.emit(rdata.hash_algorithm)?;
    encoder.emit(rdata.flags)?;
    encoder.emit_u16(rdata.iterations)?;
    encoder.emit_character_data(&rdata.salt)?;
    encoder.emit_character_data(&rdata.next_hashed_owner_name)?;
    rdata.type_bit_maps.emit(encoder)
}

/// [RFC 5155](https://tools.ietf.org/html/rfc5155#section-3.3), NSEC3, March 2008
///
/// ```text
/// 3.3.  Presentation Format
///
///    The Salt field is represented as a sequence of case-insensitive
///    hexadecimal digits.  Whitespace is not allowed within the
///    sequence.  The Salt field is represented as "-" when the Salt Length
///    field has a value of 0.
///
///    The Next Hashed Owner Name field is represented as an unpadded
///    sequence of case-insensitive base32 digits, without whitespace.
/// ```
impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXUPPER.encode(&self.salt)
        };

        write!(
            f,
            "{alg} {flags} {iterations} {salt} {owner}",
            alg = self.hash_algorithm,
            flags = self.flags,
            iterations = self.iterations,
            salt = salt,
            owner = BASE32_DNSSEC.encode(&self.next_hashed_owner_name)
        )?;

        for ty in self.type_bit_maps.iter() {
            write!(f, " {ty}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = NSEC3::new(
            1,
            true,
            2,
            vec![0xAA, 0xBB],
            vec![5, 6, 7, 8],
            [RecordType::A, RecordType::AAAA, RecordType::RRSIG],
        );
        assert!(rdata.opt_out());

        let mut bytes = [0_u8; 64];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        assert!(emit(&mut encoder, &rdata).is_ok());
        let len = encoder.finish();
        assert_eq!(&bytes[..12], &[1, 1, 0, 2, 2, 0xAA, 0xBB, 4, 5, 6, 7, 8]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let restrict = Restrict::new(len as u16);
        let read_rdata = read(&mut decoder, restrict).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(read_rdata.to_string(), "1 1 2 AABB 0k30e20 A AAAA RRSIG");
    }

    #[test]
    fn test_salt_longer_than_rdata() {
        let bytes = [1, 0, 0, 0, 200, 0xAA];
        let mut decoder = BinDecoder::new(&bytes);
        let err = read(&mut decoder, Restrict::new(bytes.len() as u16)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::RDataTooShort {
                record_type: RecordType::NSEC3,
                needed: 205,
                len: 6,
            })
        );
    }
}
