// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! parameters used for the nsec3 hash method

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::HEXUPPER;

use crate::error::ProtoResult;
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict};

/// [RFC 5155, NSEC3, March 2008](https://tools.ietf.org/html/rfc5155#section-4)
///
/// ```text
/// 4.2.  NSEC3PARAM RDATA Wire Format
///
///  The RDATA of the NSEC3PARAM RR is as shown below:
///
///                       1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |   Hash Alg.   |     Flags     |          Iterations           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |  Salt Length  |                     Salt                      /
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
///  Hash Algorithm is a single octet.
///
///  Flags field is a single octet.
///
///  Iterations is represented as a 16-bit unsigned integer, with the most
///  significant bit first.
///
///  Salt Length is represented as an unsigned octet.  Salt Length
///  represents the length of the following Salt field in octets.  If the
///  value is zero, the Salt field is omitted.
///
///  Salt, if present, is encoded as a sequence of binary octets.  The
///  length of this field is determined by the preceding Salt Length
///  field.
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct NSEC3PARAM {
    hash_algorithm: u8,
    flags: u8,
    iterations: u16,
    salt: Vec<u8>,
}

impl NSEC3PARAM {
    /// Constructs a new NSEC3PARAM RData for use in a Resource Record
    pub fn new(hash_algorithm: u8, flags: u8, iterations: u16, salt: Vec<u8>) -> Self {
        Self {
            hash_algorithm,
            flags,
            iterations,
            salt,
        }
    }

    /// [RFC 5155, NSEC3, March 2008](https://tools.ietf.org/html/rfc5155#section-4.1.1)
    ///
    /// ```text
    /// 4.1.1.  Hash Algorithm
    ///
    ///    The Hash Algorithm field identifies the cryptographic hash algorithm
    ///    used to construct the hash-value.
    /// ```
    pub fn hash_algorithm(&self) -> u8 {
        self.hash_algorithm
    }

    /// ```text
    /// 4.1.2.  Flag Fields
    ///
    ///    The Opt-Out flag is not used and is set to zero.
    /// ```
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// ```text
    /// 4.1.3.  Iterations
    ///
    ///    The Iterations field defines the number of additional times the hash
    ///    is performed.
    /// ```
    pub fn iterations(&self) -> u16 {
        self.iterations
    }

    /// ```text
    /// 4.1.5.  Salt
    ///
    ///    The Salt field is appended to the original owner name before hashing.
    /// ```
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<NSEC3PARAM> {
    let hash_algorithm = decoder.read_u8()?.unverified(/*any algorithm number is carried*/);
    let flags: u8 = decoder.read_u8()?.unverified(/*reserved flags are carried*/);
    let iterations: u16 = decoder.read_u16()?.unverified(/*valid as any u16*/);
    let salt: Vec<u8> = decoder
        .read_character_data()?
        .unverified(/*valid as any array of u8*/)
        .to_vec();

    Ok(NSEC3PARAM::new(hash_algorithm, flags, iterations, salt))
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, rdata: &NSEC3PARAM) -> ProtoResult<()> {
    encoder.emit(rdata.hash_algorithm)?;
    encoder.emit(rdata.flags)?;
    encoder.emit_u16(rdata.iterations)?;
    encoder.emit_character_data(&rdata.salt)?;

    Ok(())
}

/// [RFC 5155](https://tools.ietf.org/html/rfc5155#section-4.3), NSEC3, March 2008
///
/// ```text
/// 4.4.  NSEC3PARAM RR Example
///
///    example.com. NSEC3PARAM 1 0 12 aabbccdd
/// ```
impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let salt = if self.salt.is_empty() {
            "-".to_string()
        } else {
            HEXUPPER.encode(&self.salt)
        };

        write!(
            f,
            "{alg} {flags} {iterations} {salt}",
            alg = self.hash_algorithm,
            flags = self.flags,
            iterations = self.iterations,
            salt = salt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = NSEC3PARAM::new(1, 0, 12, vec![0xAA, 0xBB, 0xCC, 0xDD]);

        let mut bytes = [0_u8; 16];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        assert!(emit(&mut encoder, &rdata).is_ok());
        let len = encoder.finish();
        assert_eq!(&bytes[..len], &[1, 0, 0, 12, 4, 0xAA, 0xBB, 0xCC, 0xDD]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let restrict = Restrict::new(len as u16);
        let read_rdata = read(&mut decoder, restrict).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(read_rdata.to_string(), "1 0 12 AABBCCDD");
    }
}
