// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! pointer record from parent zone to child zone for dnskey proof

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::HEXUPPER;

use crate::error::{DecodeError, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict, RestrictedMath};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-5)
///
/// ```text
/// 5.1.  DS RDATA Wire Format
///
///    The RDATA for a DS RR consists of a 2 octet Key Tag field, a 1 octet
///           Algorithm field, a 1 octet Digest Type field, and a Digest field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |           Key Tag             |  Algorithm    |  Digest Type  |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Digest                             /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DS {
    key_tag: u16,
    algorithm: u8,
    digest_type: u8,
    digest: Vec<u8>,
}

impl DS {
    /// Constructs a new DS RData
    ///
    /// # Arguments
    ///
    /// * `key_tag` - the key_tag associated to the DNSKEY
    /// * `algorithm` - algorithm as specified in the DNSKEY
    /// * `digest_type` - hash algorithm used to validate the DNSKEY
    /// * `digest` - hash of the DNSKEY
    ///
    /// # Returns
    ///
    /// the DS RDATA for use in a Resource Record
    pub fn new(key_tag: u16, algorithm: u8, digest_type: u8, digest: Vec<u8>) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest,
        }
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-5.1.1)
    ///
    /// ```text
    /// 5.1.1.  The Key Tag Field
    ///
    ///    The Key Tag field lists the key tag of the DNSKEY RR referred to by
    ///    the DS record, in network byte order.
    /// ```
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// ```text
    /// 5.1.2.  The Algorithm Field
    ///
    ///    The Algorithm field lists the algorithm number of the DNSKEY RR
    ///    referred to by the DS record.
    /// ```
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// ```text
    /// 5.1.3.  The Digest Type Field
    ///
    ///    The DS RR refers to a DNSKEY RR by including a digest of that DNSKEY
    ///    RR.  The Digest Type field identifies the algorithm used to construct
    ///    the digest.
    /// ```
    pub fn digest_type(&self) -> u8 {
        self.digest_type
    }

    /// ```text
    /// 5.1.4.  The Digest Field
    ///
    ///    The DS record refers to a DNSKEY RR by including a digest of that
    ///    DNSKEY RR.
    /// ```
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<DS> {
    let start_idx = decoder.offset();

    let key_tag: u16 = decoder.read_u16()?.unverified(/*key_tag is valid as any u16*/);
    let algorithm = decoder.read_u8()?.unverified(/*any algorithm number is carried*/);
    let digest_type = decoder.read_u8()?.unverified(/*any digest type is carried*/);

    let bytes_read = decoder.offset() - start_idx;
    let rdata_length = rdata_length.map(|u| u as usize);
    let left: usize = rdata_length
        .checked_sub(bytes_read)
        .map_err(|needed| DecodeError::RDataTooShort {
            record_type: RecordType::DS,
            needed,
            len: rdata_length.unverified(/*only reported*/),
        })?
        .unverified(/*used only as length safely*/);
    let digest =
        decoder.read_vec(left)?.unverified(/*the byte array will fail in usage if invalid*/);

    Ok(DS::new(key_tag, algorithm, digest_type, digest))
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, rdata: &DS) -> ProtoResult<()> {
    encoder.emit_u16(rdata.key_tag())?;
    encoder.emit(rdata.algorithm())?;
    encoder.emit(rdata.digest_type())?;
    encoder.emit_vec(rdata.digest())?;

    Ok(())
}

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-5.3)
///
/// ```text
/// 5.3.  The DS RR Presentation Format
///
///    The presentation format of the RDATA portion is as follows:
///
///    The Key Tag field MUST be represented as an unsigned decimal integer.
///
///    The Algorithm field MUST be represented either as an unsigned decimal
///    integer or as an algorithm mnemonic specified in Appendix A.1.
///
///    The Digest Type field MUST be represented as an unsigned decimal
///    integer.
///
///    The Digest MUST be represented as a sequence of case-insensitive
///    hexadecimal digits.  Whitespace is allowed within the hexadecimal
///    text.
/// ```
impl Display for DS {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{tag} {alg} {ty} {digest}",
            tag = self.key_tag,
            alg = self.algorithm,
            ty = self.digest_type,
            digest = HEXUPPER.encode(&self.digest)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = DS::new(0xF00F, 13, 2, vec![5, 6, 7, 8]);

        let mut bytes = [0_u8; 16];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        assert!(emit(&mut encoder, &rdata).is_ok());
        let len = encoder.finish();
        assert_eq!(&bytes[..len], &[0xF0, 0x0F, 13, 2, 5, 6, 7, 8]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let restrict = Restrict::new(len as u16);
        let read_rdata = read(&mut decoder, restrict).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(read_rdata.to_string(), "61455 13 2 05060708");
    }

    #[test]
    fn test_length_shorter_than_fixed_fields() {
        let mut decoder = BinDecoder::new(&[0xF0, 0x0F, 13, 2]);
        let err = read(&mut decoder, Restrict::new(3)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::RDataTooShort {
                record_type: RecordType::DS,
                needed: 4,
                len: 3,
            })
        );
    }
}
