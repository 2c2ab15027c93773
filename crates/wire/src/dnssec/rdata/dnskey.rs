// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! public key record data for signing zone records

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::BASE64;

use crate::error::{DecodeError, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict, RestrictedMath};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-2)
///
/// ```text
/// 2.1.  DNSKEY RDATA Wire Format
///
///    The RDATA for a DNSKEY RR consists of a 2 octet Flags Field, a 1
///    octet Protocol Field, a 1 octet Algorithm Field, and the Public Key
///    Field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |              Flags            |    Protocol   |   Algorithm   |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Public Key                         /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Flags and protocol are kept as read, so that a key re-encodes to the bytes it was signed
/// over.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DNSKEY {
    flags: u16,
    protocol: u8,
    algorithm: u8,
    public_key: Vec<u8>,
}

impl DNSKEY {
    /// Construct a new DNSKey RData, with protocol 3
    ///
    /// # Arguments
    ///
    /// * `flags` - the flags field, 256 for a zone key, 257 for a zone key which is also a secure
    ///   entry point
    /// * `algorithm` - number of the algorithm the key is used with
    /// * `public_key` - the public key material, in the algorithm's wire format
    pub fn new(flags: u16, algorithm: u8, public_key: Vec<u8>) -> Self {
        Self::with_protocol(flags, 3, algorithm, public_key)
    }

    /// Construct a key with any protocol field
    pub fn with_protocol(flags: u16, protocol: u8, algorithm: u8, public_key: Vec<u8>) -> Self {
        Self {
            flags,
            protocol,
            algorithm,
            public_key,
        }
    }

    /// The raw flags field
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-2.1.1)
    ///
    /// ```text
    /// 2.1.1.  The Flags Field
    ///
    ///    Bit 7 of the Flags field is the Zone Key flag.  If bit 7 has value 1,
    ///    then the DNSKEY record holds a DNS zone key, and the DNSKEY RR's
    ///    owner name MUST be the name of a zone.  If bit 7 has value 0, then
    ///    the DNSKEY record holds some other type of DNS public key and MUST
    ///    NOT be used to verify RRSIGs that cover RRsets.
    /// ```
    pub fn zone_key(&self) -> bool {
        self.flags & 0b0000_0001_0000_0000 != 0
    }

    /// ```text
    ///    Bit 15 of the Flags field is the Secure Entry Point flag, described
    ///    in [RFC3757].
    /// ```
    pub fn secure_entry_point(&self) -> bool {
        self.flags & 0b0000_0000_0000_0001 != 0
    }

    /// [RFC 5011, Trust Anchor Update, September 2007](https://tools.ietf.org/html/rfc5011#section-3)
    ///
    /// ```text
    ///    This document defines a new DNSKEY flag, the REVOKE bit (8).
    /// ```
    pub fn revoke(&self) -> bool {
        self.flags & 0b0000_0000_1000_0000 != 0
    }

    /// The protocol field, always 3 for keys valid for DNSSEC
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// The algorithm number
    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// The public key material
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#appendix-B)
    ///
    /// ```text
    /// Appendix B.  Key Tag Calculation
    ///
    ///    The Key Tag field in the RRSIG and DS resource record types provides
    ///    a mechanism for selecting a public key efficiently.
    /// ```
    ///
    /// The checksum over the rdata, not valid for the deprecated algorithm 1.
    pub fn calculate_key_tag(&self) -> u16 {
        let mut ac: u32 = 0;
        let header = [
            (self.flags >> 8) as u8,
            self.flags as u8,
            self.protocol,
            self.algorithm,
        ];
        for (i, k) in header.iter().chain(self.public_key.iter()).enumerate() {
            ac += u32::from(*k) << if i & 0x01 != 0 { 0 } else { 8 };
        }
        ac += ac >> 16;
        (ac & 0xFFFF) as u16
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<DNSKEY> {
    //    Bits 0-6 and 8-14 are reserved: these bits MUST have value 0 upon
    //    creation of the DNSKEY RR and MUST be ignored upon receipt.
    let flags: u16 = decoder.read_u16()?.unverified(/*used as a bitfield, this is safe*/);
    let protocol = decoder.read_u8()?.unverified(/*checked at verification*/);
    let algorithm = decoder.read_u8()?.unverified(/*any algorithm number is carried*/);

    // the public key is the left-over bytes minus 4 for the first fields
    let rdata_length = rdata_length.map(|u| u as usize);
    let key_len = rdata_length
        .checked_sub(4)
        .map_err(|needed| DecodeError::RDataTooShort {
            record_type: RecordType::DNSKEY,
            needed,
            len: rdata_length.unverified(/*only reported*/),
        })?
        .unverified(/*used only as length safely*/);
    let public_key: Vec<u8> =
        decoder.read_vec(key_len)?.unverified(/*the byte array will fail in usage if invalid*/);

    Ok(DNSKEY::with_protocol(flags, protocol, algorithm, public_key))
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, rdata: &DNSKEY) -> ProtoResult<()> {
    encoder.emit_u16(rdata.flags())?;
    encoder.emit(rdata.protocol())?;
    encoder.emit(rdata.algorithm())?;
    encoder.emit_vec(rdata.public_key())?;

    Ok(())
}

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-2.2)
///
/// ```text
/// 2.3.  DNSKEY RR Example
///
///    The following DNSKEY RR stores a DNS zone key for example.com.
///
///    example.com. 86400 IN DNSKEY 256 3 5 ( AQPSKmynfzW4kyBv015MUG2DeIQ3
///                                           Cbl+BBZH4b/0PY1kxkmvHjcZc8no
///                                           kfzj31GajIQKY+5CptLr3buXA10h
///                                           WqTkF7H6RfoRqXQeogmMHfpftf6z
///                                           Mv1LyBUgia7za6ZEzOJBOztyvhjL
///                                           742iU/TpPSEDhm2SNKLijfUppn1U
///                                           aNvv4w==  )
/// ```
impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{flags} {protocol} {alg} {key}",
            flags = self.flags,
            protocol = self.protocol,
            alg = self.algorithm,
            key = BASE64.encode(&self.public_key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = DNSKEY::new(257, 8, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(rdata.zone_key());
        assert!(rdata.secure_entry_point());
        assert!(!rdata.revoke());

        let mut bytes = [0_u8; 32];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        assert!(emit(&mut encoder, &rdata).is_ok());
        let len = encoder.finish();
        assert_eq!(&bytes[..4], &[0x01, 0x01, 3, 8]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let restrict = Restrict::new(len as u16);
        let read_rdata = read(&mut decoder, restrict).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(read_rdata.to_string(), "257 3 8 AAECAwQFBgc=");
    }

    #[test]
    fn test_calculate_key_tag_checksum() {
        // 0x0100 + 0x0308 + 0x0102 + 0x0304 = 0x080E
        let rdata = DNSKEY::new(256, 8, vec![1, 2, 3, 4]);
        assert_eq!(rdata.calculate_key_tag(), 0x080E);

        // the carry is folded back in
        let rdata = DNSKEY::new(0xFFFF, 0xFF, vec![0xFF; 4]);
        let sum: u32 = 0xFFFF + 0x03FF + 0xFFFF + 0xFFFF;
        assert_eq!(
            rdata.calculate_key_tag(),
            ((sum + (sum >> 16)) & 0xFFFF) as u16
        );
    }
}
