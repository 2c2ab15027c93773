// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! TLSA records for storing TLS certificate validation information

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::HEXUPPER;

use crate::error::{DecodeError, ProtoResult};
use crate::rr::RecordType;
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict, RestrictedMath};

/// [RFC 6698, DNS-Based Authentication for TLS](https://tools.ietf.org/html/rfc6698#section-2.1)
///
/// ```text
/// 2.1.  TLSA RDATA Wire Format
///
///    The RDATA for a TLSA RR consists of a one-octet certificate usage
///    field, a one-octet selector field, a one-octet matching type field,
///    and the certificate association data field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |  Cert. Usage  |   Selector    | Matching Type |               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+               /
///    /                                                               /
///    /                 Certificate Association Data                  /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The three one-octet fields are carried as plain numbers, their registries are not
/// interpreted here.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TLSA {
    cert_usage: u8,
    selector: u8,
    matching: u8,
    cert_data: Vec<u8>,
}

impl TLSA {
    /// Constructs a new TLSA
    ///
    /// [RFC 6698, DNS-Based Authentication for TLS](https://tools.ietf.org/html/rfc6698#section-2.1)
    pub fn new(cert_usage: u8, selector: u8, matching: u8, cert_data: Vec<u8>) -> Self {
        Self {
            cert_usage,
            selector,
            matching,
            cert_data,
        }
    }

    /// Specifies the provided association that will be used to match the certificate presented
    /// in the TLS handshake
    pub fn cert_usage(&self) -> u8 {
        self.cert_usage
    }

    /// Specifies which part of the TLS certificate presented by the server will be matched
    /// against the association data
    pub fn selector(&self) -> u8 {
        self.selector
    }

    /// Specifies how the certificate association is presented
    pub fn matching(&self) -> u8 {
        self.matching
    }

    /// Binary data for validating the cert, see other members to understand format
    pub fn cert_data(&self) -> &[u8] {
        &self.cert_data
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<TLSA> {
    let cert_usage = decoder.read_u8()?.unverified(/*any u8 is valid*/);
    let selector = decoder.read_u8()?.unverified(/*any u8 is valid*/);
    let matching = decoder.read_u8()?.unverified(/*any u8 is valid*/);

    // the remaining data is for the cert
    let rdata_length = rdata_length.map(|u| u as usize);
    let cert_len = rdata_length
        .checked_sub(3)
        .map_err(|needed| DecodeError::RDataTooShort {
            record_type: RecordType::TLSA,
            needed,
            len: rdata_length.unverified(/*only reported*/),
        })?
        .unverified(/*used purely as length safely*/);
    let cert_data = decoder.read_vec(cert_len)?.unverified(/*will fail in usage if invalid*/);

    Ok(TLSA {
        cert_usage,
        selector,
        matching,
        cert_data,
    })
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, tlsa: &TLSA) -> ProtoResult<()> {
    encoder.emit_u8(tlsa.cert_usage)?;
    encoder.emit_u8(tlsa.selector)?;
    encoder.emit_u8(tlsa.matching)?;
    encoder.emit_vec(&tlsa.cert_data)?;
    Ok(())
}

/// [RFC 6698, DNS-Based Authentication for TLS](https://tools.ietf.org/html/rfc6698#section-2.2)
///
/// ```text
/// 2.3.  TLSA RR Examples
///
///    In the following examples, the domain name is formed using the rules
///    in Section 3.
///
///    An example of a hashed (SHA-256) association of a PKIX CA
///    certificate:
///
///    _443._tcp.www.example.com. IN TLSA (
///       0 0 1 d2abde240d7cd3ee6b4b28c54df034b9
///             7983a1d16e8a410e4561cb106618e971 )
/// ```
impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{usage} {selector} {matching} {cert}",
            usage = self.cert_usage,
            selector = self.selector,
            matching = self.matching,
            cert = HEXUPPER.encode(&self.cert_data),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = TLSA::new(3, 1, 1, vec![0xD2, 0xAB, 0xDE, 0x24]);

        let mut bytes = [0_u8; 16];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        emit(&mut encoder, &rdata).unwrap();
        let len = encoder.finish();
        assert_eq!(&bytes[..len], &[3, 1, 1, 0xD2, 0xAB, 0xDE, 0x24]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let read_rdata = read(&mut decoder, Restrict::new(len as u16)).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(read_rdata.to_string(), "3 1 1 D2ABDE24");
    }

    #[test]
    fn test_rdata_shorter_than_fixed_fields() {
        let mut decoder = BinDecoder::new(&[0, 0, 0, 0]);
        let err = read(&mut decoder, Restrict::new(2)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::RDataTooShort {
                record_type: RecordType::TLSA,
                needed: 3,
                len: 2,
            })
        );
    }
}
