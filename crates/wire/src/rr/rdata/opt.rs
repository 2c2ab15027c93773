/*
 * Copyright (C) 2015 Benjamin Fry <benjaminfry@me.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! option record for passing protocol options between the client and server

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::HEXUPPER;

use crate::error::{DecodeError, ProtoError, ProtoResult};
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict};

/// The OPT record type is used for ExtendedDNS records.
///
/// These allow for additional information to be associated with the DNS request that otherwise
/// would require changes to the DNS protocol.
///
/// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6)
///
/// ```text
/// 6.1.2.  Wire Format
///
///        The variable part of an OPT RR may contain zero or more options in
///        the RDATA.  Each option MUST be treated as a bit field.  Each option
///        is encoded as:
///
///                   +0 (MSB)                            +1 (LSB)
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     0: |                          OPTION-CODE                          |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     2: |                         OPTION-LENGTH                         |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     4: |                                                               |
///        /                          OPTION-DATA                          /
///        /                                                               /
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///
///        OPTION-CODE
///           Assigned by the Expert Review process as defined by the DNSEXT
///           working group and the IESG.
///
///        OPTION-LENGTH
///           Size (in octets) of OPTION-DATA.
///
///        OPTION-DATA
///           Varies per OPTION-CODE.  MUST be treated as a bit field.
///
///        The order of appearance of option tuples is not defined.  If one
///        option modifies the behaviour of another or multiple options are
///        related to one another in some way, they have the same effect
///        regardless of ordering in the RDATA wire encoding.
/// ```
///
/// Options keep the order they were read or added in, repeated codes included.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Default, Debug, PartialEq, Eq, Hash, Clone)]
pub struct OPT {
    options: Vec<EdnsOption>,
}

impl OPT {
    /// Creates a new OPT record data.
    ///
    /// # Arguments
    ///
    /// * `options` - the options in wire order
    ///
    /// # Return value
    ///
    /// The newly created OPT data
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self { options }
    }

    /// The options in wire order
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    /// The first option with the given code
    pub fn get(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.iter().find(|option| option.code == code)
    }

    /// Appends an option
    pub fn insert(&mut self, option: EdnsOption) {
        self.options.push(option);
    }

    /// Consumes the record data, returning the options
    pub fn into_options(self) -> Vec<EdnsOption> {
        self.options
    }
}

/// Read the RData from the given Decoder
///
/// The options must fill the rdata exactly.
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<OPT> {
    let mut options = Vec::new();
    let start_idx = decoder.offset();

    // There is no unsafe direct use of the rdata length after this point
    let rdata_length =
        rdata_length.map(|u| u as usize).unverified(/*rdata length usage is bounded*/);
    while rdata_length > decoder.offset() - start_idx {
        let code = EdnsCode::from(decoder.read_u16()?.unverified(/*EdnsCode is verified as safe*/));
        let remaining = rdata_length.saturating_sub(decoder.offset() - start_idx + 2);
        let length = decoder
            .read_u16()?
            .map(|u| u as usize)
            .verify_unwrap(|u| *u <= remaining)
            .map_err(|len| DecodeError::EdnsOptionLengthExceedsRData {
                code: code.into(),
                len,
                remaining,
            })?;

        let data = decoder.read_vec(length)?.unverified(/*option data is opaque*/);
        options.push(EdnsOption { code, data });
    }

    Ok(OPT::new(options))
}

/// Write the RData from the given Decoder
pub fn emit(encoder: &mut BinEncoder<'_>, opt: &OPT) -> ProtoResult<()> {
    for option in opt.options() {
        encoder.emit_u16(u16::from(option.code))?;
        encoder.emit_u16(option.len()?)?;
        encoder.emit_vec(&option.data)?;
    }

    Ok(())
}

impl fmt::Display for OPT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{option}")?;
        }

        Ok(())
    }
}

/// The code of the EDNS data option
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Hash, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EdnsCode {
    /// [RFC 6891, Reserved](https://tools.ietf.org/html/rfc6891)
    Zero,

    /// [RFC 8764l, Apple's Long-Lived Queries, Optional](https://tools.ietf.org/html/rfc8764)
    LLQ,

    /// [UL On-hold](http://files.dns-sd.org/draft-sekar-dns-ul.txt)
    UL,

    /// [RFC 5001, NSID](https://tools.ietf.org/html/rfc5001)
    NSID,
    // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
    /// [RFC 6975, DNSSEC Algorithm Understood](https://tools.ietf.org/html/rfc6975)
    DAU,

    /// [RFC 6975, DS Hash Understood](https://tools.ietf.org/html/rfc6975)
    DHU,

    /// [RFC 6975, NSEC3 Hash Understood](https://tools.ietf.org/html/rfc6975)
    N3U,

    /// [RFC 7871, Client Subnet, Optional](https://tools.ietf.org/html/rfc7871)
    Subnet,

    /// [RFC 7314, EDNS EXPIRE, Optional](https://tools.ietf.org/html/rfc7314)
    Expire,

    /// [RFC 7873, DNS Cookies](https://tools.ietf.org/html/rfc7873)
    Cookie,

    /// [RFC 7828, edns-tcp-keepalive](https://tools.ietf.org/html/rfc7828)
    Keepalive,

    /// [RFC 7830, The EDNS(0) Padding](https://tools.ietf.org/html/rfc7830)
    Padding,

    /// [RFC 7901, CHAIN Query Requests in DNS, Optional](https://tools.ietf.org/html/rfc7901)
    Chain,

    /// Unknown, used to deal with unknown or unsupported codes
    Unknown(u16),
}

impl From<u16> for EdnsCode {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Zero,
            1 => Self::LLQ,
            2 => Self::UL,
            3 => Self::NSID,
            // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
            5 => Self::DAU,
            6 => Self::DHU,
            7 => Self::N3U,
            8 => Self::Subnet,
            9 => Self::Expire,
            10 => Self::Cookie,
            11 => Self::Keepalive,
            12 => Self::Padding,
            13 => Self::Chain,
            _ => Self::Unknown(value),
        }
    }
}

impl From<EdnsCode> for u16 {
    fn from(value: EdnsCode) -> Self {
        match value {
            EdnsCode::Zero => 0,
            EdnsCode::LLQ => 1,
            EdnsCode::UL => 2,
            EdnsCode::NSID => 3,
            // 4 Reserved [draft-cheshire-edns0-owner-option] -EXPIRED-
            EdnsCode::DAU => 5,
            EdnsCode::DHU => 6,
            EdnsCode::N3U => 7,
            EdnsCode::Subnet => 8,
            EdnsCode::Expire => 9,
            EdnsCode::Cookie => 10,
            EdnsCode::Keepalive => 11,
            EdnsCode::Padding => 12,
            EdnsCode::Chain => 13,
            EdnsCode::Unknown(value) => value,
        }
    }
}

/// One `(code, data)` option of the OPT record, the data is kept opaque
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct EdnsOption {
    /// The option code
    pub code: EdnsCode,
    /// The option data, at most 65535 bytes
    pub data: Vec<u8>,
}

impl EdnsOption {
    /// Constructs a new option
    pub fn new(code: impl Into<EdnsCode>, data: Vec<u8>) -> Self {
        Self {
            code: code.into(),
            data,
        }
    }

    /// Returns the length in bytes of the EdnsOption
    pub fn len(&self) -> ProtoResult<u16> {
        u16::try_from(self.data.len())
            .map_err(|_| ProtoError::from("EDNS option data exceeds 65535 bytes"))
    }

    /// Returns `true` if the length in bytes of the EdnsOption is 0
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for EdnsOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{code}:{data}",
            code = u16::from(self.code),
            data = HEXUPPER.encode(&self.data)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = OPT::new(vec![
            EdnsOption::new(EdnsCode::Cookie, vec![1, 2, 3, 4, 5, 6, 7, 8]),
            EdnsOption::new(EdnsCode::Padding, vec![]),
            EdnsOption::new(EdnsCode::Cookie, vec![9]),
        ]);

        let mut bytes = [0_u8; 64];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        emit(&mut encoder, &rdata).unwrap();
        let len = encoder.finish();
        assert_eq!(len, 12 + 4 + 5);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let read_rdata = read(&mut decoder, Restrict::new(len as u16)).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(
            read_rdata.get(EdnsCode::Cookie).map(|o| o.data.len()),
            Some(8)
        );
    }

    #[test]
    fn test_read_empty_option_at_end() {
        let bytes: Vec<u8> = vec![0x00, 0x0a, 0x00, 0x00];
        let mut decoder = BinDecoder::new(&bytes);
        let read_rdata = read(&mut decoder, Restrict::new(bytes.len() as u16)).unwrap();
        assert_eq!(read_rdata.options(), &[EdnsOption::new(10_u16, vec![])]);
    }

    #[test]
    fn test_option_longer_than_rdata() {
        // the option claims 5 bytes, the rdata only has room for 2
        let bytes: Vec<u8> = vec![0x00, 0x0a, 0x00, 0x05, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE];
        let mut decoder = BinDecoder::new(&bytes);
        let err = read(&mut decoder, Restrict::new(6)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::EdnsOptionLengthExceedsRData {
                code: 10,
                len: 5,
                remaining: 2,
            })
        );
    }
}
