// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//! Message metadata

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{OpCode, ResponseCode};
use crate::error::ProtoResult;
use crate::rr::CompressionIndex;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// Metadata for the `Message` struct.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.1. Header section format
///
/// The header contains the following fields
///
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      ID                       |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |  /// AD and CD from RFC4035
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    QDCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ANCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    NSCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ARCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The four counts are not part of this type, they are derived from the sections of the
/// message when writing and returned as [`HeaderCounts`] when reading. The response code held
/// here is the full extended code, only its low four bits are written to the header itself.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    id: u16,
    message_type: MessageType,
    op_code: OpCode,
    authoritative: bool,
    truncation: bool,
    recursion_desired: bool,
    recursion_available: bool,
    z: bool,
    authentic_data: bool,
    checking_disabled: bool,
    response_code: ResponseCode,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{id}:{message_type}:{flags}:{code}:{op_code}",
            id = self.id,
            message_type = self.message_type,
            flags = self.flags(),
            code = u16::from(self.response_code),
            op_code = self.op_code,
        )
    }
}

/// Message types are either Query (also Update) or Response
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Copy, Clone, Hash)]
pub enum MessageType {
    /// Queries are Client requests, these are either Queries or Updates
    Query,
    /// Response message from the Server or upstream Resolver
    Response,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match self {
            Self::Query => "QUERY",
            Self::Response => "RESPONSE",
        };

        f.write_str(s)
    }
}

/// All the flags of the request/response header
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags {
    authoritative: bool,
    truncation: bool,
    recursion_desired: bool,
    recursion_available: bool,
    authentic_data: bool,
    checking_disabled: bool,
}

/// We are following the `dig` commands display format for the header flags
///
/// Example: "RD,AA,RA;" is Recursion-Desired, Authoritative-Answer, Recursion-Available.
impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        const SEPARATOR: &str = ",";

        let flags = [
            (self.recursion_desired, "RD"),
            (self.checking_disabled, "CD"),
            (self.truncation, "TC"),
            (self.authoritative, "AA"),
            (self.recursion_available, "RA"),
            (self.authentic_data, "AD"),
        ];

        let mut iter = flags.iter().filter(|(flag, _)| *flag).map(|(_, s)| *s);

        // print first without a separator, then print the rest.
        if let Some(s) = iter.next() {
            f.write_str(s)?
        }
        for s in iter {
            f.write_str(SEPARATOR)?;
            f.write_str(s)?;
        }

        Ok(())
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    /// A default Header, not very useful.
    pub const fn new() -> Self {
        Self {
            id: 0,
            message_type: MessageType::Query,
            op_code: OpCode::Query,
            authoritative: false,
            truncation: false,
            recursion_desired: false,
            recursion_available: false,
            z: false,
            authentic_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NoError,
        }
    }

    /// Construct a new header based off the request header. This copies over the RD
    ///   (recursion-desired) and CD (checking-disabled), as well as the op_code and id of the
    ///   request.
    pub fn response_from_request(header: &Self) -> Self {
        Self {
            id: header.id,
            message_type: MessageType::Response,
            op_code: header.op_code,
            recursion_desired: header.recursion_desired,
            checking_disabled: header.checking_disabled,
            ..Self::new()
        }
    }

    /// Length of the header, always 12 bytes
    #[inline(always)]
    pub fn len() -> usize {
        12 /* this is always 12 bytes */
    }

    /// Sets the id of the message, for queries this should be random.
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.id = id;
        self
    }

    /// Sets the message type, Queries and Updates both use Query.
    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.message_type = message_type;
        self
    }

    /// Set the operation code for the message
    pub fn set_op_code(&mut self, op_code: OpCode) -> &mut Self {
        self.op_code = op_code;
        self
    }

    /// From the server is specifies that it is an authoritative response.
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.authoritative = authoritative;
        self
    }

    /// Specifies that the message was truncated, set by the writer when the buffer overflows
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.truncation = truncated;
        self
    }

    /// Specify that the resolver should recursively request data from upstream DNS nodes
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.recursion_desired = recursion_desired;
        self
    }

    /// Specifies that recursion is available from this or the remote resolver
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.recursion_available = recursion_available;
        self
    }

    /// The reserved Z bit, must be zero in all queries and responses
    pub fn set_z(&mut self, z: bool) -> &mut Self {
        self.z = z;
        self
    }

    /// Specifies that the data is authentic, i.e. the resolver believes all data to be valid
    /// through DNSSEC
    pub fn set_authentic_data(&mut self, authentic_data: bool) -> &mut Self {
        self.authentic_data = authentic_data;
        self
    }

    /// Used during recursive resolution to specified if a resolver should or should not validate
    /// DNSSEC signatures
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.checking_disabled = checking_disabled;
        self
    }

    /// A method to get all header flags (useful for Display purposes)
    pub fn flags(&self) -> Flags {
        Flags {
            authoritative: self.authoritative,
            authentic_data: self.authentic_data,
            checking_disabled: self.checking_disabled,
            recursion_available: self.recursion_available,
            recursion_desired: self.recursion_desired,
            truncation: self.truncation,
        }
    }

    /// The full response code, the bits above the low four travel in the OPT record
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.response_code = response_code;
        self
    }

    /// Merge the high bits carried by an OPT record into the response code
    pub(crate) fn merge_response_code(&mut self, high_response_code: u8) {
        self.response_code = ResponseCode::from(high_response_code, self.response_code.low());
    }

    /// ```text
    /// ID              A 16 bit identifier assigned by the program that
    ///                 generates any kind of query.  This identifier is copied
    ///                 the corresponding reply and can be used by the requester
    ///                 to match up replies to outstanding queries.
    /// ```
    pub fn id(&self) -> u16 {
        self.id
    }

    /// ```text
    /// QR              A one bit field that specifies whether this message is a
    ///                 query (0), or a response (1).
    /// ```
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// ```text
    /// OPCODE          A four bit field that specifies kind of query in this
    ///                 message.  This value is set by the originator of a query
    ///                 and copied into the response.
    /// ```
    pub fn op_code(&self) -> OpCode {
        self.op_code
    }

    /// ```text
    /// AA              Authoritative Answer - this bit is valid in responses,
    ///                 and specifies that the responding name server is an
    ///                 authority for the domain name in question section.
    /// ```
    pub fn authoritative(&self) -> bool {
        self.authoritative
    }

    /// ```text
    /// TC              TrunCation - specifies that this message was truncated
    ///                 due to length greater than that permitted on the
    ///                 transmission channel.
    /// ```
    pub fn truncated(&self) -> bool {
        self.truncation
    }

    /// ```text
    /// RD              Recursion Desired - this bit may be set in a query and
    ///                 is copied into the response.  If RD is set, it directs
    ///                 the name server to pursue the query recursively.
    ///                 Recursive query support is optional.
    /// ```
    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    /// ```text
    /// RA              Recursion Available - this be is set or cleared in a
    ///                 response, and denotes whether recursive query support is
    ///                 available in the name server.
    /// ```
    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    /// ```text
    /// Z               Reserved for future use.  Must be zero in all queries
    ///                 and responses.
    /// ```
    pub fn z(&self) -> bool {
        self.z
    }

    /// [RFC 4035, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4035#section-3.1.6)
    ///
    /// ```text
    /// 3.1.6.  The AD and CD Bits in an Authoritative Response
    /// ```
    pub fn authentic_data(&self) -> bool {
        self.authentic_data
    }

    /// [RFC 4035, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4035#section-3.1.6)
    pub fn checking_disabled(&self) -> bool {
        self.checking_disabled
    }

    /// The full response code, the header on the wire only carries its low four bits
    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }
}

/// Writes the id and the flags word, the counts follow as [`HeaderCounts`]
impl BinEncodable for Header {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        // Id
        encoder.emit_u16(self.id)?;

        // IsQuery, OpCode, Authoritative, Truncation, RecursionDesired
        let mut q_opcd_a_t_r: u8 = if let MessageType::Response = self.message_type {
            0x80
        } else {
            0x00
        };
        q_opcd_a_t_r |= (u8::from(self.op_code) & 0x0F) << 3;
        q_opcd_a_t_r |= if self.authoritative { 0x4 } else { 0x0 };
        q_opcd_a_t_r |= if self.truncation { 0x2 } else { 0x0 };
        q_opcd_a_t_r |= if self.recursion_desired { 0x1 } else { 0x0 };
        encoder.emit(q_opcd_a_t_r)?;

        // IsRecursionAvailable, Z, AuthenticData, CheckingDisabled, ResponseCode
        let mut r_z_ad_cd_rcod: u8 = if self.recursion_available {
            0b1000_0000
        } else {
            0b0000_0000
        };
        r_z_ad_cd_rcod |= if self.z { 0b0100_0000 } else { 0b0000_0000 };
        r_z_ad_cd_rcod |= if self.authentic_data {
            0b0010_0000
        } else {
            0b0000_0000
        };
        r_z_ad_cd_rcod |= if self.checking_disabled {
            0b0001_0000
        } else {
            0b0000_0000
        };
        r_z_ad_cd_rcod |= self.response_code.low();
        encoder.emit(r_z_ad_cd_rcod)
    }
}

impl BinDecodable for Header {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        let id = decoder.read_u16()?.unverified(/*it is valid for this to be any u16*/);

        let q_opcd_a_t_r = decoder.read_u8()?.unverified(/*used as a bitfield, this is safe*/);
        // if the first bit is set
        let message_type = if (0b1000_0000 & q_opcd_a_t_r) == 0b1000_0000 {
            MessageType::Response
        } else {
            MessageType::Query
        };
        // the 4bit opcode, masked and then shifted right 3bits for the u8...
        let op_code = OpCode::from_u8((0b0111_1000 & q_opcd_a_t_r) >> 3);
        let authoritative = (0b0000_0100 & q_opcd_a_t_r) == 0b0000_0100;
        let truncation = (0b0000_0010 & q_opcd_a_t_r) == 0b0000_0010;
        let recursion_desired = (0b0000_0001 & q_opcd_a_t_r) == 0b0000_0001;

        let r_z_ad_cd_rcod = decoder.read_u8()?.unverified(/*used as a bitfield, this is safe*/);

        let recursion_available = (0b1000_0000 & r_z_ad_cd_rcod) == 0b1000_0000;
        let z = (0b0100_0000 & r_z_ad_cd_rcod) == 0b0100_0000;
        let authentic_data = (0b0010_0000 & r_z_ad_cd_rcod) == 0b0010_0000;
        let checking_disabled = (0b0001_0000 & r_z_ad_cd_rcod) == 0b0001_0000;
        let response_code = ResponseCode::from_low(0b0000_1111 & r_z_ad_cd_rcod);

        Ok(Self {
            id,
            message_type,
            op_code,
            authoritative,
            truncation,
            recursion_desired,
            recursion_available,
            z,
            authentic_data,
            checking_disabled,
            response_code,
        })
    }
}

/// The section counts that follow the flags in the header
///
/// These can not be trusted while reading, every record they announce still has to be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderCounts {
    /// QDCOUNT, the number of entries in the question section
    pub query_count: u16,
    /// ANCOUNT, the number of resource records in the answer section
    pub answer_count: u16,
    /// NSCOUNT, the number of name server resource records in the authority section
    pub name_server_count: u16,
    /// ARCOUNT, the number of resource records in the additional section
    pub additional_count: u16,
}

impl BinEncodable for HeaderCounts {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        encoder.emit_u16(self.query_count)?;
        encoder.emit_u16(self.answer_count)?;
        encoder.emit_u16(self.name_server_count)?;
        encoder.emit_u16(self.additional_count)
    }
}

impl BinDecodable for HeaderCounts {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(Self {
            query_count: decoder.read_u16()?.unverified(/*verified when reading queries*/),
            answer_count: decoder.read_u16()?.unverified(/*evaluated when reading records*/),
            name_server_count: decoder.read_u16()?.unverified(/*evaluated when reading records*/),
            additional_count: decoder.read_u16()?.unverified(/*evaluated when reading records*/),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let byte_vec = vec![
            0x01, 0x10, 0xAA, 0x83, // 0b1010 1010 1000 0011
            0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11,
        ];

        let mut decoder = BinDecoder::new(&byte_vec);

        let expect = Header {
            id: 0x0110,
            message_type: MessageType::Response,
            op_code: OpCode::Update,
            authoritative: false,
            truncation: true,
            recursion_desired: false,
            recursion_available: true,
            z: false,
            authentic_data: false,
            checking_disabled: false,
            response_code: ResponseCode::NXDomain,
        };
        let expect_counts = HeaderCounts {
            query_count: 0x8877,
            answer_count: 0x6655,
            name_server_count: 0x4433,
            additional_count: 0x2211,
        };

        let got = Header::read(&mut decoder).unwrap();
        let counts = HeaderCounts::read(&mut decoder).unwrap();

        assert_eq!(got, expect);
        assert_eq!(counts, expect_counts);
    }

    #[test]
    fn test_write() {
        let mut header = Header::new();
        header
            .set_id(0x0110)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Update)
            .set_authoritative(true)
            .set_truncated(false)
            .set_recursion_desired(true)
            .set_recursion_available(false)
            .set_authentic_data(true)
            .set_checking_disabled(false)
            .set_response_code(ResponseCode::ServFail);
        let counts = HeaderCounts {
            query_count: 0x8877,
            answer_count: 0x6655,
            name_server_count: 0x4433,
            additional_count: 0x2211,
        };

        let expect: Vec<u8> = vec![
            0x01, 0x10, 0x2D, 0x22, // 0b0010 1101 0010 0010
            0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11,
        ];

        let mut bytes = [0_u8; 12];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        let mut names = CompressionIndex::default();
        header.emit(&mut encoder, &mut names).unwrap();
        counts.emit(&mut encoder, &mut names).unwrap();

        assert_eq!(encoder.written(), &expect[..]);
    }

    #[test]
    fn test_reserved_bits_survive() {
        let mut header = Header::new();
        header
            .set_z(true)
            .set_checking_disabled(true)
            .set_op_code(OpCode::Unknown(15));

        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes, [0, 0, 0b0111_1000, 0b0101_0000]);
        assert_eq!(Header::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn test_extended_code_keeps_low_bits_only() {
        let mut header = Header::new();
        header.set_response_code(ResponseCode::BADCOOKIE);

        let read = Header::from_bytes(&header.to_bytes().unwrap()).unwrap();
        assert_eq!(read.response_code(), ResponseCode::from_low(23));

        let mut read = read;
        read.merge_response_code(1);
        assert_eq!(read.response_code(), ResponseCode::BADCOOKIE);
    }
}
