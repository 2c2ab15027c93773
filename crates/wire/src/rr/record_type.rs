// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record type definitions

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};
use crate::rr::CompressionIndex;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// The type of the resource record.
///
/// This specifies the type of data in the RData field of the Resource Record. Codes without a
/// variant of their own are carried as `Unknown`, `RecordType::from(1)` is always `A` and never
/// `Unknown(1)`.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[non_exhaustive]
pub enum RecordType {
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) IPv4 Address record
    A,
    /// [RFC 3596](https://tools.ietf.org/html/rfc3596) IPv6 address record
    AAAA,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) All cached records, aka ANY
    ANY,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Authoritative Zone Transfer
    AXFR,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Canonical name record
    CNAME,
    /// [RFC 4034](https://tools.ietf.org/html/rfc4034) DNS Key record
    DNSKEY,
    /// [RFC 4034](https://tools.ietf.org/html/rfc4034) Delegation signer
    DS,
    /// [RFC 1995](https://tools.ietf.org/html/rfc1995) Incremental Zone Transfer
    IXFR,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Mail exchange record
    MX,
    /// [RFC 3403](https://tools.ietf.org/html/rfc3403) Naming Authority Pointer
    NAPTR,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Name server record
    NS,
    /// [RFC 4034](https://tools.ietf.org/html/rfc4034) Next-Secure record
    NSEC,
    /// [RFC 5155](https://tools.ietf.org/html/rfc5155) NSEC record version 3
    NSEC3,
    /// [RFC 5155](https://tools.ietf.org/html/rfc5155) NSEC3 parameters
    NSEC3PARAM,
    /// [RFC 6891](https://tools.ietf.org/html/rfc6891) Option
    OPT,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Pointer record
    PTR,
    /// [RFC 4034](https://tools.ietf.org/html/rfc4034) DNSSEC signature
    RRSIG,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) and
    /// [RFC 2308](https://tools.ietf.org/html/rfc2308) Start of [a zone of] authority record
    SOA,
    /// [RFC 4408](https://tools.ietf.org/html/rfc4408) Sender Policy Framework, same layout as TXT
    SPF,
    /// [RFC 2782](https://tools.ietf.org/html/rfc2782) Service locator
    SRV,
    /// [RFC 6698](https://tools.ietf.org/html/rfc6698) TLSA certificate association
    TLSA,
    /// [RFC 1035](https://tools.ietf.org/html/rfc1035) Text record
    TXT,
    /// A type code this library has no variant for
    Unknown(u16),
}

impl RecordType {
    /// Returns true if this is an ANY
    #[inline]
    pub fn is_any(self) -> bool {
        self == Self::ANY
    }

    /// Returns true if the type is one of the DNSSEC record types
    pub fn is_dnssec(self) -> bool {
        matches!(
            self,
            Self::DNSKEY | Self::DS | Self::NSEC | Self::NSEC3 | Self::NSEC3PARAM | Self::RRSIG
        )
    }
}

impl FromStr for RecordType {
    type Err = ProtoError;

    /// Convert `&str` to `RecordType`, accepting the generic `TYPE65280` form as well
    ///
    /// ```
    /// use std::str::FromStr;
    /// use dnswire::rr::RecordType;
    ///
    /// assert_eq!(RecordType::from_str("AAAA").unwrap(), RecordType::AAAA);
    /// assert_eq!(RecordType::from_str("TYPE1").unwrap(), RecordType::A);
    /// assert_eq!(RecordType::from_str("TYPE65280").unwrap(), RecordType::Unknown(65280));
    /// ```
    fn from_str(str: &str) -> ProtoResult<Self> {
        Ok(match str {
            "A" => Self::A,
            "AAAA" => Self::AAAA,
            "ANY" | "*" => Self::ANY,
            "AXFR" => Self::AXFR,
            "CNAME" => Self::CNAME,
            "DNSKEY" => Self::DNSKEY,
            "DS" => Self::DS,
            "IXFR" => Self::IXFR,
            "MX" => Self::MX,
            "NAPTR" => Self::NAPTR,
            "NS" => Self::NS,
            "NSEC" => Self::NSEC,
            "NSEC3" => Self::NSEC3,
            "NSEC3PARAM" => Self::NSEC3PARAM,
            "OPT" => Self::OPT,
            "PTR" => Self::PTR,
            "RRSIG" => Self::RRSIG,
            "SOA" => Self::SOA,
            "SPF" => Self::SPF,
            "SRV" => Self::SRV,
            "TLSA" => Self::TLSA,
            "TXT" => Self::TXT,
            _ => {
                return str
                    .strip_prefix("TYPE")
                    .and_then(|code| code.parse::<u16>().ok())
                    .map(Self::from)
                    .ok_or_else(|| ProtoErrorKind::UnknownRecordTypeStr(str.to_string()).into())
            }
        })
    }
}

impl From<u16> for RecordType {
    /// Convert from `u16` to `RecordType`
    ///
    /// ```
    /// use dnswire::rr::RecordType;
    ///
    /// let var = RecordType::from(1);
    /// assert_eq!(RecordType::A, var);
    /// ```
    fn from(value: u16) -> Self {
        match value {
            1 => Self::A,
            2 => Self::NS,
            5 => Self::CNAME,
            6 => Self::SOA,
            12 => Self::PTR,
            15 => Self::MX,
            16 => Self::TXT,
            28 => Self::AAAA,
            33 => Self::SRV,
            35 => Self::NAPTR,
            41 => Self::OPT,
            43 => Self::DS,
            46 => Self::RRSIG,
            47 => Self::NSEC,
            48 => Self::DNSKEY,
            50 => Self::NSEC3,
            51 => Self::NSEC3PARAM,
            52 => Self::TLSA,
            99 => Self::SPF,
            251 => Self::IXFR,
            252 => Self::AXFR,
            255 => Self::ANY,
            _ => Self::Unknown(value),
        }
    }
}

impl From<RecordType> for u16 {
    /// Convert from `RecordType` to `u16`
    ///
    /// ```
    /// use dnswire::rr::RecordType;
    ///
    /// let var: u16 = RecordType::A.into();
    /// assert_eq!(1, var);
    /// ```
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::SPF => 99,
            RecordType::IXFR => 251,
            RecordType::AXFR => 252,
            RecordType::ANY => 255,
            RecordType::Unknown(code) => code,
        }
    }
}

impl BinEncodable for RecordType {
    fn emit(&self, encoder: &mut BinEncoder<'_>, _: &mut CompressionIndex) -> ProtoResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl BinDecodable for RecordType {
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        Ok(decoder
            .read_u16()
            .map(Restrict::unverified)
            .map(Self::from)?)
    }
}

impl PartialOrd<Self> for RecordType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by type code, which is the order of type bitmaps
impl Ord for RecordType {
    fn cmp(&self, other: &Self) -> Ordering {
        u16::from(*self).cmp(&u16::from(*other))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "TYPE{code}"),
            known => f.write_str(known.mnemonic()),
        }
    }
}

impl RecordType {
    /// The registered mnemonic, `"TYPE"` for codes without one
    fn mnemonic(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::ANY => "ANY",
            Self::AXFR => "AXFR",
            Self::CNAME => "CNAME",
            Self::DNSKEY => "DNSKEY",
            Self::DS => "DS",
            Self::IXFR => "IXFR",
            Self::MX => "MX",
            Self::NAPTR => "NAPTR",
            Self::NS => "NS",
            Self::NSEC => "NSEC",
            Self::NSEC3 => "NSEC3",
            Self::NSEC3PARAM => "NSEC3PARAM",
            Self::OPT => "OPT",
            Self::PTR => "PTR",
            Self::RRSIG => "RRSIG",
            Self::SOA => "SOA",
            Self::SPF => "SPF",
            Self::SRV => "SRV",
            Self::TLSA => "TLSA",
            Self::TXT => "TXT",
            Self::Unknown(_) => "TYPE",
        }
    }

    /// The registered mnemonic, `None` for codes without one
    pub(crate) fn known_mnemonic(self) -> Option<&'static str> {
        match self {
            Self::Unknown(_) => None,
            known => Some(known.mnemonic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let mut unordered = vec![
            RecordType::Unknown(1000),
            RecordType::SPF,
            RecordType::AAAA,
            RecordType::A,
            RecordType::NSEC,
        ];
        unordered.sort();

        assert_eq!(
            unordered,
            vec![
                RecordType::A,
                RecordType::AAAA,
                RecordType::NSEC,
                RecordType::SPF,
                RecordType::Unknown(1000),
            ]
        );
    }

    #[test]
    fn test_code_round_trip() {
        for code in 0..=u16::MAX {
            assert_eq!(u16::from(RecordType::from(code)), code);
        }
    }

    #[test]
    fn test_str_round_trip() {
        for code in [1_u16, 28, 41, 46, 52, 99, 4242] {
            let rt = RecordType::from(code);
            assert_eq!(rt.to_string().parse::<RecordType>().unwrap(), rt);
        }
        assert!("NOPE".parse::<RecordType>().is_err());
    }
}
