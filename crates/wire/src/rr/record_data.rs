/*
 * Copyright (C) 2015-2019 Benjamin Fry <benjaminfry@me.com>
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

//! record data enum variants and the table of their codecs

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use enum_as_inner::EnumAsInner;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rdata::{self, MX, NAPTR, NULL, OPT, SOA, SRV, TLSA, TXT};
use super::{CompressionIndex, Name, RecordType};
use crate::dnssec::rdata::{self as dnssec, DNSKEY, DS, NSEC, NSEC3, NSEC3PARAM, RRSIG};
use crate::error::{DecodeError, ProtoErrorKind, ProtoResult};
use crate::serialize::binary::{BinDecoder, BinEncoder, Restrict};

/// Record data enum variants
///
/// [RFC 1035](https://tools.ietf.org/html/rfc1035), DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987
///
/// ```text
/// 3.3. Standard RRs
///
/// The following RR definitions are expected to occur, at least
/// potentially, in all classes.  In particular, NS, SOA, CNAME, and PTR
/// will be used in all classes, and have the same format in all classes.
/// Because their RDATA format is known, all domain names in the RDATA
/// section of these RRs may be compressed.
///
/// <domain-name> is a domain name represented as a series of labels, and
/// terminated by a label with zero length.  <character-string> is a single
/// length octet followed by that number of characters.  <character-string>
/// is treated as binary information, and can be up to 256 characters in
/// length (including the length octet).
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, EnumAsInner, PartialEq, Clone, Eq, Hash)]
#[non_exhaustive]
pub enum RData {
    /// ```text
    /// 3.4.1. A RDATA format
    ///
    /// ADDRESS         A 32 bit Internet address.
    /// ```
    A(Ipv4Addr),

    /// ```text
    /// 2.2 AAAA data format
    ///
    ///    A 128 bit IPv6 address is encoded in the data portion of an AAAA
    ///    resource record in network byte order (high-order byte first).
    /// ```
    AAAA(Ipv6Addr),

    /// ```text
    /// 3.3.1. CNAME RDATA format
    ///
    /// CNAME           A <domain-name> which specifies the canonical or primary
    ///                 name for the owner.  The owner name is an alias.
    /// ```
    CNAME(Name),

    /// [RFC 4034](https://tools.ietf.org/html/rfc4034#section-2) DNS public key
    DNSKEY(DNSKEY),

    /// [RFC 4034](https://tools.ietf.org/html/rfc4034#section-5) Delegation signer
    DS(DS),

    /// ```text
    /// 3.3.9. MX RDATA format
    ///
    /// PREFERENCE      A 16 bit integer which specifies the preference given to
    ///                 this RR among others at the same owner.
    ///
    /// EXCHANGE        A <domain-name> which specifies a host willing to act as
    ///                 a mail exchange for the owner name.
    /// ```
    MX(MX),

    /// [RFC 3403](https://tools.ietf.org/html/rfc3403#section-4) Naming Authority Pointer
    NAPTR(NAPTR),

    /// ```text
    /// 3.3.11. NS RDATA format
    ///
    /// NSDNAME         A <domain-name> which specifies a host which should be
    ///                 authoritative for the specified class and domain.
    /// ```
    NS(Name),

    /// [RFC 4034](https://tools.ietf.org/html/rfc4034#section-4) Next secure
    NSEC(NSEC),

    /// [RFC 5155](https://tools.ietf.org/html/rfc5155#section-3) Hashed next secure
    NSEC3(NSEC3),

    /// [RFC 5155](https://tools.ietf.org/html/rfc5155#section-4) NSEC3 parameters
    NSEC3PARAM(NSEC3PARAM),

    /// [RFC 6891](https://tools.ietf.org/html/rfc6891#section-6.1.2) EDNS options
    OPT(OPT),

    /// ```text
    /// 3.3.12. PTR RDATA format
    ///
    /// PTRDNAME        A <domain-name> which points to some location in the
    ///                 domain name space.
    /// ```
    PTR(Name),

    /// [RFC 4034](https://tools.ietf.org/html/rfc4034#section-3) Signature over an RRset
    RRSIG(RRSIG),

    /// ```text
    /// 3.3.13. SOA RDATA format
    /// ```
    SOA(SOA),

    /// [RFC 4408](https://tools.ietf.org/html/rfc4408#section-3.1.1) Sender Policy Framework,
    /// laid out like TXT
    SPF(TXT),

    /// [RFC 2782](https://tools.ietf.org/html/rfc2782) Service locator
    SRV(SRV),

    /// [RFC 6698](https://tools.ietf.org/html/rfc6698#section-2.1) TLSA certificate association
    TLSA(TLSA),

    /// ```text
    /// 3.3.14. TXT RDATA format
    ///
    /// TXT-DATA        One or more <character-string>s.
    /// ```
    TXT(TXT),

    /// Rdata of a type without a dedicated layout, kept as opaque bytes
    Unknown {
        /// RecordType code
        code: RecordType,
        /// RData associated to the record
        rdata: NULL,
    },
}

impl RData {
    /// Read the RData from the given Decoder, exactly `rdata_length` bytes
    ///
    /// Registered types go through their codec, all other codes are read as opaque bytes.
    pub fn read(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdata_length: Restrict<u16>,
    ) -> ProtoResult<Self> {
        let start_idx = decoder.offset();

        debug!("reading {}", record_type);
        let result = match RDataCodec::lookup(record_type) {
            Some(codec) => (codec.read)(decoder, rdata_length)?,
            None => rdata::null::read(decoder, rdata_length).map(|rdata| Self::Unknown {
                code: record_type,
                rdata,
            })?,
        };

        // we should have read rdata_length, but we did not
        let read = decoder.offset() - start_idx;
        rdata_length
            .map(|u| u as usize)
            .verify_unwrap(|rdata_length| read == *rdata_length)
            .map_err(|rdata_length| DecodeError::IncorrectRDataLengthRead {
                read,
                len: rdata_length,
            })?;

        Ok(result)
    }

    /// Write the rdata of a record of `record_type`
    ///
    /// The variant must match the record type, names are compressed or written canonical as
    /// each layout requires.
    pub fn emit(
        &self,
        record_type: RecordType,
        encoder: &mut BinEncoder<'_>,
        names: &mut CompressionIndex,
    ) -> ProtoResult<()> {
        match RDataCodec::lookup(record_type) {
            Some(codec) => (codec.emit)(self, encoder, names),
            None => match self {
                Self::Unknown { code, rdata } if *code == record_type => {
                    rdata::null::emit(encoder, rdata)
                }
                other => Err(mismatch(record_type, other)),
            },
        }
    }

    /// Converts this to a Recordtype
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(..) => RecordType::A,
            Self::AAAA(..) => RecordType::AAAA,
            Self::CNAME(..) => RecordType::CNAME,
            Self::DNSKEY(..) => RecordType::DNSKEY,
            Self::DS(..) => RecordType::DS,
            Self::MX(..) => RecordType::MX,
            Self::NAPTR(..) => RecordType::NAPTR,
            Self::NS(..) => RecordType::NS,
            Self::NSEC(..) => RecordType::NSEC,
            Self::NSEC3(..) => RecordType::NSEC3,
            Self::NSEC3PARAM(..) => RecordType::NSEC3PARAM,
            Self::OPT(..) => RecordType::OPT,
            Self::PTR(..) => RecordType::PTR,
            Self::RRSIG(..) => RecordType::RRSIG,
            Self::SOA(..) => RecordType::SOA,
            Self::SPF(..) => RecordType::SPF,
            Self::SRV(..) => RecordType::SRV,
            Self::TLSA(..) => RecordType::TLSA,
            Self::TXT(..) => RecordType::TXT,
            Self::Unknown { code, .. } => *code,
        }
    }

    /// If this is an A or AAAA record type, then an IpAddr will be returned
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match *self {
            Self::A(a) => Some(IpAddr::from(a)),
            Self::AAAA(aaaa) => Some(IpAddr::from(aaaa)),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::A(address) => write!(f, "{address}"),
            Self::AAAA(address) => write!(f, "{address}"),
            Self::CNAME(name) | Self::NS(name) | Self::PTR(name) => write!(f, "{name}"),
            Self::DNSKEY(key) => write!(f, "{key}"),
            Self::DS(ds) => write!(f, "{ds}"),
            Self::MX(mx) => write!(f, "{mx}"),
            Self::NAPTR(naptr) => write!(f, "{naptr}"),
            Self::NSEC(nsec) => write!(f, "{nsec}"),
            Self::NSEC3(nsec3) => write!(f, "{nsec3}"),
            Self::NSEC3PARAM(param) => write!(f, "{param}"),
            Self::OPT(opt) => write!(f, "{opt}"),
            Self::RRSIG(sig) => write!(f, "{sig}"),
            Self::SOA(soa) => write!(f, "{soa}"),
            Self::SPF(txt) | Self::TXT(txt) => write!(f, "{txt}"),
            Self::SRV(srv) => write!(f, "{srv}"),
            Self::TLSA(tlsa) => write!(f, "{tlsa}"),
            Self::Unknown { rdata, .. } => write!(f, "{rdata}"),
        }
    }
}

/// The field a record of a registered type can not be written without
#[derive(Clone, Copy, Debug)]
pub(crate) struct MissingField {
    pub(crate) record: &'static str,
    pub(crate) field: &'static str,
}

/// Entry of the codec table, one per registered record type
pub(crate) struct RDataCodec {
    pub(crate) record_type: RecordType,
    /// `None` for types which may be written without rdata
    pub(crate) requires: Option<MissingField>,
    read: fn(&mut BinDecoder<'_>, Restrict<u16>) -> ProtoResult<RData>,
    emit: fn(&RData, &mut BinEncoder<'_>, &mut CompressionIndex) -> ProtoResult<()>,
}

impl RDataCodec {
    /// The codec for `record_type`, `None` if the type is read as opaque bytes
    pub(crate) fn lookup(record_type: RecordType) -> Option<&'static Self> {
        CODECS.iter().find(|codec| codec.record_type == record_type)
    }
}

fn mismatch(record_type: RecordType, rdata: &RData) -> crate::error::ProtoError {
    ProtoErrorKind::RDataMismatch {
        record_type,
        rdata_type: rdata.record_type(),
    }
    .into()
}

/// Builds a table entry, the emit arm only accepts the variant of its own type
macro_rules! codec {
    (
        $record_type:ident requires $requires:expr,
        read: $read:expr,
        emit: |$rdata:ident: $variant:ident, $encoder:ident, $names:ident| $emit:expr $(,)?
    ) => {
        RDataCodec {
            record_type: RecordType::$record_type,
            requires: $requires,
            read: $read,
            emit: |rdata, $encoder, $names| match rdata {
                RData::$variant($rdata) => $emit,
                other => Err(mismatch(RecordType::$record_type, other)),
            },
        }
    };
}

const fn requires(record: &'static str, field: &'static str) -> Option<MissingField> {
    Some(MissingField { record, field })
}

static CODECS: &[RDataCodec] = &[
    codec! {
        A requires requires("A/AAAA", "address"),
        read: |decoder, length| rdata::a::read(decoder, length).map(RData::A),
        emit: |address: A, encoder, names| rdata::a::emit(encoder, names, address),
    },
    codec! {
        AAAA requires requires("A/AAAA", "address"),
        read: |decoder, length| rdata::aaaa::read(decoder, length).map(RData::AAAA),
        emit: |address: AAAA, encoder, names| rdata::aaaa::emit(encoder, names, address),
    },
    codec! {
        CNAME requires requires("NS/CNAME/PTR", "data"),
        read: |decoder, length| rdata::name::read(decoder, length).map(RData::CNAME),
        emit: |name: CNAME, encoder, names| rdata::name::emit(encoder, names, name),
    },
    codec! {
        DNSKEY requires requires("DNSKEY", "public_key"),
        read: |decoder, length| dnssec::dnskey::read(decoder, length).map(RData::DNSKEY),
        emit: |key: DNSKEY, encoder, _names| dnssec::dnskey::emit(encoder, key),
    },
    codec! {
        DS requires requires("DS", "digest"),
        read: |decoder, length| dnssec::ds::read(decoder, length).map(RData::DS),
        emit: |ds: DS, encoder, _names| dnssec::ds::emit(encoder, ds),
    },
    codec! {
        MX requires requires("MX", "priority"),
        read: |decoder, length| rdata::mx::read(decoder, length).map(RData::MX),
        emit: |mx: MX, encoder, names| rdata::mx::emit(encoder, names, mx),
    },
    codec! {
        NAPTR requires requires("NAPTR", "order"),
        read: |decoder, length| rdata::naptr::read(decoder, length).map(RData::NAPTR),
        emit: |naptr: NAPTR, encoder, names| rdata::naptr::emit(encoder, names, naptr),
    },
    codec! {
        NS requires requires("NS/CNAME/PTR", "data"),
        read: |decoder, length| rdata::name::read(decoder, length).map(RData::NS),
        emit: |name: NS, encoder, names| rdata::name::emit(encoder, names, name),
    },
    codec! {
        NSEC requires requires("NSEC", "next_domain_name"),
        read: |decoder, length| dnssec::nsec::read(decoder, length).map(RData::NSEC),
        emit: |nsec: NSEC, encoder, names| dnssec::nsec::emit(encoder, names, nsec),
    },
    codec! {
        NSEC3 requires requires("NSEC3", "next_hashed_owner_name"),
        read: |decoder, length| dnssec::nsec3::read(decoder, length).map(RData::NSEC3),
        emit: |nsec3: NSEC3, encoder, _names| dnssec::nsec3::emit(encoder, nsec3),
    },
    codec! {
        NSEC3PARAM requires requires("NSEC3PARAM", "hash_algorithm"),
        read: |decoder, length| dnssec::nsec3param::read(decoder, length).map(RData::NSEC3PARAM),
        emit: |param: NSEC3PARAM, encoder, _names| dnssec::nsec3param::emit(encoder, param),
    },
    codec! {
        OPT requires None,
        read: |decoder, length| rdata::opt::read(decoder, length).map(RData::OPT),
        emit: |opt: OPT, encoder, _names| rdata::opt::emit(encoder, opt),
    },
    codec! {
        PTR requires requires("NS/CNAME/PTR", "data"),
        read: |decoder, length| rdata::name::read(decoder, length).map(RData::PTR),
        emit: |name: PTR, encoder, names| rdata::name::emit(encoder, names, name),
    },
    codec! {
        RRSIG requires requires("RRSIG", "signature"),
        read: |decoder, length| dnssec::rrsig::read(decoder, length).map(RData::RRSIG),
        emit: |sig: RRSIG, encoder, names| dnssec::rrsig::emit(encoder, names, sig),
    },
    codec! {
        SOA requires requires("SOA", "primary"),
        read: |decoder, length| rdata::soa::read(decoder, length).map(RData::SOA),
        emit: |soa: SOA, encoder, names| rdata::soa::emit(encoder, names, soa),
    },
    codec! {
        SPF requires requires("SPF", "data"),
        read: |decoder, length| rdata::txt::read(decoder, length).map(RData::SPF),
        emit: |txt: SPF, encoder, _names| rdata::txt::emit(encoder, txt),
    },
    codec! {
        SRV requires requires("SRV", "priority"),
        read: |decoder, length| rdata::srv::read(decoder, length).map(RData::SRV),
        emit: |srv: SRV, encoder, names| rdata::srv::emit(encoder, names, srv),
    },
    codec! {
        TLSA requires requires("TLSA", "cert_data"),
        read: |decoder, length| rdata::tlsa::read(decoder, length).map(RData::TLSA),
        emit: |tlsa: TLSA, encoder, _names| rdata::tlsa::emit(encoder, tlsa),
    },
    codec! {
        TXT requires requires("TXT", "data"),
        read: |decoder, length| rdata::txt::read(decoder, length).map(RData::TXT),
        emit: |txt: TXT, encoder, _names| rdata::txt::emit(encoder, txt),
    },
];

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::serialize::binary::BinEncodable;

    fn emit(rdata: &RData, record_type: RecordType) -> ProtoResult<Vec<u8>> {
        let mut bytes = [0_u8; 512];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        rdata.emit(record_type, &mut encoder, &mut CompressionIndex::default())?;
        Ok(encoder.written().to_vec())
    }

    #[test]
    fn test_table_covers_every_variant() {
        for rdata in [
            RData::A(Ipv4Addr::LOCALHOST),
            RData::AAAA(Ipv6Addr::LOCALHOST),
            RData::CNAME(Name::root()),
            RData::DNSKEY(DNSKEY::new(256, 8, vec![1])),
            RData::DS(DS::new(1, 8, 2, vec![1])),
            RData::MX(MX::new(1, Name::root())),
            RData::NS(Name::root()),
            RData::NSEC(NSEC::new(Name::root(), [RecordType::A])),
            RData::NSEC3PARAM(NSEC3PARAM::new(1, 0, 0, vec![])),
            RData::OPT(OPT::default()),
            RData::PTR(Name::root()),
            RData::SPF(TXT::new(vec!["v=spf1 -all".to_string()])),
            RData::SRV(SRV::new(1, 2, 3, Name::root())),
            RData::TLSA(TLSA::new(3, 1, 1, vec![1])),
            RData::TXT(TXT::new(vec!["text".to_string()])),
        ] {
            let record_type = rdata.record_type();
            assert!(RDataCodec::lookup(record_type).is_some(), "{record_type}");

            let bytes = emit(&rdata, record_type).unwrap();
            let mut decoder = BinDecoder::new(&bytes);
            let read = RData::read(&mut decoder, record_type, Restrict::new(bytes.len() as u16))
                .unwrap();
            assert_eq!(read, rdata);
        }
    }

    #[test]
    fn test_unknown_is_opaque() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut decoder = BinDecoder::new(&bytes);
        let record_type = RecordType::Unknown(65280);

        let rdata = RData::read(&mut decoder, record_type, Restrict::new(4)).unwrap();
        assert_eq!(
            rdata,
            RData::Unknown {
                code: record_type,
                rdata: NULL::with(bytes.to_vec())
            }
        );
        assert_eq!(emit(&rdata, record_type).unwrap(), bytes);
        assert_eq!(rdata.to_string(), "\\# 4 DEADBEEF");
    }

    #[test]
    fn test_mismatched_variant() {
        let rdata = RData::A(Ipv4Addr::LOCALHOST);
        let err = emit(&rdata, RecordType::AAAA).unwrap_err();
        assert!(matches!(
            err.kind(),
            ProtoErrorKind::RDataMismatch {
                record_type: RecordType::AAAA,
                rdata_type: RecordType::A,
            }
        ));

        let unknown = RData::Unknown {
            code: RecordType::Unknown(1000),
            rdata: NULL::new(),
        };
        assert!(emit(&unknown, RecordType::Unknown(1001)).is_err());
    }

    #[test]
    fn test_read_must_consume_rdata_length() {
        // an A record declaring 5 bytes of rdata
        let bytes = [127, 0, 0, 1, 0];
        let mut decoder = BinDecoder::new(&bytes);
        let err = RData::read(&mut decoder, RecordType::A, Restrict::new(5)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::IncorrectRDataLengthRead { read: 4, len: 5 })
        );

        // a name running past a declared length of 2
        let bytes = Name::from_str("example.com").unwrap().to_bytes().unwrap();
        let mut decoder = BinDecoder::new(&bytes);
        assert!(RData::read(&mut decoder, RecordType::NS, Restrict::new(2)).is_err());
    }
}
