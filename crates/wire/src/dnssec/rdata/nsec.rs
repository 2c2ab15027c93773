// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! negative cache proof for non-existence

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ProtoResult};
use crate::rr::{CompressionIndex, Name, RecordType, RecordTypeSet};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncoder, Restrict, RestrictedMath};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4)
///
/// ```text
/// 4.1.  NSEC RDATA Wire Format
///
///    The RDATA of the NSEC RR is as shown below:
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                      Next Domain Name                         /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                       Type Bit Maps                           /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
/// 4.1.1.  The Next Domain Name Field
///
///    The Next Domain field contains the next owner name (in the canonical
///    ordering of the zone) that has authoritative data or contains a
///    delegation point NS RRset; see Section 6.1 for an explanation of
///    canonical ordering.  The value of the Next Domain Name field in the
///    last NSEC record in the zone is the name of the zone apex (the owner
///    name of the zone's SOA RR).  This indicates that the owner name of
///    the NSEC RR is the last name in the canonical ordering of the zone.
///
///    A sender MUST NOT use DNS name compression on the Next Domain Name
///    field when transmitting an NSEC RR.
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct NSEC {
    next_domain_name: Name,
    type_bit_maps: RecordTypeSet,
}

impl NSEC {
    /// Constructs a new NSEC RData, warning this won't guarantee that the NSEC covers itself
    ///  which it should at it's own name.
    ///
    /// # Arguments
    ///
    /// * `next_domain_name` - the name labels of the next ordered name in the zone
    /// * `type_bit_maps` - a bit map of the types that don't exist at this name
    ///
    /// # Returns
    ///
    /// An NSEC RData for use in a Resource Record
    pub fn new(
        next_domain_name: Name,
        type_bit_maps: impl IntoIterator<Item = RecordType>,
    ) -> Self {
        Self {
            next_domain_name,
            type_bit_maps: RecordTypeSet::new(type_bit_maps),
        }
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4.1.1)
    ///
    /// ```text
    /// 4.1.1.  The Next Domain Name Field
    ///
    ///    The Next Domain field contains the next owner name (in the canonical
    ///    ordering of the zone) that has authoritative data or contains a
    ///    delegation point NS RRset.
    /// ```
    pub fn next_domain_name(&self) -> &Name {
        &self.next_domain_name
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4.1.2)
    ///
    /// ```text
    /// 4.1.2.  The Type Bit Maps Field
    ///
    ///    The Type Bit Maps field identifies the RRset types that exist at the
    ///    NSEC RR's owner name.
    /// ```
    pub fn type_bit_maps(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.type_bit_maps.iter()
    }

    /// The types as a set
    pub fn type_set(&self) -> &RecordTypeSet {
        &self.type_bit_maps
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<NSEC> {
    let start_idx = decoder.offset();

    let next_domain_name = Name::read(decoder)?;

    let rdata_length = rdata_length.map(|u| u as usize);
    let bit_map_len = rdata_length
        .checked_sub(decoder.offset() - start_idx)
        .map_err(|needed| DecodeError::RDataTooShort {
            record_type: RecordType::NSEC,
            needed,
            len: rdata_length.unverified(/*only reported*/),
        })?;
    let type_bit_maps = RecordTypeSet::read(decoder, bit_map_len)?;

    Ok(NSEC {
        next_domain_name,
        type_bit_maps,
    })
}

/// Write the RData, with the next domain name in canonical form
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    rdata: &NSEC,
) -> ProtoResult<()> {
    rdata
        .next_domain_name()
        .emit_as_canonical(encoder, names, true)?;
    rdata.type_bit_maps.emit(encoder)
}

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-4.2)
///
/// ```text
/// 4.3.  NSEC RR Example
///
///    The following NSEC RR identifies the RRsets associated with
///    alfa.example.com. and identifies the next authoritative name after
///    alfa.example.com.
///
///    alfa.example.com. 86400 IN NSEC host.example.com. (
///                                    A MX RRSIG NSEC TYPE1234 )
/// ```
impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.next_domain_name)?;

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
        let rdata = NSEC::new(
            Name::from_ascii("host.example.com").unwrap(),
            [
                RecordType::A,
                RecordType::MX,
                RecordType::RRSIG,
                RecordType::NSEC,
                RecordType::Unknown(1234),
            ],
        );

        let mut bytes = [0_u8; 128];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        assert!(emit(&mut encoder, &mut CompressionIndex::default(), &rdata).is_ok());
        let len = encoder.finish();

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let restrict = Restrict::new(len as u16);
        let read_rdata = read(&mut decoder, restrict).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert_eq!(
            read_rdata.to_string(),
            "host.example.com A MX RRSIG NSEC TYPE1234"
        );
    }

    #[test]
    fn test_empty_bit_maps() {
        let rdata = NSEC::new(Name::root(), []);

        let mut bytes = [0_u8; 8];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        emit(&mut encoder, &mut CompressionIndex::default(), &rdata).unwrap();
        assert_eq!(encoder.finish(), 1);

        let mut decoder = BinDecoder::new(&bytes[..1]);
        assert_eq!(read(&mut decoder, Restrict::new(1)).unwrap(), rdata);
    }
}
