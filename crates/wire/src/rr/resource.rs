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

//! resource record implementation

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::record_data::RDataCodec;
use super::{CompressionIndex, DNSClass, Name, RData, RecordType};
use crate::error::{DecodeError, ProtoErrorKind, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// Resource records are storage value in DNS, into which all key/value pair data is stored.
///
/// [RFC 1035](https://tools.ietf.org/html/rfc1035), DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987
///
/// ```text
/// 4.1.3. Resource record format
///
/// The answer, authority, and additional sections all share the same
/// format: a variable number of resource records, where the number of
/// records is specified in the corresponding count field in the header.
/// Each resource record has the following format:
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                                               /
///     /                      NAME                     /
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--|
///     /                     RDATA                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// ```
///
/// The rdata length is never stored, it is computed while writing. A record without rdata is
/// written with a zero length. Reading always runs the decoder of the type, so a zero length
/// yields an empty blob for unknown types and an empty OPT, and fails for fixed layouts.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    name_labels: Name,
    rr_type: RecordType,
    dns_class: DNSClass,
    ttl: u32,
    rdata: Option<RData>,
}

impl Record {
    /// Create a record with the specified initial values and no rdata, class IN.
    ///
    /// # Arguments
    ///
    /// * `name` - name of the resource records
    /// * `rr_type` - the record type
    /// * `ttl` - time-to-live is the amount of time this record should be cached before refreshing
    pub fn with(name: Name, rr_type: RecordType, ttl: u32) -> Self {
        Self {
            name_labels: name,
            rr_type,
            dns_class: DNSClass::IN,
            ttl,
            rdata: None,
        }
    }

    /// Create a record of class IN, the type is taken from the rdata
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use dnswire::rr::{Name, RData, Record, RecordType};
    ///
    /// let record = Record::from_rdata(
    ///     Name::from_ascii("www.example.com.").unwrap(),
    ///     300,
    ///     RData::A(Ipv4Addr::new(93, 184, 216, 34)),
    /// );
    /// assert_eq!(record.record_type(), RecordType::A);
    /// assert_eq!(record.to_string(), "www.example.com 300 IN A 93.184.216.34");
    /// ```
    pub fn from_rdata(name: Name, ttl: u32, rdata: RData) -> Self {
        Self {
            name_labels: name,
            rr_type: rdata.record_type(),
            dns_class: DNSClass::IN,
            ttl,
            rdata: Some(rdata),
        }
    }

    /// ```text
    /// NAME            a domain name to which this resource record pertains.
    /// ```
    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name_labels = name;
        self
    }

    /// ```text
    /// TYPE            two octets containing one of the RR type codes.  This
    ///                 field specifies the meaning of the data in the RDATA
    ///                 field.
    /// ```
    pub fn set_record_type(&mut self, rr_type: RecordType) -> &mut Self {
        self.rr_type = rr_type;
        self
    }

    /// ```text
    /// CLASS           two octets which specify the class of the data in the
    ///                 RDATA field.
    /// ```
    ///
    /// For OPT records this is the requestor's UDP payload size.
    pub fn set_dns_class(&mut self, dns_class: DNSClass) -> &mut Self {
        self.dns_class = dns_class;
        self
    }

    /// ```text
    /// TTL             a 32 bit integer that specifies the time
    ///                 interval (in seconds) that the resource record may be
    ///                 cached before it should be discarded.  Zero values are
    ///                 interpreted to mean that the RR can only be used for the
    ///                 transaction in progress, and should not be cached.
    /// ```
    ///
    /// For OPT records this packs the extended response code, version and flags.
    pub fn set_ttl(&mut self, ttl: u32) -> &mut Self {
        self.ttl = ttl;
        self
    }

    /// Sets the rdata, `None` writes an empty rdata where the type allows it
    pub fn set_data(&mut self, rdata: Option<RData>) -> &mut Self {
        self.rdata = rdata;
        self
    }

    /// Returns the name of the record
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name_labels
    }

    /// Returns the type of the RData in the record
    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.rr_type
    }

    /// Returns the DNSClass of the Record, generally IN for internet
    #[inline]
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Returns the time-to-live of the record, for caching purposes
    #[inline]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the Record Data, i.e. the record information
    #[inline]
    pub fn data(&self) -> Option<&RData> {
        self.rdata.as_ref()
    }

    /// Take the rdata out of the record
    pub fn into_data(self) -> Option<RData> {
        self.rdata
    }
}

impl BinEncodable for Record {
    fn emit(&self, encoder: &mut BinEncoder<'_>, names: &mut CompressionIndex) -> ProtoResult<()> {
        // NSEC chains are signed over the expanded owner
        let canonical = self.rr_type == RecordType::NSEC;
        self.name_labels
            .emit_as_canonical(encoder, names, canonical)?;
        self.rr_type.emit(encoder, names)?;
        encoder.emit_u16(self.dns_class.into())?;
        encoder.emit_u32(self.ttl)?;

        // place the RData length
        let place = encoder.place::<u16>()?;

        match &self.rdata {
            Some(rdata) => rdata.emit(self.rr_type, encoder, names)?,
            None => {
                if let Some(missing) = RDataCodec::lookup(self.rr_type).and_then(|c| c.requires) {
                    return Err(ProtoErrorKind::MissingRData {
                        record: missing.record,
                        field: missing.field,
                    }
                    .into());
                }
            }
        }

        // get the length written
        let len = encoder.len_since_place(&place);
        let len = u16::try_from(len).map_err(|_| ProtoErrorKind::RDataTooLong(len))?;

        // replace the location with the length
        place.replace(encoder, len)
    }
}

impl BinDecodable for Record {
    /// parse a resource record line example:
    ///  WARNING: the record_bytes is 100% consumed and destroyed in this parsing process
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        // NAME            an owner name, i.e., the name of the node to which this
        //                 resource record pertains.
        let name_labels = Name::read(decoder)?;

        // TYPE            two octets containing one of the RR TYPE codes.
        let record_type = RecordType::read(decoder)?;

        // the OPT owner is always the root
        if record_type == RecordType::OPT && !name_labels.is_root() {
            return Err(DecodeError::EdnsNameNotRoot(name_labels).into());
        }

        // CLASS           two octets containing one of the RR CLASS codes, or for OPT the
        //                 requestor's payload size
        let dns_class = DNSClass::from(
            decoder.read_u16()?.unverified(/*any class or payload size is valid*/),
        );

        // TTL             a 32 bit signed integer that specifies the time interval
        //                that the resource record may be cached before the source
        //                of the information should again be consulted.  Zero
        //                values are interpreted to mean that the RR can only be
        //                used for the transaction in progress, and should not be
        //                cached.  For example, SOA records are always distributed
        //                with a zero TTL to prohibit caching.  Zero values can
        //                also be used for extremely volatile data.
        let ttl = decoder.read_u32()?.unverified(/*any u32 is valid*/);

        // RDLENGTH        an unsigned 16 bit integer that specifies the length in
        //                octets of the RDATA field.
        let remaining = decoder.len();
        let rd_length = decoder
            .read_u16()?
            .verify_unwrap(|u| *u as usize <= remaining - 2)
            .map_err(|len| DecodeError::RDataLengthExceedsMessage {
                len,
                remaining: remaining - 2,
            })?;

        // RDATA           a variable length string of octets that describes the
        //                resource.  The format of this information varies
        //                according to the TYPE and CLASS of the resource record.
        let rdata = Some(RData::read(decoder, record_type, Restrict::new(rd_length))?);

        Ok(Self {
            name_labels,
            rr_type: record_type,
            dns_class,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{name} {ttl} {class} {ty}",
            name = self.name_labels,
            ttl = self.ttl,
            class = self.dns_class,
            ty = self.rr_type,
        )?;

        if let Some(rdata) = &self.rdata {
            write!(f, " {rdata}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    use super::*;
    use crate::dnssec::rdata::NSEC;
    use crate::rr::rdata::{MX, NULL, OPT, TXT};

    fn emit_all(records: &[Record]) -> ProtoResult<Vec<u8>> {
        let mut bytes = vec![0_u8; 512];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        let mut names = CompressionIndex::default();
        for record in records {
            record.emit(&mut encoder, &mut names)?;
        }
        Ok(encoder.written().to_vec())
    }

    #[test]
    fn test_emit_and_read() {
        let record = Record::from_rdata(
            Name::from_str("www.example.com").unwrap(),
            5,
            RData::A(Ipv4Addr::new(192, 168, 0, 1)),
        );

        let bytes = emit_all(&[record.clone()]).unwrap();
        // 17 name, 10 fixed, 4 address
        assert_eq!(bytes.len(), 31);
        assert_eq!(&bytes[25..27], &[0, 4]);

        let mut decoder = BinDecoder::new(&bytes);
        let got = Record::read(&mut decoder).unwrap();
        assert_eq!(got, record);
        assert!(got.name().raw_bytes().is_some());
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_owner_compression() {
        let name = Name::from_str("example.com").unwrap();
        let records = [
            Record::from_rdata(name.clone(), 60, RData::MX(MX::new(10, name.clone()))),
            Record::from_rdata(name.clone(), 60, RData::A(Ipv4Addr::LOCALHOST)),
        ];
        let bytes = emit_all(&records).unwrap();

        // first record: 13 name, 10 fixed, 2 preference, pointer
        assert_eq!(&bytes[25..27], &[0xC0, 0x00]);
        // second owner is a pointer to the first
        assert_eq!(&bytes[27..29], &[0xC0, 0x00]);
    }

    #[test]
    fn test_nsec_owner_is_canonical() {
        let name = Name::from_str("example.com").unwrap();
        let records = [
            Record::from_rdata(name.clone(), 60, RData::A(Ipv4Addr::LOCALHOST)),
            Record::from_rdata(name.clone(), 60, RData::NSEC(NSEC::new(name, [RecordType::A]))),
        ];
        let bytes = emit_all(&records).unwrap();

        let nsec_start = 13 + 10 + 4;
        assert_eq!(&bytes[nsec_start..nsec_start + 13], &bytes[..13]);
    }

    #[test]
    fn test_missing_rdata() {
        let record = Record::with(Name::from_str("example.com").unwrap(), RecordType::MX, 60);
        let err = emit_all(&[record]).unwrap_err();
        assert_eq!(err.to_string(), "MX record requires \"priority\"");

        let record = Record::with(Name::root(), RecordType::AAAA, 60);
        assert_eq!(
            emit_all(&[record]).unwrap_err().to_string(),
            "A/AAAA record requires \"address\""
        );
    }

    #[test]
    fn test_empty_rdata_unknown_type() {
        let record = Record::with(Name::root(), RecordType::Unknown(65280), 0);
        let bytes = emit_all(&[record]).unwrap();
        assert_eq!(bytes, [0, 0xFF, 0, 0, 1, 0, 0, 0, 0, 0, 0]);

        let mut decoder = BinDecoder::new(&bytes);
        let got = Record::read(&mut decoder).unwrap();
        assert_eq!(
            got.data(),
            Some(&RData::Unknown {
                code: RecordType::Unknown(65280),
                rdata: NULL::new(),
            })
        );
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_empty_rdata_opt() {
        let mut record = Record::with(Name::root(), RecordType::OPT, 0);
        record.set_dns_class(DNSClass::from(1232));
        let bytes = emit_all(&[record]).unwrap();

        let got = Record::read(&mut BinDecoder::new(&bytes)).unwrap();
        assert_eq!(got.data(), Some(&RData::OPT(OPT::default())));
        assert_eq!(got.dns_class(), DNSClass::from(1232));
    }

    #[test]
    fn test_empty_rdata_fixed_layout() {
        // root owner, A, IN, ttl 0, rdlength 0
        let bytes = [0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0];
        let err = Record::read(&mut BinDecoder::new(&bytes)).unwrap_err();
        assert_eq!(err.as_decode(), Some(&DecodeError::InsufficientBytes));

        // the address is read past the record into the next one
        let mut bytes = bytes.to_vec();
        bytes.extend_from_slice(&[192, 0, 2, 1]);
        let err = Record::read(&mut BinDecoder::new(&bytes)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::IncorrectRDataLengthRead { read: 4, len: 0 })
        );
    }

    #[test]
    fn test_rdata_length_past_message() {
        let mut bytes = emit_all(&[Record::from_rdata(
            Name::root(),
            0,
            RData::TXT(TXT::new(vec!["abc".to_string()])),
        )])
        .unwrap();
        bytes.truncate(bytes.len() - 1);

        let err = Record::read(&mut BinDecoder::new(&bytes)).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::RDataLengthExceedsMessage {
                len: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_opt_owner_must_be_root() {
        let mut record = Record::with(Name::from_str("example.com").unwrap(), RecordType::OPT, 0);
        record.set_dns_class(DNSClass::from(4096));
        let bytes = emit_all(&[record]).unwrap();

        assert!(matches!(
            Record::read(&mut BinDecoder::new(&bytes)).unwrap_err().as_decode(),
            Some(DecodeError::EdnsNameNotRoot(_))
        ));
    }
}
