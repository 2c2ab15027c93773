// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//! Extended DNS options

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ProtoError, ProtoErrorKind};
use crate::rr::rdata::opt::{EdnsCode, EdnsOption};
use crate::rr::rdata::OPT;
use crate::rr::{DNSClass, Name, RData, Record, RecordType};

/// Edns implements the higher level concepts for working with extended dns as it is used to
/// create or be created from OPT record data.
///
/// ```text
///             +0 (MSB)                            +1 (LSB)
///  +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  |         EXTENDED-RCODE        |            VERSION            |
///  +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  | DO|                           Z                               |
///  +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Edns {
    // high 8 bits that make up the 12 bit total field when included with the 4bit rcode from the
    //  header (from TTL)
    rcode_high: u8,
    // Indicates the implementation level of the setter. (from TTL)
    version: u8,
    // DNSSEC OK and Z flags (from TTL)
    flags: u16,
    // max payload size, minimum of 512, (from RR CLASS)
    max_payload: u16,

    options: OPT,
}

impl Default for Edns {
    fn default() -> Self {
        Self {
            rcode_high: 0,
            version: 0,
            flags: 0,
            max_payload: 512,
            options: OPT::default(),
        }
    }
}

impl Edns {
    /// Creates a new extended DNS object.
    pub fn new() -> Self {
        Self::default()
    }

    /// The high order bytes for the response code in the DNS Message
    pub fn rcode_high(&self) -> u8 {
        self.rcode_high
    }

    /// Returns the EDNS version
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Specifies that DNSSEC is supported for this Client or Server
    pub fn dnssec_ok(&self) -> bool {
        self.flags & 0x8000 == 0x8000
    }

    /// The 15 reserved flag bits following DO
    pub fn z_flags(&self) -> u16 {
        self.flags & 0x7FFF
    }

    /// Maximum supported size of the DNS payload
    pub fn max_payload(&self) -> u16 {
        self.max_payload
    }

    /// Returns the Option associated with the code
    pub fn option(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options.get(code)
    }

    /// Returns the options portion of EDNS
    pub fn options(&self) -> &OPT {
        &self.options
    }

    /// Returns a mutable options portion of EDNS
    pub fn options_mut(&mut self) -> &mut OPT {
        &mut self.options
    }

    /// Set the high order bits for the result code.
    pub fn set_rcode_high(&mut self, rcode_high: u8) -> &mut Self {
        self.rcode_high = rcode_high;
        self
    }

    /// Set the EDNS version
    pub fn set_version(&mut self, version: u8) -> &mut Self {
        self.version = version;
        self
    }

    /// Creates a new extended DNS object prepared for DNSSEC messages.
    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        if dnssec_ok {
            self.flags |= 0x8000;
        } else {
            self.flags &= !0x8000;
        }
        self
    }

    /// Set the reserved flag bits, the DO bit is left alone
    pub fn set_z_flags(&mut self, z: u16) -> &mut Self {
        self.flags &= !0x7FFF;
        self.flags |= z & 0x7FFF;
        self
    }

    /// Set the maximum payload which can be supported
    /// From RFC 6891: `Values lower than 512 MUST be treated as equal to 512`
    pub fn set_max_payload(&mut self, max_payload: u16) -> &mut Self {
        self.max_payload = max_payload.max(512);
        self
    }

    /// The TTL field of the OPT record this view packs into
    fn ttl(&self) -> u32 {
        let mut ttl: u32 = u32::from(self.rcode_high) << 24;
        ttl |= u32::from(self.version) << 16;
        ttl |= u32::from(self.flags);
        ttl
    }
}

/// Unpacks the OPT pseudo record, the payload size is taken as is, even below 512
impl<'a> TryFrom<&'a Record> for Edns {
    type Error = ProtoError;

    fn try_from(value: &'a Record) -> Result<Self, Self::Error> {
        let options = match value.data() {
            // built by hand without rdata
            None => OPT::default(),
            Some(RData::OPT(option_data)) => option_data.clone(),
            Some(other) => {
                return Err(ProtoErrorKind::RDataMismatch {
                    record_type: RecordType::OPT,
                    rdata_type: other.record_type(),
                }
                .into())
            }
        };

        let ttl = value.ttl();
        Ok(Self {
            rcode_high: ((ttl & 0xFF00_0000u32) >> 24) as u8,
            version: ((ttl & 0x00FF_0000u32) >> 16) as u8,
            flags: (ttl & 0x0000_FFFFu32) as u16,
            max_payload: u16::from(value.dns_class()),
            options,
        })
    }
}

/// Packs the view into an OPT pseudo record owned by the root
///
/// The record always carries OPT rdata, empty when there are no options, the same as an OPT
/// record with an empty rdata reads back.
impl<'a> From<&'a Edns> for Record {
    fn from(value: &'a Edns) -> Self {
        let mut record = Self::with(Name::root(), RecordType::OPT, value.ttl());
        record
            .set_dns_class(DNSClass::from(value.max_payload))
            .set_data(Some(RData::OPT(value.options.clone())));
        record
    }
}

impl fmt::Display for Edns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "version: {version} dnssec_ok: {dnssec_ok} z_flags: 0x{z_flags:04x} \
             max_payload: {max_payload} opts: {opts_len}",
            version = self.version,
            dnssec_ok = self.dnssec_ok(),
            z_flags = self.z_flags(),
            max_payload = self.max_payload,
            opts_len = self.options.options().len()
        )
    }
}
