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

//! service records for identify port mapping for specific services on a host

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ProtoResult;
use crate::rr::{CompressionIndex, Name};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// [RFC 2782, DNS SRV RR, February 2000](https://tools.ietf.org/html/rfc2782)
///
/// ```text
/// Introductory example
///
///  If a SRV-cognizant LDAP client wants to discover a LDAP server that
///  supports TCP protocol and provides LDAP service for the domain
///  example.com., it does a lookup of
///
/// _ldap._tcp.example.com
///
///  as described in [ARM].  The example zone file near the end of this
///  memo contains answering RRs for an SRV query.
///
///  Note: LDAP is chosen as an example for illustrative purposes only,
///  and the LDAP examples used in this document should not be considered
///  a definitive statement on the recommended way to support LDAP in the
///  DNS.
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SRV {
    priority: u16,
    weight: u16,
    port: u16,
    target: Name,
}

impl SRV {
    /// Creates a new SRV record data.
    ///
    /// # Arguments
    ///
    /// * `priority` - lower values have a higher priority and clients will attempt to use these
    ///                first.
    /// * `weight` - for servers with the same priority, higher weights will be chosen more often.
    /// * `port` - the socket port number on which the service is listening.
    /// * `target` - like CNAME, this is the target domain name to which the service is associated.
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// ```text
    /// Priority
    ///  The priority of this target host.  A client MUST attempt to
    ///  contact the target host with the lowest-numbered priority it can
    ///  reach; target hosts with the same priority SHOULD be tried in an
    ///  order defined by the weight field.
    /// ```
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// ```text
    /// Weight
    ///  A server selection mechanism.  The weight field specifies a
    ///  relative weight for entries with the same priority.
    /// ```
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// ```text
    /// Port
    ///  The port on this target host of this service.
    /// ```
    pub fn port(&self) -> u16 {
        self.port
    }

    /// ```text
    /// Target
    ///  The domain name of the target host.  There MUST be one or more
    ///  address records for this name, the name MUST NOT be an alias (in
    ///  the sense of RFC 1034 or RFC 2181).
    /// ```
    pub fn target(&self) -> &Name {
        &self.target
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<SRV> {
    // SRV { priority: u16, weight: u16, port: u16, target: Name, }
    Ok(SRV::new(
        decoder.read_u16()?.unverified(/*any u16 is valid*/),
        decoder.read_u16()?.unverified(/*any u16 is valid*/),
        decoder.read_u16()?.unverified(/*any u16 is valid*/),
        Name::read(decoder)?,
    ))
}

/// The target is written with compression, as most resolvers accept it
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    srv: &SRV,
) -> ProtoResult<()> {
    encoder.emit_u16(srv.priority())?;
    encoder.emit_u16(srv.weight())?;
    encoder.emit_u16(srv.port())?;
    srv.target().emit(encoder, names)
}

/// ```text
/// _Service._Proto.Name TTL Class SRV Priority Weight Port Target
/// ```
impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{priority} {weight} {port} {target}",
            priority = self.priority,
            weight = self.weight,
            port = self.port,
            target = self.target,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let rdata = SRV::new(1, 2, 3, Name::from_ascii("_dns._tcp.example.com").unwrap());

        let mut bytes = [0_u8; 64];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        emit(&mut encoder, &mut CompressionIndex::default(), &rdata).unwrap();
        let len = encoder.finish();
        assert_eq!(&bytes[..6], &[0, 1, 0, 2, 0, 3]);

        let mut decoder = BinDecoder::new(&bytes[..len]);
        let read_rdata = read(&mut decoder, Restrict::new(len as u16)).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
        assert!(decoder.is_empty());
    }
}
