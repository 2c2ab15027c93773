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

//! mail exchange, email, record

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ProtoResult;
use crate::rr::{CompressionIndex, Name};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 3.3.9. MX RDATA format
///
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                  PREFERENCE                   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                   EXCHANGE                    /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// MX records cause type A additional section processing for the host
/// specified by EXCHANGE.  The use of MX RRs is explained in detail in
/// [RFC-974].
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MX {
    preference: u16,
    exchange: Name,
}

impl MX {
    /// Constructs a new MX RData
    ///
    /// # Arguments
    ///
    /// * `preference` - weight of this MX record as opposed to others, lower values have the
    ///   higher preference
    /// * `exchange` - Name labels for the mail server
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// ```text
    /// PREFERENCE      A 16 bit integer which specifies the preference given to
    ///                 this RR among others at the same owner.  Lower values
    ///                 are preferred.
    /// ```
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// ```text
    /// EXCHANGE        A <domain-name> which specifies a host willing to act as
    ///                 a mail exchange for the owner name.
    /// ```
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<MX> {
    Ok(MX::new(
        decoder.read_u16()?.unverified(/*any u16 is a valid preference*/),
        Name::read(decoder)?,
    ))
}

/// The exchange may be compressed
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    mx: &MX,
) -> ProtoResult<()> {
    encoder.emit_u16(mx.preference())?;
    mx.exchange().emit(encoder, names)
}

/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// MX RR format:
///
///    <owner> <ttl> <class> MX <preference> <exchange>
/// ```
impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{pref} {ex}", pref = self.preference, ex = self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_is_compressed() {
        let mut bytes = [0_u8; 64];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        let mut names = CompressionIndex::default();

        Name::from_ascii("example.com")
            .unwrap()
            .emit(&mut encoder, &mut names)
            .unwrap();
        let rdata = MX::new(16, Name::from_ascii("mail.example.com").unwrap());
        emit(&mut encoder, &mut names, &rdata).unwrap();

        assert_eq!(
            &encoder.written()[13..],
            &[0, 16, 4, b'm', b'a', b'i', b'l', 0xC0, 0x00]
        );

        let len = encoder.finish();
        let mut decoder = BinDecoder::new(&bytes[..len]);
        decoder.set_offset(13).unwrap();
        let read_rdata = read(&mut decoder, Restrict::new(9)).unwrap();
        assert_eq!(read_rdata, rdata);
        assert_eq!(read_rdata.to_string(), "16 mail.example.com");
    }
}
