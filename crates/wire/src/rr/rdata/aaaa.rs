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

//! IPv6 address record data
//!
//! [RFC 3596, DNS Extensions to Support IPv6, October 2003](https://tools.ietf.org/html/rfc3596)
//!
//! ```text
//! 2.2 AAAA data format
//!
//!    A 128 bit IPv6 address is encoded in the data portion of an AAAA
//!    resource record in network byte order (high-order byte first).
//! ```

pub use std::net::Ipv6Addr;

use crate::error::ProtoResult;
use crate::rr::CompressionIndex;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// Read the RData from the given Decoder, as eight 16 bit groups
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<Ipv6Addr> {
    Ipv6Addr::read(decoder)
}

/// Write the RData to the given Encoder
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    address: &Ipv6Addr,
) -> ProtoResult<()> {
    address.emit(encoder, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_not_compressed() {
        let bytes = [
            0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
        ];
        let mut decoder = BinDecoder::new(&bytes);
        let address = read(&mut decoder, Restrict::new(16)).unwrap();
        assert_eq!(address.segments(), [0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
    }
}
