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

//! IPv4 address record data
//!
//! [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
//!
//! ```text
//! 3.4. Internet specific RRs
//!
//! 3.4.1. A RDATA format
//!
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!     |                    ADDRESS                    |
//!     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//!
//! where:
//!
//! ADDRESS         A 32 bit Internet address.
//! ```

pub use std::net::Ipv4Addr;

use crate::error::ProtoResult;
use crate::rr::CompressionIndex;
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<Ipv4Addr> {
    Ipv4Addr::read(decoder)
}

/// Write the RData to the given Encoder
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    address: &Ipv4Addr,
) -> ProtoResult<()> {
    address.emit(encoder, names)
}
