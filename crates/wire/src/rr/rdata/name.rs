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

//! Record data for all record types which consist of a single name: NS, CNAME and PTR

use crate::error::ProtoResult;
use crate::rr::{CompressionIndex, Name};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, _: Restrict<u16>) -> ProtoResult<Name> {
    Name::read(decoder)
}

/// [RFC 1035](https://tools.ietf.org/html/rfc1035) allows compression of these names
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    name: &Name,
) -> ProtoResult<()> {
    name.emit(encoder, names)
}
