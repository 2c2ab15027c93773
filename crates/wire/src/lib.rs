// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! DNS wire format library
//!
//! Reads and writes complete DNS messages ([RFC 1035]) into caller supplied buffers. Names are
//! compressed on write, except where DNSSEC requires the canonical form, and EDNS0 ([RFC 6891])
//! is folded into and out of the OPT pseudo record, see [`op::Edns`]. A message that does not fit
//! its buffer is truncated rather than rejected, see [`op::truncation`].
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use dnswire::op::{Message, MessageType, Query};
//! use dnswire::rr::{Name, RData, Record, RecordType};
//!
//! let name = Name::from_ascii("www.example.com.").unwrap();
//! let mut message = Message::query(7, Query::query(name.clone(), RecordType::A));
//! message
//!     .set_message_type(MessageType::Response)
//!     .add_answer(Record::from_rdata(name, 60, RData::A(Ipv4Addr::new(192, 0, 2, 1))));
//!
//! let mut buffer = [0_u8; 512];
//! let len = dnswire::write(&mut buffer, &message).unwrap();
//! let parsed = dnswire::parse(&buffer[..len]).unwrap();
//! assert_eq!(parsed, message);
//! ```
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035
//! [RFC 6891]: https://tools.ietf.org/html/rfc6891

pub mod dnssec;
pub mod error;
pub mod op;
pub mod rr;
pub mod serialize;

pub use self::error::{DecodeError, ProtoError, ProtoErrorKind, ProtoResult};
pub use self::op::{parse, write};
