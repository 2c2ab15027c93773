// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//! What to keep when a message does not fit its buffer
//!
//! Sections are written answer first, then authority, then additional, and that is also
//! their priority: the section a record overflowed in keeps the records written before it,
//! every later section is dropped entirely, earlier sections are never touched. The header is
//! rewritten with the TC bit set and the counts of what remains.
//!
//! This is coarser than [RFC 2181, section 9](https://tools.ietf.org/html/rfc2181#section-9),
//! which asks to omit only the RRset that did not fit and to leave TC clear when that happens
//! outside of the answer section.

use std::fmt;

use tracing::debug;

use super::{Header, HeaderCounts};
use crate::error::ProtoResult;
use crate::rr::CompressionIndex;
use crate::serialize::binary::{BinEncodable, BinEncoder};

/// The record sections of a message, in wire and priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Answers to the question
    Answer,
    /// Name servers, aka the authority section
    Authority,
    /// Additional records, where the OPT record lives
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Answer => "answer",
            Self::Authority => "authority",
            Self::Additional => "additional",
        })
    }
}

/// The counts announced after `section` overflowed with `kept` of its records written
pub fn truncated_counts(counts: HeaderCounts, section: Section, kept: u16) -> HeaderCounts {
    match section {
        Section::Answer => HeaderCounts {
            answer_count: kept,
            name_server_count: 0,
            additional_count: 0,
            ..counts
        },
        Section::Authority => HeaderCounts {
            name_server_count: kept,
            additional_count: 0,
            ..counts
        },
        Section::Additional => HeaderCounts {
            additional_count: kept,
            ..counts
        },
    }
}

/// Rewrites the header in place for a truncated message and rewinds to `record_start`
///
/// `record_start` is the offset of the record that did not fit, which becomes the length of the
/// message.
pub(crate) fn truncate(
    encoder: &mut BinEncoder<'_>,
    header: &Header,
    counts: HeaderCounts,
    section: Section,
    kept: u16,
    record_start: usize,
) -> ProtoResult<usize> {
    let mut header = *header;
    header.set_truncated(true);
    let counts = truncated_counts(counts, section, kept);
    debug!(%section, kept, len = record_start, "message truncated");

    // the header fit before, it fits again
    let mut names = CompressionIndex::default();
    encoder.set_offset(0)?;
    header.emit(encoder, &mut names)?;
    counts.emit(encoder, &mut names)?;
    encoder.set_offset(record_start)?;

    Ok(record_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::binary::BinDecodable;

    const COUNTS: HeaderCounts = HeaderCounts {
        query_count: 1,
        answer_count: 4,
        name_server_count: 3,
        additional_count: 2,
    };

    #[test]
    fn test_priority() {
        assert_eq!(
            truncated_counts(COUNTS, Section::Answer, 2),
            HeaderCounts {
                query_count: 1,
                answer_count: 2,
                name_server_count: 0,
                additional_count: 0,
            }
        );
        assert_eq!(
            truncated_counts(COUNTS, Section::Authority, 0),
            HeaderCounts {
                query_count: 1,
                answer_count: 4,
                name_server_count: 0,
                additional_count: 0,
            }
        );
        assert_eq!(
            truncated_counts(COUNTS, Section::Additional, 1),
            HeaderCounts {
                additional_count: 1,
                ..COUNTS
            }
        );
        assert!(Section::Answer < Section::Authority && Section::Authority < Section::Additional);
    }

    #[test]
    fn test_rewrites_header() {
        let mut bytes = [0xFF_u8; 32];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        let mut header = Header::new();
        header.set_id(7).set_recursion_desired(true);
        header
            .emit(&mut encoder, &mut CompressionIndex::default())
            .unwrap();
        COUNTS
            .emit(&mut encoder, &mut CompressionIndex::default())
            .unwrap();
        encoder.emit_vec(&[1, 2, 3, 4, 5, 6]).unwrap();

        let len = truncate(&mut encoder, &header, COUNTS, Section::Authority, 1, 14).unwrap();
        assert_eq!(len, 14);
        assert_eq!(encoder.finish(), 14);

        let mut decoder = crate::serialize::binary::BinDecoder::new(&bytes[..14]);
        let read = Header::read(&mut decoder).unwrap();
        assert!(read.truncated());
        assert!(read.recursion_desired());
        assert_eq!(
            HeaderCounts::read(&mut decoder).unwrap(),
            HeaderCounts {
                query_count: 1,
                answer_count: 4,
                name_server_count: 1,
                additional_count: 0,
            }
        );
    }
}
