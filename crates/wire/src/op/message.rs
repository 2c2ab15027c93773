// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//! Basic protocol message for DNS

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::truncation::{self, Section};
use super::{Edns, Header, HeaderCounts, MessageType, Query, ResponseCode};
use crate::error::{DecodeError, ProtoErrorKind, ProtoResult};
use crate::rr::{CompressionIndex, Record, RecordType};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// The basic request and response data structure, used for all DNS protocols.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1. Format
///
/// All communications inside of the domain protocol are carried in a single
/// format called a message.  The top level format of message is divided
/// into 5 sections (some of which are empty in certain cases) shown below:
///
///     +--------------------------+
///     |        Header            |
///     +--------------------------+
///     |  Question / Zone         | the question for the name server
///     +--------------------------+
///     |   Answer  / Prerequisite | RRs answering the question
///     +--------------------------+
///     | Authority / Update       | RRs pointing toward an authority
///     +--------------------------+
///     |      Additional          | RRs holding additional information
///     +--------------------------+
///
/// The header section is always present.  The header includes fields that
/// specify which of the remaining sections are present, and also specify
/// whether the message is a query or a response, a standard query or some
/// other opcode, etc.
/// ```
///
/// Exactly one question is supported. The EDNS view and the OPT record in the additional
/// section describe the same data, a parsed message has both, see
/// [`Message::ensure_opt_record`] for messages that are built.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message {
    header: Header,
    queries: Vec<Query>,
    answers: Vec<Record>,
    name_servers: Vec<Record>,
    additionals: Vec<Record>,
    edns: Option<Edns>,
}

impl Message {
    /// Returns a new "empty" Message
    pub fn new() -> Self {
        Self::default()
    }

    /// A query for `query` with recursion desired
    ///
    /// ```
    /// use dnswire::op::{Message, Query};
    /// use dnswire::rr::{Name, RecordType};
    ///
    /// let query = Query::query(Name::from_ascii("example.com.").unwrap(), RecordType::A);
    /// let message = Message::query(0x1234, query);
    ///
    /// let bytes = message.to_vec().unwrap();
    /// assert_eq!(&bytes[..4], &[0x12, 0x34, 0x01, 0x00]);
    /// assert_eq!(Message::from_vec(&bytes).unwrap(), message);
    /// ```
    pub fn query(id: u16, query: Query) -> Self {
        let mut message = Self::new();
        message
            .header
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_recursion_desired(true);
        message.queries.push(query);
        message
    }

    /// Returns a Message constructed with error details to return to a client
    pub fn error_msg(id: u16, query: Query, response_code: ResponseCode) -> Self {
        let mut message = Self::query(id, query);
        message
            .header
            .set_message_type(MessageType::Response)
            .set_recursion_desired(false)
            .set_response_code(response_code);
        message
    }

    /// Sets the header, the counts are always derived from the sections
    pub fn set_header(&mut self, header: Header) -> &mut Self {
        self.header = header;
        self
    }

    /// see `Header::set_id`
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.header.set_id(id);
        self
    }

    /// see `Header::set_message_type`
    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.header.set_message_type(message_type);
        self
    }

    /// see `Header::set_recursion_desired`
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.header.set_recursion_desired(recursion_desired);
        self
    }

    /// Sets the full response code, the high bits travel in the EDNS record
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.header.set_response_code(response_code);
        if let Some(edns) = &mut self.edns {
            edns.set_rcode_high(response_code.high());
        }
        self
    }

    /// Add a query to the Message, either the query response from the server, or the request Query.
    pub fn add_query(&mut self, query: Query) -> &mut Self {
        self.queries.push(query);
        self
    }

    /// Add an answer to the Message
    pub fn add_answer(&mut self, record: Record) -> &mut Self {
        self.answers.push(record);
        self
    }

    /// Add all the records from the iterator to the answers section of the Message
    pub fn add_answers<R, I>(&mut self, records: R) -> &mut Self
    where
        R: IntoIterator<Item = Record, IntoIter = I>,
        I: Iterator<Item = Record>,
    {
        self.answers.extend(records);
        self
    }

    /// Add a name server record to the Message
    pub fn add_name_server(&mut self, record: Record) -> &mut Self {
        self.name_servers.push(record);
        self
    }

    /// Add all the records in the Iterator to the name server section of the message
    pub fn add_name_servers<R, I>(&mut self, records: R) -> &mut Self
    where
        R: IntoIterator<Item = Record, IntoIter = I>,
        I: Iterator<Item = Record>,
    {
        self.name_servers.extend(records);
        self
    }

    /// Add an additional Record to the message
    pub fn add_additional(&mut self, record: Record) -> &mut Self {
        self.additionals.push(record);
        self
    }

    /// Add all the records in the Iterator to the additional section of the message
    pub fn add_additionals<R, I>(&mut self, records: R) -> &mut Self
    where
        R: IntoIterator<Item = Record, IntoIter = I>,
        I: Iterator<Item = Record>,
    {
        self.additionals.extend(records);
        self
    }

    /// Request EDNS for this message
    ///
    /// Unless the additional section already holds an OPT record, one is packed from `edns` when
    /// the message is written.
    pub fn set_edns(&mut self, mut edns: Edns) -> &mut Self {
        edns.set_rcode_high(self.header.response_code().high());
        self.edns = Some(edns);
        self
    }

    /// Places the OPT record the EDNS view packs into at the front of the additional section
    ///
    /// Nothing happens without EDNS or if an OPT record is already present. Writing a message
    /// performs the same step on the fly, after this call the message equals the one parsed
    /// back from its bytes.
    pub fn ensure_opt_record(&mut self) -> &mut Self {
        if let Some(record) = self.synthesized_opt_record() {
            self.additionals.insert(0, record);
        }
        self
    }

    /// The OPT record to write ahead of the additional section, if one is needed
    fn synthesized_opt_record(&self) -> Option<Record> {
        let edns = self.edns.as_ref()?;
        if self
            .additionals
            .iter()
            .any(|record| record.record_type() == RecordType::OPT)
        {
            return None;
        }

        let mut edns = edns.clone();
        edns.set_rcode_high(self.header.response_code().high());
        Some(Record::from(&edns))
    }

    /// see `Header`
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// see `Header::id()`
    pub fn id(&self) -> u16 {
        self.header.id()
    }

    /// see `Header::message_type()`
    pub fn message_type(&self) -> MessageType {
        self.header.message_type()
    }

    /// see `Header::truncated()`
    pub fn truncated(&self) -> bool {
        self.header.truncated()
    }

    /// see `Header::response_code()`
    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code()
    }

    /// ```text
    /// Question        Carries the query name and other query parameters.
    /// ```
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// The single question of the message, `None` unless there is exactly one
    pub fn question(&self) -> Option<&Query> {
        match self.queries.as_slice() {
            [query] => Some(query),
            _ => None,
        }
    }

    /// ```text
    /// Answer          Carries RRs which directly answer the query.
    /// ```
    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    /// ```text
    /// Authority       Carries RRs which describe other authoritative servers.
    ///                 May optionally carry the SOA RR for the authoritative
    ///                 data in the answer section.
    /// ```
    pub fn name_servers(&self) -> &[Record] {
        &self.name_servers
    }

    /// ```text
    /// Additional      Carries RRs which may be helpful in using the RRs in the
    ///                 other sections.
    /// ```
    pub fn additionals(&self) -> &[Record] {
        &self.additionals
    }

    /// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6.1.1)
    ///
    /// ```text
    /// 6.1.1.  Basic Elements
    ///
    ///  An OPT pseudo-RR (sometimes called a meta-RR) MAY be added to the
    ///  additional data section of a request.
    /// ```
    pub fn edns(&self) -> Option<&Edns> {
        self.edns.as_ref()
    }

    /// Mutable access to the EDNS view, changes reach the wire only through a synthesized OPT
    /// record
    pub fn edns_mut(&mut self) -> Option<&mut Edns> {
        self.edns.as_mut()
    }

    /// Encodes the message into a buffer of the largest size a DNS message can have
    pub fn to_vec(&self) -> ProtoResult<Vec<u8>> {
        let mut buffer = vec![0; u16::MAX as usize];
        let len = write(&mut buffer, self)?;
        buffer.truncate(len);
        Ok(buffer)
    }

    /// Decodes a message from the buffer.
    pub fn from_vec(buffer: &[u8]) -> ProtoResult<Self> {
        parse(buffer)
    }
}

/// Writes `message` into `buffer`, returning the number of bytes written
///
/// The message must have exactly one question, and every record must carry the rdata its type
/// requires. A message that does not fit is truncated, see [`truncation`](super::truncation):
/// the returned length then covers only the records that fit and the TC bit is set. The only
/// size error is a buffer too small for the header and the question.
///
/// If EDNS is requested and the additional section holds no OPT record, one is written as the
/// first additional record, `message` itself is left as it is.
pub fn write(buffer: &mut [u8], message: &Message) -> ProtoResult<usize> {
    if message.queries.len() != 1 {
        return Err(ProtoErrorKind::QuestionCount(message.queries.len()).into());
    }

    let header = message.header;
    if message.edns.is_none() && header.response_code().high() != 0 {
        warn!(
            response_code = u16::from(header.response_code()),
            "response code requires EDNS, only its low bits are written"
        );
    }

    let opt = message.synthesized_opt_record();
    let sections: [(Section, Vec<&Record>); 3] = [
        (Section::Answer, message.answers.iter().collect()),
        (Section::Authority, message.name_servers.iter().collect()),
        (
            Section::Additional,
            opt.iter().chain(message.additionals.iter()).collect(),
        ),
    ];
    let counts = HeaderCounts {
        query_count: 1,
        answer_count: section_count(&sections[0].1)?,
        name_server_count: section_count(&sections[1].1)?,
        additional_count: section_count(&sections[2].1)?,
    };

    let mut encoder = BinEncoder::new(buffer);
    let mut names = CompressionIndex::default();

    // the header and the question are mandatory, there is nothing to truncate them to
    let capacity = encoder.capacity();
    header
        .emit(&mut encoder, &mut names)
        .and_then(|()| counts.emit(&mut encoder, &mut names))
        .and_then(|()| message.queries[0].emit(&mut encoder, &mut names))
        .map_err(|e| {
            if e.is_overflow() {
                ProtoErrorKind::BufferTooSmall(capacity).into()
            } else {
                e
            }
        })?;

    for (section, records) in &sections {
        for (kept, record) in records.iter().enumerate() {
            let record_start = encoder.offset();
            match record.emit(&mut encoder, &mut names) {
                Ok(()) => {}
                Err(e) if e.is_overflow() => {
                    // kept never exceeds the count, which fit in a u16
                    return truncation::truncate(
                        &mut encoder,
                        &header,
                        counts,
                        *section,
                        kept as u16,
                        record_start,
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(encoder.finish())
}

fn section_count(records: &[&Record]) -> ProtoResult<u16> {
    u16::try_from(records.len()).map_err(|_| ProtoErrorKind::TooManyRecords(records.len()).into())
}

/// Parses a complete message
///
/// The header must announce exactly one question. The first OPT record of the additional section
/// becomes the EDNS view and completes the response code of the header, the record itself stays
/// in the section. Any malformed record fails the whole message.
pub fn parse(bytes: &[u8]) -> ProtoResult<Message> {
    let mut decoder = BinDecoder::new(bytes);

    let mut header = Header::read(&mut decoder)?;
    let counts = HeaderCounts::read(&mut decoder)?;
    if counts.query_count != 1 {
        return Err(DecodeError::QuestionCount(counts.query_count).into());
    }

    let queries = vec![Query::read(&mut decoder)?];
    let answers = read_records(&mut decoder, counts.answer_count)?;
    let name_servers = read_records(&mut decoder, counts.name_server_count)?;
    let additionals = read_records(&mut decoder, counts.additional_count)?;

    let mut edns = None;
    for record in additionals
        .iter()
        .filter(|record| record.record_type() == RecordType::OPT)
    {
        if edns.is_some() {
            return Err(DecodeError::MoreThanOneEdns.into());
        }
        edns = Some(Edns::try_from(record)?);
    }

    if let Some(edns) = &edns {
        header.merge_response_code(edns.rcode_high());
    }

    if !decoder.is_empty() {
        debug!(trailing = decoder.len(), "ignoring bytes after the message");
    }

    Ok(Message {
        header,
        queries,
        answers,
        name_servers,
        additionals,
        edns,
    })
}

/// Attempts to read the specified number of records
fn read_records(decoder: &mut BinDecoder<'_>, count: u16) -> ProtoResult<Vec<Record>> {
    // the count is not trusted, each record takes at least 11 bytes
    let mut records = Vec::with_capacity((count as usize).min(decoder.len() / 11));
    for _ in 0..count {
        records.push(Record::read(decoder)?);
    }
    Ok(records)
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let write_query = |slice: &[Query], f: &mut fmt::Formatter<'_>| -> Result<(), fmt::Error> {
            for d in slice {
                writeln!(f, ";; {d}")?;
            }

            Ok(())
        };

        let write_slice = |slice: &[Record], f: &mut fmt::Formatter<'_>| -> Result<(), fmt::Error> {
            for d in slice {
                writeln!(f, "{d}")?;
            }

            Ok(())
        };

        writeln!(f, "; header {header}", header = self.header())?;

        if let Some(edns) = self.edns() {
            writeln!(f, "; edns {edns}")?;
        }

        writeln!(f, "; query")?;
        write_query(self.queries(), f)?;

        writeln!(f, "; answers {}", self.answers.len())?;
        write_slice(self.answers(), f)?;
        writeln!(f, "; nameservers {}", self.name_servers.len())?;
        write_slice(self.name_servers(), f)?;
        writeln!(f, "; additionals {}", self.additionals.len())?;
        write_slice(self.additionals(), f)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::rr::rdata::opt::{EdnsCode, EdnsOption};
    use crate::rr::{Name, RData};

    fn query() -> Query {
        Query::query(Name::from_ascii("www.example.com.").unwrap(), RecordType::A)
    }

    fn a_record(last: u8) -> Record {
        Record::from_rdata(
            Name::from_ascii("www.example.com.").unwrap(),
            300,
            RData::A(Ipv4Addr::new(192, 0, 2, last)),
        )
    }

    #[test]
    fn test_emit_and_read_header() {
        let mut message = Message::query(10, query());
        message
            .set_message_type(MessageType::Response)
            .add_answer(a_record(1))
            .add_answer(a_record(2));

        let bytes = message.to_vec().unwrap();
        // 12 header, 21 question, two answers of 2 pointer + 10 fixed + 4 address
        assert_eq!(bytes.len(), 12 + 21 + 2 * 16);
        assert_eq!(&bytes[4..12], &[0, 1, 0, 2, 0, 0, 0, 0]);

        let parsed = Message::from_vec(&bytes).unwrap();
        assert_eq!(parsed, message);
        assert!(parsed.edns().is_none());
    }

    #[test]
    fn test_question_count() {
        let mut message = Message::new();
        assert!(matches!(
            write(&mut [0; 512], &message).unwrap_err().kind(),
            ProtoErrorKind::QuestionCount(0)
        ));

        message.add_query(query()).add_query(query());
        assert!(matches!(
            message.to_vec().unwrap_err().kind(),
            ProtoErrorKind::QuestionCount(2)
        ));

        let mut bytes = Message::query(1, query()).to_vec().unwrap();
        bytes[5] = 2;
        assert_eq!(
            parse(&bytes).unwrap_err().as_decode(),
            Some(&DecodeError::QuestionCount(2))
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let message = Message::query(1, query());
        let err = write(&mut [0; 20], &message).unwrap_err();
        assert!(matches!(err.kind(), ProtoErrorKind::BufferTooSmall(20)));
        assert!(!err.is_overflow());
    }

    #[test]
    fn test_edns_synthesized_first() {
        let mut message = Message::query(1, query());
        message.add_additional(a_record(9));
        let mut edns = Edns::new();
        edns.set_max_payload(4096).set_dnssec_ok(true);
        edns.options_mut()
            .insert(EdnsOption::new(EdnsCode::Padding, vec![0; 4]));
        message.set_edns(edns);

        let bytes = message.to_vec().unwrap();
        assert_eq!(&bytes[10..12], &[0, 2]);

        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.additionals()[0].record_type(), RecordType::OPT);
        assert_eq!(parsed.additionals()[1], a_record(9));
        assert!(parsed.edns().unwrap().dnssec_ok());
        assert_eq!(parsed.edns().unwrap().max_payload(), 4096);

        // written as is, once the record is in place
        message.ensure_opt_record();
        assert_eq!(message.additionals().len(), 2);
        assert_eq!(parsed, message);
        assert_eq!(message.to_vec().unwrap(), bytes);
    }

    #[test]
    fn test_extended_response_code() {
        let mut message = Message::error_msg(3, query(), ResponseCode::BADVERS);
        message.set_edns(Edns::new());

        let bytes = message.to_vec().unwrap();
        // the header only carries the low bits
        assert_eq!(bytes[3] & 0x0F, 0);

        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.response_code(), ResponseCode::BADVERS);
        assert_eq!(parsed.edns().unwrap().rcode_high(), 1);

        message.ensure_opt_record();
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_more_than_one_edns() {
        let mut message = Message::query(1, query());
        message
            .add_additional(Record::from(&Edns::new()))
            .add_additional(Record::from(&Edns::new()));

        let bytes = message.to_vec().unwrap();
        assert_eq!(
            parse(&bytes).unwrap_err().as_decode(),
            Some(&DecodeError::MoreThanOneEdns)
        );
    }

    #[test]
    fn test_opt_anywhere_in_additional() {
        let mut message = Message::query(1, query());
        let mut edns = Edns::new();
        edns.set_version(1);
        message
            .add_additional(a_record(1))
            .add_additional(Record::from(&edns));

        let parsed = parse(&message.to_vec().unwrap()).unwrap();
        assert_eq!(parsed.edns().unwrap().version(), 1);
        assert_eq!(parsed.additionals()[1].record_type(), RecordType::OPT);
    }

    #[test]
    fn test_display() {
        let mut message = Message::query(0x0102, query());
        message.add_answer(a_record(1));

        let text = message.to_string();
        assert!(text.contains(";; www.example.com IN A"));
        assert!(text.contains("www.example.com 300 IN A 192.0.2.1"));
        assert!(text.contains("; answers 1"));
    }
}
