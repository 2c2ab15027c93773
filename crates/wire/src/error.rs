// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

#![deny(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::rr::{Name, RecordType};

/// An alias for results returned by functions of this crate
pub type ProtoResult<T> = ::std::result::Result<T, ProtoError>;

/// An alias for results of the low level decoding routines
pub(crate) type DecodeResult<T> = ::std::result::Result<T, DecodeError>;

/// The error kind for errors that get returned in the crate
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ProtoErrorKind {
    /// The output buffer can not hold the header and the question
    #[error("buffer of {0} bytes can not hold the header and question")]
    BufferTooSmall(usize),

    /// Character data length exceeded the limit
    #[non_exhaustive]
    #[error("char data length exceeds {max}: {len}")]
    CharacterDataTooLong {
        /// Specified maximum
        max: usize,
        /// Actual length
        len: usize,
    },

    /// Message decoding error
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// A domain name was too long
    #[error("name exceeds 255 bytes on the wire: {0}")]
    DomainNameTooLong(usize),

    /// An empty label was found in the middle of a name
    #[error("empty label in name: {0:?}")]
    EmptyLabel(String),

    /// Label bytes exceeded the limit of 63
    #[error("label bytes exceed 63: {0}")]
    LabelBytesTooLong(usize),

    /// The maximum buffer size was exceeded
    ///
    /// This is the overflow signal that drives truncation, it never leaves `write`.
    #[error("maximum buffer size exceeded: {0}")]
    MaxBufferSizeExceeded(usize),

    /// An error with an arbitrary message, referenced as &'static str
    #[error("{0}")]
    Message(&'static str),

    /// A record is missing the rdata its type requires
    #[non_exhaustive]
    #[error("{record} record requires \"{field}\"")]
    MissingRData {
        /// Family of record types, e.g. `A/AAAA`
        record: &'static str,
        /// The first field the record can not be written without
        field: &'static str,
    },

    /// An error with an arbitrary message, stored as String
    #[error("{0}")]
    Msg(String),

    /// Messages must carry exactly one question
    #[error("DNS requires one question, found {0}")]
    QuestionCount(usize),

    /// The rdata variant does not belong to the record type
    #[non_exhaustive]
    #[error("record of type {record_type} carries {rdata_type} rdata")]
    RDataMismatch {
        /// The type of the record
        record_type: RecordType,
        /// The type implied by the rdata
        rdata_type: RecordType,
    },

    /// The rdata did not fit in the 16 bit length field
    #[error("rdata length exceeds 65535: {0}")]
    RDataTooLong(usize),

    /// A section holds more records than its 16 bit count can express
    #[error("section holds more than 65535 records: {0}")]
    TooManyRecords(usize),

    /// The registry has no class for this mnemonic
    #[error("dns class string unknown: {0}")]
    UnknownDnsClassStr(String),

    /// The registry has no type for this mnemonic
    #[error("record type string unknown: {0}")]
    UnknownRecordTypeStr(String),
}

/// The error type for errors that get returned in the crate
#[derive(Error, Clone, Debug)]
#[non_exhaustive]
pub struct ProtoError {
    /// Kind of error that occurred
    pub kind: Box<ProtoErrorKind>,
}

impl ProtoError {
    /// Get the kind of the error
    #[inline]
    pub fn kind(&self) -> &ProtoErrorKind {
        &self.kind
    }

    /// Returns true if a write ran past the end of the output buffer
    #[inline]
    pub fn is_overflow(&self) -> bool {
        matches!(*self.kind, ProtoErrorKind::MaxBufferSizeExceeded(_))
    }

    /// Returns the decoding error, if this is one
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match &*self.kind {
            ProtoErrorKind::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl<E: Into<ProtoErrorKind>> From<E> for ProtoError {
    fn from(error: E) -> Self {
        Self {
            kind: Box::new(error.into()),
        }
    }
}

impl From<&'static str> for ProtoError {
    fn from(msg: &'static str) -> Self {
        ProtoErrorKind::Message(msg).into()
    }
}

impl From<String> for ProtoError {
    fn from(msg: String) -> Self {
        ProtoErrorKind::Msg(msg).into()
    }
}

/// An error that can occur deep in a decoder, i.e. malformed input
///
/// This type is kept very small so that function that use it inline often
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Type bitmap windows must appear in strictly ascending order
    #[non_exhaustive]
    #[error("bitmap window {window} follows window {previous}")]
    BitMapWindowOutOfOrder {
        /// The window read before
        previous: u8,
        /// The offending window
        window: u8,
    },

    /// Type bitmap window length outside of 1..=32 or past the end of the rdata
    #[non_exhaustive]
    #[error("bitmap window {window} has invalid length {len}")]
    BitMapLengthInvalid {
        /// The window
        window: u8,
        /// Declared length of its map
        len: u8,
    },

    /// EDNS resource record label is not the root label, although required
    #[error("edns resource record label must be the root label (.): {0}")]
    EdnsNameNotRoot(Name),

    /// The length of rdata read was not as expected
    #[non_exhaustive]
    #[error("incorrect rdata length read: {read} expected: {len}")]
    IncorrectRDataLengthRead {
        /// The amount of read data
        read: usize,
        /// The expected length of the data
        len: usize,
    },

    /// Insufficient data in the buffer for a read operation
    #[error("unexpected end of input reached")]
    InsufficientBytes,

    /// slice_from was called with an invalid index
    #[error("the index passed to slice_from must not be past the cursor position")]
    InvalidPreviousIndex,

    /// A domain name was too long
    #[error("name label data exceed 255: {0}")]
    DomainNameTooLong(usize),

    /// An EDNS option declares more data than its OPT record holds
    #[non_exhaustive]
    #[error("edns option {code} declares {len} bytes, {remaining} left in the rdata")]
    EdnsOptionLengthExceedsRData {
        /// Code of the option
        code: u16,
        /// Declared option length
        len: usize,
        /// Bytes left in the rdata
        remaining: usize,
    },

    /// More than one OPT record in the additional section
    #[error("more than one edns record present")]
    MoreThanOneEdns,

    /// Pointer points to an index within or after the current label run
    #[non_exhaustive]
    #[error("label points to data not prior to idx: {idx} ptr: {ptr}")]
    PointerNotPriorToLabel {
        /// index of the label containing this pointer
        idx: usize,
        /// location to which the pointer is directing
        ptr: u16,
    },

    /// The header did not declare exactly one question
    #[error("DNS requires one question, header declares {0}")]
    QuestionCount(u16),

    /// The rdata is shorter than the fixed fields and inner lengths of its type require
    #[non_exhaustive]
    #[error("{record_type} rdata needs at least {needed} bytes, has {len}")]
    RDataTooShort {
        /// Type of the record
        record_type: RecordType,
        /// Bytes required by what was read so far
        needed: usize,
        /// Declared rdata length
        len: usize,
    },

    /// The declared rdata length runs past the end of the message
    #[non_exhaustive]
    #[error("rdata length {len} exceeds the {remaining} bytes left in the message")]
    RDataLengthExceedsMessage {
        /// Declared rdata length
        len: u16,
        /// Bytes left in the message
        remaining: usize,
    },

    /// An unrecognized label code was found
    #[error("unrecognized label code: {0:b}")]
    UnrecognizedLabelCode(u8),
}
