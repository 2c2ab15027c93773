// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! domain name, aka labels, implementation

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::error::{DecodeError, DecodeResult, ProtoErrorKind, ProtoResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict};

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
/// Highest offset a compression pointer can express
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// A domain name, a sequence of labels ending implicitly in the root
///
/// Names decoded from a message also keep the exact bytes they were read from, pointers
/// included, see [`Name::raw_bytes`]. Equality and hashing only consider the labels.
#[derive(Clone, Default)]
pub struct Name {
    labels: Vec<Box<[u8]>>,
    raw: Option<Box<[u8]>>,
}

impl Name {
    /// The root name, `.`
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true if there are no labels, i.e. this is the root
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of labels, not counting the root
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Iterates over the labels, leftmost first
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.labels.iter().map(AsRef::as_ref)
    }

    /// Builds a name from raw labels
    ///
    /// Every label must hold 1 to 63 bytes and the whole name must fit in 255 bytes on the wire.
    pub fn from_labels<I, L>(labels: I) -> ProtoResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let labels = labels
            .into_iter()
            .map(|l| Box::<[u8]>::from(l.as_ref()))
            .collect::<Vec<_>>();

        for label in &labels {
            if label.is_empty() {
                return Err(ProtoErrorKind::EmptyLabel(String::new()).into());
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(ProtoErrorKind::LabelBytesTooLong(label.len()).into());
            }
        }

        let name = Self { labels, raw: None };
        if name.encoded_len() > MAX_NAME_LEN {
            return Err(ProtoErrorKind::DomainNameTooLong(name.encoded_len()).into());
        }

        Ok(name)
    }

    /// Parses a dotted name such as `www.example.com` or `www.example.com.`
    ///
    /// Both `""` and `"."` are the root.
    ///
    /// ```
    /// use dnswire::rr::Name;
    ///
    /// let name = Name::from_ascii("www.example.com.").unwrap();
    /// assert_eq!(name.num_labels(), 3);
    /// assert_eq!(name.to_string(), "www.example.com");
    /// assert!(Name::from_ascii(".").unwrap().is_root());
    /// ```
    pub fn from_ascii<S: AsRef<str>>(name: S) -> ProtoResult<Self> {
        let name = name.as_ref();
        let trimmed = name.strip_suffix('.').unwrap_or(name);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        if trimmed.contains('\0') {
            return Err(ProtoErrorKind::Message("names may not contain NUL").into());
        }
        if trimmed.split('.').any(str::is_empty) {
            return Err(ProtoErrorKind::EmptyLabel(name.to_string()).into());
        }

        Self::from_labels(trimmed.split('.'))
    }

    /// The wire bytes this name was decoded from, compression pointers included
    ///
    /// `None` for names that were built rather than read. These bytes are only a record of the
    /// input, writing a name always encodes it again from its labels.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Length of the uncompressed wire form, including the terminating zero
    pub fn encoded_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Writes the name, with `canonical` set no compression pointer is emitted
    ///
    /// Offsets of every suffix written here are stored in `names` in either mode, so later names
    /// may point into a canonical one.
    pub fn emit_as_canonical(
        &self,
        encoder: &mut BinEncoder<'_>,
        names: &mut CompressionIndex,
        canonical: bool,
    ) -> ProtoResult<()> {
        for (i, label) in self.labels.iter().enumerate() {
            let suffix = &self.labels[i..];
            if !canonical {
                if let Some(offset) = names.get(suffix) {
                    return encoder.emit_u16(0xC000 | offset);
                }
            }

            let offset = encoder.offset();
            encoder.emit_character_data(label)?;
            names.insert(suffix, offset);
        }

        // the root label
        encoder.emit(0)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{self}\")")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }

        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&String::from_utf8_lossy(label))?;
        }

        Ok(())
    }
}

impl FromStr for Name {
    type Err = crate::ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}

impl BinEncodable for Name {
    fn emit(&self, encoder: &mut BinEncoder<'_>, names: &mut CompressionIndex) -> ProtoResult<()> {
        self.emit_as_canonical(encoder, names, false)
    }
}

impl BinDecodable for Name {
    /// Parses a name from the decoder, following compression pointers
    ///
    /// The decoder is left after the first pointer of the name, or after its terminating zero
    /// if it has none, however many pointers were followed.
    fn read(decoder: &mut BinDecoder<'_>) -> ProtoResult<Self> {
        read_name(decoder).map_err(Into::into)
    }
}

//         4.1.4. Message compression
//
// In order to reduce the size of messages, the domain system utilizes a
// compression scheme which eliminates the repetition of domain names in a
// message.  In this scheme, an entire domain name or a list of labels at
// the end of a domain name is replaced with a pointer to a prior occurrence
// of the same name.
//
// The pointer takes the form of a two octet sequence:
//
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//     | 1  1|                OFFSET                   |
//     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
//
// The first two bits are ones.  This allows a pointer to be distinguished
// from a label, since the label must begin with two zero bits because
// labels are restricted to 63 octets or less.  (The 10 and 01 combinations
// are reserved for future use.)
//
// Every pointer must lead strictly before the run of labels it was found in, so each hop moves
// backwards through the message and loops are impossible.
fn read_name(decoder: &mut BinDecoder<'_>) -> DecodeResult<Name> {
    let name_start = decoder.offset();
    let mut run_start = name_start;
    let mut resume_at = None;
    let mut labels = Vec::new();
    let mut encoded_len = 1;

    loop {
        let code = decoder.read_u8()?.unverified(/*checked by the match*/);
        match code & 0b1100_0000 {
            0b0000_0000 if code == 0 => break,
            0b0000_0000 => {
                let label = decoder.read_slice(code as usize)?.unverified();
                encoded_len += label.len() + 1;
                if encoded_len > MAX_NAME_LEN {
                    return Err(DecodeError::DomainNameTooLong(encoded_len));
                }
                labels.push(Box::from(label));
            }
            0b1100_0000 => {
                let pointer_location = decoder.offset() - 1;
                let low = decoder.read_u8()?.unverified();
                let pointer = Restrict::new(u16::from_be_bytes([code, low]) & 0x3FFF)
                    .verify_unwrap(|ptr| (*ptr as usize) < run_start)
                    .map_err(|ptr| DecodeError::PointerNotPriorToLabel {
                        idx: pointer_location,
                        ptr,
                    })?;

                // the outer read resumes after the first pointer
                resume_at.get_or_insert(decoder.offset());
                trace!(from = pointer_location, to = pointer, "following name pointer");

                run_start = pointer as usize;
                decoder.set_offset(run_start)?;
            }
            _ => return Err(DecodeError::UnrecognizedLabelCode(code)),
        }
    }

    if let Some(resume_at) = resume_at {
        decoder.set_offset(resume_at)?;
    }
    let raw = Box::from(decoder.slice_from(name_start)?);

    Ok(Name {
        labels,
        raw: Some(raw),
    })
}

/// Offsets of the names already written to a message, keyed by label suffix
///
/// One index belongs to one message being written. Lookups are exact, byte for byte.
#[derive(Debug, Default)]
pub struct CompressionIndex {
    pointers: HashMap<Vec<Box<[u8]>>, u16>,
}

impl CompressionIndex {
    /// Offset of a previously written occurrence of `suffix`
    pub fn get(&self, suffix: &[Box<[u8]>]) -> Option<u16> {
        self.pointers.get(suffix).copied()
    }

    /// Offsets past what a pointer can address are not recorded
    fn insert(&mut self, suffix: &[Box<[u8]>], offset: usize) {
        if offset > MAX_POINTER_OFFSET {
            return;
        }
        self.pointers.insert(suffix.to_vec(), offset as u16);
    }

    /// Number of suffixes recorded
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns true if no name has been written yet
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

#[cfg(feature = "serde")]
impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        Self::from_ascii(&string).map_err(<D::Error as serde::de::Error>::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_all(names: &[(&Name, bool)]) -> Vec<u8> {
        let mut buf = [0_u8; 512];
        let mut encoder = BinEncoder::new(&mut buf[..]);
        let mut index = CompressionIndex::default();
        for (name, canonical) in names {
            name.emit_as_canonical(&mut encoder, &mut index, *canonical)
                .unwrap();
        }
        encoder.written().to_vec()
    }

    #[test]
    fn test_from_ascii() {
        let name = Name::from_ascii("www.example.com").unwrap();
        assert_eq!(
            name.iter().collect::<Vec<_>>(),
            vec![&b"www"[..], &b"example"[..], &b"com"[..]]
        );
        assert_eq!(name, Name::from_ascii("www.example.com.").unwrap());
        assert_eq!(name.encoded_len(), 17);

        assert!(Name::from_ascii("").unwrap().is_root());
        assert_eq!(Name::root().to_string(), ".");
    }

    #[test]
    fn test_from_ascii_rejects() {
        assert!(matches!(
            Name::from_ascii("www..com").unwrap_err().kind(),
            ProtoErrorKind::EmptyLabel(_)
        ));
        assert!(matches!(
            Name::from_ascii("a".repeat(64)).unwrap_err().kind(),
            ProtoErrorKind::LabelBytesTooLong(64)
        ));

        let long = vec!["a".repeat(63); 4].join(".");
        assert!(matches!(
            Name::from_ascii(long).unwrap_err().kind(),
            ProtoErrorKind::DomainNameTooLong(257)
        ));
        assert!(Name::from_ascii("nul\0.com").is_err());
    }

    #[test]
    fn test_read_root() {
        let mut decoder = BinDecoder::new(&[0]);
        let name = Name::read(&mut decoder).unwrap();
        assert!(name.is_root());
        assert_eq!(name.raw_bytes(), Some(&[0_u8][..]));
        assert_eq!(name.to_string(), ".");
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_pointer() {
        let first = Name::from_ascii("www.example.com").unwrap();
        let second = Name::from_ascii("ftp.example.com").unwrap();
        let bytes = emit_all(&[(&first, false), (&second, false), (&first, false)]);

        // "ftp" then a pointer to "example.com" at offset 4
        assert_eq!(&bytes[17..], b"\x03ftp\xC0\x04\xC0\x00");

        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(Name::read(&mut decoder).unwrap(), first);

        let read = Name::read(&mut decoder).unwrap();
        assert_eq!(read, second);
        assert_eq!(read.raw_bytes(), Some(&b"\x03ftp\xC0\x04"[..]));
        assert_eq!(decoder.offset(), 23);

        let read = Name::read(&mut decoder).unwrap();
        assert_eq!(read, first);
        assert_eq!(read.raw_bytes(), Some(&b"\xC0\x00"[..]));
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_canonical_never_points() {
        let name = Name::from_ascii("example.com").unwrap();
        let bytes = emit_all(&[(&name, false), (&name, true)]);
        assert_eq!(&bytes[..13], &bytes[13..]);

        // the canonical copy still serves as a pointer target
        let bytes = emit_all(&[(&name, true), (&name, false)]);
        assert_eq!(&bytes[13..], b"\xC0\x00");
    }

    #[test]
    fn test_recursive_pointer() {
        // points to itself
        let mut decoder = BinDecoder::new(&[0xC0, 0x00]);
        assert!(matches!(
            Name::read(&mut decoder).unwrap_err().as_decode(),
            Some(DecodeError::PointerNotPriorToLabel { idx: 0, ptr: 0 })
        ));

        // two pointers pointing at each other
        let bytes = [0xC0, 0x02, 0xC0, 0x00];
        let mut decoder = BinDecoder::new(&bytes);
        decoder.set_offset(2).unwrap();
        assert!(Name::read(&mut decoder).is_err());

        // a label followed by a pointer back into that same label
        let bytes = [0x01, b'a', 0xC0, 0x00];
        let mut decoder = BinDecoder::new(&bytes);
        assert!(Name::read(&mut decoder).is_err());
    }

    #[test]
    fn test_bad_label_code() {
        let mut decoder = BinDecoder::new(&[0x40, 0x00]);
        assert_eq!(
            Name::read(&mut decoder).unwrap_err().as_decode(),
            Some(&DecodeError::UnrecognizedLabelCode(0x40))
        );
    }

    #[test]
    fn test_bin_max_octets() {
        // 4 labels of 63 bytes is 257 octets with the length bytes and the root
        let mut bytes = Vec::new();
        for _ in 0..4 {
            bytes.push(63);
            bytes.extend_from_slice(&[b'a'; 63]);
        }
        bytes.push(0);

        let mut decoder = BinDecoder::new(&bytes);
        assert!(matches!(
            Name::read(&mut decoder).unwrap_err().as_decode(),
            Some(DecodeError::DomainNameTooLong(_))
        ));
    }

    #[test]
    fn test_truncated_name() {
        let mut decoder = BinDecoder::new(b"\x03www\x07exam");
        assert_eq!(
            Name::read(&mut decoder).unwrap_err().as_decode(),
            Some(&DecodeError::InsufficientBytes)
        );
    }

    #[test]
    fn test_equality_ignores_raw() {
        let name = Name::from_ascii("example.com").unwrap();
        let bytes = emit_all(&[(&name, false)]);
        let read = Name::from_bytes(&bytes).unwrap();
        assert!(read.raw_bytes().is_some());
        assert!(name.raw_bytes().is_none());
        assert_eq!(read, name);
    }
}
