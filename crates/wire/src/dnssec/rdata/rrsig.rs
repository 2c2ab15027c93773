// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! RRSIG type and related implementations

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use data_encoding::BASE64;

use crate::error::{DecodeError, ProtoResult};
use crate::rr::{CompressionIndex, Name, RecordType};
use crate::serialize::binary::{
    BinDecodable, BinDecoder, BinEncodable, BinEncoder, Restrict, RestrictedMath,
};

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-3)
///
/// ```text
/// 3.1.  RRSIG RDATA Wire Format
///
///    The RDATA for an RRSIG RR consists of a 2 octet Type Covered field, a
///    1 octet Algorithm field, a 1 octet Labels field, a 4 octet Original
///    TTL field, a 4 octet Signature Expiration field, a 4 octet Signature
///    Inception field, a 2 octet Key tag, the Signer's Name field, and the
///    Signature field.
///
///                         1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
///     0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |        Type Covered           |  Algorithm    |     Labels    |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                         Original TTL                          |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                      Signature Expiration                     |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |                      Signature Inception                      |
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    |            Key Tag            |                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+         Signer's Name         /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///    /                                                               /
///    /                            Signature                          /
///    /                                                               /
///    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///
/// 3.1.7.  The Signer's Name Field
///
///    The Signer's Name field value identifies the owner name of the DNSKEY
///    RR that a validator is supposed to use to validate this signature.
///    The Signer's Name field MUST contain the name of the zone of the
///    covered RRset.  A sender MUST NOT use DNS name compression on the
///    Signer's Name field when transmitting a RRSIG RR.
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct RRSIG {
    input: SigInput,
    sig: Vec<u8>,
}

impl RRSIG {
    /// Creates a new RRSIG from its fixed fields and the signature
    pub fn new(input: SigInput, sig: Vec<u8>) -> Self {
        Self { input, sig }
    }

    /// Everything but the signature, the part of the rdata that is itself signed
    pub fn input(&self) -> &SigInput {
        &self.input
    }

    /// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-3.1.8)
    ///
    /// ```text
    /// 3.1.8.  The Signature Field
    ///
    ///    The Signature field contains the cryptographic signature that covers
    ///    the RRSIG RDATA (excluding the Signature field) and the RRset
    ///    specified by the RRSIG owner name, RRSIG class, and RRSIG Type
    ///    Covered field.  The format of this field depends on the algorithm in
    ///    use, and these formats are described in separate companion
    ///    documents.
    /// ```
    pub fn sig(&self) -> &[u8] {
        &self.sig
    }
}

/// Input for an RRSIG record signature.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SigInput {
    /// `RecordType` which this signature covers
    pub type_covered: RecordType,
    /// Number of the algorithm used to generate the `signature`.
    pub algorithm: u8,
    /// Number of labels in the name, should be less 1 for *.name labels, see
    /// `Name::num_labels()`.
    pub num_labels: u8,
    /// TTL for the RRSet stored in the zone
    pub original_ttl: u32,
    /// Timestamp at which this signature is no longer valid, in serial number arithmetic
    pub sig_expiration: u32,
    /// Timestamp when this signature was generated, in serial number arithmetic
    pub sig_inception: u32,
    /// Key tag of the DNSKEY which validates this signature
    pub key_tag: u16,
    /// Domain name of the zone which generated the signature.
    pub signer_name: Name,
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: Restrict<u16>) -> ProtoResult<RRSIG> {
    let start_idx = decoder.offset();

    let type_covered = RecordType::read(decoder)?;
    let algorithm = decoder.read_u8()?.unverified(/*any algorithm number is carried*/);
    let num_labels = decoder.read_u8()?.unverified(/*technically valid as any u8*/);
    let original_ttl = decoder.read_u32()?.unverified(/*valid as any u32*/);
    let sig_expiration =
        decoder.read_u32()?.unverified(/*valid as any u32, in practice should be in the future*/);
    let sig_inception = decoder
        .read_u32()?
        .unverified(/*valid as any u32, in practice should be before expiration*/);
    let key_tag = decoder.read_u16()?.unverified(/*valid as any u16*/);
    let signer_name = Name::read(decoder)?;

    let input = SigInput {
        type_covered,
        algorithm,
        num_labels,
        original_ttl,
        sig_expiration,
        sig_inception,
        key_tag,
        signer_name,
    };

    // read the signature, this will vary buy key size
    let rdata_length = rdata_length.map(|u| u as usize);
    let sig_len = rdata_length
        .checked_sub(decoder.offset() - start_idx)
        .map_err(|needed| DecodeError::RDataTooShort {
            record_type: RecordType::RRSIG,
            needed,
            len: rdata_length.unverified(/*only reported*/),
        })?
        .unverified(/*used only as length safely*/);
    let sig = decoder
        .read_vec(sig_len)?
        .unverified(/*will fail in usage if invalid*/);

    Ok(RRSIG { input, sig })
}

/// Write the RData, with the signer's name in canonical form
pub fn emit(
    encoder: &mut BinEncoder<'_>,
    names: &mut CompressionIndex,
    rdata: &RRSIG,
) -> ProtoResult<()> {
    let input = rdata.input();

    input.type_covered.emit(encoder, names)?;
    encoder.emit(input.algorithm)?;
    encoder.emit(input.num_labels)?;
    encoder.emit_u32(input.original_ttl)?;
    encoder.emit_u32(input.sig_expiration)?;
    encoder.emit_u32(input.sig_inception)?;
    encoder.emit_u16(input.key_tag)?;
    input.signer_name.emit_as_canonical(encoder, names, true)?;
    encoder.emit_vec(rdata.sig())?;

    Ok(())
}

/// [RFC 4034, DNSSEC Resource Records, March 2005](https://tools.ietf.org/html/rfc4034#section-3.2)
///
/// ```text
/// 3.3.  RRSIG RR Example
///
///    The following RRSIG RR stores the signature for the A RRset of
///    host.example.com:
///
///    host.example.com. 86400 IN RRSIG A 5 3 86400 20030322173103 (
///                                     20030220173103 2642 example.com.
///                                     oJB1W6WNGv+ldvQ3WDG0MQkg5IEhjRip8WTr
///                                     PYGv07h108dUKGMeDPKijVCHX3DDKdfb+v6o
///                                     B9wfuh3DTJXUAfI/M0zmO/zz8bW0Rznl8O3t
///                                     GNazPwQKkRN20XPXV6nwwfoXmJQbsLNrLfkG
///                                     J5D6fwFm8nN+6pBzeDQfsS3Ap3o= )
/// ```
///
/// The timestamps are shown as the raw 32 bit values.
impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{ty_covered} {alg} {num_labels} {original_ttl} {expire} {inception} {tag} \
             {signer} {sig}",
            ty_covered = self.input.type_covered,
            alg = self.input.algorithm,
            num_labels = self.input.num_labels,
            original_ttl = self.input.original_ttl,
            expire = self.input.sig_expiration,
            inception = self.input.sig_inception,
            tag = self.input.key_tag,
            signer = self.input.signer_name,
            sig = BASE64.encode(&self.sig)
        )
    }
}
