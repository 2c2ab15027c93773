// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt::Debug;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::*;
use crate::error::ProtoResult;

fn get_ipv4_data() -> Vec<(Ipv4Addr, Vec<u8>)> {
    vec![
        (Ipv4Addr::new(0, 0, 0, 0), vec![0, 0, 0, 0]),
        (Ipv4Addr::new(127, 0, 0, 1), vec![127, 0, 0, 1]),
        (Ipv4Addr::new(192, 168, 64, 32), vec![192, 168, 64, 32]),
        (Ipv4Addr::new(255, 255, 255, 255), vec![255, 255, 255, 255]),
    ]
}

#[test]
fn read_ipv4() {
    test_read_data_set(get_ipv4_data(), |mut d| Ipv4Addr::read(&mut d));
}

#[test]
fn emit_ipv4() {
    test_emit_data_set(get_ipv4_data(), |e, d| {
        d.emit(e, &mut CompressionIndex::default())
    });
}

#[rustfmt::skip]
fn get_ipv6_data() -> Vec<(Ipv6Addr, Vec<u8>)> {
    vec![
        (Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 0), vec![0; 16]),
        (
            Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1),
            vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        ),
        (
            Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0xff00, 0x42, 0x8329),
            vec![0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0xff, 0x00, 0x00, 0x42, 0x83, 0x29],
        ),
    ]
}

#[test]
fn read_ipv6() {
    test_read_data_set(get_ipv6_data(), |mut d| Ipv6Addr::read(&mut d));
}

#[test]
fn emit_ipv6() {
    test_emit_data_set(get_ipv6_data(), |e, d| {
        d.emit(e, &mut CompressionIndex::default())
    });
}

fn get_i32_data() -> Vec<(i32, Vec<u8>)> {
    vec![
        (0, vec![0x00, 0x00, 0x00, 0x00]),
        (256, vec![0x00, 0x00, 0x01, 0x00]),
        (-1, vec![0xFF, 0xFF, 0xFF, 0xFF]),
        (i32::MIN, vec![0x80, 0x00, 0x00, 0x00]),
        (i32::MAX, vec![0x7F, 0xFF, 0xFF, 0xFF]),
    ]
}

#[test]
fn read_i32() {
    test_read_data_set(get_i32_data(), |mut d| {
        d.read_i32().map(Restrict::unverified).map_err(Into::into)
    });
}

#[test]
fn emit_i32() {
    test_emit_data_set(get_i32_data(), |e, d| e.emit_i32(d));
}

#[test]
fn read_truncated_address() {
    let mut decoder = BinDecoder::new(&[10, 0, 0]);
    assert!(Ipv4Addr::read(&mut decoder).is_err());
}

pub(crate) fn test_read_data_set<E, F>(data_set: Vec<(E, Vec<u8>)>, read_func: F)
where
    E: PartialEq<E> + Debug,
    F: Fn(BinDecoder<'_>) -> ProtoResult<E>,
{
    for (expect, binary) in data_set {
        let decoder = BinDecoder::new(&binary);
        assert_eq!(read_func(decoder).unwrap(), expect, "reading {binary:?}");
    }
}

pub(crate) fn test_emit_data_set<S, F>(data_set: Vec<(S, Vec<u8>)>, emit_func: F)
where
    F: Fn(&mut BinEncoder<'_>, S) -> ProtoResult<()>,
    S: Debug,
{
    for (data, expect) in data_set {
        let mut bytes = [0_u8; 512];
        let mut encoder = BinEncoder::new(&mut bytes[..]);
        let description = format!("{data:?}");
        emit_func(&mut encoder, data).unwrap();
        assert_eq!(encoder.written(), &expect[..], "emitting {description}");
    }
}
