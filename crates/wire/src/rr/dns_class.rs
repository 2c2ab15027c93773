// Copyright 2015-2021 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! class of DNS operations, in general always IN for internet

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ProtoError, ProtoErrorKind, ProtoResult};

/// The DNS Record class
///
/// The OPT pseudo record reuses this field for the requestor's UDP payload size, which then
/// surfaces as `Unknown(payload)` here, see [`crate::op::Edns`] for the interpreted view.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, PartialOrd, Ord)]
#[non_exhaustive]
pub enum DNSClass {
    /// Internet
    IN,
    /// Chaos
    CH,
    /// Hesiod
    HS,
    /// QCLASS NONE
    NONE,
    /// QCLASS * (ANY)
    ANY,
    /// Any other value
    Unknown(u16),
}

impl FromStr for DNSClass {
    type Err = ProtoError;

    /// Convert from `&str` to `DNSClass`
    ///
    /// ```
    /// use std::str::FromStr;
    /// use dnswire::rr::DNSClass;
    ///
    /// let var: DNSClass = DNSClass::from_str("IN").unwrap();
    /// assert_eq!(DNSClass::IN, var);
    /// ```
    fn from_str(str: &str) -> ProtoResult<Self> {
        match str {
            "IN" => Ok(Self::IN),
            "CH" => Ok(Self::CH),
            "HS" => Ok(Self::HS),
            "NONE" => Ok(Self::NONE),
            "ANY" | "*" => Ok(Self::ANY),
            _ => str
                .strip_prefix("CLASS")
                .and_then(|code| code.parse::<u16>().ok())
                .map(Self::from)
                .ok_or_else(|| ProtoErrorKind::UnknownDnsClassStr(str.to_string()).into()),
        }
    }
}

impl From<u16> for DNSClass {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::IN,
            3 => Self::CH,
            4 => Self::HS,
            254 => Self::NONE,
            255 => Self::ANY,
            _ => Self::Unknown(value),
        }
    }
}

impl From<DNSClass> for u16 {
    /// Convert from `DNSClass` to `u16`
    ///
    /// ```
    /// use dnswire::rr::DNSClass;
    ///
    /// let var: u16 = DNSClass::IN.into();
    /// assert_eq!(1, var);
    /// ```
    fn from(rt: DNSClass) -> Self {
        match rt {
            DNSClass::IN => 1,
            DNSClass::CH => 3,
            DNSClass::HS => 4,
            DNSClass::NONE => 254,
            DNSClass::ANY => 255,
            DNSClass::Unknown(code) => code,
        }
    }
}

impl DNSClass {
    pub(crate) fn known_mnemonic(self) -> Option<&'static str> {
        match self {
            Self::IN => Some("IN"),
            Self::CH => Some("CH"),
            Self::HS => Some("HS"),
            Self::NONE => Some("NONE"),
            Self::ANY => Some("ANY"),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for DNSClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known_mnemonic() {
            Some(mnemonic) => f.write_str(mnemonic),
            None => write!(f, "CLASS{}", u16::from(*self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for code in [1_u16, 3, 4, 254, 255, 512, 4096] {
            let class = DNSClass::from(code);
            assert_eq!(u16::from(class), code);
            assert_eq!(class.to_string().parse::<DNSClass>().unwrap(), class);
        }
        assert_eq!(DNSClass::from(4096), DNSClass::Unknown(4096));
    }
}
