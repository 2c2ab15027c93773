// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//! All defined response codes in DNS

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The status code of the response to a query.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// RCODE           Response code - this 4 bit field is set as part of
///                 responses.
/// ```
///
/// With EDNS the code grows to 12 bits, the high 8 of which travel in the OPT record, see
/// [RFC 6891](https://tools.ietf.org/html/rfc6891#section-6.1.3).
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[derive(Debug, Eq, PartialEq, PartialOrd, Copy, Clone, Hash, Default)]
#[non_exhaustive]
pub enum ResponseCode {
    /// No Error [RFC 1035](https://tools.ietf.org/html/rfc1035)
    #[default]
    NoError,

    /// Format Error [RFC 1035](https://tools.ietf.org/html/rfc1035)
    FormErr,

    /// Server Failure [RFC 1035](https://tools.ietf.org/html/rfc1035)
    ServFail,

    /// Non-Existent Domain [RFC 1035](https://tools.ietf.org/html/rfc1035)
    NXDomain,

    /// Not Implemented [RFC 1035](https://tools.ietf.org/html/rfc1035)
    NotImp,

    /// Query Refused [RFC 1035](https://tools.ietf.org/html/rfc1035)
    Refused,

    /// Name Exists when it should not [RFC 2136](https://tools.ietf.org/html/rfc2136)
    YXDomain,

    /// RR Set Exists when it should not [RFC 2136](https://tools.ietf.org/html/rfc2136)
    YXRRSet,

    /// RR Set that should exist does not [RFC 2136](https://tools.ietf.org/html/rfc2136)
    NXRRSet,

    /// Server Not Authoritative for zone [RFC 2136](https://tools.ietf.org/html/rfc2136)
    NotAuth,

    /// Name not contained in zone [RFC 2136](https://tools.ietf.org/html/rfc2136)
    NotZone,

    /// Bad OPT Version [RFC 6891](https://tools.ietf.org/html/rfc6891#section-9)
    BADVERS,

    /// Bad/missing server cookie [RFC 7873](https://tools.ietf.org/html/rfc7873)
    BADCOOKIE,

    /// Any other code, up to 12 bits
    Unknown(u16),
}

impl ResponseCode {
    /// returns the lower 4 bits of the response code (for the original header portion of the code)
    pub fn low(self) -> u8 {
        (u16::from(self) & 0x000F) as u8
    }

    /// returns the high 8 bits for the EDNS portion of the response code
    pub fn high(self) -> u8 {
        ((u16::from(self) & 0x0FF0) >> 4) as u8
    }

    /// DNS can not store the entire space of ResponseCodes in 4 bit space of the Header, this
    ///   function allows for a initial value of the first 4 bits to be set.
    pub fn from_low(low: u8) -> Self {
        (u16::from(low) & 0x000F).into()
    }

    /// Combines the EDNS high and low from the Header to produce the Extended ResponseCode
    ///
    /// ```
    /// use dnswire::op::ResponseCode;
    ///
    /// let code = ResponseCode::from(1, 0);
    /// assert_eq!(code, ResponseCode::BADVERS);
    /// assert_eq!((code.high(), code.low()), (1, 0));
    /// ```
    pub fn from(high: u8, low: u8) -> Self {
        ((u16::from(high) << 4) | (u16::from(low) & 0x000F)).into()
    }

    /// Transform the response code into a human readable string
    pub fn to_str(self) -> &'static str {
        match self {
            Self::NoError => "No Error",
            Self::FormErr => "Form Error",
            Self::ServFail => "Server Failure",
            Self::NXDomain => "Non-Existent Domain",
            Self::NotImp => "Not Implemented",
            Self::Refused => "Query Refused",
            Self::YXDomain => "Name should not exist",
            Self::YXRRSet => "RR Set should not exist",
            Self::NXRRSet => "RR Set does not exist",
            Self::NotAuth => "Not authorized",
            Self::NotZone => "Name not in zone",
            Self::BADVERS => "Bad option version",
            Self::BADCOOKIE => "Bad server cookie",
            Self::Unknown(_) => "Unknown response code",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.to_str())
    }
}

impl From<ResponseCode> for u16 {
    fn from(rt: ResponseCode) -> Self {
        match rt {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::YXDomain => 6,
            ResponseCode::YXRRSet => 7,
            ResponseCode::NXRRSet => 8,
            ResponseCode::NotAuth => 9,
            ResponseCode::NotZone => 10,
            // 11-15    Unassigned
            ResponseCode::BADVERS => 16,
            ResponseCode::BADCOOKIE => 23,
            ResponseCode::Unknown(code) => code & 0x0FFF,
        }
    }
}

impl From<u16> for ResponseCode {
    fn from(value: u16) -> Self {
        match value & 0x0FFF {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            6 => Self::YXDomain,
            7 => Self::YXRRSet,
            8 => Self::NXRRSet,
            9 => Self::NotAuth,
            10 => Self::NotZone,
            16 => Self::BADVERS,
            23 => Self::BADCOOKIE,
            code => Self::Unknown(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_merge() {
        for code in [0_u16, 3, 15, 16, 23, 0x0FFF] {
            let rcode: ResponseCode = code.into();
            assert_eq!(u16::from(rcode), code);
            assert_eq!(ResponseCode::from(rcode.high(), rcode.low()), rcode);
        }
        assert_eq!(ResponseCode::from_low(0xF3), ResponseCode::NXDomain);
    }
}
