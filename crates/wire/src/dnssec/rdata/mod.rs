// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! DNSSEC related record data

pub mod dnskey;
pub mod ds;
pub mod nsec;
pub mod nsec3;
pub mod nsec3param;
pub mod rrsig;

pub use self::dnskey::DNSKEY;
pub use self::ds::DS;
pub use self::nsec::NSEC;
pub use self::nsec3::NSEC3;
pub use self::nsec3param::NSEC3PARAM;
pub use self::rrsig::{SigInput, RRSIG};
