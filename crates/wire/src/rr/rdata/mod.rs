// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! All record data structures and related serialization methods

// each module carries the read and emit functions for its layout
pub mod a;
pub mod aaaa;
pub mod mx;
pub mod name;
pub mod naptr;
pub mod null;
pub mod opt;
pub mod soa;
pub mod srv;
pub mod tlsa;
pub mod txt;

pub use self::mx::MX;
pub use self::naptr::NAPTR;
pub use self::null::NULL;
pub use self::opt::{EdnsCode, EdnsOption, OPT};
pub use self::soa::SOA;
pub use self::srv::SRV;
pub use self::tlsa::TLSA;
pub use self::txt::TXT;
