// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! translation between type and class mnemonics and their wire codes

use super::{DNSClass, RecordType};
use crate::error::ProtoResult;

/// Name to code translation for record types and classes
///
/// The codec itself only ever deals in codes, this is consulted when messages are built from
/// textual input such as `"AAAA"` or `"IN"`.
pub trait TypeRegistry {
    /// The record type registered under `name`
    fn record_type(&self, name: &str) -> ProtoResult<RecordType>;

    /// The mnemonic of `record_type`, `None` if it has none
    fn record_type_name(&self, record_type: RecordType) -> Option<&str>;

    /// The class registered under `name`
    fn dns_class(&self, name: &str) -> ProtoResult<DNSClass>;

    /// The mnemonic of `dns_class`, `None` if it has none
    fn dns_class_name(&self, dns_class: DNSClass) -> Option<&str>;
}

/// The registry of every type and class with a variant in [`RecordType`] and [`DNSClass`]
///
/// Unlisted codes are still accepted in their generic `TYPE1234` and `CLASS1234` forms.
///
/// ```
/// use dnswire::rr::{DNSClass, RecordType, StaticRegistry, TypeRegistry};
///
/// let registry = StaticRegistry;
/// assert_eq!(registry.record_type("NAPTR").unwrap(), RecordType::NAPTR);
/// assert_eq!(registry.record_type_name(RecordType::from(46)), Some("RRSIG"));
/// assert_eq!(registry.dns_class("CH").unwrap(), DNSClass::CH);
/// assert_eq!(registry.dns_class_name(DNSClass::from(4096)), None);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticRegistry;

impl TypeRegistry for StaticRegistry {
    fn record_type(&self, name: &str) -> ProtoResult<RecordType> {
        name.to_ascii_uppercase().parse()
    }

    fn record_type_name(&self, record_type: RecordType) -> Option<&str> {
        record_type.known_mnemonic()
    }

    fn dns_class(&self, name: &str) -> ProtoResult<DNSClass> {
        name.to_ascii_uppercase().parse()
    }

    fn dns_class_name(&self, dns_class: DNSClass) -> Option<&str> {
        dns_class.known_mnemonic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtoErrorKind;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(StaticRegistry.record_type("srv").unwrap(), RecordType::SRV);
        assert_eq!(StaticRegistry.dns_class("in").unwrap(), DNSClass::IN);
        assert_eq!(
            StaticRegistry.record_type("type65280").unwrap(),
            RecordType::Unknown(65280)
        );
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = StaticRegistry.record_type("BOGUS").unwrap_err();
        assert!(matches!(err.kind(), ProtoErrorKind::UnknownRecordTypeStr(s) if s == "BOGUS"));
        assert!(StaticRegistry.dns_class("NOWHERE").is_err());
        assert_eq!(StaticRegistry.record_type_name(RecordType::Unknown(999)), None);
    }
}
