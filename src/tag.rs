//! Identifier octets: class, constructed flag and tag number.
//!
//! Only the low-tag-number form is understood. The decoder dispatches on the
//! identifier octet with the two class bits cleared ([`Tag::dispatch_key`]), so the
//! constructed flag stays part of the key: SEQUENCE is 0x30, not 0x10.

/// Dispatch keys recognised by the decoder.
pub mod tags {
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const NULL: u8 = 0x05;
    pub const OID: u8 = 0x06;
    pub const PRINTABLE_STRING: u8 = 0x13;
    pub const UTC_TIME: u8 = 0x17;
    /// Constructed flag with tag number 0.
    pub const CONSTRUCTED: u8 = 0x20;
    pub const SEQUENCE: u8 = 0x30;
    pub const SET: u8 = 0x31;
}

const CLASS_MASK: u8 = 0xc0;
const CONSTRUCTED_BIT: u8 = 0x20;
const NUMBER_MASK: u8 = 0x1f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

/// One identifier octet, split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    raw: u8,
}

impl Tag {
    pub fn from_octet(raw: u8) -> Self {
        Tag { raw }
    }

    pub fn raw(&self) -> u8 {
        self.raw
    }

    pub fn class(&self) -> TagClass {
        TagClass::from_bits((self.raw & CLASS_MASK) >> 6)
    }

    pub fn is_constructed(&self) -> bool {
        self.raw & CONSTRUCTED_BIT != 0
    }

    pub fn number(&self) -> u8 {
        self.raw & NUMBER_MASK
    }

    /// Identifier octet without the class bits.
    pub fn dispatch_key(&self) -> u8 {
        self.raw & !CLASS_MASK
    }
}
