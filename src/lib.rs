//! # asn1dump — single-pass ASN.1 BER/DER decoder
//!
//! Walks a definite-length BER/DER encoding once, front to back, and reports every
//! element it decodes to a [`Visitor`], in document order. Nothing is re-encoded and
//! no schema is applied; the only checks are structural.
//!
//! ## Supported elements
//!
//! - INTEGER (arbitrary size, reported as sign + big-endian magnitude)
//! - NULL (empty, or a single zero octet)
//! - BIT STRING (unused trailing bits cleared)
//! - OBJECT IDENTIFIER (arcs as big-endian byte strings)
//! - PrintableString, UTCTime (restricted ASCII text)
//! - SEQUENCE, SET (recursive), and a bare constructed marker for `0x20`
//!
//! Tag classes are recorded but, by default, ignored for dispatch; see
//! [`DecoderConfig::class_aware_dispatch`]. High tag numbers and the indefinite
//! length form are not supported.
//!
//! ## Usage
//!
//! ```
//! use asn1dump::{decode_slice, DumpVisitor};
//!
//! let der = [0x30, 0x05, 0x02, 0x01, 0xff, 0x05, 0x00];
//! let mut dump = DumpVisitor::new(Vec::new()).with_indent(2);
//! decode_slice(&der, &mut dump).unwrap();
//! let text = String::from_utf8(dump.finish().unwrap()).unwrap();
//! assert_eq!(text, "SEQUENCE(\n  INTEGER -01\n  NULL\n)\n");
//! ```
//!
//! The `asn1dump` binary wraps this for files: `asn1dump [--hex] cert.der`.

pub mod decoder;
pub mod dump;
pub mod error;
pub mod input;
pub mod length;
pub mod tag;
pub mod value;
pub mod visitor;

pub use decoder::{
    decode_events, decode_slice, decode_slice_with_config, Decoder, DecoderConfig,
    DEFAULT_MAX_DEPTH,
};
pub use dump::{format_event, DumpVisitor, OidStyle};
pub use error::{DecodeError, InputError, PositionedError};
pub use input::{parse_hex, read_input, InputFormat};
pub use tag::{Tag, TagClass};
pub use value::{Event, EventCollector};
pub use visitor::Visitor;
