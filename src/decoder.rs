//! Single-pass TLV decoder over an untrusted byte buffer.
//!
//! The decoder walks the buffer once, front to back, and hands every element it
//! finishes to a [`Visitor`]. It keeps no decoded state of its own: each value is
//! built inside its decode routine and moved into the visitor call.
//!
//! ## Walk
//!
//! [`Decoder::decode`] treats the whole buffer as the content of an implicit
//! container. For each element it reads the identifier octet, clears the class bits,
//! reads the length octets and dispatches on what is left of the identifier:
//!
//! | Key  | Element          | Visitor call(s)                               |
//! |------|------------------|-----------------------------------------------|
//! | 0x02 | INTEGER          | `integer`                                     |
//! | 0x03 | BIT STRING       | `bit_string`                                  |
//! | 0x05 | NULL             | `null`                                        |
//! | 0x06 | OBJECT IDENTIFIER| `oid`                                         |
//! | 0x13 | PrintableString  | `printable_string`                            |
//! | 0x17 | UTCTime          | `utc_time`                                    |
//! | 0x20 | bare constructed | `constructed` (content is not entered)        |
//! | 0x30 | SEQUENCE         | `sequence_start`, members, `sequence_end`     |
//! | 0x31 | SET              | `set_start`, members, `set_end`               |
//!
//! Anything else is [`DecodeError::UnknownTag`].
//!
//! ## Exactness
//!
//! Members of a container are decoded against the whole buffer, not a sub-slice;
//! after the last member the decoder requires that exactly the declared number of
//! octets was consumed. Falling short of or running past the declared length is
//! [`DecodeError::ElementsTooBig`].
//!
//! ## Limits
//!
//! Nesting of SEQUENCE/SET is capped by [`DecoderConfig::max_depth`]. Every length
//! is checked against the remaining input before anything is allocated, so a
//! declared length larger than the buffer fails with [`DecodeError::Truncated`].
//!
//! ## Example
//!
//! ```
//! use asn1dump::{decode_events, Event};
//!
//! let events = decode_events(&[0x30, 0x03, 0x02, 0x01, 0x05]).unwrap();
//! assert_eq!(events[0], Event::SequenceStart);
//! assert_eq!(events[1].as_i128(), Some(5));
//! assert_eq!(events[2], Event::SequenceEnd);
//! ```

use crate::error::{DecodeError, PositionedError};
use crate::length::decode_length;
use crate::tag::{tags, Tag, TagClass};
use crate::value::{Event, EventCollector};
use crate::visitor::Visitor;
use log::{debug, trace};

/// Default cap on SEQUENCE/SET nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// YYMMDDhhmm
const MIN_UTC_TIME_LEN: u64 = 10;
// YYMMDDhhmmss+hhmm
const MAX_UTC_TIME_LEN: u64 = 17;

/// Decoder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum SEQUENCE/SET nesting depth.
    pub max_depth: usize,
    /// Dispatch only universal-class identifiers. Off by default: the class bits are
    /// stripped and ignored, so e.g. a context-specific `[2]` primitive decodes as an
    /// INTEGER.
    pub class_aware_dispatch: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            class_aware_dispatch: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Container {
    Sequence,
    Set,
}

/// Cursor over one input buffer.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
    config: DecoderConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Decoder {
            data,
            pos: 0,
            depth: 0,
            config,
        }
    }

    /// Cursor offset. After a failed pass this is where decoding stopped.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the whole buffer from offset 0, feeding `visitor`.
    ///
    /// Succeeds only if every octet is consumed as well-formed elements. On error the
    /// visitor has already received the calls for everything decoded before the
    /// failure.
    pub fn decode<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<(), DecodeError> {
        self.pos = 0;
        self.depth = 0;
        debug!("decoding {} bytes", self.data.len());
        let result = self.dec_asn1(self.data.len() as u64, visitor);
        match &result {
            Ok(()) => debug!("decoded {} bytes", self.pos),
            Err(e) => debug!("decode failed at offset {}: {}", self.pos, e),
        }
        result
    }

    fn check_len(&self, n: u64) -> Result<usize, DecodeError> {
        let n = usize::try_from(n).map_err(|_| DecodeError::LengthOverflow(n))?;
        if self.remaining() < n {
            return Err(DecodeError::Truncated);
        }
        Ok(n)
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self.data.get(self.pos).ok_or(DecodeError::Truncated)?;
        self.pos += 1;
        Ok(b)
    }

    fn read_bytes(&mut self, n: u64) -> Result<&'a [u8], DecodeError> {
        let n = self.check_len(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    fn dec_asn1<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        let start = self.pos;
        while ((self.pos - start) as u64) < len {
            let offset = self.pos;
            let tag = Tag::from_octet(self.read_byte()?);
            let elem_len = decode_length(self.data, &mut self.pos)?;
            trace!(
                "offset {}: tag 0x{:02x} ({:?}) len {}",
                offset,
                tag.raw(),
                tag.class(),
                elem_len
            );
            if self.config.class_aware_dispatch && tag.class() != TagClass::Universal {
                return Err(DecodeError::UnknownTag(tag.raw()));
            }
            match tag.dispatch_key() {
                tags::NULL => self.dec_null(elem_len, visitor)?,
                tags::BIT_STRING => self.dec_bit_string(elem_len, visitor)?,
                tags::OID => self.dec_oid(elem_len, visitor)?,
                tags::PRINTABLE_STRING => {
                    let s = self.dec_text(elem_len)?;
                    visitor.printable_string(s);
                }
                tags::UTC_TIME => self.dec_utc_time(elem_len, visitor)?,
                tags::INTEGER => self.dec_integer(elem_len, visitor)?,
                tags::CONSTRUCTED => visitor.constructed(),
                tags::SEQUENCE => self.dec_container(Container::Sequence, elem_len, visitor)?,
                tags::SET => self.dec_container(Container::Set, elem_len, visitor)?,
                _ => return Err(DecodeError::UnknownTag(tag.raw())),
            }
        }
        if (self.pos - start) as u64 != len {
            return Err(DecodeError::ElementsTooBig);
        }
        Ok(())
    }

    fn dec_container<V: Visitor + ?Sized>(
        &mut self,
        kind: Container,
        len: u64,
        visitor: &mut V,
    ) -> Result<(), DecodeError> {
        if self.depth >= self.config.max_depth {
            return Err(DecodeError::MaxDepthExceeded(self.config.max_depth));
        }
        self.check_len(len)?;
        match kind {
            Container::Sequence => visitor.sequence_start(),
            Container::Set => visitor.set_start(),
        }
        self.depth += 1;
        self.dec_asn1(len, visitor)?;
        self.depth -= 1;
        match kind {
            Container::Sequence => visitor.sequence_end(),
            Container::Set => visitor.set_end(),
        }
        Ok(())
    }

    fn dec_integer<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        let raw = self.read_bytes(len)?;
        let (magnitude, negative) = integer_magnitude(raw);
        visitor.integer(magnitude, negative);
        Ok(())
    }

    fn dec_null<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        match len {
            0 => {}
            // some encoders emit NULL with a single zero content octet
            1 => {
                let b = self.read_byte()?;
                if b != 0 {
                    return Err(DecodeError::NullValue(b));
                }
                debug!("accepting one-octet NULL at offset {}", self.pos - 1);
            }
            _ => return Err(DecodeError::NullLength(len)),
        }
        visitor.null();
        Ok(())
    }

    fn dec_bit_string<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        if len == 0 {
            return Err(DecodeError::BitStringMissingUnused);
        }
        let raw = self.read_bytes(len)?;
        let unused = raw[0];
        let mut bits = raw[1..].to_vec();
        if let Some(last) = bits.last_mut() {
            *last &= unused_bits_mask(unused);
        }
        visitor.bit_string(bits);
        Ok(())
    }

    fn dec_oid<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        let raw = self.read_bytes(len)?;
        let arcs = oid_arcs(raw)?;
        visitor.oid(arcs);
        Ok(())
    }

    fn dec_text(&mut self, len: u64) -> Result<String, DecodeError> {
        let raw = self.read_bytes(len)?;
        let mut s = String::with_capacity(raw.len());
        for &c in raw {
            if !is_accepted_char(c) {
                return Err(DecodeError::InvalidCharacter(c));
            }
            s.push(c as char);
        }
        Ok(s)
    }

    fn dec_utc_time<V: Visitor + ?Sized>(&mut self, len: u64, visitor: &mut V) -> Result<(), DecodeError> {
        if !(MIN_UTC_TIME_LEN..=MAX_UTC_TIME_LEN).contains(&len) {
            return Err(DecodeError::UtcTimeLength(len));
        }
        let s = self.dec_text(len)?;
        visitor.utc_time(s);
        Ok(())
    }
}

/// Character filter shared by PrintableString and UTCTime: 0x1f..=0x7f.
fn is_accepted_char(c: u8) -> bool {
    (0x1f..=0x7f).contains(&c)
}

/// Mask clearing the low `unused` bits of an octet. `unused >= 8` clears all of it.
fn unused_bits_mask(unused: u8) -> u8 {
    0xffu8.checked_shl(unused as u32).unwrap_or(0)
}

/// Two's-complement content octets to (minimal big-endian magnitude, negative).
///
/// A negative value is inverted and incremented, carrying from the last octet
/// towards the first; a carry out of the first octet prepends a 0x01.
pub fn integer_magnitude(raw: &[u8]) -> (Vec<u8>, bool) {
    let negative = raw.first().map_or(false, |&b| b & 0x80 != 0);
    let mut magnitude = if negative {
        let mut rev = Vec::with_capacity(raw.len() + 1);
        let mut carry = true;
        for &b in raw.iter().rev() {
            let (x, overflow) = (!b).overflowing_add(carry as u8);
            rev.push(x);
            carry = overflow;
        }
        if carry {
            rev.push(1);
        }
        rev.reverse();
        rev
    } else {
        raw.to_vec()
    };
    let first = magnitude.iter().position(|&b| b != 0).unwrap_or(magnitude.len());
    magnitude.drain(..first);
    (magnitude, negative)
}

/// Split OID content octets into arcs, expanding the first subidentifier into two.
pub fn oid_arcs(raw: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut arcs = Vec::new();
    let mut groups = Vec::new();
    for &b in raw {
        groups.push(b & 0x7f);
        if b & 0x80 == 0 {
            let value = pack_base128(&groups);
            groups.clear();
            if arcs.is_empty() {
                let (x, y) = split_first_subidentifier(value);
                arcs.push(x);
                arcs.push(y);
            } else {
                arcs.push(value);
            }
        }
    }
    // content ended inside a subidentifier
    if !groups.is_empty() {
        return Err(DecodeError::Truncated);
    }
    Ok(arcs)
}

/// Repack 7-bit groups (most significant first) into big-endian octets.
///
/// Works from the least significant group, so each group lands at a shift that
/// rotates 0, 7, 6, ..., 1 within the output octet it starts in.
fn pack_base128(groups: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len());
    let mut acc: u16 = 0;
    let mut bits = 0u32;
    for &g in groups.iter().rev() {
        acc |= (g as u16) << bits;
        bits += 7;
        if bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push(acc as u8);
    }
    while out.len() > 1 && out.last() == Some(&0) {
        out.pop();
    }
    if out.is_empty() {
        out.push(0);
    }
    out.reverse();
    out
}

/// First subidentifier `40 * x + y` into `(x, y)`, x capped at 2.
fn split_first_subidentifier(value: Vec<u8>) -> (Vec<u8>, Vec<u8>) {
    let small = match value.as_slice() {
        [v] => Some(*v),
        _ => None,
    };
    match small {
        Some(v) if v < 40 => (vec![0], vec![v]),
        Some(v) if v < 80 => (vec![1], vec![v - 40]),
        _ => (vec![2], sub_small(value, 80)),
    }
}

/// `value - n` for a big-endian magnitude known to be >= n.
fn sub_small(mut value: Vec<u8>, n: u8) -> Vec<u8> {
    let mut borrow = n;
    for b in value.iter_mut().rev() {
        if borrow == 0 {
            break;
        }
        let (x, under) = b.overflowing_sub(borrow);
        *b = x;
        borrow = under as u8;
    }
    let first = value.iter().position(|&b| b != 0).unwrap_or(value.len() - 1);
    value.drain(..first);
    value
}

/// Decode `data`, feeding `visitor`.
pub fn decode_slice<V: Visitor + ?Sized>(data: &[u8], visitor: &mut V) -> Result<(), PositionedError> {
    decode_slice_with_config(data, DecoderConfig::default(), visitor)
}

/// Decode `data` with custom options, feeding `visitor`.
pub fn decode_slice_with_config<V: Visitor + ?Sized>(
    data: &[u8],
    config: DecoderConfig,
    visitor: &mut V,
) -> Result<(), PositionedError> {
    let mut decoder = Decoder::with_config(data, config);
    decoder.decode(visitor).map_err(|error| PositionedError {
        offset: decoder.position(),
        error,
    })
}

/// Decode `data` into the list of visitor calls it produces.
pub fn decode_events(data: &[u8]) -> Result<Vec<Event>, PositionedError> {
    let mut collector = EventCollector::new();
    decode_slice(data, &mut collector)?;
    Ok(collector.into_events())
}
