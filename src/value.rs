//! Owned decoded values: the visitor contract as a tagged union.

use crate::visitor::Visitor;

/// One visitor call, recorded as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Integer { magnitude: Vec<u8>, negative: bool },
    Null,
    BitString(Vec<u8>),
    Oid(Vec<Vec<u8>>),
    PrintableString(String),
    UtcTime(String),
    Constructed,
    SequenceStart,
    SequenceEnd,
    SetStart,
    SetEnd,
}

impl Event {
    /// INTEGER value when it fits an `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Event::Integer { magnitude, negative } => integer_to_i128(magnitude, *negative),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&[Vec<u8>]> {
        match self {
            Event::Oid(arcs) => Some(arcs.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Event::PrintableString(s) | Event::UtcTime(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// +1 for a container start, -1 for an end, 0 otherwise.
    pub fn depth_delta(&self) -> i32 {
        match self {
            Event::SequenceStart | Event::SetStart => 1,
            Event::SequenceEnd | Event::SetEnd => -1,
            _ => 0,
        }
    }

    /// Replay this event into a visitor.
    pub fn visit<V: Visitor + ?Sized>(self, visitor: &mut V) {
        match self {
            Event::Integer { magnitude, negative } => visitor.integer(magnitude, negative),
            Event::Null => visitor.null(),
            Event::BitString(b) => visitor.bit_string(b),
            Event::Oid(arcs) => visitor.oid(arcs),
            Event::PrintableString(s) => visitor.printable_string(s),
            Event::UtcTime(s) => visitor.utc_time(s),
            Event::Constructed => visitor.constructed(),
            Event::SequenceStart => visitor.sequence_start(),
            Event::SequenceEnd => visitor.sequence_end(),
            Event::SetStart => visitor.set_start(),
            Event::SetEnd => visitor.set_end(),
        }
    }
}

/// Unsigned big-endian bytes as a `u128`; `None` if wider than 128 bits.
pub fn unsigned_to_u128(bytes: &[u8]) -> Option<u128> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > 16 {
        return None;
    }
    Some(significant.iter().fold(0u128, |acc, &b| (acc << 8) | b as u128))
}

/// Sign and magnitude as an `i128`; `None` if out of range.
pub fn integer_to_i128(magnitude: &[u8], negative: bool) -> Option<i128> {
    let m = unsigned_to_u128(magnitude)?;
    if negative {
        if m == 1u128 << 127 {
            Some(i128::MIN)
        } else {
            i128::try_from(m).ok().map(|v| -v)
        }
    } else {
        i128::try_from(m).ok()
    }
}

/// Dotted-decimal form of OID arcs. Arcs wider than 128 bits are shown as `0x<hex>`.
pub fn oid_to_dotted(arcs: &[Vec<u8>]) -> String {
    arcs.iter()
        .map(|arc| match unsigned_to_u128(arc) {
            Some(v) => v.to_string(),
            None => format!("0x{}", hex_string(arc)),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Lowercase hex, two digits per byte, no separator.
pub fn hex_string(b: &[u8]) -> String {
    b.iter().map(|x| format!("{:02x}", x)).collect()
}

/// A visitor that records every call in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventCollector {
    pub events: Vec<Event>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Visitor for EventCollector {
    fn integer(&mut self, magnitude: Vec<u8>, negative: bool) {
        self.events.push(Event::Integer { magnitude, negative });
    }
    fn null(&mut self) {
        self.events.push(Event::Null);
    }
    fn bit_string(&mut self, bits: Vec<u8>) {
        self.events.push(Event::BitString(bits));
    }
    fn oid(&mut self, arcs: Vec<Vec<u8>>) {
        self.events.push(Event::Oid(arcs));
    }
    fn printable_string(&mut self, text: String) {
        self.events.push(Event::PrintableString(text));
    }
    fn utc_time(&mut self, text: String) {
        self.events.push(Event::UtcTime(text));
    }
    fn constructed(&mut self) {
        self.events.push(Event::Constructed);
    }
    fn sequence_start(&mut self) {
        self.events.push(Event::SequenceStart);
    }
    fn sequence_end(&mut self) {
        self.events.push(Event::SequenceEnd);
    }
    fn set_start(&mut self) {
        self.events.push(Event::SetStart);
    }
    fn set_end(&mut self) {
        self.events.push(Event::SetEnd);
    }
}
