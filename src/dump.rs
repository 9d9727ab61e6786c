//! Text rendering of decoded elements, one line per visitor call.
//!
//! The line format is:
//!
//! ```text
//! SEQUENCE(
//! INTEGER -80
//! NULL
//! BIT STRING 0ff0
//! OID(01.02.0348.)
//! PrintableString hello
//! UTCTime 200102030405Z
//! (constructed)
//! SET{
//! }
//! )
//! ```
//!
//! With an indent width, container members are shifted right by that many spaces
//! per nesting level.

use crate::value::{hex_string, oid_to_dotted, Event};
use crate::visitor::Visitor;
use std::io::{self, Write};

/// How OBJECT IDENTIFIER arcs are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OidStyle {
    /// `OID(01.02.0348.)`: hex per arc, each followed by a dot.
    #[default]
    Hex,
    /// `OID(1.2.840)`
    Dotted,
}

/// Format one event as a single line (no newline, no indent).
pub fn format_event(event: &Event, oid_style: OidStyle) -> String {
    match event {
        Event::Integer { magnitude, negative } => {
            let digits = if magnitude.is_empty() {
                "00".to_string()
            } else {
                hex_string(magnitude)
            };
            format!("INTEGER {}{}", if *negative { "-" } else { "" }, digits)
        }
        Event::Null => "NULL".to_string(),
        Event::BitString(b) => format!("BIT STRING {}", hex_string(b)),
        Event::Oid(arcs) => match oid_style {
            OidStyle::Hex => {
                let body: String = arcs.iter().map(|a| format!("{}.", hex_string(a))).collect();
                format!("OID({})", body)
            }
            OidStyle::Dotted => format!("OID({})", oid_to_dotted(arcs)),
        },
        Event::PrintableString(s) => format!("PrintableString {}", s),
        Event::UtcTime(s) => format!("UTCTime {}", s),
        Event::Constructed => "(constructed)".to_string(),
        Event::SequenceStart => "SEQUENCE(".to_string(),
        Event::SequenceEnd => ")".to_string(),
        Event::SetStart => "SET{".to_string(),
        Event::SetEnd => "}".to_string(),
    }
}

/// Visitor writing [`format_event`] lines to `out`.
///
/// Visitor calls cannot fail, so the first write error is kept and later output is
/// dropped; [`DumpVisitor::finish`] reports it.
pub struct DumpVisitor<W: Write> {
    out: W,
    indent: usize,
    oid_style: OidStyle,
    level: usize,
    error: Option<io::Error>,
}

impl<W: Write> DumpVisitor<W> {
    pub fn new(out: W) -> Self {
        DumpVisitor {
            out,
            indent: 0,
            oid_style: OidStyle::Hex,
            level: 0,
            error: None,
        }
    }

    /// Spaces per nesting level (0 = flat).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_oid_style(mut self, oid_style: OidStyle) -> Self {
        self.oid_style = oid_style;
        self
    }

    /// Flush and return the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        if event.depth_delta() < 0 {
            self.level = self.level.saturating_sub(1);
        }
        let pad = " ".repeat(self.indent * self.level);
        let line = format_event(&event, self.oid_style);
        if let Err(e) = writeln!(self.out, "{}{}", pad, line) {
            self.error = Some(e);
        }
        if event.depth_delta() > 0 {
            self.level += 1;
        }
    }
}

impl<W: Write> Visitor for DumpVisitor<W> {
    fn integer(&mut self, magnitude: Vec<u8>, negative: bool) {
        self.emit(Event::Integer { magnitude, negative });
    }
    fn null(&mut self) {
        self.emit(Event::Null);
    }
    fn bit_string(&mut self, bits: Vec<u8>) {
        self.emit(Event::BitString(bits));
    }
    fn oid(&mut self, arcs: Vec<Vec<u8>>) {
        self.emit(Event::Oid(arcs));
    }
    fn printable_string(&mut self, text: String) {
        self.emit(Event::PrintableString(text));
    }
    fn utc_time(&mut self, text: String) {
        self.emit(Event::UtcTime(text));
    }
    fn constructed(&mut self) {
        self.emit(Event::Constructed);
    }
    fn sequence_start(&mut self) {
        self.emit(Event::SequenceStart);
    }
    fn sequence_end(&mut self) {
        self.emit(Event::SequenceEnd);
    }
    fn set_start(&mut self) {
        self.emit(Event::SetStart);
    }
    fn set_end(&mut self) {
        self.emit(Event::SetEnd);
    }
}
