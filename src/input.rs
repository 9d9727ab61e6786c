//! Loading the bytes to decode: raw binary files, or hex text parsed with PEST.

use crate::error::InputError;
use log::debug;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::path::Path;

#[derive(PestParser)]
#[grammar = "hex.pest"]
struct HexParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// File content is the encoding itself.
    #[default]
    Binary,
    /// File content is hex text (see [`parse_hex`]).
    Hex,
}

/// Read `path` and return the bytes to decode.
pub fn read_input(path: &Path, format: InputFormat) -> Result<Vec<u8>, InputError> {
    let bytes = match format {
        InputFormat::Binary => std::fs::read(path)?,
        InputFormat::Hex => parse_hex(&std::fs::read_to_string(path)?)?,
    };
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Parse hex text such as a dump pasted from another tool.
///
/// Accepts whitespace- or comma-separated runs of hex digits, each optionally
/// prefixed with `0x`, `#` comments to end of line, and `offset:` labels (ignored).
/// A label must start its line and be followed by a separator; a `:` anywhere else
/// is a parse error. Each run must have an even number of digits.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, InputError> {
    let pairs = HexParser::parse(Rule::hex_text, text)
        .map_err(|e| InputError::Hex(format!("Parse error: {}", e)))?;
    let root = pairs
        .into_iter()
        .next()
        .ok_or_else(|| InputError::Hex("Empty parse".to_string()))?;

    let mut out = Vec::new();
    for inner in root.into_inner() {
        match inner.as_rule() {
            Rule::chunk => {
                let s = inner.as_str();
                let digits = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                if digits.len() % 2 != 0 {
                    let (line, col) = inner.as_span().start_pos().line_col();
                    return Err(InputError::Hex(format!(
                        "odd number of hex digits in '{}' at {}:{}",
                        s, line, col
                    )));
                }
                for i in (0..digits.len()).step_by(2) {
                    let b = u8::from_str_radix(&digits[i..i + 2], 16)
                        .map_err(|e| InputError::Hex(e.to_string()))?;
                    out.push(b);
                }
            }
            _ => {}
        }
    }
    Ok(out)
}
