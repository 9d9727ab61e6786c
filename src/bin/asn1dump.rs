//! Dump the elements of an ASN.1 BER/DER file as text.
//!
//! Usage:
//!   asn1dump [OPTIONS] FILE
//!
//! Options:
//!   --hex, -x            FILE is hex text instead of binary
//!   --indent N, -i N     Indent container members by N spaces per level (default 0)
//!   --dotted, -d         Print OIDs as dotted decimal
//!   --strict-class       Only dispatch universal-class tags
//!   --max-depth N        Maximum SEQUENCE/SET nesting (default 64)
//!
//! Exit code 0 on success, 1 if decoding fails, 2 on bad usage.
//! Set RUST_LOG=debug (or trace) for decoder logging on stderr.

use anyhow::Context;
use asn1dump::{decode_slice_with_config, read_input, DecoderConfig, DumpVisitor, InputFormat, OidStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

struct Options {
    path: PathBuf,
    format: InputFormat,
    indent: usize,
    oid_style: OidStyle,
    config: DecoderConfig,
}

fn usage() -> ! {
    eprintln!("usage: asn1dump [--hex] [--indent N] [--dotted] [--strict-class] [--max-depth N] <file with ASN.1 payload>");
    exit(2);
}

fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    if let Some(pos) = args.iter().position(|a| names.contains(&a.as_str())) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, names: &[&str]) -> Option<usize> {
    let pos = args.iter().position(|a| names.contains(&a.as_str()))?;
    if pos + 1 >= args.len() {
        usage();
    }
    let flag = args.remove(pos);
    let raw = args.remove(pos);
    match raw.parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("{} expects a number, got '{}'", flag, raw);
            usage();
        }
    }
}

fn parse_args() -> Options {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let format = if take_flag(&mut args, &["--hex", "-x"]) {
        InputFormat::Hex
    } else {
        InputFormat::Binary
    };
    let oid_style = if take_flag(&mut args, &["--dotted", "-d"]) {
        OidStyle::Dotted
    } else {
        OidStyle::Hex
    };
    let mut config = DecoderConfig::default();
    config.class_aware_dispatch = take_flag(&mut args, &["--strict-class"]);
    if let Some(n) = take_value(&mut args, &["--max-depth"]) {
        config.max_depth = n;
    }
    let indent = take_value(&mut args, &["--indent", "-i"]).unwrap_or(0);

    if args.len() != 1 || args[0].starts_with('-') {
        usage();
    }
    Options {
        path: PathBuf::from(args.remove(0)),
        format,
        indent,
        oid_style,
        config,
    }
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug for decoder logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "error");
    }
    env_logger::init();

    let opts = parse_args();
    let data = read_input(&opts.path, opts.format)
        .with_context(|| format!("failed to open {}", opts.path.display()))?;

    let stdout = io::stdout();
    let mut dump = DumpVisitor::new(stdout.lock())
        .with_indent(opts.indent)
        .with_oid_style(opts.oid_style);
    let result = decode_slice_with_config(&data, opts.config, &mut dump);
    let mut out = dump.finish().context("writing output")?;

    if let Err(e) = result {
        log::error!("decoding stopped at offset {} ({})", e.offset, e.error.kind());
        writeln!(out, "decoding failed: {}", e)?;
        out.flush()?;
        exit(1);
    }
    Ok(())
}
