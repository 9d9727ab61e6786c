//! The `asn1dump` binary: output, exit codes for decode failures and bad usage.

use std::io::Write;
use std::process::{Command, Output};

fn der_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("tempfile");
    f.write_all(bytes).expect("write");
    f
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asn1dump"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .output()
        .expect("spawn asn1dump")
}

#[test]
fn dumps_and_exits_zero() {
    let f = der_file(&[0x30, 0x03, 0x02, 0x01, 0x05]);
    let out = run(&["--indent", "2", f.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "SEQUENCE(\n  INTEGER 05\n)\n");
}

#[test]
fn decode_failure_exits_one() {
    let f = der_file(&[0x04, 0x00]);
    let out = run(&[f.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("decoding failed: unknown type: 0x04"));
}

#[test]
fn non_numeric_option_is_bad_usage() {
    let f = der_file(&[0x05, 0x00]);
    for flag in ["--indent", "--max-depth"] {
        let out = run(&[flag, "abc", f.path().to_str().unwrap()]);
        assert_eq!(out.status.code(), Some(2), "{}", flag);
        let err = String::from_utf8_lossy(&out.stderr);
        assert!(err.contains("expects a number, got 'abc'"), "{}", err);
        assert!(err.contains("usage: asn1dump"), "{}", err);
        assert!(out.stdout.is_empty());
    }
}

#[test]
fn missing_file_argument_is_bad_usage() {
    assert_eq!(run(&["--hex"]).status.code(), Some(2));
}
