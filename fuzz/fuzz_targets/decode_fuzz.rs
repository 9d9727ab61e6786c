//! Decoder fuzz target: feed arbitrary bytes to the decoder.
//! The decoder must not panic; it either succeeds or returns a DecodeError.
//! Build with: cargo fuzz run decode_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut dump = asn1dump::DumpVisitor::new(std::io::sink());
    let result = asn1dump::decode_slice(data, &mut dump);
    if let Err(e) = result {
        assert!(e.offset <= data.len());
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run decode_fuzz");
}
