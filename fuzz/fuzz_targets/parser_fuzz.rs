//! Parser fuzz target: feed arbitrary text through parse and lenient
//! validation. Neither may panic; the parser is infallible by contract and
//! validation returns a structured error at worst.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let fp = otfpdsl::parse(s);
    let _ = otfpdsl::validate(&fp, "fuzz", false);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
