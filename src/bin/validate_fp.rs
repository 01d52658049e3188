//! Validate fingerprint DSL files against the protocol rule tables.
//!
//! Usage:
//!   validate_fp [OPTIONS] FILE.fp ...
//!
//! Options:
//!   --lenient, -l  Tolerate `SAFE false` steps and report them instead of
//!                  failing (default is CI-strict: any unsafe step fails)
//!
//! Prints `<path>: OK` or `<path>: ERROR -> <message>` per file; a failing
//! file never stops the batch. Exit code 1 if any file failed.

use otfpdsl::{parse, validate};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let ci_mode = if let Some(pos) = args.iter().position(|a| a == "--lenient" || a == "-l") {
        args.remove(pos);
        false
    } else {
        true
    };

    if args.is_empty() {
        eprintln!("usage: validate_fp [--lenient] FILE.fp ...");
        std::process::exit(2);
    }

    let mut has_error = false;
    for path in &args {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{path}: ERROR -> {e}");
                has_error = true;
                continue;
            }
        };
        let fp = parse(&source);
        match validate(&fp, path, ci_mode) {
            Ok(meta) => {
                println!("{path}: OK");
                for step in &meta.unsafe_steps {
                    println!("  unsafe step: {step}");
                }
            }
            Err(e) => {
                eprintln!("{path}: ERROR -> {e}");
                has_error = true;
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
