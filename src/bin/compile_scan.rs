//! Compile canonical fingerprint JSON into scanner probe definitions.
//!
//! Usage:
//!   compile_scan [OPTIONS] FILE.json ...
//!
//! Options:
//!   --policy exclude|tag  Unsafe-step handling (default: exclude).
//!                         `exclude` drops unsafe steps from the probe;
//!                         `tag` keeps them and marks `"unsafe": true`.
//!   --out DIR             Output directory (default: output/scanner)
//!
//! Reads the canonical records produced by `compile_fp` and writes
//! `<out>/<FINGERPRINT>.json`. A failing file never stops the batch.

use otfpdsl::{compile_scanner, CanonicalRecord, UnsafePolicy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let policy = match args.iter().position(|a| a == "--policy") {
        Some(pos) if pos + 1 < args.len() => {
            args.remove(pos);
            match args.remove(pos).as_str() {
                "exclude" => UnsafePolicy::Exclude,
                "tag" => UnsafePolicy::Tag,
                other => {
                    eprintln!("unknown policy '{other}' (expected exclude or tag)");
                    std::process::exit(2);
                }
            }
        }
        Some(_) => {
            eprintln!("usage: compile_scan [--policy exclude|tag] [--out DIR] FILE.json ...");
            std::process::exit(2);
        }
        None => UnsafePolicy::Exclude,
    };

    let out_dir = match args.iter().position(|a| a == "--out") {
        Some(pos) if pos + 1 < args.len() => {
            args.remove(pos);
            PathBuf::from(args.remove(pos))
        }
        Some(_) => {
            eprintln!("usage: compile_scan [--policy exclude|tag] [--out DIR] FILE.json ...");
            std::process::exit(2);
        }
        None => PathBuf::from("output/scanner"),
    };

    if args.is_empty() {
        eprintln!("usage: compile_scan [--policy exclude|tag] [--out DIR] FILE.json ...");
        std::process::exit(2);
    }

    std::fs::create_dir_all(&out_dir)?;

    let mut has_error = false;
    for path in &args {
        match compile_one(path, policy, &out_dir) {
            Ok(out_file) => println!("wrote scanner record to {}", out_file.display()),
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

fn compile_one(path: &str, policy: UnsafePolicy, out_dir: &std::path::Path) -> anyhow::Result<PathBuf> {
    let source = std::fs::read_to_string(path)?;
    let record: CanonicalRecord = serde_json::from_str(&source)?;
    let scanner = compile_scanner(&record, policy, path)?;
    let out_file = out_dir.join(format!("{}.json", scanner.id));
    std::fs::write(&out_file, serde_json::to_string_pretty(&scanner)?)?;
    Ok(out_file)
}
