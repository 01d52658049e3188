//! Compile fingerprint DSL files into canonical JSON records.
//!
//! Usage:
//!   compile_fp [OPTIONS] FILE.fp ...
//!
//! Options:
//!   --out DIR  Output directory (default: output/json)
//!
//! Validation runs lenient so unsafe steps land in the record's `_metadata`
//! rather than failing the build; each record is written to
//! `<out>/<FINGERPRINT>.json`. A failing file never stops the batch.

use otfpdsl::{compile_canonical, parse, validate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let out_dir = match args.iter().position(|a| a == "--out") {
        Some(pos) if pos + 1 < args.len() => {
            args.remove(pos);
            PathBuf::from(args.remove(pos))
        }
        Some(_) => {
            eprintln!("usage: compile_fp [--out DIR] FILE.fp ...");
            std::process::exit(2);
        }
        None => PathBuf::from("output/json"),
    };

    if args.is_empty() {
        eprintln!("usage: compile_fp [--out DIR] FILE.fp ...");
        std::process::exit(2);
    }

    std::fs::create_dir_all(&out_dir)?;

    let mut has_error = false;
    for path in &args {
        match compile_one(path, &out_dir) {
            Ok(out_file) => println!("wrote canonical JSON to {}", out_file.display()),
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

fn compile_one(path: &str, out_dir: &std::path::Path) -> anyhow::Result<PathBuf> {
    let source = std::fs::read_to_string(path)?;
    let fp = parse(&source);
    let metadata = validate(&fp, path, false)?;
    let record = compile_canonical(&fp, &metadata, path)?;
    let out_file = out_dir.join(format!("{}.json", record.fingerprint_id));
    std::fs::write(&out_file, serde_json::to_string_pretty(&record)?)?;
    Ok(out_file)
}
