//! Canonical record compilation: the normalized, storage-ready form of a
//! fingerprint after protocol and port resolution.
//!
//! The canonical record embeds the validation metadata verbatim under the
//! reserved `_metadata` key without interpreting it, so the scanner stage
//! can apply its own unsafe-step policy without re-validating.

use crate::error::Error;
use crate::record::{FieldValue, Fingerprint};
use crate::rules::{default_port, FALLBACK_PORT};
use crate::validate::ValidationMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

const DEFAULT_CONFIDENCE: &str = "medium";

/// Optional fields copied through verbatim when present. Nothing outside
/// this list is invented; nothing on it is dropped.
const PASSTHROUGH_KEYS: [&str; 8] = [
    "SCOPE", "NOTES", "VENDOR", "PRODUCT", "FIRMWARE", "CWE", "INDICATOR", "IMPACT",
];

/// Canonical archival form of one fingerprint, keyed by `FINGERPRINT` when
/// written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "FINGERPRINT")]
    pub fingerprint_id: String,
    #[serde(rename = "VULNERABILITY", default)]
    pub vulnerability: String,
    #[serde(rename = "CONFIDENCE", default = "default_confidence")]
    pub confidence: String,
    #[serde(rename = "PROTOCOL", default)]
    pub protocol: String,
    #[serde(rename = "PORT")]
    pub port: u16,
    #[serde(rename = "DETECT", default)]
    pub detect: Vec<String>,
    #[serde(rename = "_metadata", default)]
    pub metadata: ValidationMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_confidence() -> String {
    DEFAULT_CONFIDENCE.to_string()
}

/// Compile a parsed fingerprint and its validation metadata into canonical
/// form. Fails only on a missing fingerprint id or a malformed explicit
/// port; everything else resolves to documented defaults.
pub fn compile_canonical(
    fp: &Fingerprint,
    metadata: &ValidationMetadata,
    doc: &str,
) -> Result<CanonicalRecord, Error> {
    let fingerprint_id = fp
        .scalar("FINGERPRINT")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::structural(doc, "missing FINGERPRINT"))?
        .to_string();

    let detect: Vec<String> = fp.lines("DETECT").into_iter().map(str::to_string).collect();

    // Explicit PROTOCOL wins; otherwise the first detect step names it.
    let protocol = match fp.scalar("PROTOCOL") {
        Some(p) if !p.is_empty() => p.to_uppercase(),
        _ => {
            let inferred = detect
                .first()
                .and_then(|line| line.split_whitespace().next())
                .map(str::to_uppercase)
                .unwrap_or_default();
            debug!(doc, protocol = %inferred, "PROTOCOL inferred from first detect step");
            inferred
        }
    };

    let port: u16 = match fp.scalar("PORT") {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::value(doc, format!("PORT must be numeric, got '{value}'")))?,
        None => {
            let port = default_port(&protocol).unwrap_or(FALLBACK_PORT);
            debug!(doc, port, "PORT defaulted by protocol");
            port
        }
    };

    let mut extra = Map::new();
    for key in PASSTHROUGH_KEYS {
        if let Some(value) = fp.get(key) {
            let json = match value {
                FieldValue::Scalar(s) => Value::String(s.clone()),
                FieldValue::Bare => Value::Null,
                FieldValue::Block(lines) => {
                    Value::Array(lines.iter().cloned().map(Value::String).collect())
                }
            };
            extra.insert(key.to_string(), json);
        }
    }

    Ok(CanonicalRecord {
        fingerprint_id,
        vulnerability: fp.scalar("VULNERABILITY").unwrap_or("").to_string(),
        confidence: fp.scalar("CONFIDENCE").unwrap_or(DEFAULT_CONFIDENCE).to_string(),
        protocol,
        port,
        detect,
        metadata: metadata.clone(),
        extra,
    })
}
