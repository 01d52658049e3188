//! Scanner record compilation: map a canonical record into the probe
//! definition a scanning tool consumes.
//!
//! Unsafe steps are matched by code part against the metadata embedded in
//! the canonical record. The caller picks one of two policies: drop unsafe
//! steps entirely, or keep every step and tag the unsafe ones in place.

use crate::canonical::CanonicalRecord;
use crate::error::Error;
use crate::record::DetectStep;
use crate::rules::SUPPORTED_PROTOCOLS;
use serde::{Deserialize, Serialize};

/// How the scanner compiler treats steps flagged unsafe by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafePolicy {
    /// Drop unsafe steps from the output sequence.
    Exclude,
    /// Keep all steps in order; mark unsafe ones with `"unsafe": true`.
    Tag,
}

/// Scanner-ready probe definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerRecord {
    pub id: String,
    pub info: ScannerInfo,
    pub protocol: String,
    pub port: u16,
    pub inputs: ScannerInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerInfo {
    pub name: String,
    pub severity: String,
}

/// Probe steps, shaped by the unsafe-step policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScannerInputs {
    /// Exclusion mode: the surviving raw lines.
    Lines(Vec<String>),
    /// Tagging mode: every line, unsafe ones marked.
    Tagged(Vec<TaggedStep>),
}

/// One step under tagging mode. Absence of the `unsafe` key signals a safe
/// step; a `false` value is never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedStep {
    pub line: String,
    #[serde(rename = "unsafe", skip_serializing_if = "Option::is_none")]
    pub unsafe_marker: Option<bool>,
}

/// Compile a canonical record into a scanner record under the given
/// unsafe-step policy. Pure: the same record and policy always produce the
/// same output.
pub fn compile_scanner(
    record: &CanonicalRecord,
    policy: UnsafePolicy,
    doc: &str,
) -> Result<ScannerRecord, Error> {
    let protocol = if record.protocol.is_empty() {
        match record.detect.first().and_then(|line| line.split_whitespace().next()) {
            Some(token) => token.to_uppercase(),
            None => {
                return Err(Error::structural(
                    doc,
                    "cannot resolve protocol: record has no detect steps",
                ))
            }
        }
    } else {
        record.protocol.to_uppercase()
    };

    if !SUPPORTED_PROTOCOLS.contains(&protocol.as_str()) {
        return Err(Error::unsupported_protocol(doc, protocol));
    }

    let is_unsafe = |line: &str| {
        record
            .metadata
            .unsafe_steps
            .contains(DetectStep::new(line).code_part())
    };

    let inputs = match policy {
        UnsafePolicy::Exclude => ScannerInputs::Lines(
            record
                .detect
                .iter()
                .filter(|line| !is_unsafe(line))
                .cloned()
                .collect(),
        ),
        UnsafePolicy::Tag => ScannerInputs::Tagged(
            record
                .detect
                .iter()
                .map(|line| TaggedStep {
                    line: line.clone(),
                    unsafe_marker: is_unsafe(line).then_some(true),
                })
                .collect(),
        ),
    };

    Ok(ScannerRecord {
        id: record.fingerprint_id.clone(),
        info: ScannerInfo {
            name: record.vulnerability.clone(),
            severity: record.confidence.clone(),
        },
        protocol,
        port: record.port,
        inputs,
    })
}
