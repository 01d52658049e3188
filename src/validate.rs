//! Structural and protocol-rule validation of parsed fingerprints.
//!
//! ## Checks
//!
//! - required fields: FINGERPRINT, VULNERABILITY, DETECT, CONFIDENCE
//! - CONFIDENCE is one of low / medium / high (case-insensitive)
//! - DETECT block present and non-empty
//! - per step, on the comment-stripped code part: `PORT`, `FUNCTION` and
//!   `SAFE` token pairs against the protocol rule table
//! - EVIDENCE lines start with a known evidence type and carry a payload
//!
//! Each step is keyed by its own first token (lower-cased), independent of
//! the document's PROTOCOL field; a step outside its protocol's keyword set
//! is protocol-neutral and only the token-triggered checks apply to it.
//!
//! The `ci_mode` flag is explicit per call. Strict validation aborts the
//! whole document on any `SAFE false` step; lenient validation tolerates
//! such steps and records their code parts in the returned metadata.

use crate::error::Error;
use crate::record::{DetectStep, Fingerprint};
use crate::rules::{rules_for, EVIDENCE_TYPES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const REQUIRED: [&str; 4] = ["FINGERPRINT", "VULNERABILITY", "DETECT", "CONFIDENCE"];
const CONFIDENCE_VALUES: [&str; 3] = ["low", "medium", "high"];

/// Side-channel output of validation, carried forward into the canonical
/// record under the reserved `_metadata` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMetadata {
    /// Code part of every detect step flagged unsafe.
    pub unsafe_steps: BTreeSet<String>,
}

/// Validate a parsed fingerprint. `doc` identifies the document in errors;
/// `ci_mode` selects strict (reject `SAFE false`) over lenient (record it).
pub fn validate(fp: &Fingerprint, doc: &str, ci_mode: bool) -> Result<ValidationMetadata, Error> {
    let missing: Vec<&str> = REQUIRED.iter().filter(|k| !fp.contains(k)).copied().collect();
    if !missing.is_empty() {
        return Err(Error::structural(
            doc,
            format!("missing required fields: {}", missing.join(", ")),
        ));
    }

    match fp.scalar("CONFIDENCE") {
        Some(v) if CONFIDENCE_VALUES.contains(&v.to_lowercase().as_str()) => {}
        Some(v) => return Err(Error::value(doc, format!("invalid CONFIDENCE '{v}'"))),
        None => return Err(Error::value(doc, "invalid CONFIDENCE (expected a value)")),
    }

    let steps: Vec<DetectStep<'_>> = fp
        .detect_steps()
        .into_iter()
        .filter(|s| {
            let t = s.raw.trim();
            !t.is_empty() && !t.starts_with('#')
        })
        .collect();
    if steps.is_empty() {
        return Err(Error::structural(doc, "DETECT block is empty"));
    }

    let mut metadata = ValidationMetadata::default();
    for step in &steps {
        check_step(step, doc, ci_mode, &mut metadata)?;
    }

    for line in fp.lines("EVIDENCE") {
        check_evidence(line, doc)?;
    }

    Ok(metadata)
}

/// Apply the rule table to one detect step.
///
/// The step's protocol key is its first token, lower-cased. `PORT`,
/// `FUNCTION` and `SAFE` checks trigger on the literal token appearing in
/// the code part, with the value taken as the following token; range bounds
/// consult the step protocol's rules when the table has them.
fn check_step(
    step: &DetectStep<'_>,
    doc: &str,
    ci_mode: bool,
    metadata: &mut ValidationMetadata,
) -> Result<(), Error> {
    let code = step.code_part();
    let tokens = step.tokens();
    let Some(first) = tokens.first() else {
        return Ok(());
    };
    let protocol = first.to_lowercase();
    let rule = rules_for(&protocol);

    if let Some(rule) = rule {
        if !rule.recognizes(first) {
            debug!(step = code, protocol = %protocol, "first token outside keyword set, step is protocol-neutral");
        }
    }

    if let Some(i) = tokens.iter().position(|t| *t == "PORT") {
        let value = tokens.get(i + 1).copied().unwrap_or("");
        let port: u32 = value
            .parse()
            .map_err(|_| Error::value(doc, format!("PORT must be numeric, got '{value}'")))?;
        if let Some(rule) = rule {
            if !rule.ports.allows(port) {
                return Err(Error::value(
                    doc,
                    format!("PORT {port} invalid for protocol {protocol}"),
                ));
            }
        }
    }

    if let Some(range) = rule.and_then(|r| r.function_codes.as_ref()) {
        if let Some(i) = tokens.iter().position(|t| *t == "FUNCTION") {
            let value = tokens.get(i + 1).copied().unwrap_or("");
            let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
            let code_num = u32::from_str_radix(digits, 16).map_err(|_| {
                Error::value(doc, format!("Modbus FUNCTION code must be hex, got '{value}'"))
            })?;
            if !range.contains(&code_num) {
                return Err(Error::value(
                    doc,
                    format!("Modbus function code 0x{code_num:X} invalid"),
                ));
            }
        }
    }

    if let Some(i) = tokens.iter().position(|t| *t == "SAFE") {
        let value = tokens.get(i + 1).copied().unwrap_or("");
        match value.to_lowercase().as_str() {
            "true" => {}
            "false" => {
                if ci_mode {
                    return Err(Error::policy(
                        doc,
                        format!("unsafe step (SAFE false) not allowed in CI mode: {code}"),
                    ));
                }
                warn!(doc, step = code, "unsafe step tolerated under lenient validation");
                metadata.unsafe_steps.insert(code.to_string());
            }
            _ => {
                return Err(Error::value(
                    doc,
                    format!("SAFE must be true/false, got '{value}'"),
                ))
            }
        }
    }

    Ok(())
}

/// An EVIDENCE line must start with a known evidence type followed by at
/// least one more token.
fn check_evidence(line: &str, doc: &str) -> Result<(), Error> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let evidence_type = parts.next().unwrap_or("");
    let payload = parts.next().map(str::trim).unwrap_or("");
    if evidence_type.is_empty() || payload.is_empty() {
        return Err(Error::value(doc, format!("EVIDENCE line incomplete: {trimmed}")));
    }
    if !EVIDENCE_TYPES.contains(&evidence_type) {
        return Err(Error::value(
            doc,
            format!("unsupported evidence type '{evidence_type}' in line: {trimmed}"),
        ));
    }
    Ok(())
}
