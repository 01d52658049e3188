//! Parse fingerprint DSL source into a [`Fingerprint`] using PEST.
//!
//! The grammar classifies each line in isolation (comment, block open, block
//! close, key-value, bare key); this module's builder supplies the flat block
//! state: a block stays open until a lone `}`, a second open inside a block
//! re-binds a new top-level field, and a stray `}` is ignored. Malformed
//! input degrades to best-effort parsing: the parser never validates, and
//! the validator is the sole authority on well-formedness.

use crate::record::{FieldValue, Fingerprint};
use pest::Parser;
use pest_derive::Parser as PestParser;
use tracing::warn;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct FingerprintParser;

/// Parse DSL source into a fingerprint record. Infallible: the grammar is
/// total over UTF-8 text, and structural oddities are preserved rather than
/// reported.
pub fn parse(source: &str) -> Fingerprint {
    let document = match FingerprintParser::parse(Rule::document, source) {
        Ok(mut pairs) => match pairs.next() {
            Some(p) => p,
            None => return Fingerprint::default(),
        },
        // The grammar accepts any line shape, so this only fires if the
        // grammar itself regresses. Degrade to an empty record.
        Err(e) => {
            warn!(error = %e, "fingerprint source did not match the line grammar");
            return Fingerprint::default();
        }
    };

    let mut fp = Fingerprint::default();
    let mut current_block: Option<String> = None;

    for line in document.into_inner() {
        match line.as_rule() {
            Rule::comment => {}
            Rule::block_open => {
                let name = line
                    .into_inner()
                    .next()
                    .map(|n| n.as_str().trim().to_string())
                    .unwrap_or_default();
                fp.fields.insert(name.clone(), FieldValue::Block(Vec::new()));
                current_block = Some(name);
            }
            Rule::block_close => current_block = None,
            Rule::key_value => {
                let raw = line.as_str().trim_end();
                if let Some(lines) = open_block(&mut fp, &current_block) {
                    lines.push(raw.to_string());
                } else {
                    let mut inner = line.into_inner();
                    let key = inner.next().map(|p| p.as_str()).unwrap_or_default();
                    let value = inner.next().map(|p| p.as_str()).unwrap_or_default();
                    fp.fields.insert(
                        key.to_string(),
                        FieldValue::Scalar(value.trim().trim_matches('"').to_string()),
                    );
                }
            }
            Rule::bare_key => {
                let raw = line.as_str().trim_end();
                if let Some(lines) = open_block(&mut fp, &current_block) {
                    lines.push(raw.to_string());
                } else {
                    fp.fields.insert(raw.to_string(), FieldValue::Bare);
                }
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    fp
}

/// The line sink of the currently open block, if any.
fn open_block<'a>(
    fp: &'a mut Fingerprint,
    current: &Option<String>,
) -> Option<&'a mut Vec<String>> {
    let name = current.as_ref()?;
    match fp.fields.get_mut(name) {
        Some(FieldValue::Block(lines)) => Some(lines),
        _ => None,
    }
}
