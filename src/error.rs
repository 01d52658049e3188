//! Error taxonomy for the validate/compile pipeline.
//!
//! Every error names the offending document and describes the violated rule.
//! The parser raises nothing (it is deliberately permissive); everything
//! downstream propagates through this enum, and batch callers decide
//! per-document whether to continue.

/// Pipeline error. One variant per failure class.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field or block is missing.
    #[error("{doc}: {detail}")]
    Structural { doc: String, detail: String },
    /// A field or step carries a malformed or out-of-bounds value.
    #[error("{doc}: {detail}")]
    Value { doc: String, detail: String },
    /// An unsafe step was rejected under CI-strict validation.
    #[error("{doc}: {detail}")]
    Policy { doc: String, detail: String },
    /// The record's protocol is not one the scanner compiler supports.
    #[error("{doc}: unsupported protocol '{protocol}'")]
    UnsupportedProtocol { doc: String, protocol: String },
}

impl Error {
    pub fn structural(doc: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Structural { doc: doc.into(), detail: detail.into() }
    }

    pub fn value(doc: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Value { doc: doc.into(), detail: detail.into() }
    }

    pub fn policy(doc: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Policy { doc: doc.into(), detail: detail.into() }
    }

    pub fn unsupported_protocol(doc: impl Into<String>, protocol: impl Into<String>) -> Self {
        Error::UnsupportedProtocol { doc: doc.into(), protocol: protocol.into() }
    }

    /// Identifier of the document the error belongs to.
    pub fn doc(&self) -> &str {
        match self {
            Error::Structural { doc, .. }
            | Error::Value { doc, .. }
            | Error::Policy { doc, .. }
            | Error::UnsupportedProtocol { doc, .. } => doc,
        }
    }
}
