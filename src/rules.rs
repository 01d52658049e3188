//! Static protocol rule tables driving validation and compilation.
//!
//! The rule table is immutable process-wide configuration: it is never
//! derived from input and never mutated. Rule-table keys are the lower-case
//! per-step protocol names (`modbus`, `s7`, `opcua`, `dnp3`); the
//! document-level protocol names are `MODBUS`, `S7COMM`, `OPCUA`, `DNP3`.
//! The mismatch between the two namespaces is inherited behavior.

use std::ops::RangeInclusive;

/// Per-protocol validation policy.
#[derive(Debug, Clone)]
pub struct ProtocolRule {
    /// Ports a `PORT` token pair may name under this protocol.
    pub ports: PortRule,
    /// First tokens recognized as protocol-specific steps. Any other first
    /// token makes the step protocol-neutral.
    pub step_keywords: &'static [&'static str],
    /// Allowed `FUNCTION` codes. Modbus only.
    pub function_codes: Option<RangeInclusive<u32>>,
}

impl ProtocolRule {
    /// Whether a step's first token is one of this protocol's step keywords.
    pub fn recognizes(&self, first_token: &str) -> bool {
        self.step_keywords.contains(&first_token)
    }
}

/// Allowed-port shape: a contiguous range or an explicit set.
#[derive(Debug, Clone)]
pub enum PortRule {
    Range(RangeInclusive<u32>),
    Set(&'static [u32]),
}

impl PortRule {
    pub fn allows(&self, port: u32) -> bool {
        match self {
            PortRule::Range(r) => r.contains(&port),
            PortRule::Set(ports) => ports.contains(&port),
        }
    }
}

static MODBUS: ProtocolRule = ProtocolRule {
    ports: PortRule::Range(1..=65535),
    step_keywords: &["FUNCTION", "SAFE", "PORT"],
    function_codes: Some(0x01..=0x10),
};

static S7: ProtocolRule = ProtocolRule {
    ports: PortRule::Set(&[102]),
    step_keywords: &["S7_SETUP_COMM", "S7_READ_SZL", "S7_WRITE_REG", "SAFE", "PORT"],
    function_codes: None,
};

static OPCUA: ProtocolRule = ProtocolRule {
    ports: PortRule::Set(&[4840]),
    step_keywords: &["OPCUA_CONNECT", "OPCUA_READ", "OPCUA_WRITE", "SAFE", "PORT"],
    function_codes: None,
};

static DNP3: ProtocolRule = ProtocolRule {
    ports: PortRule::Set(&[20000]),
    step_keywords: &["DNP3_READ", "DNP3_WRITE", "SAFE", "PORT"],
    function_codes: None,
};

/// Rule lookup by per-step protocol key (lower case). `None` means the step
/// is exempt from protocol-specific bounds.
pub fn rules_for(protocol: &str) -> Option<&'static ProtocolRule> {
    match protocol {
        "modbus" => Some(&MODBUS),
        "s7" => Some(&S7),
        "opcua" => Some(&OPCUA),
        "dnp3" => Some(&DNP3),
        _ => None,
    }
}

/// Document-level protocols the scanner compiler accepts.
pub const SUPPORTED_PROTOCOLS: [&str; 4] = ["MODBUS", "S7COMM", "OPCUA", "DNP3"];

/// Port used when a record names no port and its protocol is unknown or
/// empty. Inherited fallback: S7's port.
pub const FALLBACK_PORT: u16 = 102;

/// Default port per document-level protocol.
pub fn default_port(protocol: &str) -> Option<u16> {
    match protocol {
        "MODBUS" => Some(502),
        "S7COMM" => Some(102),
        "OPCUA" => Some(4840),
        "DNP3" => Some(20000),
        _ => None,
    }
}

/// Evidence-type tokens an EVIDENCE line may start with.
pub const EVIDENCE_TYPES: [&str; 5] = [
    "firmware:file",
    "firmware:string",
    "firmware:regex",
    "firmware:sha256",
    "firmware:offset",
];
