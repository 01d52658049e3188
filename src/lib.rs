//! # otfpdsl — OT/ICS Fingerprint DSL and Compilers
//!
//! A DSL for describing protocol fingerprints of industrial-control-system
//! devices (Modbus, S7, OPC UA, DNP3), with validation against per-protocol
//! safety and structural rules and compilation into a canonical archival
//! record and a scanner-executable probe definition.
//!
//! ## Pipeline
//!
//! - **parse**: line-oriented DSL text into a [`Fingerprint`] mapping
//! - **validate**: structural completeness plus the protocol rule table;
//!   unsafe steps are rejected (CI-strict) or recorded ([`ValidationMetadata`])
//! - **compile_canonical**: protocol/port resolution into a [`CanonicalRecord`]
//! - **compile_scanner**: a [`ScannerRecord`] under an [`UnsafePolicy`]
//!   (drop unsafe steps, or tag them in place)
//!
//! ## Example DSL
//!
//! ```text
//! FINGERPRINT modbus-write-coil-unauth
//! VULNERABILITY "Unauthenticated Modbus coil write"
//! CONFIDENCE high
//! PROTOCOL MODBUS
//!
//! DETECT {
//!     MODBUS FUNCTION 05 # write single coil
//!     SAFE true
//! }
//!
//! EVIDENCE {
//!     firmware:string "coil write accepted"
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! use otfpdsl::{parse, validate, compile_canonical, compile_scanner, UnsafePolicy};
//!
//! let source = "FINGERPRINT demo\nVULNERABILITY x\nCONFIDENCE low\nDETECT {\n  MODBUS FUNCTION 03\n}\n";
//! let fp = parse(source);
//! let meta = validate(&fp, "demo.fp", false).unwrap();
//! let canonical = compile_canonical(&fp, &meta, "demo.fp").unwrap();
//! let scanner = compile_scanner(&canonical, UnsafePolicy::Exclude, "demo.fp").unwrap();
//! assert_eq!(scanner.port, 502);
//! ```

pub mod canonical;
pub mod error;
pub mod parser;
pub mod record;
pub mod rules;
pub mod scanner;
pub mod validate;

pub use canonical::{compile_canonical, CanonicalRecord};
pub use error::Error;
pub use parser::parse;
pub use record::{DetectStep, FieldValue, Fingerprint};
pub use rules::{default_port, rules_for, PortRule, ProtocolRule, SUPPORTED_PROTOCOLS};
pub use scanner::{compile_scanner, ScannerInfo, ScannerInputs, ScannerRecord, TaggedStep, UnsafePolicy};
pub use validate::{validate, ValidationMetadata};
