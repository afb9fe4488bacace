//! Sensor telemetry recording module.
//!
//! This module provides functionality to:
//! - Record sensor telemetry to `.ljr` files (line-delimited JSON records)
//! - Assemble per-instant frames from producer notifications
//! - Serialize typed properties without losing round-trip fidelity
//!
//! ## File Format
//!
//! The `.ljr` format is UTF-8 text, one self-contained JSON document per
//! line:
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Header                   │  {"header":{"prot_version",...}}, once
//! ├──────────────────────────┤
//! │ Property Snapshot        │  {"prop":[...]}, once, with type metadata
//! ├──────────────────────────┤
//! │ Frame                    │  {"frame":{"ts",states,echoes}}
//! │ Frame                    │
//! │ Property Change          │  {"prop":[{id,val}]}, outside frame context
//! │ Frame                    │
//! │ ...                      │
//! └──────────────────────────┘
//! ```
//!
//! Every line parses on its own; the enum text tables and integer/float
//! limits recorded in the snapshot make the later numeric-only records
//! decodable without the device present.

pub mod json_writer;
pub mod properties;
pub mod recorder;

pub use json_writer::JsonWriter;
pub use recorder::{
    LjrRecorder, RecordingState, RecordingStatus, LJR_PROT_VERSION, LJR_SUFFIX,
};
