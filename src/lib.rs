//! # Lidara
//!
//! Frame-oriented recording engine for streaming LiDAR sensor telemetry.
//!
//! Lidara persists periodic state readings, point-cloud "echo" detections
//! and device configuration properties into an append-only, line-delimited
//! JSON log (the `.ljr` format): one self-contained document per line, so a
//! record stays readable even when truncated mid-session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Producer (sensor stack, external)                          │
//! │  - emits StateReady / EchoReady / PropertyChanged events    │
//! │  - fills the double-buffered EchoBuffer                     │
//! └─────────────────────────────────────────────────────────────┘
//!                             │ RecorderEvent
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  LjrRecorder (this crate)                                   │
//! │  ├── frame state machine   (coalesces same-instant events)  │
//! │  ├── property serializer   (7 typed kinds, exhaustive)      │
//! │  ├── JsonWriter            (one document per line)          │
//! │  └── file lifecycle        (naming, header, finalization)   │
//! └─────────────────────────────────────────────────────────────┘
//!                             │ flushed lines
//!                             ▼
//!                        record.ljr
//! ```
//!
//! The engine is single-threaded by contract: the caller serializes event
//! delivery, and every operation is synchronous. The only concurrent piece
//! is the [`EchoBuffer`], which a producer thread may refill while the
//! recorder takes a snapshot.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lidara::{LjrRecorder, PropertyRegistry, RecorderEvent, TelemetrySource};
//!
//! fn record(registry: Arc<dyn PropertyRegistry>, source: Arc<dyn TelemetrySource>)
//!     -> Result<(), lidara::RecordError>
//! {
//!     let mut recorder = LjrRecorder::new(registry, source);
//!     // Empty path: name synthesized as <device>_<YYYY-MM-DD_HH-MM-SS>.ljr
//!     let path = recorder.start("")?;
//!     println!("recording to {}", path.display());
//!
//!     recorder.handle(RecorderEvent::StateReady(1000))?;
//!     recorder.handle(RecorderEvent::EchoReady(1000))?;
//!
//!     recorder.stop()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Modules
//!
//! - [`recording`] - the recorder, the streaming line writer, property
//!   serialization
//! - [`property`] - the typed property model (seven kinds, sealed enum)
//! - [`echoes`] - the double-buffered detection buffer
//! - [`source`] - collaborator traits for the producer and the registry
//! - [`error`] - the error taxonomy

pub mod echoes;
pub mod error;
pub mod property;
pub mod recording;
pub mod source;

// Re-export commonly used types
pub use echoes::{Echo, EchoBuffer, ScaledEcho};
pub use error::{FormatError, RecordError};
pub use property::{EnumEntry, Property, PropertyValues};
pub use recording::{
    JsonWriter, LjrRecorder, RecordingState, RecordingStatus, LJR_PROT_VERSION, LJR_SUFFIX,
};
pub use source::{PropertyRegistry, RecorderEvent, TelemetrySource};
