//! Collaborator seams between the recording engine and the device stack.
//!
//! The engine does not own the sensor connection or the property registry;
//! it reads both through the traits below. Notifications arrive as
//! [`RecorderEvent`] values delivered by direct synchronous call — the
//! caller is responsible for serializing delivery (one dispatch thread),
//! the engine performs no internal locking for its own state.

use std::sync::Arc;

use crate::echoes::EchoBuffer;
use crate::property::Property;

/// A producer notification consumed by the recorder.
///
/// Timestamps are the sensor's sampling-instant clock; notifications with
/// equal timestamps describe the same instant and are coalesced into one
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderEvent {
    /// New state properties are available for the given timestamp
    StateReady(u32),
    /// A new detection batch is available for the given timestamp
    EchoReady(u32),
    /// The property with the given id changed outside frame context
    PropertyChanged(u32),
}

/// Read access to the device's property registry.
///
/// The registry owns and validates the values; the engine only reads them.
/// Properties returned here are self-contained snapshots, safe to serialize
/// after the call returns.
pub trait PropertyRegistry: Send + Sync {
    /// Numeric device type recorded in the file header
    fn device_type(&self) -> u32;

    /// Connection protocol identifier recorded in the file header
    fn connection_protocol(&self) -> u32;

    /// Device name used for record file-name synthesis
    fn device_name(&self) -> Option<String> {
        None
    }

    /// Ordered set of properties flagged for persistence, serialized into
    /// the snapshot line
    fn persisted_properties(&self) -> Vec<Property>;

    /// Look up a single property by id, for change records
    fn property(&self, id: u32) -> Option<Property>;
}

/// Telemetry exposed by the sensor producer.
pub trait TelemetrySource: Send + Sync {
    /// Persisted state properties for the current sampling instant
    fn state_properties(&self) -> Vec<Property>;

    /// The shared detection buffer, including its current scale factors
    fn echoes(&self) -> Arc<EchoBuffer>;
}
