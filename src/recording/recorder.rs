//! LJR recorder - consumes producer notifications and writes `.ljr` files.
//!
//! The recorder is single-threaded by contract: the caller serializes
//! notification delivery (one dispatch thread), and every operation runs to
//! completion synchronously. The only shared state is the detection buffer,
//! which is guarded by [`EchoBuffer`](crate::echoes::EchoBuffer) itself.

use chrono::{Local, Utc};
use log::{debug, error, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::RecordError;
use crate::source::{PropertyRegistry, RecorderEvent, TelemetrySource};

use super::json_writer::JsonWriter;
use super::properties::{write_property, write_snapshot_property};

/// Protocol version written in every record header
pub const LJR_PROT_VERSION: u32 = 1;

/// Record file suffix, matched case-insensitively
pub const LJR_SUFFIX: &str = ".ljr";

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "idle"),
            RecordingState::Recording => write!(f, "recording"),
        }
    }
}

/// Recording status information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStatus {
    /// Current state
    pub state: String,
    /// Path being written (if any)
    pub path: Option<String>,
    /// Number of frames flushed so far
    pub frame_count: u64,
    /// Number of lines flushed so far, header and snapshot included
    pub line_count: u64,
    /// Recording start time (Unix timestamp ms)
    pub start_time_ms: Option<u64>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Frame assembly state.
///
/// `Closed` corresponds to the reserved timestamp 0 ("no frame open") of the
/// on-disk protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Closed,
    Open(u32),
}

/// Which payload a data notification carries.
#[derive(Debug, Clone, Copy)]
enum DataKind {
    States,
    Echoes,
}

/// Records sensor telemetry into a line-delimited JSON (`.ljr`) file.
///
/// One line per record: header, property snapshot, frames, property changes.
/// Data notifications with equal timestamps are coalesced into a single
/// frame; a property change always closes the open frame first so a
/// configuration change is never attributed to the wrong frame.
pub struct LjrRecorder {
    registry: Arc<dyn PropertyRegistry>,
    source: Arc<dyn TelemetrySource>,
    file: Option<BufWriter<File>>,
    writer: JsonWriter,
    frame: FrameState,
    path: Option<PathBuf>,
    frame_count: u64,
    line_count: u64,
    start_time_ms: Option<u64>,
}

impl LjrRecorder {
    pub fn new(registry: Arc<dyn PropertyRegistry>, source: Arc<dyn TelemetrySource>) -> Self {
        LjrRecorder {
            registry,
            source,
            file: None,
            writer: JsonWriter::new(),
            frame: FrameState::Closed,
            path: None,
            frame_count: 0,
            line_count: 0,
            start_time_ms: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecordingState {
        if self.file.is_some() {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.file.is_some()
    }

    /// Get current status
    pub fn status(&self) -> RecordingStatus {
        let duration_ms = self
            .start_time_ms
            .map(|start| (Utc::now().timestamp_millis() as u64).saturating_sub(start))
            .unwrap_or(0);
        RecordingStatus {
            state: self.state().to_string(),
            path: self
                .path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            frame_count: self.frame_count,
            line_count: self.line_count,
            start_time_ms: self.start_time_ms,
            duration_ms,
        }
    }

    /// Start a recording session.
    ///
    /// With an empty `path` the file name is synthesized from the device
    /// name and the local time. The `.ljr` suffix is appended if absent
    /// (case-insensitive). Header and snapshot lines are written and flushed
    /// before this returns. Returns the final path used.
    pub fn start(&mut self, path: &str) -> Result<PathBuf, RecordError> {
        if !path.is_empty() && Path::new(path).exists() {
            return Err(RecordError::AlreadyExists(PathBuf::from(path)));
        }

        let mut name = if path.is_empty() {
            self.synthesize_name()
        } else {
            path.to_string()
        };
        if !name.to_ascii_lowercase().ends_with(LJR_SUFFIX) {
            name.push_str(LJR_SUFFIX);
        }

        if self.file.is_some() {
            return Err(RecordError::AlreadyRecording);
        }

        // The exists check above and this open are not atomic; a concurrent
        // creation of the same path between the two steps is not detected.
        let file = File::create(&name)?;
        self.file = Some(BufWriter::new(file));
        self.frame = FrameState::Closed;
        self.frame_count = 0;
        self.line_count = 0;
        self.start_time_ms = Some(Utc::now().timestamp_millis() as u64);
        self.path = Some(PathBuf::from(&name));

        self.write_header()?;
        self.write_snapshot()?;

        info!("Recording to {}", name);
        Ok(PathBuf::from(name))
    }

    /// Stop the recording session.
    ///
    /// Closes and flushes a pending frame, then releases the file handle.
    /// Idempotent: stopping an idle recorder is a no-op.
    pub fn stop(&mut self) -> Result<(), RecordError> {
        if self.file.is_none() {
            return Ok(());
        }

        let result = match self.frame {
            FrameState::Open(_) => self.end_frame(),
            FrameState::Closed => Ok(()),
        };

        self.file = None;
        self.frame = FrameState::Closed;
        self.writer.reset();
        if let Some(path) = self.path.take() {
            info!(
                "Recording finished: {} ({} frames, {} lines)",
                path.display(),
                self.frame_count,
                self.line_count
            );
        }
        self.start_time_ms = None;

        result
    }

    /// Consume one producer notification.
    ///
    /// Notifications arriving while no session is active are ignored.
    pub fn handle(&mut self, event: RecorderEvent) -> Result<(), RecordError> {
        if self.file.is_none() {
            return Ok(());
        }

        match event {
            RecorderEvent::StateReady(ts) => self.append_frame_data(ts, DataKind::States),
            RecorderEvent::EchoReady(ts) => self.append_frame_data(ts, DataKind::Echoes),
            RecorderEvent::PropertyChanged(id) => self.property_changed(id),
        }
    }

    /// Frame coalescing: equal timestamps extend the open frame, differing
    /// timestamps close it and open a new one.
    fn append_frame_data(&mut self, ts: u32, kind: DataKind) -> Result<(), RecordError> {
        match self.frame {
            FrameState::Open(current) if current == ts => {}
            FrameState::Open(_) => {
                self.end_frame()?;
                self.begin_frame(ts)?;
            }
            FrameState::Closed => self.begin_frame(ts)?,
        }

        match kind {
            DataKind::States => self.append_states()?,
            DataKind::Echoes => self.append_echoes()?,
        }
        self.frame = FrameState::Open(ts);
        Ok(())
    }

    fn begin_frame(&mut self, ts: u32) -> Result<(), RecordError> {
        self.writer.begin_object()?;
        self.writer.key("frame")?;
        self.writer.begin_object()?;
        self.writer.key("ts")?;
        self.writer.uint(u64::from(ts))?;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RecordError> {
        self.writer.end_object()?; // frame
        self.writer.end_object()?; // root
        self.emit_line()?;
        self.frame = FrameState::Closed;
        self.frame_count += 1;
        Ok(())
    }

    fn append_states(&mut self) -> Result<(), RecordError> {
        self.writer.key("states")?;
        self.writer.begin_array()?;
        for prop in self.source.state_properties() {
            if prop.count() > 0 {
                write_property(&mut self.writer, &prop)?;
            }
        }
        self.writer.end_array()?;
        Ok(())
    }

    fn append_echoes(&mut self) -> Result<(), RecordError> {
        // The snapshot is copied out under the buffer guard; the guard is
        // already released by the time the echoes are encoded below.
        let echoes = self.source.echoes().snapshot();

        self.writer.key("echoes")?;
        self.writer.begin_array()?;
        for echo in &echoes {
            self.writer.begin_array()?;
            self.writer.uint(u64::from(echo.channel))?;
            self.writer.double(echo.distance)?;
            self.writer.double(echo.amplitude)?;
            self.writer.uint(u64::from(echo.flag))?;
            self.writer.end_array()?;
        }
        self.writer.end_array()?;
        Ok(())
    }

    /// A property change closes any open frame first, then emits a
    /// standalone change line. The frame sentinel is reset even when no
    /// frame was open, so the next data notification starts a fresh frame.
    fn property_changed(&mut self, id: u32) -> Result<(), RecordError> {
        if let FrameState::Open(_) = self.frame {
            self.end_frame()?;
        }
        self.frame = FrameState::Closed;

        let Some(prop) = self.registry.property(id) else {
            debug!("Property change for unknown id {}, nothing recorded", id);
            return Ok(());
        };
        if prop.count() == 0 {
            return Ok(());
        }

        self.writer.begin_object()?;
        self.writer.key("prop")?;
        self.writer.begin_array()?;
        write_property(&mut self.writer, &prop)?;
        self.writer.end_array()?;
        self.writer.end_object()?;
        self.emit_line()
    }

    /// First line of the file: protocol version and device identity.
    fn write_header(&mut self) -> Result<(), RecordError> {
        self.writer.begin_object()?;
        self.writer.key("header")?;
        self.writer.begin_object()?;
        self.writer.key("prot_version")?;
        self.writer.uint(u64::from(LJR_PROT_VERSION))?;
        self.writer.key("devicetype")?;
        self.writer.uint(u64::from(self.registry.device_type()))?;
        self.writer.key("protocol")?;
        self.writer.uint(u64::from(self.registry.connection_protocol()))?;
        self.writer.key("timestamp")?;
        self.writer.uint(Utc::now().timestamp() as u64)?;
        self.writer.end_object()?;
        self.writer.end_object()?;
        self.emit_line()
    }

    /// Second line of the file: every persisted property with its metadata.
    fn write_snapshot(&mut self) -> Result<(), RecordError> {
        self.writer.begin_object()?;
        self.writer.key("prop")?;
        self.writer.begin_array()?;
        for prop in self.registry.persisted_properties() {
            write_snapshot_property(&mut self.writer, &prop)?;
        }
        self.writer.end_array()?;
        self.writer.end_object()?;
        self.emit_line()
    }

    /// Flush the completed document as one line and reset the builder.
    fn emit_line(&mut self) -> Result<(), RecordError> {
        let line = self.writer.finish()?;
        if let Some(out) = self.file.as_mut() {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            out.flush()?;
            self.line_count += 1;
        }
        Ok(())
    }

    fn synthesize_name(&self) -> String {
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        match self.registry.device_name().filter(|name| !name.is_empty()) {
            Some(name) => format!("{}_{}", name, stamp),
            None => format!("UnknownDevice_{}", stamp),
        }
    }
}

impl Drop for LjrRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to finalize recording: {}", e);
        }
    }
}
