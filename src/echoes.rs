//! Detection buffer shared between the sensor producer and the recorder.
//!
//! The buffer is double-banked: the producer publishes complete detection
//! batches into the back bank and flips which side is readable, while the
//! recorder copies a scale-corrected snapshot out of the readable bank. The
//! two sides contend only on the short guarded section covering the publish
//! or the copy, never on downstream encoding work.

use std::sync::RwLock;

/// One raw detection as delivered by the sensor.
///
/// Distance and amplitude are integer counts; the physical value is
/// `raw / scale` with the scale factors held by the [`EchoBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Echo {
    /// Segment/channel the detection belongs to
    pub channel: u32,
    /// Raw distance count
    pub distance: i32,
    /// Raw amplitude count
    pub amplitude: i32,
    /// Detection flags as reported by the sensor
    pub flag: u16,
}

/// A detection with the scale factors applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledEcho {
    pub channel: u32,
    /// Physical distance, `raw / distance_scale`
    pub distance: f64,
    /// Physical amplitude, `raw / amplitude_scale`
    pub amplitude: f64,
    pub flag: u16,
}

#[derive(Debug)]
struct Banks {
    banks: [Vec<Echo>; 2],
    /// Index of the bank currently safe to read
    readable: usize,
    distance_scale: u32,
    amplitude_scale: u32,
}

/// Double-buffered detection storage.
///
/// Guard acquisition blocks without timeout; the guarded sections are small
/// and bounded. Scale factors must be non-zero.
#[derive(Debug)]
pub struct EchoBuffer {
    inner: RwLock<Banks>,
}

impl EchoBuffer {
    pub fn new(distance_scale: u32, amplitude_scale: u32) -> Self {
        EchoBuffer {
            inner: RwLock::new(Banks {
                banks: [Vec::new(), Vec::new()],
                readable: 0,
                distance_scale,
                amplitude_scale,
            }),
        }
    }

    /// Update the scale factors reported by the sensor.
    pub fn set_scales(&self, distance_scale: u32, amplitude_scale: u32) {
        let mut inner = self.inner.write().unwrap();
        inner.distance_scale = distance_scale;
        inner.amplitude_scale = amplitude_scale;
    }

    /// Publish a complete detection batch.
    ///
    /// The batch replaces the back bank, which then becomes the readable
    /// side. Called by the producer thread.
    pub fn publish(&self, echoes: Vec<Echo>) {
        let mut inner = self.inner.write().unwrap();
        let back = 1 - inner.readable;
        inner.banks[back] = echoes;
        inner.readable = back;
    }

    /// Number of detections currently readable.
    pub fn echo_count(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.banks[inner.readable].len()
    }

    /// Copy the readable bank out with the scale factors applied.
    ///
    /// The guard is held only for the copy and is released before this
    /// function returns, so callers can encode the snapshot without holding
    /// up the producer.
    pub fn snapshot(&self) -> Vec<ScaledEcho> {
        let inner = self.inner.read().unwrap();
        let distance_scale = f64::from(inner.distance_scale);
        let amplitude_scale = f64::from(inner.amplitude_scale);
        inner.banks[inner.readable]
            .iter()
            .map(|echo| ScaledEcho {
                channel: echo.channel,
                distance: f64::from(echo.distance) / distance_scale,
                amplitude: f64::from(echo.amplitude) / amplitude_scale,
                flag: echo.flag,
            })
            .collect()
    }
}
