//! Device transports.
//!
//! Everything that owns a socket lives here; frame encoding stays in
//! `protocols`. A device is built once from a validated configuration,
//! flushed zero or many times, and closed exactly once.

mod udp;

pub use udp::UdpDevice;

use std::io;

use thiserror::Error;

use crate::config::{ConfigError, DeviceKind, RawDeviceConfig};
use crate::frame::PixelFrame;

/// Uniform capability every LED output target implements.
///
/// Callers drive one device from one loop at a time; `flush` taking
/// `&mut self` makes overlapping calls on the same instance impossible.
/// Distinct devices own distinct sockets and may be flushed from
/// independent threads.
pub trait Device: Send {
    /// Number of addressable pixels declared at construction. Pure.
    fn pixel_count(&self) -> usize;

    /// Encode and transmit one frame as a single datagram.
    ///
    /// The frame length must equal [`Device::pixel_count`]; a mismatch is
    /// rejected, never truncated or padded. A transport failure drops the
    /// frame without retrying: by the time a retry could complete, a newer
    /// frame would already be due. The device stays usable after any
    /// per-call error except [`FlushError::Closed`].
    fn flush(&mut self, frame: &PixelFrame) -> Result<(), FlushError>;

    /// Release the transport. Idempotent; every later flush fails with
    /// [`FlushError::Closed`] and performs no network write.
    fn close(&mut self);
}

/// Errors fatal to device construction. No partial device is returned; when
/// validation fails, no socket was opened.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid device config: {0}")]
    Config(#[from] ConfigError),
    #[error("socket setup failed: {0}")]
    Socket(#[from] io::Error),
}

/// Per-call flush failures.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error("frame size mismatch: expected {expected} pixels, got {actual}")]
    FrameSize { expected: usize, actual: usize },
    #[error("datagram send failed: {0}")]
    Transport(#[from] io::Error),
    #[error("device is closed")]
    Closed,
}

/// Build a device from a raw configuration mapping.
///
/// The transport variant is selected from the mapping's `type` tag,
/// the mapping is validated, and only then is the transport opened.
///
/// # Examples
/// ```no_run
/// use pixelcast_core::{Device, PixelFrame, Rgb, build_device};
/// use serde_json::json;
///
/// let mut device = build_device(&json!({
///     "ip_address": "192.168.1.40",
///     "port": 21324,
///     "pixel_count": 1,
/// }))?;
/// device.flush(&PixelFrame::new(vec![Rgb::new(255, 0, 0)]))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build_device(value: &serde_json::Value) -> Result<Box<dyn Device>, BuildError> {
    let raw: RawDeviceConfig =
        serde_json::from_value(value.clone()).map_err(ConfigError::from)?;
    let config = raw.validate()?;
    match raw.kind {
        DeviceKind::Udp => Ok(Box::new(UdpDevice::open(config)?)),
    }
}
