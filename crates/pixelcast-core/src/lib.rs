//! Pixelcast core library for driving addressable LED hardware.
//!
//! This crate implements the output pipeline used by the CLI: a render loop
//! produces pixel frames, the config boundary validates raw device mappings
//! into typed records, protocol encoders turn one frame into one datagram
//! payload, and device transports send it. Encoding is byte-oriented and
//! side-effect free; all I/O is isolated in `device` modules. Wire
//! conventions are captured in writers so encoders stay minimal.
//!
//! Invariants:
//! - Payloads are deterministic: the same config and frame yield the same
//!   bytes on every call.
//! - A device's pixel count and framing are fixed at construction;
//!   reconfiguration means recreating the device.
//! - One flush sends at most one datagram; failed frames are dropped and
//!   never retried, because a newer frame supersedes them.
//!
//! Version française (résumé):
//! Cette crate fournit le pipeline de sortie : la boucle de rendu produit
//! des trames, la frontière de configuration valide les descriptions
//! d'appareils, les encodeurs construisent la charge utile d'un datagramme
//! et les transports l'envoient. Les encodeurs sont purs ; les E/S vivent
//! dans `device`. Garanties : encodage déterministe, configuration figée à
//! la construction, une trame échouée est abandonnée, jamais renvoyée.
//!
//! # Examples
//! ```
//! use pixelcast_core::{Framing, PixelFrame, Rgb, encode_frame};
//!
//! let frame = PixelFrame::new(vec![Rgb::new(10, 20, 30), Rgb::new(40, 50, 60)]);
//! let payload = encode_frame(&Framing::default(), &frame);
//! assert_eq!(payload, vec![10, 20, 30, 40, 50, 60]);
//! ```

mod config;
mod device;
mod frame;
mod protocols;

pub use config::{ConfigError, DeviceConfig, DeviceKind, RawDeviceConfig};
pub use device::{BuildError, Device, FlushError, UdpDevice, build_device};
pub use frame::{PixelFrame, Rgb};
pub use protocols::raw::{Framing, encode_frame, payload_len};
