use crate::frame::PixelFrame;

use super::layout;
use super::writer::PayloadWriter;

/// Framing options fixed at device construction.
///
/// Prefix and postfix bytes are decoded from configuration once; the
/// default carries no framing and no indexes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Framing {
    /// Bytes sent before the pixel data.
    pub prefix: Vec<u8>,
    /// Bytes sent after the pixel data.
    pub postfix: Vec<u8>,
    /// Whether every pixel is preceded by its position byte.
    pub include_indexes: bool,
}

/// Exact payload length for a frame of `pixel_count` pixels.
pub fn payload_len(framing: &Framing, pixel_count: usize) -> usize {
    let stride = if framing.include_indexes {
        layout::INDEXED_PIXEL_STRIDE
    } else {
        layout::PIXEL_STRIDE
    };
    framing.prefix.len() + pixel_count * stride + framing.postfix.len()
}

/// Encode one frame into a datagram payload.
///
/// Deterministic and stateless: the same framing and frame always produce
/// byte-identical output. The buffer is sized up front; encoding is
/// O(pixel count).
///
/// # Examples
/// ```
/// use pixelcast_core::{Framing, PixelFrame, Rgb, encode_frame};
///
/// let frame = PixelFrame::new(vec![Rgb::new(10, 20, 30)]);
/// assert_eq!(encode_frame(&Framing::default(), &frame), vec![10, 20, 30]);
/// ```
pub fn encode_frame(framing: &Framing, frame: &PixelFrame) -> Vec<u8> {
    let mut writer = PayloadWriter::with_capacity(payload_len(framing, frame.len()));
    writer.push_bytes(&framing.prefix);
    if framing.include_indexes {
        for (position, pixel) in frame.pixels().iter().enumerate() {
            writer.push_indexed_pixel(position, *pixel);
        }
    } else {
        for pixel in frame.pixels() {
            writer.push_pixel(*pixel);
        }
    }
    writer.push_bytes(&framing.postfix);
    writer.into_bytes()
}
