//! Raw pixel-stream encoding.
//!
//! The encoder turns one frame into one datagram payload: optional prefix
//! bytes, then one RGB triple per pixel in frame order (each optionally
//! preceded by a one-byte pixel position), then optional postfix bytes.
//! Indexing is opt-in because most receiving firmware infers the position
//! from the byte offset; sparse or addressed protocols pay one extra byte
//! per pixel for the explicit form.
//!
//! The index byte is the pixel position truncated to its low 8 bits, so
//! positions above 255 wrap. Receivers addressing more pixels must rely on
//! byte offsets instead of indexes.
//!
//! Version française (résumé):
//! L'encodeur produit la charge utile d'un datagramme : préfixe optionnel,
//! triplets RGB dans l'ordre de la trame (précédés d'un octet de position si
//! demandé), suffixe optionnel. La position est tronquée à 8 bits ; au-delà
//! de 255 pixels elle reboucle.

pub mod encoder;
pub mod layout;
pub mod writer;

pub use encoder::{Framing, encode_frame, payload_len};
