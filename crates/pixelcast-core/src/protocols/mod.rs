//! Protocol encoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: strides and framing constants (source of truth)
//! - `writer`: byte-append conventions
//! - `encoder`: domain-level encoding (no direct buffer indexing)
//!
//! Encoders are pure and contain no I/O; device modules own sockets and
//! decide when a payload is sent.

pub mod raw;
