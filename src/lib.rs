//! `acoustic-relay` — a small, focused acoustic data transport library.
//!
//! This crate provides:
//! - MFSK modulation and Goertzel-based demodulation over two fixed profiles
//! - Packet framing with an additive checksum
//! - A SYN/DATA/FIN session protocol with selective retransmission via NACK
//! - File-mode (one `.wav` artifact per packet) and streaming-mode (rolling live
//!   capture, preamble-synchronized) operation
//!
//! The library is designed to be used by both CLI tools and longer-running services,
//! with an emphasis on clarity and a codec layer that never panics on valid input.

// Fixed session configuration (sample rate, tone table, framing sizes).
pub mod profile;

// MFSK tone generation and the Goertzel symbol detector.
pub mod tone;
pub mod detector;

// Bit/symbol and byte/bit packing, and the packet <-> PCM modulation layer.
pub mod bits;
pub mod modem;

// Packet framing and checksum.
pub mod packet;

// Payload compression.
pub mod compression;

// WAV artifact I/O and naming conventions.
pub mod wav;

// Session-level SYN/DATA/FIN protocol: file mode, streaming mode, retransmission.
pub mod session;

// Library-level session configuration.
pub mod config;

// Error taxonomy and process exit code mapping.
pub mod error;

// Logging configuration and control.
pub mod logging;

pub use config::SessionOpts;
pub use error::{Error, Result};
pub use profile::Profile;
