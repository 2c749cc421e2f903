//! Session-level protocol: SYN/DATA/FIN framing over either one-artifact-per-packet
//! (file mode) or a rolling live capture (streaming mode), plus the NACK-driven
//! selective retransmission that ties the two sides together.

pub mod file_receiver;
pub mod file_sender;
pub mod retransmitter;
pub mod streaming;
pub mod syn_payload;

pub use file_receiver::{ReceiverState, receive_file};
pub use file_sender::{SendReport, send_file};
pub use retransmitter::{retransmit, retransmit_strict};
pub use streaming::{CaptureSource, DeliveredPayload, StreamingSession};
pub use syn_payload::SynPayload;
