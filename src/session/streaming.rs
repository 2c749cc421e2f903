//! Streaming session: a single-threaded cooperative loop over a live capture source,
//! locating frames by preamble search instead of one-artifact-per-packet.
//!
//! Suspension points are exactly the blocking capture read (and, for a sender, the
//! blocking playback write) — nothing else in this module may block.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::compression::decompress;
use crate::detector::GoertzelBank;
use crate::error::{Error, Result};
use crate::modem::detect_all_symbols;
use crate::bits::{bits_to_bytes, symbols_to_bits};
use crate::packet::{self, PacketType};
use crate::profile::Profile;
use crate::session::file_receiver::reassemble;
use crate::session::syn_payload::SynPayload;

/// A blocking PCM capture source. One `read_block` call is one of the two suspension
/// points the concurrency model allows.
pub trait CaptureSource {
    /// Block until `block_len` samples are available (or the source ends), returning
    /// however many were actually read. Returning `0` signals end-of-stream.
    fn read_block(&mut self, block_len: usize) -> Result<Vec<i16>>;

    /// Release the device. Called exactly once, whether the loop ends normally or is
    /// cancelled.
    fn release(&mut self) {}
}

/// One fully-reassembled streaming payload, delivered to the caller's sink.
#[derive(Debug, Clone)]
pub struct DeliveredPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

struct ActiveSession {
    compressed: bool,
    name: String,
    packets: BTreeMap<u8, Vec<u8>>,
}

/// The streaming receiver's rolling-buffer state machine.
pub struct StreamingSession {
    profile: Profile,
    bank: GoertzelBank,
    buffer: Vec<f32>,
    active: Option<ActiveSession>,
    watchdog: Option<Duration>,
    last_progress: Option<Instant>,
}

/// Bound on how many symbols are demodulated while searching for a preamble match, per
/// §4.8 step 1 ("up to ~50 symbols").
const PREAMBLE_SEARCH_SYMBOLS: usize = 50;
/// Minimum buffered symbols before a probe attempt: enough for a preamble plus a
/// minimal packet.
const MIN_PROBE_SYMBOLS: usize = 20;

impl StreamingSession {
    pub fn new(profile: Profile) -> Self {
        let bank = GoertzelBank::new(&profile);
        Self {
            profile,
            bank,
            buffer: Vec::new(),
            active: None,
            watchdog: None,
            last_progress: None,
        }
    }

    /// Attach a watchdog: a session with no progress for longer than `timeout` aborts
    /// with [`Error::Cancelled`] on the next buffer fill. Purely opt-in, per §5.
    pub fn with_watchdog(mut self, timeout: Duration) -> Self {
        self.watchdog = Some(timeout);
        self
    }

    /// Run the cooperative loop until `capture` signals end-of-stream, `should_cancel`
    /// returns true, or the watchdog (if any) fires. `on_delivery` is invoked once per
    /// completed session; a decompression failure is reported there rather than
    /// aborting the loop, per §7 ("compression failures are terminal for the session
    /// only").
    pub fn run(
        &mut self,
        capture: &mut dyn CaptureSource,
        should_cancel: &dyn Fn() -> bool,
        mut on_delivery: impl FnMut(Result<DeliveredPayload>),
    ) -> Result<()> {
        let block_len = 4 * self.profile.samples_per_symbol;

        loop {
            if should_cancel() {
                capture.release();
                return Err(Error::Cancelled);
            }
            if let (Some(watchdog), Some(last)) = (self.watchdog, self.last_progress)
                && last.elapsed() > watchdog
            {
                capture.release();
                self.active = None;
                return Err(Error::Cancelled);
            }

            let block = capture.read_block(block_len)?;
            if block.is_empty() {
                break;
            }
            self.buffer
                .extend(block.iter().map(|&s| s as f32 / 32767.0));

            self.process_buffer(&mut on_delivery);
        }

        capture.release();
        Ok(())
    }

    fn process_buffer(&mut self, on_delivery: &mut impl FnMut(Result<DeliveredPayload>)) {
        let window_len = self.bank.window_len();
        let min_probe_samples = MIN_PROBE_SYMBOLS * window_len;

        while self.buffer.len() >= min_probe_samples {
            let prefix_len = (PREAMBLE_SEARCH_SYMBOLS * window_len).min(self.buffer.len());
            let symbols = detect_all_symbols(&self.bank, &self.buffer[..prefix_len]);

            let Some(match_offset) = find_preamble(&symbols, self.profile.preamble_pattern)
            else {
                let keep_from = self.buffer.len().saturating_sub(PREAMBLE_SEARCH_SYMBOLS * window_len);
                self.buffer.drain(..keep_from);
                return;
            };

            let packet_start = (match_offset + self.profile.preamble_pattern.len()) * window_len;

            match self.try_extract_frame(packet_start) {
                ExtractResult::NeedMoreData => return,
                ExtractResult::Extracted { framed, consumed } => {
                    if let Ok(decoded) = packet::decode(&framed)
                        && decoded.valid
                    {
                        self.last_progress = Some(Instant::now());
                        self.dispatch(decoded, on_delivery);
                        self.buffer.drain(..consumed);
                        continue;
                    }
                    // Framing invalid: skip past this preamble match and keep scanning.
                    self.buffer.drain(..((match_offset + 1) * window_len).max(1));
                }
            }
        }
    }

    fn try_extract_frame(&self, packet_start: usize) -> ExtractResult {
        let window_len = self.bank.window_len();
        let bits_per_symbol = self.profile.bits_per_symbol as usize;

        let header_symbols = ceil_div(24, bits_per_symbol);
        let header_samples = header_symbols * window_len;
        if self.buffer.len() < packet_start + header_samples {
            return ExtractResult::NeedMoreData;
        }

        let header_region = &self.buffer[packet_start..packet_start + header_samples];
        let header_syms = detect_all_symbols(&self.bank, header_region);
        let header_bits = symbols_to_bits(&self.profile, &header_syms);
        let header_bytes = bits_to_bytes(&header_bits);
        let Some(&len_byte) = header_bytes.get(2) else {
            return ExtractResult::NeedMoreData;
        };
        let frame_len = 5 + len_byte as usize;

        let frame_symbols = ceil_div(frame_len * 8, bits_per_symbol);
        let frame_samples = frame_symbols * window_len;
        if self.buffer.len() < packet_start + frame_samples {
            return ExtractResult::NeedMoreData;
        }

        let frame_region = &self.buffer[packet_start..packet_start + frame_samples];
        let frame_syms = detect_all_symbols(&self.bank, frame_region);
        let frame_bits = symbols_to_bits(&self.profile, &frame_syms);
        let mut frame_bytes = bits_to_bytes(&frame_bits);
        frame_bytes.truncate(frame_len);

        ExtractResult::Extracted {
            framed: frame_bytes,
            consumed: packet_start + frame_samples,
        }
    }

    fn dispatch(
        &mut self,
        decoded: packet::DecodedPacket,
        on_delivery: &mut impl FnMut(Result<DeliveredPayload>),
    ) {
        match decoded.packet_type {
            PacketType::Syn => match SynPayload::decode_streaming(&decoded.payload) {
                Ok(SynPayload::Streaming { compressed, name }) => {
                    info!(name, compressed, "SYN accepted, session opened");
                    self.active = Some(ActiveSession {
                        compressed,
                        name,
                        packets: BTreeMap::new(),
                    });
                    self.last_progress = Some(Instant::now());
                }
                Ok(SynPayload::File { .. }) | Err(_) => {
                    warn!("malformed streaming SYN, ignoring");
                }
            },
            PacketType::Data => {
                if let Some(session) = &mut self.active {
                    debug!(seq = decoded.seq, "DATA accepted");
                    session.packets.insert(decoded.seq, decoded.payload);
                } else {
                    debug!("DATA received outside an open session, ignoring");
                }
            }
            PacketType::Fin => {
                let Some(session) = self.active.take() else {
                    debug!("FIN received outside an open session, ignoring");
                    return;
                };
                let (payload, missing) = reassemble(&session.packets, decoded.seq);
                if !missing.is_empty() {
                    warn!(?missing, name = session.name, "session incomplete, discarding");
                    return;
                }
                let result = if session.compressed {
                    decompress(&payload)
                } else {
                    Ok(payload)
                };
                on_delivery(result.map(|bytes| DeliveredPayload {
                    name: session.name,
                    bytes,
                }));
            }
            PacketType::Ack | PacketType::Nack => {
                debug!("ACK/NACK not meaningful to a streaming receiver, ignoring");
            }
        }
    }
}

enum ExtractResult {
    NeedMoreData,
    Extracted { framed: Vec<u8>, consumed: usize },
}

/// Exact-equality search for `pattern` as a contiguous run within `symbols`. An empty
/// pattern always matches at offset 0 (a profile with no preamble has no search to do).
fn find_preamble(symbols: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    if pattern.len() > symbols.len() {
        return None;
    }
    symbols.windows(pattern.len()).position(|w| w == pattern)
}

fn ceil_div(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modem;

    struct ScriptedCapture {
        blocks: Vec<Vec<i16>>,
        idx: usize,
        released: bool,
    }

    impl CaptureSource for ScriptedCapture {
        fn read_block(&mut self, block_len: usize) -> Result<Vec<i16>> {
            if self.idx >= self.blocks.len() {
                return Ok(Vec::new());
            }
            let mut block = std::mem::take(&mut self.blocks[self.idx]);
            self.idx += 1;
            block.resize(block_len.max(block.len()), 0);
            Ok(block)
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    fn build_session_samples(profile: &Profile, name: &str, payload: &[u8]) -> Vec<i16> {
        let syn_payload = SynPayload::Streaming {
            compressed: false,
            name: name.to_string(),
        }
        .encode();
        let syn = packet::encode(PacketType::Syn, 0, &syn_payload);

        let mut samples = modem::modulate(profile, &syn);

        let chunks: Vec<&[u8]> = payload.chunks(profile.payload_chunk_size).collect();
        for (seq, chunk) in chunks.iter().enumerate() {
            let data = packet::encode(PacketType::Data, seq as u8, chunk);
            samples.extend(modem::modulate(profile, &data));
        }

        let fin = packet::encode(PacketType::Fin, chunks.len() as u8, &[]);
        samples.extend(modem::modulate(profile, &fin));
        samples
    }

    #[test]
    fn single_session_end_to_end() {
        let profile = Profile::ultrasonic();
        let samples = build_session_samples(&profile, "a.txt", b"streamed payload");

        let mut capture = ScriptedCapture {
            blocks: samples.chunks(4096).map(|c| c.to_vec()).collect(),
            idx: 0,
            released: false,
        };

        let mut session = StreamingSession::new(profile);
        let mut delivered = Vec::new();
        session
            .run(&mut capture, &|| false, |r| delivered.push(r))
            .unwrap();

        assert_eq!(delivered.len(), 1);
        let payload = delivered.remove(0).unwrap();
        assert_eq!(payload.name, "a.txt");
        assert_eq!(payload.bytes, b"streamed payload");
        assert!(capture.released);
    }

    #[test]
    fn two_back_to_back_sessions_s6() {
        let profile = Profile::ultrasonic();
        let mut samples = build_session_samples(&profile, "first.txt", b"first payload");
        samples.extend(build_session_samples(&profile, "second.txt", b"second payload!!"));

        let mut capture = ScriptedCapture {
            blocks: samples.chunks(4096).map(|c| c.to_vec()).collect(),
            idx: 0,
            released: false,
        };

        let mut session = StreamingSession::new(profile);
        let mut delivered = Vec::new();
        session
            .run(&mut capture, &|| false, |r| delivered.push(r))
            .unwrap();

        assert_eq!(delivered.len(), 2);
        let first = delivered.remove(0).unwrap();
        let second = delivered.remove(0).unwrap();
        assert_eq!(first.name, "first.txt");
        assert_eq!(first.bytes, b"first payload");
        assert_eq!(second.name, "second.txt");
        assert_eq!(second.bytes, b"second payload!!");
    }

    #[test]
    fn cancellation_releases_capture() {
        let profile = Profile::ultrasonic();
        let mut capture = ScriptedCapture {
            blocks: vec![vec![0i16; 4096]; 5],
            idx: 0,
            released: false,
        };
        let mut session = StreamingSession::new(profile);
        let err = session.run(&mut capture, &|| true, |_| {}).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(capture.released);
    }

    #[test]
    fn preamble_search_finds_exact_pattern() {
        assert_eq!(find_preamble(&[1, 0, 7, 0, 7, 2], &[0, 7, 0, 7]), Some(1));
        assert_eq!(find_preamble(&[1, 2, 3], &[0, 7, 0, 7]), None);
        assert_eq!(find_preamble(&[1, 2, 3], &[]), Some(0));
    }
}
