//! File-mode receiver: probes artifacts by sequence number, reassembles, and issues
//! NACKs for any gap.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::compression::decompress;
use crate::config::SessionOpts;
use crate::error::{Error, Result};
use crate::modem;
use crate::packet::{self, DecodedPacket, PacketType};
use crate::profile::Profile;
use crate::session::syn_payload::SynPayload;
use crate::wav::{self, ArtifactNames};

/// Receiver-side session state, mirroring the data-model state machine:
/// `Idle --SYN_ok--> Receiving --FIN_ok∧complete--> Complete`;
/// `Receiving --FIN_ok∧gaps--> AwaitingRetx`; any bad SYN or unreadable FIN -> `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Idle,
    Receiving,
    Complete,
    AwaitingRetx,
    Failed,
}

/// Receive a file-mode transmission from artifacts under `opts.artifact_prefix`.
///
/// Returns `Ok(payload)` on a complete, gap-free session. Returns
/// `Err(Error::IncompleteNeedsRetx { missing })` after writing one NACK artifact per
/// missing sequence number under `nack_prefix`. Any other `Err` is terminal
/// (`FailedHandshake` for a bad/missing SYN or FIN, `PayloadCorrupt` for a
/// decompression failure).
pub fn receive_file(opts: &SessionOpts, nack_prefix: &str) -> Result<Vec<u8>> {
    let profile = &opts.profile;
    let names = ArtifactNames::new(&opts.artifact_prefix);

    let syn = read_packet(profile, &names.syn())
        .map_err(|e| Error::FailedHandshake(format!("could not read SYN artifact: {e}")))?;
    if syn.packet_type != PacketType::Syn || !syn.valid {
        return Err(Error::FailedHandshake(
            "SYN packet missing, wrong type, or checksum invalid".into(),
        ));
    }
    let syn_payload = SynPayload::decode_file(&syn.payload)?;
    let compressed = syn_payload.compressed();
    debug!(compressed, "SYN accepted");

    let received = probe_data_packets(profile, &names);

    let fin = read_packet(profile, &names.fin())
        .map_err(|e| Error::FailedHandshake(format!("could not read FIN artifact: {e}")))?;
    if fin.packet_type != PacketType::Fin || !fin.valid {
        return Err(Error::FailedHandshake(
            "FIN packet missing, wrong type, or checksum invalid".into(),
        ));
    }
    let expected_count = fin.seq;
    info!(expected_count, received = received.len(), "FIN accepted");

    let (payload, missing) = reassemble(&received, expected_count);

    if !missing.is_empty() {
        warn!(?missing, "session incomplete, emitting NACKs");
        let nack_names = ArtifactNames::new(nack_prefix);
        for &seq in &missing {
            let nack = packet::encode(PacketType::Nack, seq, &[]);
            let pcm = modem::modulate(profile, &nack);
            wav::write_artifact(nack_names.nack(seq), profile, &pcm)?;
        }
        return Err(Error::IncompleteNeedsRetx { missing });
    }

    let payload = if compressed {
        decompress(&payload)?
    } else {
        payload
    };

    Ok(payload)
}

/// Map a [`receive_file`] result onto the receiver-side state machine, for callers that
/// want to log or display the terminal state rather than just the payload/error.
pub fn outcome_state(outcome: &Result<Vec<u8>>) -> ReceiverState {
    match outcome {
        Ok(_) => ReceiverState::Complete,
        Err(Error::IncompleteNeedsRetx { .. }) => ReceiverState::AwaitingRetx,
        Err(_) => ReceiverState::Failed,
    }
}

/// Probe `_data_0000.wav`, `_data_0001.wav`, ... in order, stopping at the first one
/// that can't be read. A readable-but-invalid (checksum failed) frame is recorded as a
/// gap by simply not being inserted into the map — it does not stop the probe.
fn probe_data_packets(profile: &Profile, names: &ArtifactNames) -> BTreeMap<u8, Vec<u8>> {
    let mut received = BTreeMap::new();
    let mut seq = 0u8;
    loop {
        match read_packet(profile, &names.data(seq)) {
            Ok(decoded) if decoded.packet_type == PacketType::Data && decoded.valid => {
                debug!(seq, len = decoded.payload.len(), "DATA accepted");
                received.insert(decoded.seq, decoded.payload);
            }
            Ok(_) => {
                warn!(seq, "DATA artifact failed checksum, recording as gap");
            }
            Err(_) => break,
        }
        let Some(next) = seq.checked_add(1) else {
            break;
        };
        seq = next;
    }
    received
}

/// Reassemble a payload from a `seq -> chunk` map, reporting which indices in
/// `[0, expected_count)` are absent. Order-independent: the result only depends on the
/// map's contents, never on the order its entries were inserted in.
pub(crate) fn reassemble(received: &BTreeMap<u8, Vec<u8>>, expected_count: u8) -> (Vec<u8>, Vec<u8>) {
    let mut payload = Vec::new();
    let mut missing = Vec::new();
    for seq in 0..expected_count {
        match received.get(&seq) {
            Some(chunk) => payload.extend_from_slice(chunk),
            None => missing.push(seq),
        }
    }
    (payload, missing)
}

fn read_packet(profile: &Profile, path: &std::path::Path) -> Result<DecodedPacket> {
    let samples = wav::read_artifact(path)?;
    let framed = modem::demodulate(profile, &samples);
    packet::decode(&framed)
}
