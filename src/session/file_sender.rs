//! File-mode sender: SYN/DATA/FIN packets, each written as its own modulated artifact.

use tracing::{debug, info};

use crate::compression::compress;
use crate::config::SessionOpts;
use crate::error::Result;
use crate::modem;
use crate::packet::{self, PacketType};
use crate::session::syn_payload::SynPayload;
use crate::wav::{self, ArtifactNames};

/// Summary of a completed send, useful for a CLI to report progress.
#[derive(Debug, Clone)]
pub struct SendReport {
    pub data_packet_count: usize,
    pub compressed_len: usize,
}

/// Send `payload` as a sequence of `.wav` artifacts under `opts.artifact_prefix`.
///
/// 1. Compress `payload` if `opts.compress`.
/// 2. Emit `SYN` (`seq=0`) carrying the compression flag.
/// 3. Emit `DATA` packets in ascending `seq`, each holding up to
///    `profile.payload_chunk_size` bytes.
/// 4. Emit `FIN` (`seq = total_data_packets`), empty payload.
pub fn send_file(opts: &SessionOpts, payload: &[u8]) -> Result<SendReport> {
    let profile = &opts.profile;
    let names = ArtifactNames::new(&opts.artifact_prefix);

    let body = if opts.compress {
        compress(payload)
    } else {
        payload.to_vec()
    };

    let syn_payload = SynPayload::File {
        compressed: opts.compress,
    }
    .encode();
    let syn = packet::encode(PacketType::Syn, 0, &syn_payload);
    write_packet_artifact(profile, &names.syn(), &syn)?;
    debug!(prefix = %opts.artifact_prefix, "emitted SYN");

    let chunks: Vec<&[u8]> = body.chunks(profile.payload_chunk_size).collect();
    for (seq, chunk) in chunks.iter().enumerate() {
        let seq = seq as u8;
        let data = packet::encode(PacketType::Data, seq, chunk);
        write_packet_artifact(profile, &names.data(seq), &data)?;
        debug!(seq, len = chunk.len(), "emitted DATA");
    }

    let fin = packet::encode(PacketType::Fin, chunks.len() as u8, &[]);
    write_packet_artifact(profile, &names.fin(), &fin)?;
    info!(
        prefix = %opts.artifact_prefix,
        data_packets = chunks.len(),
        "send complete"
    );

    Ok(SendReport {
        data_packet_count: chunks.len(),
        compressed_len: body.len(),
    })
}

fn write_packet_artifact(
    profile: &crate::profile::Profile,
    path: &std::path::Path,
    framed: &[u8],
) -> Result<()> {
    let pcm = modem::modulate(profile, framed);
    wav::write_artifact(path, profile, &pcm)
}
