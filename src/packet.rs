//! Packet framing: `[type(1)][seq(1)][len(1)][payload(0..255)][checksum(2, big-endian)]`.

use crate::error::{Error, Result};

/// The packet kind carried in byte 0 of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Data = 0,
    Ack = 1,
    Nack = 2,
    Syn = 3,
    Fin = 4,
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PacketType::Data),
            1 => Ok(PacketType::Ack),
            2 => Ok(PacketType::Nack),
            3 => Ok(PacketType::Syn),
            4 => Ok(PacketType::Fin),
            other => Err(Error::UnknownType { value: other }),
        }
    }
}

/// A decoded frame, including the checksum verdict.
///
/// `valid = false` is a *soft* error: the fields are still populated so the caller can
/// decide how to react (e.g. treat as a gap and continue), rather than the crate
/// deciding for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPacket {
    pub packet_type: PacketType,
    pub seq: u8,
    pub payload: Vec<u8>,
    pub valid: bool,
}

/// Encode `type ‖ seq ‖ len ‖ payload ‖ checksum` where checksum is the big-endian
/// 16-bit truncated sum of every preceding byte.
///
/// `len` and `seq` are each masked to a single byte; a payload longer than 255 bytes is
/// truncated at the `len` field the same way the original protocol does (callers are
/// expected to keep payloads within `payload_chunk_size`, which is always <= 255).
pub fn encode(packet_type: PacketType, seq: u8, payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() & 0xFF) as u8;
    let mut packet = Vec::with_capacity(3 + payload.len() + 2);
    packet.push(packet_type as u8);
    packet.push(seq);
    packet.push(len);
    packet.extend_from_slice(&payload[..len as usize]);

    let checksum = checksum16(&packet);
    packet.push((checksum >> 8) as u8);
    packet.push((checksum & 0xFF) as u8);
    packet
}

/// Decode a frame. Fails with [`Error::MalformedFrame`] if too short to hold a header +
/// checksum, or [`Error::UnknownType`] if byte 0 isn't a known [`PacketType`]. A bad
/// checksum is reported via `valid = false`, not an `Err`.
pub fn decode(bytes: &[u8]) -> Result<DecodedPacket> {
    if bytes.len() < 5 {
        return Err(Error::MalformedFrame(format!(
            "frame of {} bytes is shorter than the minimum 5-byte header+checksum",
            bytes.len()
        )));
    }

    let packet_type = PacketType::try_from(bytes[0])?;
    let seq = bytes[1];
    let len = bytes[2] as usize;

    if bytes.len() < 3 + len + 2 {
        return Err(Error::MalformedFrame(format!(
            "declared len {len} exceeds frame of {} bytes",
            bytes.len()
        )));
    }

    let payload = bytes[3..3 + len].to_vec();
    let prefix = &bytes[..3 + len];
    let received = ((bytes[3 + len] as u16) << 8) | bytes[3 + len + 1] as u16;
    let valid = received == checksum16(prefix);

    Ok(DecodedPacket {
        packet_type,
        seq,
        payload,
        valid,
    })
}

fn checksum16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u32, |acc, &b| acc + b as u32) as u16
}
