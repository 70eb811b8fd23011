/// Flux image stream writer

use crate::error::Result;
use crate::format::constants::*;
use crate::image::{P64Image, Pulse};
use std::io::Write;

/// Serialise a flux image
///
/// Layout: signature, version, flags, one `HTP` chunk per non-empty
/// half-track, then a `DONE` chunk. Each chunk carries its payload size and a
/// CRC-32 of the payload.
pub fn write_p64<W: Write>(image: &P64Image, writer: &mut W) -> Result<()> {
    writer.write_all(P64_SIGNATURE)?;
    writer.write_all(&P64_STREAM_VERSION.to_le_bytes())?;

    let flags = if image.write_protected {
        P64_FLAG_WRITE_PROTECT
    } else {
        0
    };
    writer.write_all(&flags.to_le_bytes())?;

    for (half_track, pulses) in image.tracks() {
        let id = [
            P64_TRACK_CHUNK[0],
            P64_TRACK_CHUNK[1],
            P64_TRACK_CHUNK[2],
            half_track,
        ];
        write_chunk(writer, &id, &encode_pulses(pulses))?;
    }

    write_chunk(writer, P64_DONE_CHUNK, &[])?;
    Ok(())
}

fn encode_pulses(pulses: &[Pulse]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + pulses.len() * 8);
    payload.extend_from_slice(&(pulses.len() as u32).to_le_bytes());
    for pulse in pulses {
        payload.extend_from_slice(&pulse.position.to_le_bytes());
        payload.extend_from_slice(&pulse.strength.to_le_bytes());
    }
    payload
}

fn write_chunk<W: Write>(writer: &mut W, id: &[u8; 4], payload: &[u8]) -> Result<()> {
    let checksum = if payload.is_empty() {
        0
    } else {
        crc32fast::hash(payload)
    };
    writer.write_all(id)?;
    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(&checksum.to_le_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_layout() {
        let mut out = Vec::new();
        write_p64(&P64Image::new(), &mut out).unwrap();

        assert_eq!(&out[..8], P64_SIGNATURE);
        assert_eq!(out.len(), 16 + 12);
        assert_eq!(&out[16..20], P64_DONE_CHUNK);
    }

    #[test]
    fn test_track_chunk_layout() {
        let mut image = P64Image::new();
        image.add_pulse(36, 0x0102_0304, 0xFFFF_FFFF).unwrap();
        let mut out = Vec::new();
        write_p64(&image, &mut out).unwrap();

        assert_eq!(&out[16..20], b"HTP\x24");
        assert_eq!(u32::from_le_bytes([out[20], out[21], out[22], out[23]]), 12);
        assert_eq!(&out[28..32], &1u32.to_le_bytes());
        assert_eq!(&out[32..36], &0x0102_0304u32.to_le_bytes());
    }

    #[test]
    fn test_write_protect_flag() {
        let mut image = P64Image::new();
        image.write_protected = true;
        let mut out = Vec::new();
        write_p64(&image, &mut out).unwrap();
        assert_eq!(&out[12..16], &P64_FLAG_WRITE_PROTECT.to_le_bytes());
    }
}
