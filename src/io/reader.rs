/// Flux image stream reader

use crate::error::{Result, SnapshotError};
use crate::format::constants::*;
use crate::image::P64Image;
use log::warn;
use std::io::Read;

/// Read a serialised flux image
pub fn read_p64<R: Read>(reader: &mut R) -> Result<P64Image> {
    let mut signature = [0u8; 8];
    read_exact(reader, &mut signature, "header")?;
    if &signature != P64_SIGNATURE {
        return Err(SnapshotError::flux("not a P64 stream"));
    }

    let version = read_u32(reader, "header")?;
    if version != P64_STREAM_VERSION {
        return Err(SnapshotError::flux(format!(
            "unsupported P64 stream version {}",
            version
        )));
    }

    let flags = read_u32(reader, "header")?;
    let mut image = P64Image::new();
    image.write_protected = flags & P64_FLAG_WRITE_PROTECT != 0;

    loop {
        let mut id = [0u8; 4];
        read_exact(reader, &mut id, "chunk header")?;
        let size = read_u32(reader, "chunk header")?;
        let checksum = read_u32(reader, "chunk header")?;

        if &id == P64_DONE_CHUNK {
            return Ok(image);
        }

        let payload = read_payload(reader, size)?;
        if crc32fast::hash(&payload) != checksum {
            return Err(SnapshotError::flux(format!(
                "checksum mismatch in chunk {}",
                String::from_utf8_lossy(&id[..3])
            )));
        }

        if &id[..3] == P64_TRACK_CHUNK {
            read_track_chunk(&mut image, id[3], &payload)?;
        } else {
            warn!("Skipping unknown P64 chunk {:?}", String::from_utf8_lossy(&id));
        }
    }
}

/// Decode the pulses of one half-track chunk
fn read_track_chunk(image: &mut P64Image, half_track: u8, payload: &[u8]) -> Result<()> {
    if payload.len() < 4 {
        return Err(SnapshotError::flux("truncated half-track chunk"));
    }
    let count = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;

    let expected = count
        .checked_mul(8)
        .and_then(|n| n.checked_add(4))
        .ok_or_else(|| SnapshotError::flux("pulse count overflow"))?;
    if payload.len() != expected {
        return Err(SnapshotError::flux(format!(
            "half-track {} chunk is {} bytes, expected {}",
            half_track,
            payload.len(),
            expected
        )));
    }

    for pulse in payload[4..].chunks_exact(8) {
        let position = u32::from_le_bytes([pulse[0], pulse[1], pulse[2], pulse[3]]);
        let strength = u32::from_le_bytes([pulse[4], pulse[5], pulse[6], pulse[7]]);
        image.add_pulse(half_track, position, strength)?;
    }

    Ok(())
}

fn read_payload<R: Read>(reader: &mut R, size: u32) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    Read::take(&mut *reader, size as u64)
        .read_to_end(&mut payload)
        .map_err(|e| SnapshotError::flux(format!("chunk payload: {}", e)))?;
    if payload.len() != size as usize {
        return Err(SnapshotError::flux("truncated chunk payload"));
    }
    Ok(payload)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|_| SnapshotError::flux(format!("truncated {}", what)))
}

fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, what)?;
    Ok(u32::from_le_bytes(buf))
}
