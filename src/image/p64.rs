/// P64 flux images

use crate::error::{Result, SnapshotError};
use crate::format::constants::{MAX_GCR_HALFTRACKS, P64_SAMPLES_PER_ROTATION};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};

/// A flux transition on a half-track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    /// Position within the rotation, in samples
    pub position: u32,
    /// Pulse strength (0xFFFFFFFF for a clean transition)
    pub strength: u32,
}

/// Flux transitions per half-track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct P64Image {
    /// Write protection flag stored with the image
    pub write_protected: bool,
    tracks: BTreeMap<u8, Vec<Pulse>>,
}

impl P64Image {
    /// Create an empty flux image
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pulse; positions on a half-track must be strictly increasing
    pub fn add_pulse(&mut self, half_track: u8, position: u32, strength: u32) -> Result<()> {
        if half_track as usize >= MAX_GCR_HALFTRACKS {
            return Err(SnapshotError::flux(format!(
                "half-track {} out of range",
                half_track
            )));
        }
        if position >= P64_SAMPLES_PER_ROTATION {
            return Err(SnapshotError::flux(format!(
                "pulse position {} past end of rotation",
                position
            )));
        }

        let pulses = self.tracks.entry(half_track).or_default();
        if let Some(last) = pulses.last() {
            if position <= last.position {
                return Err(SnapshotError::flux(format!(
                    "pulse position {} not after {} on half-track {}",
                    position, last.position, half_track
                )));
            }
        }
        pulses.push(Pulse { position, strength });
        Ok(())
    }

    /// Pulses on a half-track
    pub fn pulses(&self, half_track: u8) -> &[Pulse] {
        self.tracks
            .get(&half_track)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over half-tracks holding pulses
    pub fn tracks(&self) -> impl Iterator<Item = (u8, &[Pulse])> {
        self.tracks
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(&ht, p)| (ht, p.as_slice()))
    }

    /// Total number of pulses
    pub fn pulse_count(&self) -> usize {
        self.tracks.values().map(|p| p.len()).sum()
    }

    /// Check whether the image holds no pulses
    pub fn is_empty(&self) -> bool {
        self.pulse_count() == 0
    }

    /// Remove every pulse
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Serialise into a stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        crate::io::writer::write_p64(self, writer)
    }

    /// Replace the contents from a stream; on error the image is unchanged
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        *self = crate::io::reader::read_p64(reader)?;
        Ok(())
    }

    /// Serialise into a byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut stream = Cursor::new(Vec::new());
        self.write_to(&mut stream)?;
        Ok(stream.into_inner())
    }
}
