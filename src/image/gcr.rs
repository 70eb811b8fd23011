/// GCR track images

use crate::format::constants::MAX_GCR_HALFTRACKS;

/// Raw GCR data per half-track
///
/// Each of the fixed number of half-track slots holds an independently sized
/// byte buffer, or nothing for an unformatted half-track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcrImage {
    tracks: Vec<Option<Vec<u8>>>,
}

impl Default for GcrImage {
    fn default() -> Self {
        Self::new()
    }
}

impl GcrImage {
    /// Create an image with every half-track empty
    pub fn new() -> Self {
        Self {
            tracks: vec![None; MAX_GCR_HALFTRACKS],
        }
    }

    /// Number of half-track slots
    pub fn half_track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Data of a half-track slot
    pub fn track(&self, index: usize) -> Option<&[u8]> {
        self.tracks.get(index).and_then(|t| t.as_deref())
    }

    /// Length of a half-track slot (0 when empty)
    pub fn track_size(&self, index: usize) -> usize {
        self.track(index).map_or(0, |t| t.len())
    }

    /// Replace a half-track slot; an empty buffer clears it and indices past
    /// the last slot are ignored
    pub fn set_track(&mut self, index: usize, data: Option<Vec<u8>>) {
        if let Some(slot) = self.tracks.get_mut(index) {
            *slot = data.filter(|d| !d.is_empty());
        }
    }

    /// Number of half-tracks holding data
    pub fn loaded_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_some()).count()
    }

    /// Iterate over `(index, data)` for half-tracks holding data
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.tracks
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_deref().map(|d| (i, d)))
    }
}
