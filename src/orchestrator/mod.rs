/// Top-level save and restore of every disk unit
///
/// Writing emits the DRIVE module followed by the per-unit CPU, machine,
/// image and ROM modules. Reading runs in two phases: [`decode`] turns the
/// DRIVE module into a [`StagedState`] without touching the live units, then
/// [`reconstruct`] applies it and re-derives the runtime-only configuration.

/// DRIVE module decoding and the full restore sequence
pub mod read;
/// Live configuration derived from a staged unit type
pub mod reconstruct;
/// Staged per-unit records
pub mod stage;
/// Full save sequence
pub mod write;

pub use read::{decode, read_drive_snapshot, RestoreReport};
pub use reconstruct::{apply_positions, reconstruct};
pub use stage::{StagedState, StagedUnit};
pub use write::write_drive_snapshot;
