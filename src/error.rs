use thiserror::Error;

/// Result type alias for snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors that can occur while saving or restoring drive state
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// I/O error in the underlying container or file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Module was written by a newer engine than this one
    #[error("Module {module} version {major}.{minor} is newer than supported")]
    VersionNewer {
        /// Module name
        module: String,
        /// Major version found in the container
        major: u8,
        /// Minor version found in the container
        minor: u8,
    },

    /// Module is older than the oldest layout this engine understands
    #[error("Module {module} version {major}.{minor} is too old")]
    VersionOlder {
        /// Module name
        module: String,
        /// Major version found in the container
        major: u8,
        /// Minor version found in the container
        minor: u8,
    },

    /// Structural limit exceeded or unknown tag
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// A scratch buffer could not be reserved
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Restored unit state could not be turned into live configuration
    #[error("State reconstruction failed: {0}")]
    StateReconstruction(String),

    /// Sector address outside the image geometry
    #[error("Invalid sector: track {track}, sector {sector}")]
    InvalidSector {
        /// Track number (1-based)
        track: u8,
        /// Sector number (0-based)
        sector: u8,
    },

    /// Nested flux stream could not be encoded or decoded
    #[error("Flux image error: {0}")]
    Flux(String),

    /// Resource file could not be parsed or serialised
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SnapshotError {
    /// Create a malformed data error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        SnapshotError::MalformedData(message.into())
    }

    /// Create a state reconstruction error
    pub fn reconstruction<S: Into<String>>(message: S) -> Self {
        SnapshotError::StateReconstruction(message.into())
    }

    /// Create a flux image error
    pub fn flux<S: Into<String>>(message: S) -> Self {
        SnapshotError::Flux(message.into())
    }

    /// Create a version-newer error for a module
    pub fn newer(module: &str, major: u8, minor: u8) -> Self {
        SnapshotError::VersionNewer {
            module: module.to_string(),
            major,
            minor,
        }
    }

    /// Create a version-older error for a module
    pub fn older(module: &str, major: u8, minor: u8) -> Self {
        SnapshotError::VersionOlder {
            module: module.to_string(),
            major,
            minor,
        }
    }
}
