/// Nested flux image stream I/O

/// Flux image stream reader
pub mod reader;
/// Flux image stream writer
pub mod writer;

pub use reader::read_p64;
pub use writer::write_p64;
