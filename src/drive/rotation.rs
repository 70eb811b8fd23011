/// Rotation emulation counters saved with each drive

/// Disk rotation and read-circuit counters
///
/// The fields are opaque to the snapshot engine; they are captured and
/// restored verbatim for the rotation emulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    /// Rotation accumulator
    pub accum: u32,
    /// Clock of the last rotation update
    pub last_clk: u32,
    /// Bits shifted into the current byte
    pub bit_counter: u32,
    /// Consecutive zero bits
    pub zero_count: u32,
    /// Last byte read, with the sync flag in bit 8
    pub last_read_data: u16,
    /// Last byte written
    pub last_write_data: u8,
    /// Weak-bit generator seed
    pub seed: u32,
    /// Current speed zone
    pub speed_zone: u32,
    /// UE7 counter preset
    pub ue7_dcba: u32,
    /// UE7 counter
    pub ue7_counter: u32,
    /// UF4 counter
    pub uf4_counter: u32,
    /// Flux reversal random counter
    pub fr_randcount: u32,
    /// Read filter counter
    pub filter_counter: u32,
    /// Read filter state
    pub filter_state: u32,
    /// Previous read filter state
    pub filter_last_state: u32,
    /// Pending write flux
    pub write_flux: u32,
    /// Head position within a P64 pulse stream
    pub pulse_head_position: u32,
    /// Xorshift generator state
    pub xorshift32: u32,
    /// SO line delay
    pub so_delay: u32,
    /// Cycle index within the rotation
    pub cycle_index: u32,
    /// Reference clock advance
    pub ref_advance: u32,
    /// Required reference cycles
    pub req_ref_cycles: u32,
}
