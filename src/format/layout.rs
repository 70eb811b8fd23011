/// Per-unit field layouts of the DRIVE module, one per supported version
///
/// Every retained layout is an ordered list of field descriptors. Encoding and
/// decoding walk the list generically, so a new version is one more table entry.

use crate::container::{ModuleReader, ModuleWriter};
use crate::error::Result;
use crate::format::ModuleVersion;

/// Encoded width of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 8-bit
    Byte,
    /// 16-bit little-endian
    Word,
    /// 32-bit little-endian
    DWord,
}

impl Width {
    /// Size in bytes
    pub fn bytes(&self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::DWord => 4,
        }
    }
}

/// A per-unit field of the DRIVE module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Clock of the last image attach
    AttachClk,
    /// Byte-ready line level
    ByteReadyLevel,
    /// Drive CPU clock frequency multiplier
    ClockFrequency,
    /// Half-track with the disk side folded in
    HalfTrack,
    /// Clock of the last image detach
    DetachClk,
    /// Image extension policy
    ExtendImagePolicy,
    /// Offset of the head within the current GCR track
    GcrHeadOffset,
    /// Next value read from disk
    GcrRead,
    /// Next value written to disk
    GcrWriteValue,
    /// Idling method of the drive CPU
    IdlingMethod,
    /// Parallel cable type
    ParallelCable,
    /// Write protection
    ReadOnly,
    /// Offset into the rotation speed table
    RotationTableOffset,
    /// Raw unit type
    UnitType,
    /// Rotation accumulator
    Accum,
    /// Clock of the last rotation update
    RotationLastClk,
    /// Bits shifted into the current byte
    BitCounter,
    /// Consecutive zero bits seen
    ZeroCount,
    /// Last byte (plus sync bit) read
    LastReadData,
    /// Last byte written
    LastWriteData,
    /// Pseudo-random seed for weak bits
    Seed,
    /// Current speed zone
    SpeedZone,
    /// UE7 counter preset
    Ue7Dcba,
    /// UE7 counter
    Ue7Counter,
    /// UF4 counter
    Uf4Counter,
    /// Flux reversal random counter
    FrRandCount,
    /// Read filter counter
    FilterCounter,
    /// Read filter state
    FilterState,
    /// Previous read filter state
    FilterLastState,
    /// Pending write flux
    WriteFlux,
    /// Head position within a P64 pulse stream
    PulseHeadPosition,
    /// Xorshift generator state
    XorShift32,
    /// SO line delay
    SoDelay,
    /// Cycle index within the rotation
    CycleIndex,
    /// Reference clock advance
    RefAdvance,
    /// Required reference cycles
    ReqRefCycles,
    /// Value kept only for alignment: written as zero, dropped on read
    Discard(Width),
}

impl Field {
    /// Encoded width of this field
    pub fn width(&self) -> Width {
        match self {
            Field::ByteReadyLevel
            | Field::ClockFrequency
            | Field::ExtendImagePolicy
            | Field::GcrRead
            | Field::GcrWriteValue
            | Field::IdlingMethod
            | Field::ParallelCable
            | Field::ReadOnly
            | Field::LastWriteData => Width::Byte,
            Field::HalfTrack | Field::LastReadData => Width::Word,
            Field::Discard(width) => *width,
            _ => Width::DWord,
        }
    }
}

/// Read and write access to a record by field
pub trait FieldRecord {
    /// Value of a field, widened to 32 bits
    fn get(&self, field: Field) -> u32;

    /// Store a decoded field value
    fn set(&mut self, field: Field, value: u32);
}

/// Ordered field list for one DRIVE module version
#[derive(Debug)]
pub struct Layout {
    /// Version this layout belongs to
    pub version: ModuleVersion,
    /// Fields in stream order
    pub fields: &'static [Field],
}

impl Layout {
    /// Encoded size of one unit record
    pub fn record_size(&self) -> usize {
        self.fields.iter().map(|f| f.width().bytes()).sum()
    }

    /// Check whether this layout carries a field
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Decode one unit record into `record`
    pub fn decode<R: FieldRecord>(&self, reader: &mut ModuleReader<'_>, record: &mut R) -> Result<()> {
        for &field in self.fields {
            let value = match field.width() {
                Width::Byte => reader.read_u8()? as u32,
                Width::Word => reader.read_u16()? as u32,
                Width::DWord => reader.read_u32()?,
            };
            if !matches!(field, Field::Discard(_)) {
                record.set(field, value);
            }
        }
        Ok(())
    }

    /// Encode one unit record from `record`
    pub fn encode<R: FieldRecord>(&self, writer: &mut ModuleWriter<'_>, record: &R) -> Result<()> {
        for &field in self.fields {
            let value = match field {
                Field::Discard(_) => 0,
                _ => record.get(field),
            };
            match field.width() {
                Width::Byte => writer.write_u8(value as u8)?,
                Width::Word => writer.write_u16(value as u16)?,
                Width::DWord => writer.write_u32(value)?,
            }
        }
        Ok(())
    }
}

const RESERVED: Field = Field::Discard(Width::Byte);

const LAYOUT_1_0: &[Field] = &[
    Field::Accum,
    Field::AttachClk,
    Field::Discard(Width::DWord), // bits moved
    Field::ByteReadyLevel,
    Field::ClockFrequency,
    Field::HalfTrack,
    Field::DetachClk,
    RESERVED,
    RESERVED,
    Field::ExtendImagePolicy,
    Field::Discard(Width::Byte), // finish byte
    Field::GcrHeadOffset,
    Field::GcrRead,
    Field::GcrWriteValue,
    Field::IdlingMethod,
    Field::Discard(Width::Byte), // last mode
    Field::ParallelCable,
    Field::ReadOnly,
    Field::RotationLastClk,
    Field::RotationTableOffset,
    Field::UnitType,
];

const LAYOUT_1_1: &[Field] = &[
    Field::AttachClk,
    Field::ByteReadyLevel,
    Field::ClockFrequency,
    Field::HalfTrack,
    Field::DetachClk,
    RESERVED,
    RESERVED,
    Field::ExtendImagePolicy,
    Field::GcrHeadOffset,
    Field::GcrRead,
    Field::GcrWriteValue,
    Field::IdlingMethod,
    Field::ParallelCable,
    Field::ReadOnly,
    Field::RotationTableOffset,
    Field::UnitType,
    Field::Accum,
    Field::RotationLastClk,
    Field::BitCounter,
    Field::ZeroCount,
    Field::LastReadData,
    Field::LastWriteData,
    Field::Seed,
];

const LAYOUT_1_2: &[Field] = &[
    Field::AttachClk,
    Field::ByteReadyLevel,
    Field::ClockFrequency,
    Field::HalfTrack,
    Field::DetachClk,
    RESERVED,
    RESERVED,
    Field::ExtendImagePolicy,
    Field::GcrHeadOffset,
    Field::GcrRead,
    Field::GcrWriteValue,
    Field::IdlingMethod,
    Field::ParallelCable,
    Field::ReadOnly,
    Field::RotationTableOffset,
    Field::UnitType,
    Field::Accum,
    Field::RotationLastClk,
    Field::BitCounter,
    Field::ZeroCount,
    Field::LastReadData,
    Field::LastWriteData,
    Field::Seed,
    Field::SpeedZone,
    Field::Ue7Dcba,
    Field::Ue7Counter,
    Field::Uf4Counter,
    Field::FrRandCount,
    Field::FilterCounter,
    Field::FilterState,
    Field::FilterLastState,
    Field::WriteFlux,
    Field::PulseHeadPosition,
    Field::XorShift32,
];

const LAYOUT_1_3: &[Field] = &[
    Field::AttachClk,
    Field::ByteReadyLevel,
    Field::ClockFrequency,
    Field::HalfTrack,
    Field::DetachClk,
    RESERVED,
    RESERVED,
    Field::ExtendImagePolicy,
    Field::GcrHeadOffset,
    Field::GcrRead,
    Field::GcrWriteValue,
    Field::IdlingMethod,
    Field::ParallelCable,
    Field::ReadOnly,
    Field::RotationTableOffset,
    Field::UnitType,
    Field::Accum,
    Field::RotationLastClk,
    Field::BitCounter,
    Field::ZeroCount,
    Field::LastReadData,
    Field::LastWriteData,
    Field::Seed,
    Field::SpeedZone,
    Field::Ue7Dcba,
    Field::Ue7Counter,
    Field::Uf4Counter,
    Field::FrRandCount,
    Field::FilterCounter,
    Field::FilterState,
    Field::FilterLastState,
    Field::WriteFlux,
    Field::PulseHeadPosition,
    Field::XorShift32,
    Field::SoDelay,
];

const LAYOUT_CURRENT: &[Field] = &[
    Field::AttachClk,
    Field::ByteReadyLevel,
    Field::ClockFrequency,
    Field::HalfTrack,
    Field::DetachClk,
    RESERVED,
    RESERVED,
    Field::ExtendImagePolicy,
    Field::GcrHeadOffset,
    Field::GcrRead,
    Field::GcrWriteValue,
    Field::IdlingMethod,
    Field::ParallelCable,
    Field::ReadOnly,
    Field::RotationTableOffset,
    Field::UnitType,
    Field::Accum,
    Field::RotationLastClk,
    Field::BitCounter,
    Field::ZeroCount,
    Field::LastReadData,
    Field::LastWriteData,
    Field::Seed,
    Field::SpeedZone,
    Field::Ue7Dcba,
    Field::Ue7Counter,
    Field::Uf4Counter,
    Field::FrRandCount,
    Field::FilterCounter,
    Field::FilterState,
    Field::FilterLastState,
    Field::WriteFlux,
    Field::PulseHeadPosition,
    Field::XorShift32,
    Field::SoDelay,
    Field::CycleIndex,
    Field::RefAdvance,
    Field::ReqRefCycles,
];

/// All retained layouts, oldest first. 1.4 and 1.5 share the current record.
pub static LAYOUTS: &[Layout] = &[
    Layout { version: ModuleVersion::new(1, 0), fields: LAYOUT_1_0 },
    Layout { version: ModuleVersion::new(1, 1), fields: LAYOUT_1_1 },
    Layout { version: ModuleVersion::new(1, 2), fields: LAYOUT_1_2 },
    Layout { version: ModuleVersion::new(1, 3), fields: LAYOUT_1_3 },
    Layout { version: ModuleVersion::new(1, 4), fields: LAYOUT_CURRENT },
    Layout { version: ModuleVersion::new(1, 5), fields: LAYOUT_CURRENT },
];

/// Find the layout for an exact version
pub fn layout_for(version: ModuleVersion) -> Option<&'static Layout> {
    LAYOUTS.iter().find(|layout| layout.version == version)
}

/// Layout used when writing
pub fn current_layout() -> &'static Layout {
    &LAYOUTS[LAYOUTS.len() - 1]
}
