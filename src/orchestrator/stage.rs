/// Staged DRIVE module contents, decoded but not yet applied

use crate::drive::{DiskUnit, DiskUnits, DriveType, RotationState};
use crate::format::{Field, FieldRecord, ModuleVersion, DRIVE_HALFTRACKS_1571};

/// One unit's record from the DRIVE module
///
/// Built from the live unit first, so fields a legacy layout does not carry
/// keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedUnit {
    /// Clock of the last image attach
    pub attach_clk: u32,
    /// Clock of the last image detach
    pub detach_clk: u32,
    /// Clock of the last detach followed by an attach
    pub attach_detach_clk: u32,
    /// Byte-ready line level
    pub byte_ready_level: u8,
    /// Byte-ready edge latch
    pub byte_ready_edge: bool,
    /// Byte-ready output enabled
    pub byte_ready_active: bool,
    /// CPU clock multiplier
    pub clock_frequency: u8,
    /// Half-track with the side folded in
    pub half_track_word: u16,
    /// Image extension policy
    pub extend_image_policy: u8,
    /// Head offset within the current GCR track
    pub gcr_head_offset: u32,
    /// Next value read from disk
    pub gcr_read: u8,
    /// Next value written to disk
    pub gcr_write_value: u8,
    /// Idling method of the drive CPU
    pub idling_method: u8,
    /// Parallel cable type
    pub parallel_cable: u8,
    /// Write protection
    pub read_only: bool,
    /// Offset into the rotation speed table
    pub rotation_table_offset: u32,
    /// Raw unit type, validated during reconstruction
    pub unit_type_raw: u32,
    /// Rotation counters
    pub rotation: RotationState,
}

impl StagedUnit {
    /// Capture a live unit
    pub fn capture(unit: &DiskUnit) -> Self {
        let drive = &unit.drive;
        Self {
            attach_clk: drive.attach_clk,
            detach_clk: drive.detach_clk,
            attach_detach_clk: drive.attach_detach_clk,
            byte_ready_level: drive.byte_ready_level,
            byte_ready_edge: drive.byte_ready_edge,
            byte_ready_active: drive.byte_ready_active,
            clock_frequency: unit.clock_frequency,
            half_track_word: drive.half_track_word(),
            extend_image_policy: drive.extend_image_policy,
            gcr_head_offset: drive.gcr_head_offset,
            gcr_read: drive.gcr_read,
            gcr_write_value: drive.gcr_write_value,
            idling_method: unit.idling_method,
            parallel_cable: unit.parallel_cable,
            read_only: drive.read_only,
            rotation_table_offset: drive.rotation_table_offset,
            unit_type_raw: unit.unit_type.raw(),
            rotation: drive.rotation.clone(),
        }
    }

    /// Decoded unit type, if recognised
    pub fn unit_type(&self) -> Option<DriveType> {
        DriveType::from_raw(self.unit_type_raw)
    }

    /// Split the half-track word into half-track and side
    ///
    /// Only 1570/1571 models fold a second side in; for them a value above
    /// one side's range selects side 1.
    pub fn half_track_and_side(&self, unit_type: DriveType) -> (u16, u8) {
        if unit_type.is_double_sided_gcr() && self.half_track_word > DRIVE_HALFTRACKS_1571 + 1 {
            (self.half_track_word - DRIVE_HALFTRACKS_1571, 1)
        } else {
            (self.half_track_word, 0)
        }
    }
}

impl FieldRecord for StagedUnit {
    fn get(&self, field: Field) -> u32 {
        let r = &self.rotation;
        match field {
            Field::AttachClk => self.attach_clk,
            Field::ByteReadyLevel => self.byte_ready_level as u32,
            Field::ClockFrequency => self.clock_frequency as u32,
            Field::HalfTrack => self.half_track_word as u32,
            Field::DetachClk => self.detach_clk,
            Field::ExtendImagePolicy => self.extend_image_policy as u32,
            Field::GcrHeadOffset => self.gcr_head_offset,
            Field::GcrRead => self.gcr_read as u32,
            Field::GcrWriteValue => self.gcr_write_value as u32,
            Field::IdlingMethod => self.idling_method as u32,
            Field::ParallelCable => self.parallel_cable as u32,
            Field::ReadOnly => self.read_only as u32,
            Field::RotationTableOffset => self.rotation_table_offset,
            Field::UnitType => self.unit_type_raw,
            Field::Accum => r.accum,
            Field::RotationLastClk => r.last_clk,
            Field::BitCounter => r.bit_counter,
            Field::ZeroCount => r.zero_count,
            Field::LastReadData => r.last_read_data as u32,
            Field::LastWriteData => r.last_write_data as u32,
            Field::Seed => r.seed,
            Field::SpeedZone => r.speed_zone,
            Field::Ue7Dcba => r.ue7_dcba,
            Field::Ue7Counter => r.ue7_counter,
            Field::Uf4Counter => r.uf4_counter,
            Field::FrRandCount => r.fr_randcount,
            Field::FilterCounter => r.filter_counter,
            Field::FilterState => r.filter_state,
            Field::FilterLastState => r.filter_last_state,
            Field::WriteFlux => r.write_flux,
            Field::PulseHeadPosition => r.pulse_head_position,
            Field::XorShift32 => r.xorshift32,
            Field::SoDelay => r.so_delay,
            Field::CycleIndex => r.cycle_index,
            Field::RefAdvance => r.ref_advance,
            Field::ReqRefCycles => r.req_ref_cycles,
            Field::Discard(_) => 0,
        }
    }

    fn set(&mut self, field: Field, value: u32) {
        let r = &mut self.rotation;
        match field {
            Field::AttachClk => self.attach_clk = value,
            Field::ByteReadyLevel => self.byte_ready_level = value as u8,
            Field::ClockFrequency => self.clock_frequency = value as u8,
            Field::HalfTrack => self.half_track_word = value as u16,
            Field::DetachClk => self.detach_clk = value,
            Field::ExtendImagePolicy => self.extend_image_policy = value as u8,
            Field::GcrHeadOffset => self.gcr_head_offset = value,
            Field::GcrRead => self.gcr_read = value as u8,
            Field::GcrWriteValue => self.gcr_write_value = value as u8,
            Field::IdlingMethod => self.idling_method = value as u8,
            Field::ParallelCable => self.parallel_cable = value as u8,
            Field::ReadOnly => self.read_only = value != 0,
            Field::RotationTableOffset => self.rotation_table_offset = value,
            Field::UnitType => self.unit_type_raw = value,
            Field::Accum => r.accum = value,
            Field::RotationLastClk => r.last_clk = value,
            Field::BitCounter => r.bit_counter = value,
            Field::ZeroCount => r.zero_count = value,
            Field::LastReadData => r.last_read_data = value as u16,
            Field::LastWriteData => r.last_write_data = value as u8,
            Field::Seed => r.seed = value,
            Field::SpeedZone => r.speed_zone = value,
            Field::Ue7Dcba => r.ue7_dcba = value,
            Field::Ue7Counter => r.ue7_counter = value,
            Field::Uf4Counter => r.uf4_counter = value,
            Field::FrRandCount => r.fr_randcount = value,
            Field::FilterCounter => r.filter_counter = value,
            Field::FilterState => r.filter_state = value,
            Field::FilterLastState => r.filter_last_state = value,
            Field::WriteFlux => r.write_flux = value,
            Field::PulseHeadPosition => r.pulse_head_position = value,
            Field::XorShift32 => r.xorshift32 = value,
            Field::SoDelay => r.so_delay = value,
            Field::CycleIndex => r.cycle_index = value,
            Field::RefAdvance => r.ref_advance = value,
            Field::ReqRefCycles => r.req_ref_cycles = value,
            Field::Discard(_) => {}
        }
    }
}

/// Everything decoded from a DRIVE module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedState {
    /// Version the module was written at
    pub version: ModuleVersion,
    /// Leading timing factor (the machine video standard)
    pub sync_factor: u32,
    /// One record per unit slot
    pub units: Vec<StagedUnit>,
}

impl StagedState {
    /// Seed a staged state from the live units
    pub fn from_units(version: ModuleVersion, sync_factor: u32, units: &DiskUnits) -> Self {
        Self {
            version,
            sync_factor,
            units: units.iter().map(StagedUnit::capture).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::layout::LAYOUTS;

    #[test]
    fn test_every_field_round_trips_through_record() {
        let mut staged = StagedUnit::default();
        for layout in LAYOUTS {
            for (i, &field) in layout.fields.iter().enumerate() {
                if matches!(field, Field::Discard(_)) {
                    continue;
                }
                let value = match field.width() {
                    crate::format::Width::Byte => 1 + i as u32 % 200,
                    crate::format::Width::Word => 300 + i as u32,
                    crate::format::Width::DWord => 0x1000_0000 + i as u32,
                };
                let value = if field == Field::ReadOnly { 1 } else { value };
                staged.set(field, value);
                assert_eq!(staged.get(field), value, "{:?}", field);
            }
        }
    }

    #[test]
    fn test_half_track_side_folding() {
        let staged = StagedUnit {
            half_track_word: 36 + DRIVE_HALFTRACKS_1571,
            ..Default::default()
        };
        assert_eq!(staged.half_track_and_side(DriveType::D1571), (36, 1));
        assert_eq!(staged.half_track_and_side(DriveType::D1571Cr), (36, 1));
        assert_eq!(staged.half_track_and_side(DriveType::D1541), (106, 0));

        let staged = StagedUnit {
            half_track_word: 71,
            ..Default::default()
        };
        assert_eq!(staged.half_track_and_side(DriveType::D1571), (71, 0));
    }

    #[test]
    fn test_capture_folds_side() {
        let mut unit = DiskUnit::new(0).with_type(DriveType::D1571);
        unit.drive.set_half_track(10, 1);
        let staged = StagedUnit::capture(&unit);
        assert_eq!(staged.half_track_word, 80);
        assert_eq!(staged.unit_type(), Some(DriveType::D1571));
    }
}
