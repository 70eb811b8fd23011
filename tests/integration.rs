/// Integration tests for drivesnap

use drivesnap::format::layout::layout_for;
use drivesnap::format::{FieldRecord, DRIVE_MODULE};
use drivesnap::resources::{DRIVE_TRUE_EMULATION, MACHINE_VIDEO_STANDARD};
use drivesnap::*;

/// Host that records every hook and writes small marker modules for the
/// CPU, machine, ROM and virtual drive collaborators
#[derive(Default)]
struct RecordingHost {
    events: Vec<String>,
}

impl RecordingHost {
    fn count(&self, prefix: &str) -> usize {
        self.events.iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn position(&self, event: &str) -> usize {
        self.events
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("missing event {}", event))
    }
}

fn cpu_name(index: usize) -> String {
    format!("DRIVECPU{}", index)
}

fn rom_name(index: usize) -> String {
    format!("DRIVEROM{}", index)
}

impl DriveHost for RecordingHost {
    fn gcr_writeback_all(&mut self, _units: &mut DiskUnits) {
        self.events.push("writeback".into());
    }

    fn write_virtual_drives(&mut self, snapshot: &mut Snapshot, first_unit: u8) -> Result<()> {
        let mut m = snapshot.create_module("VIRTUALDRIVES", 1, 0)?;
        m.write_u8(first_unit)?;
        m.close()
    }

    fn read_virtual_drives(&mut self, snapshot: &mut Snapshot, first_unit: u8) -> Result<()> {
        if let Some(mut m) = snapshot.open_module("VIRTUALDRIVES")? {
            let stored = m.read_u8()?;
            self.events.push(format!("vdrive {} {}", stored, first_unit));
        }
        Ok(())
    }

    fn write_cpu_module(
        &mut self,
        snapshot: &mut Snapshot,
        unit: &DiskUnit,
        family: CpuFamily,
    ) -> Result<()> {
        let mut m = snapshot.create_module(&cpu_name(unit.index), 1, 0)?;
        m.write_u8((family == CpuFamily::Wdc65c02) as u8)?;
        m.close()
    }

    fn read_cpu_module(
        &mut self,
        snapshot: &mut Snapshot,
        unit: &mut DiskUnit,
        family: CpuFamily,
    ) -> Result<()> {
        let mut m = snapshot
            .open_module(&cpu_name(unit.index))?
            .ok_or_else(|| SnapshotError::malformed("missing cpu module"))?;
        let stored = m.read_u8()?;
        assert_eq!(stored == 1, family == CpuFamily::Wdc65c02);
        self.events.push(format!("cpu {} {:?}", unit.address(), family));
        Ok(())
    }

    fn read_machine_module(&mut self, _snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<()> {
        self.events.push(format!("machine {}", unit.address()));
        Ok(())
    }

    fn write_rom_module(&mut self, snapshot: &mut Snapshot, unit: &DiskUnit) -> Result<()> {
        let mut m = snapshot.create_module(&rom_name(unit.index), 1, 0)?;
        m.write_bytes(&[0xEA; 16])?;
        m.close()
    }

    fn read_rom_module(&mut self, snapshot: &mut Snapshot, unit: &mut DiskUnit) -> Result<()> {
        if let Some(mut m) = snapshot.open_module(&rom_name(unit.index))? {
            let rom = m.read_vec(16)?;
            assert!(rom.iter().all(|&b| b == 0xEA));
            self.events.push(format!("rom {}", unit.address()));
        }
        Ok(())
    }

    fn setup_rom_image(&mut self, unit: &DiskUnit) {
        self.events.push(format!("setup rom {}", unit.address()));
    }

    fn init_drive_memory(&mut self, unit: &DiskUnit) {
        self.events.push(format!("memory {}", unit.address()));
    }

    fn install_rom_traps(&mut self, unit: &DiskUnit) {
        self.events.push(format!("traps {}", unit.address()));
    }

    fn set_bus_drive_present(&mut self, address: u8, present: bool) {
        self.events.push(format!("bus {} {}", address, present));
    }

    fn clear_parallel_cables(&mut self) {
        self.events.push("clear cables".into());
    }

    fn stop_drive_sound(&mut self) {
        self.events.push("stop sound".into());
    }

    fn update_iec_ports(&mut self) {
        self.events.push("iec".into());
    }

    fn update_ui_status(&mut self, _units: &DiskUnits) {
        self.events.push("ui".into());
    }
}

fn d81_with_content() -> SectorImage {
    let mut image = SectorImage::builder(ImageType::D81)
        .build()
        .expect("Failed to build image");
    for track in 1..=2u8 {
        for sector in 0..40u8 {
            let value = track.wrapping_mul(40).wrapping_add(sector);
            image
                .write_sector(track, sector, &[value; 256])
                .expect("Failed to write sector");
        }
    }
    image
}

/// Four units: a 1581 with a flat image, a 1541 with GCR tracks,
/// a 1571 with flux content on side 1, and an empty slot
fn configured_units() -> DiskUnits {
    let mut units = DiskUnits::new();

    units[0] = DiskUnit::new(0).with_type(DriveType::D1581);
    units[0].drive.attach_image(d81_with_content());
    units[0].idling_method = 2;
    units[0].drive.attach_clk = 1000;
    units[0].drive.detach_clk = 500;
    units[0].drive.attach_detach_clk = 750;
    units[0].drive.rotation.seed = 0x1234_5678;

    units[1] = DiskUnit::new(1).with_type(DriveType::D1541);
    let mut gcr = GcrImage::new();
    gcr.set_track(34, Some(vec![0x55; 7692]));
    gcr.set_track(35, Some(vec![0xFF; 7000]));
    units[1].drive.media = DriveMedia::Gcr(gcr);
    units[1].drive.set_half_track(34, 0);
    units[1].drive.gcr_head_offset = 4321;
    units[1].drive.read_only = true;

    units[2] = DiskUnit::new(2).with_type(DriveType::D1571);
    let mut p64 = P64Image::new();
    p64.add_pulse(40, 10, 0xFFFF_FFFF).expect("Failed to add pulse");
    p64.add_pulse(40, 20_000, 0x8000_0000).expect("Failed to add pulse");
    units[2].drive.p64 = Some(p64);
    units[2].drive.media = DriveMedia::Flux;
    units[2].drive.set_half_track(40, 1);
    units[2].clock_frequency = 2;
    units[2].drive.byte_ready_active = true;

    units
}

fn save(units: &mut DiskUnits, host: &mut RecordingHost, disks: bool, roms: bool) -> Snapshot {
    let mut snapshot = Snapshot::create("C64SC");
    write_drive_snapshot(&mut snapshot, units, host, &ResourceStore::new(), disks, roms)
        .expect("Failed to write snapshot");
    Snapshot::from_bytes(snapshot.into_bytes()).expect("Failed to reparse snapshot")
}

#[test]
fn test_full_round_trip() {
    let mut units = configured_units();
    let mut host = RecordingHost::default();
    let mut snapshot = save(&mut units, &mut host, true, true);

    let mut restored = DiskUnits::new();
    let mut resources = ResourceStore::new();
    let report = read_drive_snapshot(&mut snapshot, &mut restored, &mut host, &mut resources)
        .expect("Failed to read snapshot");

    assert_eq!(report.version, Some(ModuleVersion::new(1, 5)));
    assert_eq!(report.enabled_units, 3);
    assert_eq!(report.images_restored, 4);

    for (original, restored) in units.iter().zip(restored.iter()) {
        assert_eq!(StagedUnit::capture(original), StagedUnit::capture(restored));
        assert_eq!(original.unit_type, restored.unit_type);
        assert_eq!(original.enabled, restored.enabled);
        assert_eq!(original.drive.media_kind(), restored.drive.media_kind());
    }

    let image = restored[0].drive.flat_image().expect("No flat image");
    assert_eq!(image.data(), units[0].drive.flat_image().map(|i| i.data()).unwrap_or(&[]));
    assert_eq!(image.size_bytes(), 819_200);
    assert_eq!(restored[1].drive.media, units[1].drive.media);
    assert_eq!(restored[2].drive.p64, units[2].drive.p64);
    assert_eq!((restored[2].drive.current_half_track, restored[2].drive.side), (40, 1));

    assert_eq!(resources.get_int("Drive8IdleMethod"), Some(2));
    assert_eq!(resources.get_int(DRIVE_TRUE_EMULATION), Some(1));
    assert_eq!(resources.get_int(MACHINE_VIDEO_STANDARD), Some(1));
}

#[test]
fn test_flat_image_sector_content() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D1581);
    units[0].drive.attach_image(d81_with_content());

    let mut snapshot = save(&mut units, &mut RecordingHost::default(), true, false);
    let mut restored = DiskUnits::new();
    read_drive_snapshot(&mut snapshot, &mut restored, &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");

    let image = restored[0].drive.flat_image().expect("No flat image");
    assert_eq!(image.image_type(), ImageType::D81);
    for track in 1..=2u8 {
        for sector in 0..40u8 {
            let expected = track.wrapping_mul(40).wrapping_add(sector);
            let data = image.read_sector(track, sector).expect("Failed to read sector");
            assert!(data.iter().all(|&b| b == expected));
        }
    }
    assert!(!restored[0].drive.is_gcr_loaded());
}

#[test]
fn test_call_order() {
    let mut units = configured_units();
    let mut host = RecordingHost::default();
    let mut snapshot = save(&mut units, &mut host, true, true);
    assert_eq!(host.events, vec!["writeback"]);

    let mut host = RecordingHost::default();
    read_drive_snapshot(&mut snapshot, &mut DiskUnits::new(), &mut host, &mut ResourceStore::new())
        .expect("Failed to read snapshot");

    assert_eq!(host.events[0], "vdrive 10 10");
    assert_eq!(host.events[1], "writeback");
    assert!(host.position("traps 8") < host.position("clear cables"));
    assert!(host.position("clear cables") < host.position("cpu 8 Mos6502"));
    assert!(host.position("cpu 10 Mos6502") < host.position("rom 8"));
    assert!(host.position("rom 10") < host.position("stop sound"));
    assert!(host.position("stop sound") < host.position("iec"));
    assert!(host.position("iec") < host.position("ui"));
    assert_eq!(host.count("cpu"), 3);
    assert_eq!(host.count("machine"), 3);
    assert_eq!(host.count("rom"), 3);
}

#[test]
fn test_alternate_cpu_family() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D2000);
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), false, false);

    let mut host = RecordingHost::default();
    read_drive_snapshot(&mut snapshot, &mut DiskUnits::new(), &mut host, &mut ResourceStore::new())
        .expect("Failed to read snapshot");
    assert_eq!(host.count("cpu 8 Wdc65c02"), 1);
}

#[test]
fn test_reconstruction_scenario() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D1541II);
    units[0].idling_method = 1;
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), false, false);

    // Start from a live configuration that has a drive in slot 9
    let mut live = DiskUnits::new();
    live[1] = DiskUnit::new(1).with_type(DriveType::D1571);
    let mut host = RecordingHost::default();
    let mut resources = ResourceStore::new();
    read_drive_snapshot(&mut snapshot, &mut live, &mut host, &mut resources)
        .expect("Failed to read snapshot");

    assert!(live[0].enabled);
    assert!(live[0].rom_traps_installed);
    assert_eq!(resources.get_int("Drive8IdleMethod"), Some(1));
    assert_eq!(host.count("bus 8 true"), 1);

    assert!(!live[1].enabled);
    assert_eq!(live[1].unit_type, DriveType::None);
    assert_eq!(host.count("bus 9 false"), 1);
    assert_eq!(host.count("traps 9"), 0);
}

#[test]
fn test_unknown_unit_type() {
    let mut snapshot = Snapshot::create("C64");
    {
        let layout = layout_for(ModuleVersion::new(1, 5)).expect("No layout");
        let mut m = snapshot.create_module(DRIVE_MODULE, 1, 5).expect("Failed to create");
        m.write_u32(1).expect("write");
        let units = DiskUnits::new();
        for unit in units.iter() {
            let mut record = StagedUnit::capture(unit);
            record.unit_type_raw = 1999;
            layout.encode(&mut m, &record).expect("encode");
        }
    }

    let result = read_drive_snapshot(
        &mut snapshot,
        &mut DiskUnits::new(),
        &mut NullHost,
        &mut ResourceStore::new(),
    );
    assert!(matches!(result, Err(SnapshotError::StateReconstruction(_))));
}

#[test]
fn test_newer_major_leaves_units_untouched() {
    let mut snapshot = Snapshot::create("C64");
    {
        let mut m = snapshot.create_module(DRIVE_MODULE, 2, 0).expect("Failed to create");
        m.write_bytes(&[0xFF; 600]).expect("write");
    }

    let mut units = configured_units();
    let before = units.clone();
    let result = read_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &mut ResourceStore::new());

    assert!(matches!(result, Err(SnapshotError::VersionNewer { major: 2, .. })));
    assert_eq!(units, before);
}

#[test]
fn test_older_than_oldest_layout_rejected() {
    let mut snapshot = Snapshot::create("C64");
    snapshot
        .create_module(DRIVE_MODULE, 0, 9)
        .and_then(|m| m.close())
        .expect("Failed to create");

    let result = read_drive_snapshot(
        &mut snapshot,
        &mut DiskUnits::new(),
        &mut NullHost,
        &mut ResourceStore::new(),
    );
    assert!(matches!(result, Err(SnapshotError::VersionOlder { major: 0, minor: 9, .. })));
}

/// Minors below the current one are decoded through their historical
/// layouts. This departs from a strict "reject anything older than the
/// current version" gate; only versions below 1.0 are refused.
#[test]
fn test_minor_below_current_is_accepted() {
    for minor in 0..5u8 {
        let version = ModuleVersion::new(1, minor);
        let layout = layout_for(version).expect("No layout");

        let mut units = configured_units();
        let mut snapshot = Snapshot::create("C64");
        {
            let mut m = snapshot.create_module(DRIVE_MODULE, 1, minor).expect("Failed to create");
            m.write_u32(0).expect("write");
            for unit in units.iter_mut() {
                layout.encode(&mut m, &StagedUnit::capture(unit)).expect("encode");
            }
        }

        let mut restored = DiskUnits::new();
        let report = read_drive_snapshot(
            &mut snapshot,
            &mut restored,
            &mut NullHost,
            &mut ResourceStore::new(),
        )
        .expect("Historical layout rejected");
        assert_eq!(report.version, Some(version));

        for (original, restored) in units.iter().zip(restored.iter()) {
            let expected = StagedUnit::capture(original);
            let actual = StagedUnit::capture(restored);
            for &field in layout.fields {
                assert_eq!(expected.get(field), actual.get(field), "{} {:?}", version, field);
            }
            // Trailing fields are absent and default
            assert_eq!(restored.drive.attach_detach_clk, 0);
            assert!(!restored.drive.byte_ready_edge);
        }
    }
}

#[test]
fn test_gcr_read_clears_flat_image() {
    let mut units = configured_units();
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), true, false);

    let mut restored = DiskUnits::new();
    restored[1] = DiskUnit::new(1).with_type(DriveType::D1541);
    restored[1].drive.attach_image(SectorImage::builder(ImageType::D81).build().expect("build"));
    read_drive_snapshot(&mut snapshot, &mut restored, &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");

    assert!(restored[1].drive.flat_image().is_none());
    assert!(restored[1].drive.is_gcr_loaded());
    assert!(restored[2].drive.flat_image().is_none());
    assert!(restored[2].drive.is_gcr_loaded());
    assert!(!restored[0].drive.is_gcr_loaded());
}

#[test]
fn test_gcr_half_track_count_bound() {
    let mut snapshot = Snapshot::create("C64");
    {
        let mut m = snapshot.create_module("GCRIMAGE0", 3, 1).expect("Failed to create");
        m.write_u32(169).expect("write");
    }
    let mut unit = DiskUnit::new(0).with_type(DriveType::D1541);
    let result = codec::read_gcrimage_module(&mut snapshot, &mut unit);

    assert!(matches!(result, Err(SnapshotError::MalformedData(_))));
    assert!(unit.drive.media.gcr_image().is_none());
}

#[test]
fn test_noimage_is_idempotent() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D1581);
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), true, false);

    let mut restored = DiskUnits::new();
    restored[0] = DiskUnit::new(0).with_type(DriveType::D1581);
    restored[0].drive.attach_image(d81_with_content());
    let report = read_drive_snapshot(&mut snapshot, &mut restored, &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");

    assert!(restored[0].drive.flat_image().is_none());
    assert_eq!(report.images_restored, 4);

    // Nothing attached: still succeeds
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), true, false);
    read_drive_snapshot(&mut snapshot, &mut DiskUnits::new(), &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");
}

#[test]
fn test_noimage_detaches_gcr_and_flux_media() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D1541);
    units[1] = DiskUnit::new(1).with_type(DriveType::D1571);
    let mut snapshot = save(&mut units, &mut RecordingHost::default(), true, false);

    let mut restored = configured_units();
    restored[0] = DiskUnit::new(0).with_type(DriveType::D1541);
    restored[0].drive.media = restored[1].drive.media.clone();
    restored[1] = DiskUnit::new(1).with_type(DriveType::D1571);
    restored[1].drive.p64 = restored[2].drive.p64.clone();
    restored[1].drive.media = DriveMedia::Flux;
    assert!(restored[0].drive.is_gcr_loaded());
    assert!(restored[1].drive.is_gcr_loaded());

    let report = read_drive_snapshot(&mut snapshot, &mut restored, &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");

    assert_eq!(report.images_restored, 4);
    for unit in restored.iter() {
        assert_eq!(unit.drive.media_kind(), MediaKind::None);
    }
    assert!(restored[1].drive.p64.as_ref().is_some_and(|p64| p64.is_empty()));
}

#[test]
fn test_extreme_head_position_is_saved() {
    let mut units = DiskUnits::new();
    units[0] = DiskUnit::new(0).with_type(DriveType::D1571);
    units[0].drive.set_half_track(u16::MAX - 10, 1);

    let mut snapshot = save(&mut units, &mut RecordingHost::default(), false, false);
    let staged = decode(&mut snapshot, &DiskUnits::new())
        .expect("Failed to decode")
        .expect("No DRIVE module");
    assert_eq!(staged.units[0].half_track_word, 59);
}

#[test]
fn test_duplicate_image_modules_rejected() {
    let mut units = DiskUnits::new();
    let mut snapshot = Snapshot::create("C64");
    write_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &ResourceStore::new(), true, false)
        .expect("Failed to write snapshot");
    snapshot
        .create_module("GCRIMAGE2", 3, 1)
        .and_then(|mut m| {
            m.write_u32(0)?;
            m.close()
        })
        .expect("Failed to create");

    let before = units.clone();
    let result = read_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &mut ResourceStore::new());
    assert!(matches!(result, Err(SnapshotError::MalformedData(_))));
    assert_eq!(units, before);
}

#[test]
fn test_true_emulation_off() {
    let mut units = configured_units();
    let mut resources = ResourceStore::new();
    resources.set_int(DRIVE_TRUE_EMULATION, 0);

    let mut snapshot = Snapshot::create("C64");
    let mut host = RecordingHost::default();
    write_drive_snapshot(&mut snapshot, &mut units, &mut host, &resources, true, true)
        .expect("Failed to write snapshot");
    let names: Vec<String> = snapshot
        .modules()
        .expect("modules")
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["VIRTUALDRIVES"]);
    assert!(host.events.is_empty());

    let mut resources = ResourceStore::new();
    let mut host = RecordingHost::default();
    let before = units.clone();
    let report = read_drive_snapshot(&mut snapshot, &mut units, &mut host, &mut resources)
        .expect("Failed to read snapshot");

    assert!(!report.true_emulation());
    assert_eq!(resources.get_int(DRIVE_TRUE_EMULATION), Some(0));
    assert_eq!(host.events, vec!["vdrive 8 8"]);
    assert_eq!(units, before);
}

#[test]
fn test_sync_factor_restored() {
    let mut units = DiskUnits::new();
    let mut resources = ResourceStore::new();
    resources.set_int(MACHINE_VIDEO_STANDARD, 2);
    let mut snapshot = Snapshot::create("C64");
    write_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &resources, false, false)
        .expect("Failed to write snapshot");

    let mut resources = ResourceStore::new();
    let report = read_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &mut resources)
        .expect("Failed to read snapshot");
    assert_eq!(report.sync_factor, Some(2));
    assert_eq!(resources.get_int(MACHINE_VIDEO_STANDARD), Some(2));
}

#[test]
fn test_storage_exhaustion_mid_image() {
    let mut units = configured_units();
    let mut snapshot = Snapshot::create("C64").with_size_limit(100_000);
    let result = write_drive_snapshot(&mut snapshot, &mut units, &mut NullHost, &ResourceStore::new(), true, false);
    assert!(matches!(result, Err(SnapshotError::Io(_))));
}

#[test]
fn test_save_and_open_file() {
    let mut units = configured_units();
    let path = std::env::temp_dir().join(format!("drivesnap-it-{}.vsf", std::process::id()));
    let snapshot = save(&mut units, &mut RecordingHost::default(), true, false);
    snapshot.save(&path).expect("Failed to save");

    let mut reopened = Snapshot::open(&path).expect("Failed to open");
    assert_eq!(reopened.machine_name(), "C64SC");
    let mut restored = DiskUnits::new();
    read_drive_snapshot(&mut reopened, &mut restored, &mut NullHost, &mut ResourceStore::new())
        .expect("Failed to read snapshot");
    assert_eq!(restored[1].drive.media, units[1].drive.media);

    std::fs::remove_file(&path).ok();
}
