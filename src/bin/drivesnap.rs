/// Interactive snapshot inspector

use drivesnap::format::layout::layout_for;
use drivesnap::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;

/// Console commands as (name, arguments, summary)
const COMMANDS: &[(&str, &str, &str)] = &[
    ("open", "<path>", "Open a snapshot and restore its drive units"),
    ("info", "", "Container header and restored units"),
    ("modules", "", "Module directory with versions, offsets and sizes"),
    ("dump", "<module> [bytes]", "Hex dump of a module payload (256 bytes by default)"),
    ("drives", "", "DRIVE records as decoded, before reconstruction"),
    ("gcr", "<8-11>", "GCR half-tracks restored for a unit"),
    ("image", "<8-11>", "Flat or flux image restored for a unit"),
    ("resources", "[load|save <path>]", "Configuration resources"),
    ("help", "", "This list"),
    ("quit", "", "Leave the console (also 'exit')"),
];

/// Completes command names at the start of the line
struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        if head.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let prefix = head.to_lowercase();
        let candidates = COMMANDS
            .iter()
            .map(|(name, _, _)| *name)
            .chain(["exit"])
            .filter(|name| name.starts_with(&prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// An opened snapshot and the units restored from it
struct Session {
    path: String,
    snapshot: Snapshot,
    units: Option<DiskUnits>,
}

impl Session {
    fn open(path: &str, resources: &mut ResourceStore) -> Result<Self> {
        let snapshot = Snapshot::open(path)?;

        // Restore from a copy so `modules` and `dump` still see the whole file
        let mut scratch = snapshot.clone();
        let mut units = DiskUnits::new();
        let units = match read_drive_snapshot(&mut scratch, &mut units, &mut NullHost, resources) {
            Ok(report) => {
                println!(
                    "Restored {} enabled unit(s), {} image module(s)",
                    report.enabled_units, report.images_restored
                );
                Some(units)
            }
            Err(e) => {
                println!("Warning: drive state not restored: {}", e);
                None
            }
        };

        Ok(Self {
            path: path.to_string(),
            snapshot,
            units,
        })
    }

    fn unit(&self, arg: Option<&String>) -> Option<&DiskUnit> {
        let units = self.units.as_ref()?;
        let address: u8 = arg?.parse().ok()?;
        units.by_address(address)
    }
}

/// Console state between commands
struct Console {
    session: Option<Session>,
    resources: ResourceStore,
}

/// Whether the console keeps reading after a command
enum Flow {
    Continue,
    Quit,
}

impl Console {
    fn new() -> Self {
        Self {
            session: None,
            resources: ResourceStore::new(),
        }
    }

    fn execute(&mut self, args: &[String]) -> Flow {
        let Some(command) = args.first().map(|c| c.to_lowercase()) else {
            return Flow::Continue;
        };

        match command.as_str() {
            "quit" | "exit" => return Flow::Quit,
            "help" => print_help(),
            "open" => self.open(args.get(1)),
            "resources" => self.resources(args.get(1).map(String::as_str), args.get(2)),
            "info" | "modules" | "dump" | "drives" | "gcr" | "image" => match &self.session {
                Some(session) => inspect(session, &command, &args[1..]),
                None => println!("No snapshot loaded. Use 'open <path>' first."),
            },
            _ => println!("Unknown command '{}'. Type 'help' for the list.", command),
        }
        Flow::Continue
    }

    fn open(&mut self, path: Option<&String>) {
        let Some(path) = path else {
            println!("Usage: open <path>");
            return;
        };
        match Session::open(path, &mut self.resources) {
            Ok(session) => {
                println!("Opened: {}", path);
                self.session = Some(session);
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    fn resources(&mut self, action: Option<&str>, path: Option<&String>) {
        match (action, path) {
            (None, _) => {
                for (name, value) in self.resources.iter() {
                    println!("{:<24} {}", name, value);
                }
            }
            (Some("load"), Some(path)) => match ResourceStore::load_from(path) {
                Ok(loaded) => {
                    self.resources = loaded;
                    println!("Loaded resources from {}", path);
                }
                Err(e) => println!("Error: {}", e),
            },
            (Some("save"), Some(path)) => match self.resources.save_to(path) {
                Ok(()) => println!("Saved resources to {}", path),
                Err(e) => println!("Error: {}", e),
            },
            _ => println!("Usage: resources [load|save <path>]"),
        }
    }
}

fn inspect(session: &Session, command: &str, args: &[String]) {
    match command {
        "info" => print_info(session),
        "modules" => list_modules(&session.snapshot),
        "drives" => list_drives(&session.snapshot),
        "dump" => match args.first() {
            Some(name) => {
                let max_bytes = args.get(1).and_then(|n| n.parse().ok()).unwrap_or(256);
                dump_module(&session.snapshot, name, max_bytes);
            }
            None => println!("Usage: dump <module> [bytes]"),
        },
        "gcr" | "image" => match (session.unit(args.first()), command) {
            (Some(unit), "gcr") => show_gcr(unit),
            (Some(unit), _) => show_image(unit),
            (None, _) => println!("Usage: {} <8-11>", command),
        },
        _ => {}
    }
}

fn history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".drivesnap_history"))
}

fn main() {
    env_logger::init();

    println!("drivesnap inspector. Type 'help' for commands.");

    let mut editor = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            return;
        }
    };
    editor.set_helper(Some(CommandCompleter));

    let history = history_file();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut console = Console::new();
    loop {
        let line = match editor.readline("drivesnap> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        if let Flow::Quit = console.execute(&split_arguments(line)) {
            break;
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

/// Split a command line on whitespace, keeping double-quoted runs together
fn split_arguments(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

fn print_help() {
    println!("Commands:");
    for (name, arguments, summary) in COMMANDS {
        let usage = format!("{} {}", name, arguments);
        println!("  {:<32} {}", usage.trim_end(), summary);
    }
}

fn print_info(session: &Session) {
    let snapshot = &session.snapshot;
    println!("Filename: {}", session.path);
    println!("Machine: {}", snapshot.machine_name());
    println!("Container version: {}", snapshot.version());
    println!("Size: {} bytes", snapshot.len());
    match &session.units {
        Some(units) => {
            for unit in units.iter() {
                println!(
                    "Unit #{}: {} ({}, media {})",
                    unit.address(),
                    unit.unit_type,
                    if unit.enabled { "enabled" } else { "disabled" },
                    unit.drive.media_kind()
                );
            }
        }
        None => println!("Drive state: not restored"),
    }
}

fn list_modules(snapshot: &Snapshot) {
    match snapshot.modules() {
        Ok(modules) => {
            println!("{:<16} {:>7} {:>10} {:>10}", "Name", "Version", "Offset", "Size");
            println!("{}", "-".repeat(46));
            for m in modules {
                println!(
                    "{:<16} {:>7} {:>10} {:>10}",
                    m.name,
                    m.version.to_string(),
                    m.offset,
                    m.payload_size()
                );
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn dump_module(snapshot: &Snapshot, name: &str, max_bytes: usize) {
    let mut scratch = snapshot.clone();
    scratch.rewind();
    let mut module = match scratch.open_module(name) {
        Ok(Some(module)) => module,
        Ok(None) => {
            println!("No module named {}", name);
            return;
        }
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let size = module.remaining();
    match module.read_vec(size) {
        Ok(data) => {
            println!("{} {} ({} bytes):", name, module.version(), size);
            print_hex_dump(&data, max_bytes);
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn list_drives(snapshot: &Snapshot) {
    let mut scratch = snapshot.clone();
    scratch.rewind();
    let staged = match decode(&mut scratch, &DiskUnits::new()) {
        Ok(Some(staged)) => staged,
        Ok(None) => {
            println!("No DRIVE module (true drive emulation was off)");
            return;
        }
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let record_size = layout_for(staged.version).map(|l| l.record_size()).unwrap_or(0);
    println!(
        "DRIVE {} ({} byte records), sync factor {}",
        staged.version, record_size, staged.sync_factor
    );
    println!(
        "{:<5} {:<8} {:>6} {:>4} {:>3} {:>10} {:>10} {:>5} {:>3}",
        "Unit", "Type", "HTrack", "Side", "RO", "Attach", "Detach", "Idle", "Clk"
    );
    println!("{}", "-".repeat(64));
    for (i, record) in staged.units.iter().enumerate() {
        let address = format::FIRST_UNIT_ADDRESS + i as u8;
        let (type_name, half_track, side) = match record.unit_type() {
            Some(t) => {
                let (ht, side) = record.half_track_and_side(t);
                (t.to_string(), ht, side)
            }
            None => (format!("?{}", record.unit_type_raw), record.half_track_word, 0),
        };
        println!(
            "{:<5} {:<8} {:>6} {:>4} {:>3} {:>10} {:>10} {:>5} {:>3}",
            address,
            type_name,
            half_track,
            side,
            if record.read_only { "Y" } else { "-" },
            record.attach_clk,
            record.detach_clk,
            record.idling_method,
            record.clock_frequency
        );
    }
}

fn show_gcr(unit: &DiskUnit) {
    let gcr = match unit.drive.media.gcr_image() {
        Some(gcr) => gcr,
        None => {
            println!("Unit #{} has no GCR image ({})", unit.address(), unit.drive.media_kind());
            return;
        }
    };

    println!(
        "Unit #{}: {} of {} half-tracks loaded",
        unit.address(),
        gcr.loaded_tracks(),
        gcr.half_track_count()
    );
    for (half_track, data) in gcr.iter() {
        println!("  {:>3}: {:>6} bytes", half_track, data.len());
    }
}

fn show_image(unit: &DiskUnit) {
    println!("Unit #{}: {} ({})", unit.address(), unit.unit_type, unit.drive.media_kind());
    if let Some(image) = unit.drive.flat_image() {
        let geometry = image.geometry();
        println!("Image type: {}", image.image_type());
        println!("Tracks: {}", geometry.tracks);
        println!("Sectors: {}", geometry.total_sectors());
        println!("Size: {} bytes", image.size_bytes());
        match image.free_blocks() {
            Some(free) => println!("Free blocks: {}", free),
            None => println!("Free blocks: n/a"),
        }
    }
    if let (MediaKind::Flux, Some(p64)) = (unit.drive.media_kind(), unit.drive.p64.as_ref()) {
        println!("Flux pulses: {}", p64.pulse_count());
        println!("Write protected: {}", if p64.write_protected { "Yes" } else { "No" });
        for (half_track, pulses) in p64.tracks() {
            println!("  {:>3}: {:>6} pulses", half_track, pulses.len());
        }
    }
}

fn print_hex_dump(data: &[u8], max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:04X}: ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad if less than 16 bytes
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");
        for byte in chunk {
            let c = if *byte >= 32 && *byte < 127 {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }
        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}
