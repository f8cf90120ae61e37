//! Build script for lumino-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates fixture.toml at compile time
//! - Generates `fixture_config.rs` from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest level the PWM table supports
const MAX_LEVEL: i64 = 10;

const PRESETS: [&str; 4] = ["memory_one", "memory_two", "endo", "max"];

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Everything build.rs needs from fixture.toml, already range-checked
struct Fixture {
    max_brightness: i64,
    max_cct: i64,
    default_brightness: i64,
    default_cct: i64,
    cct_key_wraps: bool,
    presets: Vec<(i64, i64)>,
    leader: (i64, i64),
    one: (i64, i64),
    zero: (i64, i64),
    stall_polls: i64,
    page_settle_ms: i64,
    backlight_settle_ms: i64,
    probe_timeout_ms: i64,
    beep_ms: i64,
    loop_period_us: i64,
    ir_debounce_ms: i64,
}

/// Validate fixture.toml configuration at compile time
fn validate_config() -> Fixture {
    // Re-run if fixture.toml changes
    println!("cargo:rerun-if-changed=fixture.toml");

    let config_path = Path::new("fixture.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: fixture.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a fixture.toml configuration file.        ║\n\
            ║  Please create one in the lumino-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read fixture.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in fixture.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    let mut errors = Vec::new();
    let fixture = read_fixture(&config, &mut errors);
    if !errors.is_empty() {
        report("Invalid fixture configuration", &errors);
    }

    println!("cargo:warning=fixture.toml validated successfully");
    fixture
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let errors: Vec<String> = ["lighting", "preset", "ir", "display", "buzzer", "timing"]
        .iter()
        .filter(|section| config.get(**section).and_then(|v| v.as_table()).is_none())
        .map(|section| format!("Missing [{}] section", section))
        .collect();

    if !errors.is_empty() {
        report("Missing required sections in fixture.toml", &errors);
    }
}

/// Read an integer field and check its range
fn int(
    table: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if range.contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            *range.start()
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            *range.start()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            *range.start()
        }
    }
}

/// Read a `[min, max]` pulse window
fn window(table: &toml::Value, key: &str, errors: &mut Vec<String>) -> (i64, i64) {
    let bounds: Option<Vec<i64>> = table
        .get(key)
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_integer()).collect());

    match bounds.as_deref() {
        Some([min, max]) if (0..=0xFFFF).contains(min) && (0..=0xFFFF).contains(max) => {
            if min > max {
                errors.push(format!("[ir] {} window is empty ({} > {})", key, min, max));
            }
            (*min, *max)
        }
        _ => {
            errors.push(format!("[ir] {} must be [min, max] in 0-65535", key));
            (0, 0)
        }
    }
}

fn overlaps(a: (i64, i64), b: (i64, i64)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

fn read_fixture(config: &toml::Value, errors: &mut Vec<String>) -> Fixture {
    let lighting = &config["lighting"];
    let max_brightness = int(lighting, "lighting", "max_brightness", 0..=MAX_LEVEL, errors);
    let max_cct = int(lighting, "lighting", "max_cct", 0..=MAX_LEVEL, errors);
    let default_brightness = int(
        lighting,
        "lighting",
        "default_brightness",
        0..=max_brightness,
        errors,
    );
    let default_cct = int(lighting, "lighting", "default_cct", 0..=max_cct, errors);
    let cct_key_wraps = match lighting.get("cct_key_wraps") {
        None => false,
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push("[lighting] cct_key_wraps must be true or false".to_string());
            false
        }
    };

    let presets = PRESETS
        .iter()
        .map(|name| {
            let section = format!("preset.{}", name);
            match config["preset"].get(*name) {
                Some(preset) => (
                    int(preset, &section, "brightness", 0..=max_brightness, errors),
                    int(preset, &section, "cct", 0..=max_cct, errors),
                ),
                None => {
                    errors.push(format!("Missing [{}] section", section));
                    (0, 0)
                }
            }
        })
        .collect();

    let ir = &config["ir"];
    let leader = window(ir, "leader", errors);
    let one = window(ir, "one", errors);
    let zero = window(ir, "zero", errors);
    for (a, b, name_a, name_b) in [
        (leader, one, "leader", "one"),
        (leader, zero, "leader", "zero"),
        (one, zero, "one", "zero"),
    ] {
        if overlaps(a, b) {
            errors.push(format!("[ir] {} and {} windows overlap", name_a, name_b));
        }
    }

    let display = &config["display"];
    let buzzer = &config["buzzer"];
    let timing = &config["timing"];

    Fixture {
        max_brightness,
        max_cct,
        default_brightness,
        default_cct,
        cct_key_wraps,
        presets,
        leader,
        one,
        zero,
        stall_polls: int(display, "display", "stall_polls", 1..=0xFFFF, errors),
        page_settle_ms: int(display, "display", "page_settle_ms", 0..=1_000, errors),
        backlight_settle_ms: int(display, "display", "backlight_settle_ms", 0..=1_000, errors),
        probe_timeout_ms: int(display, "display", "probe_timeout_ms", 0..=10_000, errors),
        beep_ms: int(buzzer, "buzzer", "beep_ms", 0..=1_000, errors),
        loop_period_us: int(timing, "timing", "loop_period_us", 1..=1_000_000, errors),
        ir_debounce_ms: int(timing, "timing", "ir_debounce_ms", 0..=1_000, errors),
    }
}

/// Write `fixture_config.rs` into OUT_DIR
fn generate_config(f: &Fixture) {
    let preset = |i: usize| format!("Preset::new({}, {})", f.presets[i].0, f.presets[i].1);
    let code = format!(
        "// Generated by build.rs from fixture.toml\n\
         pub const FIXTURE: FixtureConfig = FixtureConfig {{\n\
         \x20   lighting: LightingConfig {{\n\
         \x20       max_brightness: {},\n\
         \x20       max_cct: {},\n\
         \x20       default_brightness: {},\n\
         \x20       default_cct: {},\n\
         \x20       cct_key_wraps: {},\n\
         \x20       presets: PresetTable {{\n\
         \x20           memory_one: {},\n\
         \x20           memory_two: {},\n\
         \x20           endo: {},\n\
         \x20           max: {},\n\
         \x20       }},\n\
         \x20   }},\n\
         \x20   ir: NecTiming {{\n\
         \x20       leader: PulseWindow::new({}, {}),\n\
         \x20       one: PulseWindow::new({}, {}),\n\
         \x20       zero: PulseWindow::new({}, {}),\n\
         \x20   }},\n\
         \x20   display: DisplayTiming {{\n\
         \x20       stall_polls: {},\n\
         \x20       page_settle_us: {},\n\
         \x20       backlight_settle_us: {},\n\
         \x20       probe_timeout_ms: {},\n\
         \x20   }},\n\
         \x20   timing: LoopTiming {{\n\
         \x20       period_us: {},\n\
         \x20       ir_debounce_us: {},\n\
         \x20   }},\n\
         \x20   buzzer: BuzzerConfig {{ beep_us: {} }},\n\
         }};\n",
        f.max_brightness,
        f.max_cct,
        f.default_brightness,
        f.default_cct,
        f.cct_key_wraps,
        preset(0),
        preset(1),
        preset(2),
        preset(3),
        f.leader.0,
        f.leader.1,
        f.one.0,
        f.one.1,
        f.zero.0,
        f.zero.1,
        f.stall_polls,
        f.page_settle_ms * 1_000,
        f.backlight_settle_ms * 1_000,
        f.probe_timeout_ms,
        f.loop_period_us,
        f.ir_debounce_ms * 1_000,
        f.beep_ms * 1_000,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("fixture_config.rs"), code).unwrap();
}
