//! Build script for parlance-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates voice.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
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
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate voice.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=voice.toml");

    let config_path = Path::new("voice.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: voice.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a voice.toml configuration file.            ║\n\
            ║  Please create one in the parlance-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read voice.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in voice.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_device(&config, &mut errors);
    validate_handshake(&config, &mut errors);
    validate_init(&config, &mut errors);
    validate_voice(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid voice configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// The on-device reader only knows these sections and keys
const SECTIONS: &[(&str, &[&str])] = &[
    ("device", &["i2c_address", "i2c_chunk_len", "uart_ack_delay_ms"]),
    (
        "handshake",
        &[
            "settle_ms",
            "accept_poll_ms",
            "complete_poll_ms",
            "accept_timeout_ms",
            "complete_timeout_ms",
        ],
    ),
    ("init", &["wake_attempts", "wake_delay_ms"]),
    ("voice", &["volume", "speed", "tone", "voice"]),
];

fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(section, _)| *section == name.as_str()) else {
            errors.push(format!("unknown section or top-level key '{}'", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Check an optional integer key against an inclusive range
fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match config.get(section).and_then(|s| s.get(key)) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_device(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "device", "i2c_address", 0x08, 0x77, errors);
    check_range(config, "device", "i2c_chunk_len", 1, 32, errors);
    check_range(config, "device", "uart_ack_delay_ms", 0, 1000, errors);
}

fn validate_handshake(config: &toml::Value, errors: &mut Vec<String>) {
    let max = u32::MAX as i64;
    check_range(config, "handshake", "settle_ms", 0, max, errors);
    check_range(config, "handshake", "accept_poll_ms", 0, max, errors);
    check_range(config, "handshake", "complete_poll_ms", 0, max, errors);

    // Deadlines are a number of milliseconds, or false for none
    for key in ["accept_timeout_ms", "complete_timeout_ms"] {
        match config.get("handshake").and_then(|s| s.get(key)) {
            None | Some(toml::Value::Boolean(false)) => {}
            Some(toml::Value::Integer(_)) => check_range(config, "handshake", key, 1, max, errors),
            Some(_) => errors.push(format!(
                "[handshake] {} must be milliseconds or false",
                key
            )),
        }
    }
}

fn validate_init(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "init", "wake_attempts", 0, 255, errors);
    check_range(config, "init", "wake_delay_ms", 0, 10_000, errors);
}

fn validate_voice(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "voice", "volume", 0, 9, errors);
    check_range(config, "voice", "speed", 0, 9, errors);
    check_range(config, "voice", "tone", 0, 9, errors);

    if let Some(voice) = config.get("voice").and_then(|s| s.get("voice")) {
        let known = ["female1", "female2", "female3", "male1", "male2", "donald_duck"];
        match voice.as_str() {
            Some(name) if known.contains(&name) => {}
            _ => errors.push(format!(
                "[voice] voice must be one of {}",
                known.join(", ")
            )),
        }
    }
}
