//! Build script for diskview-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts to the linker
//! - Validates diskview.toml at compile time

use std::fs;
use std::path::Path;

/// Keys accepted per section, with the value type each expects
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "storage",
        &[
            ("volume", Kind::Text(8)),
            ("file", Kind::Text(32)),
            ("policy", Kind::Choice(&["silent", "visible"])),
        ],
    ),
    (
        "timing",
        &[
            ("watcher_period_ms", Kind::Integer { min: 1, max: 60_000 }),
            ("display_period_ms", Kind::Integer { min: 1, max: 60_000 }),
            ("section_budget_ms", Kind::Integer { min: 0, max: 60_000 }),
            ("load_window_ms", Kind::Integer { min: 1, max: 60_000 }),
        ],
    ),
    (
        "status",
        &[
            // "CPU : 100%" is ten 10 px glyphs on a 240 px panel
            ("x", Kind::Integer { min: 0, max: 140 }),
            ("y", Kind::Integer { min: 0, max: 319 }),
        ],
    ),
    (
        "touch",
        &[
            ("x_min", Kind::Integer { min: 0, max: 4095 }),
            ("x_max", Kind::Integer { min: 0, max: 4095 }),
            ("y_min", Kind::Integer { min: 0, max: 4095 }),
            ("y_max", Kind::Integer { min: 0, max: 4095 }),
            ("swap_xy", Kind::Boolean),
        ],
    ),
];

/// Expected value type of a key
#[derive(Clone, Copy)]
enum Kind {
    /// String of at most this many bytes
    Text(usize),
    /// String from a fixed set
    Choice(&'static [&'static str]),
    Integer { min: i64, max: i64 },
    Boolean,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Pass linker scripts; memory.x comes from embassy-stm32's `memory-x` feature
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if std::env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate diskview.toml configuration at compile time
fn validate_config() {
    // Re-run if diskview.toml changes
    println!("cargo:rerun-if-changed=diskview.toml");

    let config_path = Path::new("diskview.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: diskview.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a diskview.toml configuration file.         ║\n\
            ║  Please create one in the diskview-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read diskview.toml                             ║\n\
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
                ║  ERROR: Invalid TOML syntax in diskview.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = validate_sections(&config);
    errors.extend(validate_touch_ranges(&config));

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in diskview.toml                   ║\n\
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

    println!("cargo:warning=diskview.toml validated successfully");
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

/// Check every section and key against the schema
fn validate_sections(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return errors;
    };

    for (name, section) in root {
        let Some(keys) = SCHEMA.iter().find(|(s, _)| s == name).map(|(_, k)| *k) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(section) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in section {
            match keys.iter().find(|(k, _)| k == key) {
                Some((_, kind)) => {
                    if let Some(e) = check_value(value, *kind) {
                        errors.push(format!("[{}] {} {}", name, key, e));
                    }
                }
                None => errors.push(format!("[{}] unknown key '{}'", name, key)),
            }
        }
    }

    errors
}

fn check_value(value: &toml::Value, kind: Kind) -> Option<String> {
    match (kind, value) {
        (Kind::Text(max), toml::Value::String(s)) => {
            (s.len() > max).then(|| format!("must be at most {} bytes", max))
        }
        (Kind::Choice(options), toml::Value::String(s)) => (!options.contains(&s.as_str()))
            .then(|| format!("must be one of {}", options.join(", "))),
        (Kind::Integer { min, max }, toml::Value::Integer(n)) => {
            (*n < min || *n > max).then(|| format!("must be {}-{}", min, max))
        }
        (Kind::Boolean, toml::Value::Boolean(_)) => None,
        (Kind::Text(_) | Kind::Choice(_), _) => Some("must be a string".to_string()),
        (Kind::Integer { .. }, _) => Some("must be an integer".to_string()),
        (Kind::Boolean, _) => Some("must be true or false".to_string()),
    }
}

/// A zero-width raw range would map every touch onto one line
fn validate_touch_ranges(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(touch) = config.get("touch").and_then(|t| t.as_table()) else {
        return errors;
    };

    for (lo, hi) in [("x_min", "x_max"), ("y_min", "y_max")] {
        if let (Some(a), Some(b)) = (
            touch.get(lo).and_then(|v| v.as_integer()),
            touch.get(hi).and_then(|v| v.as_integer()),
        ) {
            if a == b {
                errors.push(format!("[touch] {} and {} must differ", lo, hi));
            }
        }
    }

    errors
}
