pub mod build;
pub mod check;
pub mod init;
pub mod list;
pub mod new;
pub mod show;
pub mod snbt;
pub mod types;

use std::path::Path;

use colored::Colorize;
use sf_compiler::{Diagnostic, Severity, builtin_registry};
use sf_core::{Level, Vec3};

/// Load a level file with the built-in registry.
fn load_level(path: &Path) -> Result<Level, String> {
    Level::load(path, &builtin_registry())
        .map_err(|e| format!("cannot load {}: {e}", path.display()))
}

/// Print diagnostics to stderr followed by a count line.
fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    for diagnostic in diagnostics {
        let text = diagnostic.to_string();
        match diagnostic.severity {
            Severity::Error => eprintln!("{}", text.red()),
            Severity::Warning => eprintln!("{}", text.yellow()),
        }
    }

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}

/// Parse `x,y,z`.
fn parse_position(text: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = text
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("invalid position '{text}' (expected x,y,z)"))?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("invalid position '{text}' (expected x,y,z)")),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
