//! Package and requirement list parsing.
//!
//! The installer ships plain line-oriented lists: one apt package or pip
//! requirement per line, optionally followed by version pins, markers,
//! index options or comments. Verification only needs the bare names.

use std::path::Path;

use crate::inspect::{InspectionError, SystemInspector};

/// Characters that terminate a bare package name.
fn ends_name(c: char) -> bool {
    matches!(c, '#' | '=' | '>' | '<' | '!' | '~' | ';' | '[') || c.is_whitespace()
}

/// Reduce one list line to a bare package name.
///
/// Returns `None` for blank lines, comments and option lines (`-r`, `-i`, ...).
pub fn parse_requirement_line(line: &str) -> Option<String> {
    let mut line = line.trim();

    // VCS requirement: git+https://host/repo#egg=name
    if let Some(idx) = line.find("#egg=") {
        line = &line[idx + "#egg=".len()..];
    }

    // Index annotation: name --index-url https://...
    if let Some(idx) = line.find(" --") {
        line = &line[..idx];
    }

    if line.starts_with('-') {
        return None;
    }

    let end = line.find(ends_name).unwrap_or(line.len());
    let name = line[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// All bare names in a list, in file order.
pub fn parse_requirements(text: &str) -> Vec<String> {
    text.lines().filter_map(parse_requirement_line).collect()
}

/// Read and parse a list through the inspector.
pub fn load_requirements(
    inspector: &dyn SystemInspector,
    path: &Path,
) -> Result<Vec<String>, InspectionError> {
    let text = inspector.read_file(path)?;
    Ok(parse_requirements(&text))
}
