//! Magic-command parser.
//!
//! Turns a raw cell into a `(subcommand, flags, body)` triple. Cells that do
//! not start with the `%` marker are treated as an implicit `%run`.

use crate::{KernelError, Result};

/// Character introducing a magic command.
pub const MAGIC_MARKER: char = '%';

/// Double marker, collapsed to a single one before parsing.
pub const CELL_MAGIC_MARKER: &str = "%%";

/// Character introducing a flag.
pub const FLAG_MARKER: char = '-';

/// Subcommand assumed for cells without a marker.
pub const IMPLICIT_SUBCOMMAND: &str = "run";

/// A cell split into its magic components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased subcommand name.
    pub subcommand: String,
    /// Lower-cased flags without their `-`, in order of appearance.
    pub flags: Vec<String>,
    /// Text following the subcommand and flags.
    pub body: String,
}

impl ParsedCommand {
    /// Whether `flag` (already lower-cased) was given.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Parse a raw cell.
///
/// A token starting with `-` is only taken as a flag when more text follows
/// it; a trailing `-x` stays in the body.
///
/// # Errors
///
/// Returns [`KernelError::MalformedCommand`] if nothing follows the
/// subcommand, including empty input and a bare `%run`.
pub fn parse(raw: &str) -> Result<ParsedCommand> {
    let collapsed = if raw.starts_with(CELL_MAGIC_MARKER) {
        &raw[MAGIC_MARKER.len_utf8()..]
    } else {
        raw
    };

    let normalized = if collapsed.starts_with(MAGIC_MARKER) {
        collapsed.to_owned()
    } else {
        format!("{MAGIC_MARKER}{IMPLICIT_SUBCOMMAND} {collapsed}")
    };
    let unmarked = &normalized[MAGIC_MARKER.len_utf8()..];

    let (subcommand, rest) = match split_first_token(unmarked) {
        Some((subcommand, Some(rest))) => (subcommand.to_lowercase(), rest),
        Some((subcommand, None)) => {
            return Err(KernelError::MalformedCommand(format!(
                "no body after subcommand '{subcommand}'"
            )));
        }
        None => return Err(KernelError::MalformedCommand("empty command".into())),
    };

    let mut flags = Vec::new();
    let mut body = rest;
    while let Some((token, Some(remainder))) = split_first_token(body) {
        let Some(flag) = token.strip_prefix(FLAG_MARKER) else {
            break;
        };
        flags.push(flag.to_lowercase());
        body = remainder;
    }

    Ok(ParsedCommand {
        subcommand,
        flags,
        body: body.to_owned(),
    })
}

/// Whether `c` separates tokens.
///
/// Unicode whitespace plus the ASCII file, group, record and unit
/// separators (U+001C to U+001F), which notebook front ends also split on.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Split off the first separator-delimited token.
///
/// Leading separators are skipped. The remainder has its leading separators
/// removed and keeps any trailing ones; it is `None` when only separators
/// follow the token.
fn split_first_token(input: &str) -> Option<(&str, Option<&str>)> {
    let trimmed = input.trim_start_matches(is_separator);
    if trimmed.is_empty() {
        return None;
    }

    let Some(idx) = trimmed.find(is_separator) else {
        return Some((trimmed, None));
    };
    let (token, tail) = trimmed.split_at(idx);
    let tail = tail.trim_start_matches(is_separator);
    Some((token, (!tail.is_empty()).then_some(tail)))
}
