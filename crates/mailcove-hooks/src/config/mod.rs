//! Configuration replay
//!
//! Hook definitions normally arrive one line at a time from the mail
//! client's configuration reader. This module is the thin adapter in
//! front of the engine for that flow: it recognizes the hook command
//! words and `unhook`, and routes everything through
//! [`HookEngine::add_hook`] and [`HookEngine::unhook`]. Lines that are
//! not hook-related are rejected rather than guessed at; a full
//! configuration language lives in the mail client, not here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::dispatcher::{HookEngine, UnhookSpec};
use crate::error::{HookError, Result};
use crate::types::HookKind;

/// Apply one configuration line to the engine.
///
/// Blank lines and `#` comments are skipped. The first word selects the
/// operation: a hook command word (`folder-hook`, `send-hook`, ...)
/// registers a hook from the rest of the line, and `unhook` removes
/// hooks per its arguments (`*` or hook command words). Anything else
/// is an error.
pub fn apply_line(engine: &mut HookEngine, line: &str) -> Result<()> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(());
    }

    let (word, rest) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    };

    if word == "unhook" {
        if rest.is_empty() {
            return Err(HookError::TooFewArguments);
        }
        for token in rest.split_whitespace() {
            if token == "*" {
                engine.unhook(UnhookSpec::All)?;
            } else {
                match HookKind::from_name(token) {
                    Some(kind) => engine.unhook(UnhookSpec::Kind(kind))?,
                    None => return Err(HookError::UnknownHookType(token.to_string())),
                }
            }
        }
        return Ok(());
    }

    match HookKind::from_name(word) {
        Some(kind) => engine.add_hook(kind, rest),
        None => Err(HookError::InvalidConfiguration(format!(
            "unknown command: {word}"
        ))),
    }
}

/// Replay a configuration file into the engine, line by line.
///
/// Stops at the first failing line; its error is wrapped with the file
/// path and one-based line number.
pub fn load_file(engine: &mut HookEngine, path: &Path) -> Result<()> {
    debug!(path = %path.display(), "loading hook configuration");
    let file = File::open(path)?;
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        apply_line(engine, &line).map_err(|error| {
            HookError::InvalidConfiguration(format!(
                "{}:{}: {error}",
                path.display(),
                number + 1
            ))
        })?;
    }
    Ok(())
}
