//! Command interpreter collaborator seam
//!
//! When a hook fires, its command text is handed to the mail client's
//! configuration-command interpreter. The interpreter receives the engine
//! back by mutable reference, because hook commands are ordinary
//! configuration: they may register further hooks, remove hooks, change
//! settings, or trigger nested dispatch (the engine's re-entrancy and
//! removal guards exist precisely for that case).

use crate::dispatcher::HookEngine;

/// Executes a fired hook's command text
pub trait CommandInterpreter {
    /// Run one command. On failure, return the human-readable diagnostic
    /// to show the user; the engine aborts the remaining hooks of the
    /// current dispatch pass.
    fn execute(
        &mut self,
        command: &str,
        engine: &mut HookEngine,
    ) -> std::result::Result<(), String>;
}
