//! Category-specific pattern and command normalization
//!
//! Between parsing and storage, a hook's pattern and command are rewritten
//! into the canonical form the registry keeps:
//!
//! - mailbox-path patterns (folder/mbox hooks) get their shortcuts
//!   expanded, with guards against the two classic startup-file mistakes
//!   (`^` while no mailbox is open, and a shortcut expanding to nothing);
//! - archive hook commands are checked by the external command-syntax
//!   validator;
//! - simple patterns on message-style hooks are substituted into the
//!   configured default-hook template, so users can write a bare address
//!   fragment and still get a fully structured rule;
//! - commands that name a mailbox destination (mbox/save/fcc hooks) get
//!   their shortcuts expanded too.

use tracing::debug;

use crate::environment::MailEnvironment;
use crate::error::{HookError, Result};
use crate::parse::HookCall;
use crate::pattern::PatternCompiler;
use crate::types::{HookKind, HookSettings};

/// Rewrite a parsed hook call into the canonical form to store.
pub fn normalize(
    kind: HookKind,
    call: HookCall,
    settings: &HookSettings,
    env: &dyn MailEnvironment,
    compiler: &dyn PatternCompiler,
) -> Result<HookCall> {
    let HookCall {
        negate,
        mut pattern,
        mut command,
    } = call;

    if kind.matches_mailbox_path() {
        if pattern.starts_with('^') && env.current_folder().is_none() {
            return Err(HookError::CurrentFolderUnset);
        }

        let expanded = env.expand_path(&pattern, true);
        if expanded.is_empty() && !pattern.is_empty() {
            return Err(HookError::EmptyExpansion);
        }
        if expanded != pattern {
            debug!(kind = kind.name(), from = %pattern, to = %expanded, "expanded mailbox pattern");
        }
        pattern = expanded;
    } else if kind.is_archive_hook() {
        if !env.valid_archive_command(&command) {
            return Err(HookError::BadArchiveCommand);
        }
    } else if kind.uses_message_pattern() {
        if let Some(template) = settings.default_hook.as_deref() {
            if compiler.is_simple(&pattern) {
                let expanded = compiler.expand_simple(&pattern, template);
                debug!(kind = kind.name(), from = %pattern, to = %expanded, "expanded simple pattern");
                pattern = expanded;
            }
        }
    }

    if kind.command_is_mailbox_path() {
        command = env.expand_path(&command, false);
    }

    Ok(HookCall {
        negate,
        pattern,
        command,
    })
}
