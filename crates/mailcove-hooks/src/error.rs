//! Error types for the hook engine
//!
//! All errors use the `thiserror` crate and are recoverable at the call
//! site: a failed registration leaves the registry untouched, a refused
//! removal leaves it unchanged, and a failed hook command aborts only the
//! remaining hooks of the current dispatch pass, never the event that
//! triggered it.

use thiserror::Error;

/// Errors that can occur in the hook engine
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook definition is missing its pattern or its command.
    #[error("too few arguments")]
    TooFewArguments,

    /// A hook definition has unconsumed input after the command token.
    #[error("too many arguments")]
    TooManyArguments,

    /// The pattern uses the `^` current-mailbox shortcut while no mailbox
    /// is open. Accidentally using `^` in a startup file is a common
    /// mistake, so it is rejected instead of silently matching nothing.
    #[error("current mailbox shortcut '^' is unset")]
    CurrentFolderUnset,

    /// A non-empty pattern expanded to an empty string, which would match
    /// every subject. Another common startup-file mistake.
    #[error("mailbox shortcut expanded to empty regexp")]
    EmptyExpansion,

    /// An archive hook command failed the external command-syntax check.
    #[error("badly formatted command string")]
    BadArchiveCommand,

    /// The structured-pattern compiler rejected the pattern. The
    /// compiler's diagnostic is surfaced verbatim.
    #[error("{0}")]
    PatternCompile(String),

    /// The regular-expression compiler rejected the pattern.
    #[error("{0}")]
    Regex(#[from] regex::Error),

    /// `unhook *` was requested while a dispatch pass is running.
    #[error("unhook: can't do unhook * from within a hook")]
    UnhookAllWithinHook,

    /// Removal of the category currently being dispatched was requested
    /// from within one of its own hook commands.
    #[error("unhook: can't delete a {0} from within a {0}")]
    UnhookActiveKind(String),

    /// Configuration replay named a hook type this engine does not know.
    #[error("unhook: unknown hook type: {0}")]
    UnknownHookType(String),

    /// The command interpreter reported a failure for a fired hook. The
    /// interpreter's error text is carried verbatim; the dispatch pass
    /// that fired the hook has already been aborted.
    #[error("hook command failed: {0}")]
    ExecutionFailed(String),

    /// A configuration line could not be applied.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hook engine operations
pub type Result<T> = std::result::Result<T, HookError>;
