//! Mailcove Hook Engine
//!
//! A registry of user-defined rules that fire on mail-client events.
//!
//! # Overview
//!
//! Users attach commands to events with hook definitions in their
//! configuration: run commands when a folder is opened or an account is
//! contacted, rewrite charset names, pick encryption keys for a
//! recipient, run commands around message display, composition and
//! sending, and choose save/copy destination mailboxes. This crate owns
//! the registry of those rules and the matching and dispatch logic; the
//! surrounding mail client supplies everything else through traits.
//!
//! # Architecture
//!
//! 1. **Parsing and normalization** (`parse`, `normalize`): turn a raw
//!    definition line into the canonical pattern and command to store
//! 2. **Registry** (`registry`): the ordered rule store
//! 3. **Dispatch engine** (`dispatcher`): matches events against the
//!    registry and runs or returns the selected commands
//! 4. **Destination resolution** (`resolver`): default save folder and
//!    outgoing-copy mailbox for a message
//! 5. **Configuration replay** (`config`): line and file adapters in
//!    front of registration
//!
//! External collaborators are trait seams: [`CommandInterpreter`] runs
//! fired commands, [`PatternCompiler`] compiles and evaluates structured
//! message patterns, and [`MailEnvironment`] supplies path and address
//! utilities.
//!
//! # Quick Start
//!
//! ```ignore
//! use mailcove_hooks::{HookEngine, HookKind, HookSettings};
//!
//! let mut engine = HookEngine::new(HookSettings::default(), env, compiler);
//!
//! // Definitions, usually replayed from the configuration file.
//! engine.add_hook(HookKind::Folder, "work set sort=threads")?;
//! engine.add_hook(HookKind::Save, "'~f boss' =from-boss")?;
//!
//! // Events.
//! engine.folder_hook("/home/user/mail/work", &mut interpreter)?;
//! let mailbox = engine.default_save(&message);
//! # Ok::<(), mailcove_hooks::HookError>(())
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T>`, an alias for
//! `std::result::Result<T, HookError>`. A failed registration leaves the
//! registry untouched; a failed hook command aborts only the rest of its
//! dispatch pass.
//!
//! # Re-entrancy
//!
//! Hook commands run through the interpreter with the engine handed
//! back, so a command may register or remove hooks mid-pass. The engine
//! tracks the category being dispatched and refuses removals that would
//! pull entries out from under the running pass; see
//! [`HookEngine::unhook`].

pub mod config;
pub mod dispatcher;
pub mod environment;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod parse;
pub mod pattern;
pub mod registry;
mod resolver;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export public types
pub use dispatcher::{HookEngine, UnhookSpec};
pub use environment::MailEnvironment;
pub use error::{HookError, Result};
pub use executor::CommandInterpreter;
pub use parse::HookCall;
pub use pattern::{CompiledPattern, PatternCache, PatternCompiler};
pub use registry::HookRegistry;
pub use types::{
    Address, Envelope, Hook, HookKind, HookSettings, KindSet, Matcher, Message,
};
