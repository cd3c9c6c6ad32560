//! Matching and execution engine
//!
//! [`HookEngine`] owns the hook registry and drives both dispatch shapes:
//!
//! - *string-subject* passes (folder open, account connect, charset and
//!   encoding-alias lookups, crypt key selection) walk the registry in
//!   order and test each candidate's regular expression against the
//!   subject, negation applied;
//! - *message-context* passes (message, compose, send, send2, save, fcc,
//!   reply) evaluate each candidate's structured predicate against a
//!   message, sharing one memoization cache per pass.
//!
//! Triggering passes execute every selected command in order through the
//! external command interpreter and abort on the first failure; lookup
//! passes return the first (or, for crypt hooks, every) selected
//! command. The engine also carries the advisory re-entrancy state: the
//! active-category marker that guards removal, and the one-shot flag
//! that keeps account-hook commands from dispatching account hooks
//! recursively.

mod engine;

pub use engine::{HookEngine, UnhookSpec};
