//! Ordered hook storage
//!
//! The registry is a single ordered sequence of hook entries. Insertion
//! order is execution order; nothing here ever reorders entries, and
//! removal preserves the relative order of the survivors. The
//! category-aware registration rules (dedup for multi-command categories,
//! in-place command overwrite for single-command ones) live in the
//! dispatch engine; this module provides the container primitives they
//! are built from.

use tracing::debug;

use crate::types::{Hook, HookKind};

/// The ordered collection of registered hooks
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// The entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Hook> {
        self.hooks.get(index)
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Hook> {
        self.hooks.iter()
    }

    /// Append an entry at the end.
    pub fn push(&mut self, hook: Hook) {
        debug!(
            kind = hook.kind.name(),
            pattern = hook.pattern(),
            negate = hook.negate,
            "registering hook"
        );
        self.hooks.push(hook);
    }

    /// Index of the first entry with the given category, negation flag,
    /// and pattern source text.
    pub fn find_by_pattern(&self, kind: HookKind, negate: bool, pattern: &str) -> Option<usize> {
        self.hooks
            .iter()
            .position(|hook| hook.kind == kind && hook.negate == negate && hook.pattern() == pattern)
    }

    /// Whether an entry with exactly this category, negation flag,
    /// pattern, and command already exists.
    pub fn contains_exact(
        &self,
        kind: HookKind,
        negate: bool,
        pattern: &str,
        command: &str,
    ) -> bool {
        self.hooks.iter().any(|hook| {
            hook.kind == kind
                && hook.negate == negate
                && hook.pattern() == pattern
                && hook.command.as_deref() == Some(command)
        })
    }

    /// Replace the command of the entry at `index`, keeping its matcher
    /// and position.
    pub fn replace_command(&mut self, index: usize, command: String) {
        if let Some(hook) = self.hooks.get_mut(index) {
            debug!(
                kind = hook.kind.name(),
                pattern = hook.pattern(),
                "updating hook command in place"
            );
            hook.command = Some(command);
        }
    }

    /// Blank every entry of the given category to a commandless
    /// placeholder, keeping every position. Matching passes skip
    /// placeholders, so blanking is how entries are retired while a
    /// pass is still walking the sequence. Returns how many entries
    /// were blanked.
    pub fn blank_kind(&mut self, kind: HookKind) -> usize {
        let mut blanked = 0;
        for hook in &mut self.hooks {
            if hook.kind == kind && hook.command.is_some() {
                hook.command = None;
                blanked += 1;
            }
        }
        debug!(kind = kind.name(), blanked, "blanked hooks");
        blanked
    }

    /// Blank every entry, keeping every position. Returns how many
    /// entries were blanked.
    pub fn blank_all(&mut self) -> usize {
        let mut blanked = 0;
        for hook in &mut self.hooks {
            if hook.command.is_some() {
                hook.command = None;
                blanked += 1;
            }
        }
        debug!(blanked, "blanked hook registry");
        blanked
    }

    /// Drop every commandless placeholder, preserving the order of the
    /// remainder. Returns how many entries were dropped.
    pub fn purge_blanked(&mut self) -> usize {
        let before = self.hooks.len();
        self.hooks.retain(|hook| hook.command.is_some());
        before - self.hooks.len()
    }

    /// Remove every entry of the given category, preserving the order of
    /// the remainder. Returns how many entries were removed.
    pub fn remove_kind(&mut self, kind: HookKind) -> usize {
        let before = self.hooks.len();
        self.hooks.retain(|hook| hook.kind != kind);
        let removed = before - self.hooks.len();
        debug!(kind = kind.name(), removed, "removed hooks");
        removed
    }

    /// Remove every entry. Returns how many entries were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.hooks.len();
        self.hooks.clear();
        debug!(removed, "cleared hook registry");
        removed
    }
}
