//! Structured message-pattern collaborator seam
//!
//! Message-style hooks (message, compose, send, send2, save, fcc, reply)
//! do not match a plain string: their pattern is compiled into a predicate
//! over message attributes by an external pattern compiler, and evaluated
//! against a [`Message`](crate::types::Message) at dispatch time. This
//! module defines the traits the engine consumes; the mail client supplies
//! the implementations.
//!
//! Evaluation is memoized through an opaque per-pass cache: one dispatch
//! pass shares a cache across all its entries so repeated attribute
//! lookups are cheap, and the engine discards the cache whenever a fired
//! command could have changed what the predicates see.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::Message;

/// Opaque memoization state for one dispatch pass
///
/// The engine never looks inside a cache; it only creates one per pass via
/// [`PatternCompiler::new_cache`] and replaces it after each successful
/// command execution. The `Any` accessors let evaluator implementations
/// downcast to their concrete cache type.
pub trait PatternCache: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A compiled message predicate
pub trait CompiledPattern: fmt::Debug + Send + Sync {
    /// Evaluate the predicate against a message, memoizing attribute
    /// lookups in `cache`. Negation is applied by the caller, not here.
    fn evaluate(&self, message: &Message, cache: &mut dyn PatternCache) -> bool;
}

/// The external pattern compiler
pub trait PatternCompiler: Send + Sync {
    /// Compile pattern text into a predicate. `full_message` grants the
    /// predicate access to the message body, not just its headers. On
    /// failure the returned diagnostic is shown to the user verbatim.
    fn compile(
        &self,
        source: &str,
        full_message: bool,
    ) -> std::result::Result<Arc<dyn CompiledPattern>, String>;

    /// A fresh, empty memoization cache for one dispatch pass.
    fn new_cache(&self) -> Box<dyn PatternCache>;

    /// Whether `source` is a simple (unstructured) expression rather than
    /// a structured pattern. Simple expressions are substituted into the
    /// configured default-hook template at registration time.
    fn is_simple(&self, source: &str) -> bool;

    /// Substitute a simple expression into the default-hook template,
    /// producing structured pattern text.
    fn expand_simple(&self, source: &str, template: &str) -> String;
}
