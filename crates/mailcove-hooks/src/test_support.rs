//! Shared mock collaborators for the unit tests
//!
//! The engine only ever talks to its collaborators through traits, so the
//! tests drive it with small deterministic stand-ins: a path environment
//! with fixed shortcut rules, a pattern compiler whose predicates do
//! plain substring matching over the envelope, and interpreters that
//! record or script their behavior.

use std::sync::{Arc, Mutex};

use crate::dispatcher::HookEngine;
use crate::environment::MailEnvironment;
use crate::executor::CommandInterpreter;
use crate::pattern::{CompiledPattern, PatternCache, PatternCompiler};
use crate::types::{Address, Envelope, HookSettings, Message};

/// Deterministic path environment.
///
/// Shortcut rules: `~` expands under `/home/user`, `=`/`+` under
/// `folder_root`, `^` to `current_folder`. Errors reported by the engine
/// are collected for assertions.
pub struct StubEnvironment {
    pub current_folder: Option<String>,
    pub folder_root: String,
    pub own_addresses: Vec<String>,
    pub writable: Vec<String>,
    pub reported: Mutex<Vec<String>>,
}

impl Default for StubEnvironment {
    fn default() -> Self {
        Self {
            current_folder: None,
            folder_root: "/home/user/mail".to_string(),
            own_addresses: Vec::new(),
            writable: Vec::new(),
            reported: Mutex::new(Vec::new()),
        }
    }
}

impl StubEnvironment {
    pub fn reported_errors(&self) -> Vec<String> {
        self.reported.lock().unwrap().clone()
    }
}

impl MailEnvironment for StubEnvironment {
    fn current_folder(&self) -> Option<String> {
        self.current_folder.clone()
    }

    fn expand_path(&self, path: &str, _for_regex: bool) -> String {
        if let Some(rest) = path.strip_prefix('^') {
            return format!("{}{}", self.current_folder.clone().unwrap_or_default(), rest);
        }
        if let Some(rest) = path.strip_prefix('~') {
            return format!("/home/user{rest}");
        }
        if let Some(rest) = path.strip_prefix('=').or_else(|| path.strip_prefix('+')) {
            if rest.is_empty() {
                return self.folder_root.clone();
            }
            if self.folder_root.is_empty() {
                return rest.to_string();
            }
            return format!("{}/{}", self.folder_root, rest);
        }
        path.to_string()
    }

    fn pretty_path(&self, path: &str) -> String {
        match path.strip_prefix(&format!("{}/", self.folder_root)) {
            Some(rest) if !self.folder_root.is_empty() => format!("={rest}"),
            _ => path.to_string(),
        }
    }

    fn folder_name_for(&self, address: &Address) -> String {
        address.mailbox.replace('/', ".")
    }

    fn join_path(&self, root: &str, name: &str) -> String {
        if root.is_empty() {
            name.to_string()
        } else {
            format!("{root}/{name}")
        }
    }

    fn is_writable_mailbox(&self, path: &str) -> bool {
        self.writable.iter().any(|writable| writable == path)
    }

    fn is_own_address(&self, address: &Address) -> bool {
        self.own_addresses.iter().any(|own| own == &address.mailbox)
    }

    fn valid_archive_command(&self, command: &str) -> bool {
        command.contains("%f")
    }

    fn report_error(&self, message: &str) {
        self.reported.lock().unwrap().push(message.to_string());
    }
}

/// Memoization cache used by [`StubCompiler`] patterns: counts lookups so
/// tests can observe when the engine replaced it with a fresh one.
#[derive(Default)]
pub struct CountingCache {
    pub lookups: usize,
}

impl PatternCache for CountingCache {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Predicate produced by [`StubCompiler`]: matches when the needle occurs
/// in any envelope address or in the subject. The needle is the pattern
/// text with any `~x` operator prefixes stripped.
#[derive(Debug)]
pub struct SubstringPattern {
    needle: String,
    observed_lookups: Arc<Mutex<Vec<usize>>>,
}

impl CompiledPattern for SubstringPattern {
    fn evaluate(&self, message: &Message, cache: &mut dyn PatternCache) -> bool {
        if let Some(counting) = cache.as_any_mut().downcast_mut::<CountingCache>() {
            self.observed_lookups.lock().unwrap().push(counting.lookups);
            counting.lookups += 1;
        }

        let envelope = &message.envelope;
        let lists = [
            &envelope.from,
            &envelope.reply_to,
            &envelope.to,
            &envelope.cc,
            &envelope.bcc,
        ];
        lists
            .iter()
            .any(|list| list.iter().any(|address| address.mailbox.contains(&self.needle)))
            || message
                .subject
                .as_deref()
                .is_some_and(|subject| subject.contains(&self.needle))
    }
}

/// Pattern compiler whose output is [`SubstringPattern`].
///
/// `is_simple` treats anything not starting with `~` as simple, and
/// `expand_simple` substitutes into the template at `%s`, so template
/// expansion can be exercised end to end.
#[derive(Default)]
pub struct StubCompiler {
    /// `lookups` value of the pass cache at each predicate evaluation,
    /// in order. A fresh cache starts again from zero.
    pub observed_lookups: Arc<Mutex<Vec<usize>>>,
    /// Pattern text that fails compilation, for diagnostics tests.
    pub reject: Option<String>,
}

impl StubCompiler {
    pub fn observed(&self) -> Vec<usize> {
        self.observed_lookups.lock().unwrap().clone()
    }
}

impl PatternCompiler for StubCompiler {
    fn compile(
        &self,
        source: &str,
        _full_message: bool,
    ) -> std::result::Result<Arc<dyn CompiledPattern>, String> {
        if self.reject.as_deref() == Some(source) {
            return Err(format!("error in pattern: {source}"));
        }

        let needle = source
            .split_whitespace()
            .find(|word| !word.starts_with('~'))
            .unwrap_or(source)
            .to_string();
        Ok(Arc::new(SubstringPattern {
            needle,
            observed_lookups: Arc::clone(&self.observed_lookups),
        }))
    }

    fn new_cache(&self) -> Box<dyn PatternCache> {
        Box::new(CountingCache::default())
    }

    fn is_simple(&self, source: &str) -> bool {
        !source.starts_with('~')
    }

    fn expand_simple(&self, source: &str, template: &str) -> String {
        template.replace("%s", source)
    }
}

/// Interpreter that records executed commands and optionally fails on a
/// scripted command text.
#[derive(Default)]
pub struct RecordingInterpreter {
    pub executed: Vec<String>,
    pub fail_on: Option<String>,
}

impl CommandInterpreter for RecordingInterpreter {
    fn execute(
        &mut self,
        command: &str,
        _engine: &mut HookEngine,
    ) -> std::result::Result<(), String> {
        self.executed.push(command.to_string());
        if self.fail_on.as_deref() == Some(command) {
            Err(format!("{command}: unknown command"))
        } else {
            Ok(())
        }
    }
}

/// Interpreter driven by a closure, for tests that re-enter the engine
/// from inside a hook command.
pub struct FnInterpreter<F>(pub F)
where
    F: FnMut(&str, &mut HookEngine) -> std::result::Result<(), String>;

impl<F> CommandInterpreter for FnInterpreter<F>
where
    F: FnMut(&str, &mut HookEngine) -> std::result::Result<(), String>,
{
    fn execute(&mut self, command: &str, engine: &mut HookEngine) -> std::result::Result<(), String> {
        (self.0)(command, engine)
    }
}

/// An engine over fresh default stubs, returning the stub handles for
/// assertions.
pub fn stub_engine() -> (HookEngine, Arc<StubEnvironment>, Arc<StubCompiler>) {
    stub_engine_with(
        HookSettings::default(),
        StubEnvironment::default(),
        StubCompiler::default(),
    )
}

/// An engine over the given settings and stubs.
pub fn stub_engine_with(
    settings: HookSettings,
    env: StubEnvironment,
    compiler: StubCompiler,
) -> (HookEngine, Arc<StubEnvironment>, Arc<StubCompiler>) {
    let env = Arc::new(env);
    let compiler = Arc::new(compiler);
    let engine = HookEngine::new(settings, env.clone(), compiler.clone());
    (engine, env, compiler)
}

/// A message with single from/to addresses.
pub fn message(from: &str, to: &str) -> Message {
    Message {
        envelope: Envelope {
            from: vec![Address::new(from)],
            to: vec![Address::new(to)],
            ..Envelope::default()
        },
        subject: None,
    }
}
