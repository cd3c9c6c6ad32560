//! The hook engine

use std::sync::Arc;

use regex::RegexBuilder;
use tracing::{debug, error};

use crate::environment::MailEnvironment;
use crate::error::{HookError, Result};
use crate::executor::CommandInterpreter;
use crate::normalize::normalize;
use crate::parse::parse_hook_args;
use crate::pattern::PatternCompiler;
use crate::registry::HookRegistry;
use crate::types::{Address, Hook, HookKind, HookSettings, KindSet, Matcher, Message};

/// Scope of an `unhook` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhookSpec {
    /// Remove every hook of every category.
    All,
    /// Remove every hook of one category.
    Kind(HookKind),
}

/// Registry plus dispatch state
///
/// One engine instance serves the whole mail session. Registration goes
/// through [`add_hook`](HookEngine::add_hook) and
/// [`unhook`](HookEngine::unhook); events trigger the per-category
/// dispatch methods. Hook commands run through a caller-supplied
/// [`CommandInterpreter`] and receive the engine back, so a command may
/// register or remove hooks while a pass is running. Two pieces of state
/// make that re-entrancy safe:
///
/// - `active` records which category is currently dispatching; removal
///   of that category (or of everything) is refused until the pass ends,
///   since the pass is still walking the entries;
/// - `in_account_hook` suppresses account-hook dispatch from inside an
///   account-hook command, because such commands routinely touch
///   folders on the very account being set up.
///
/// Entries appended by a command during a pass are still visited by that
/// pass. Removals a command is permitted to make are blanked in place
/// rather than taken out of the sequence, and the vacated entries are
/// dropped once the outermost pass finishes, so positional iteration
/// stays sound and no unvisited entry is skipped over.
pub struct HookEngine {
    registry: HookRegistry,
    settings: HookSettings,
    env: Arc<dyn MailEnvironment>,
    compiler: Arc<dyn PatternCompiler>,
    active: Option<HookKind>,
    in_account_hook: bool,
    pass_depth: usize,
}

impl HookEngine {
    /// Create an engine with an empty registry.
    pub fn new(
        settings: HookSettings,
        env: Arc<dyn MailEnvironment>,
        compiler: Arc<dyn PatternCompiler>,
    ) -> Self {
        Self {
            registry: HookRegistry::new(),
            settings,
            env,
            compiler,
            active: None,
            in_account_hook: false,
            pass_depth: 0,
        }
    }

    /// The registered hooks, in registration order.
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// The engine settings.
    pub fn settings(&self) -> &HookSettings {
        &self.settings
    }

    /// Mutable access to the engine settings. Settings changes affect
    /// future registrations and dispatches only; stored entries keep the
    /// form they were normalized into.
    pub fn settings_mut(&mut self) -> &mut HookSettings {
        &mut self.settings
    }

    /// The category currently being dispatched, if a triggering pass is
    /// running.
    pub fn active_kind(&self) -> Option<HookKind> {
        self.active
    }

    pub(crate) fn environment(&self) -> &dyn MailEnvironment {
        self.env.as_ref()
    }

    /// Parse, normalize, and register one hook definition.
    ///
    /// `args` is the definition line with the command word already
    /// stripped. For categories that allow several commands per pattern
    /// an exact duplicate is silently ignored; for single-command
    /// categories a re-registration with the same pattern and negation
    /// overwrites the stored command in place, keeping the entry's
    /// position.
    pub fn add_hook(&mut self, kind: HookKind, args: &str) -> Result<()> {
        let call = parse_hook_args(kind, args)?;
        let call = normalize(
            kind,
            call,
            &self.settings,
            self.env.as_ref(),
            self.compiler.as_ref(),
        )?;

        if kind.allows_multiple_commands() {
            if self
                .registry
                .contains_exact(kind, call.negate, &call.pattern, &call.command)
            {
                debug!(kind = kind.name(), pattern = %call.pattern, "duplicate hook ignored");
                return Ok(());
            }
        } else if let Some(index) = self.registry.find_by_pattern(kind, call.negate, &call.pattern)
        {
            self.registry.replace_command(index, call.command);
            return Ok(());
        }

        let matcher = self.compile_matcher(kind, &call.pattern)?;
        self.registry.push(Hook {
            kind,
            matcher,
            negate: call.negate,
            command: Some(call.command),
        });
        Ok(())
    }

    /// Remove hooks.
    ///
    /// Refused while a pass over the affected category is running:
    /// `unhook *` requires no marked pass at all, and removing a single
    /// category requires that category not be the active one. A removal
    /// permitted while some pass is still walking the registry blanks
    /// the affected entries in place, so the pass sees every remaining
    /// entry at its original position; the blanked entries are dropped
    /// when the outermost pass finishes.
    pub fn unhook(&mut self, spec: UnhookSpec) -> Result<()> {
        match spec {
            UnhookSpec::All => {
                if self.active.is_some() {
                    return Err(HookError::UnhookAllWithinHook);
                }
                if self.pass_depth > 0 {
                    self.registry.blank_all();
                } else {
                    self.registry.clear();
                }
            }
            UnhookSpec::Kind(kind) => {
                if self.active == Some(kind) {
                    return Err(HookError::UnhookActiveKind(kind.name().to_string()));
                }
                if self.pass_depth > 0 {
                    self.registry.blank_kind(kind);
                } else {
                    self.registry.remove_kind(kind);
                }
            }
        }
        Ok(())
    }

    /// Run every folder hook matching the opened mailbox path, in
    /// registration order. Stops at the first command failure.
    pub fn folder_hook(&mut self, path: &str, interp: &mut dyn CommandInterpreter) -> Result<()> {
        debug!(path, "dispatching folder hooks");
        self.active = Some(HookKind::Folder);
        self.pass_depth += 1;
        let result = self.run_string_pass(KindSet::single(HookKind::Folder), path, interp);
        self.pass_depth -= 1;
        self.active = None;
        self.finish_pass();
        result
    }

    /// Run every account hook matching the account URL, in registration
    /// order.
    ///
    /// Does nothing when called from within an account-hook command, so
    /// commands that open folders on the account being set up cannot
    /// recurse. Account-hook commands may freely remove hooks, including
    /// account hooks; no active-category marker is set for this pass.
    pub fn account_hook(&mut self, url: &str, interp: &mut dyn CommandInterpreter) -> Result<()> {
        if self.in_account_hook {
            debug!(url, "nested account hook dispatch suppressed");
            return Ok(());
        }

        debug!(url, "dispatching account hooks");
        self.pass_depth += 1;
        let result = self.run_account_pass(url, interp);
        self.pass_depth -= 1;
        self.finish_pass();
        result
    }

    /// Run every hook of `kind` whose predicate selects `message`, in
    /// registration order. Stops at the first command failure.
    ///
    /// The categories triggered this way are the message-context ones
    /// that execute commands: message, compose, send, send2, and reply.
    /// One memoization cache is shared across the pass and replaced
    /// after each fired command, since the command may have changed what
    /// the predicates see.
    pub fn message_hook(
        &mut self,
        message: &Message,
        kind: HookKind,
        interp: &mut dyn CommandInterpreter,
    ) -> Result<()> {
        debug!(kind = kind.name(), "dispatching message hooks");
        self.active = Some(kind);
        self.pass_depth += 1;
        let result = self.run_message_pass(message, kind, interp);
        self.pass_depth -= 1;
        self.active = None;
        self.finish_pass();
        result
    }

    /// First command among hooks in `kinds` whose pattern matches the
    /// string subject.
    pub fn find_hook(&self, kinds: KindSet, subject: &str) -> Option<String> {
        self.registry.iter().find_map(|hook| {
            if kinds.contains(hook.kind) && hook.command.is_some() && hook.matches_subject(subject)
            {
                hook.command.clone()
            } else {
                None
            }
        })
    }

    /// The mailbox read messages from `path` should be moved to, if an
    /// mbox hook names one.
    pub fn mbox_hook(&self, path: &str) -> Option<String> {
        self.find_hook(KindSet::single(HookKind::Mbox), path)
    }

    /// The charset to use in place of `name`, if a charset hook names
    /// one.
    pub fn charset_hook(&self, name: &str) -> Option<String> {
        self.find_hook(KindSet::single(HookKind::Charset), name)
    }

    /// The local conversion alias for the charset `name`, if an iconv
    /// hook names one.
    pub fn iconv_hook(&self, name: &str) -> Option<String> {
        self.find_hook(KindSet::single(HookKind::Iconv), name)
    }

    /// Every key ID selected by crypt hooks for the recipient, in
    /// registration order. All matches are collected, not just the
    /// first; a recipient may have several keys.
    pub fn crypt_hook(&self, recipient: &Address) -> Vec<String> {
        self.registry
            .iter()
            .filter(|hook| {
                hook.kind == HookKind::Crypt
                    && hook.command.is_some()
                    && hook.matches_subject(&recipient.mailbox)
            })
            .filter_map(|hook| hook.command.clone())
            .collect()
    }

    /// First command among hooks of `kind` whose predicate selects the
    /// message. Used by the save/fcc resolvers; a lookup, not a
    /// triggering pass, so no active-category marker is set.
    pub(crate) fn address_hook(&self, kind: HookKind, message: &Message) -> Option<String> {
        let mut cache = self.compiler.new_cache();
        self.registry.iter().find_map(|hook| {
            if hook.kind == kind
                && hook.command.is_some()
                && hook.matches_message(message, cache.as_mut())
            {
                hook.command.clone()
            } else {
                None
            }
        })
    }

    fn run_account_pass(&mut self, url: &str, interp: &mut dyn CommandInterpreter) -> Result<()> {
        let mut index = 0;
        while index < self.registry.len() {
            let command = self.registry.get(index).and_then(|hook| {
                if hook.kind == HookKind::Account
                    && hook.command.is_some()
                    && hook.matches_subject(url)
                {
                    hook.command.clone()
                } else {
                    None
                }
            });
            if let Some(command) = command {
                self.in_account_hook = true;
                let result = self.run_command(&command, interp);
                self.in_account_hook = false;
                result?;
            }
            index += 1;
        }
        Ok(())
    }

    fn run_string_pass(
        &mut self,
        kinds: KindSet,
        subject: &str,
        interp: &mut dyn CommandInterpreter,
    ) -> Result<()> {
        let mut index = 0;
        while index < self.registry.len() {
            let command = self.registry.get(index).and_then(|hook| {
                if kinds.contains(hook.kind)
                    && hook.command.is_some()
                    && hook.matches_subject(subject)
                {
                    hook.command.clone()
                } else {
                    None
                }
            });
            if let Some(command) = command {
                self.run_command(&command, interp)?;
            }
            index += 1;
        }
        Ok(())
    }

    fn run_message_pass(
        &mut self,
        message: &Message,
        kind: HookKind,
        interp: &mut dyn CommandInterpreter,
    ) -> Result<()> {
        let mut cache = self.compiler.new_cache();
        let mut index = 0;
        while index < self.registry.len() {
            let command = match self.registry.get(index) {
                Some(hook)
                    if hook.kind == kind
                        && hook.command.is_some()
                        && hook.matches_message(message, cache.as_mut()) =>
                {
                    hook.command.clone()
                }
                _ => None,
            };
            if let Some(command) = command {
                self.run_command(&command, interp)?;
                cache = self.compiler.new_cache();
            }
            index += 1;
        }
        Ok(())
    }

    fn finish_pass(&mut self) {
        if self.pass_depth == 0 {
            self.registry.purge_blanked();
        }
    }

    fn run_command(&mut self, command: &str, interp: &mut dyn CommandInterpreter) -> Result<()> {
        debug!(command, "running hook command");
        if let Err(text) = interp.execute(command, self) {
            error!(error = %text, "hook command failed");
            self.env.report_error(&text);
            return Err(HookError::ExecutionFailed(text));
        }
        Ok(())
    }

    fn compile_matcher(&self, kind: HookKind, pattern: &str) -> Result<Matcher> {
        if kind.uses_message_pattern() {
            let compiled = self
                .compiler
                .compile(pattern, kind.full_message_pattern())
                .map_err(HookError::PatternCompile)?;
            Ok(Matcher::Message {
                source: pattern.to_string(),
                pattern: compiled,
            })
        } else {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(kind.case_insensitive())
                .build()?;
            Ok(Matcher::Regex {
                source: pattern.to_string(),
                regex,
            })
        }
    }
}
