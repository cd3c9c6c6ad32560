//! Core data types for the hook engine
//!
//! This module defines the hook categories, the hook entry itself, the
//! message model that message-context dispatch evaluates against, and the
//! engine settings.
//!
//! Each hook entry carries exactly one matcher, and which matcher that is
//! follows from its category alone: mailbox-, charset-, account- and
//! crypt-style hooks match a plain string subject with a compiled regular
//! expression, while message-style hooks (message, compose, send, send2,
//! save, fcc, reply) match a message with a structured predicate produced
//! by the external pattern compiler.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::{CompiledPattern, PatternCache};

/// Event category a hook applies to
///
/// One category per entry; queries over several categories use [`KindSet`].
/// The `name()`/`from_name()` pair maps categories to the configuration
/// command words users write (`folder-hook`, `send-hook`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    /// Runs commands when a folder is opened.
    Folder,
    /// Names the mailbox read messages are moved to.
    Mbox,
    /// Maps an incoming charset name to the one to use instead.
    Charset,
    /// Maps a character-encoding alias for conversion lookups.
    Iconv,
    /// Runs commands when connecting to a remote account URL.
    Account,
    /// Selects encryption key IDs for a recipient address.
    Crypt,
    /// Runs commands before a message is displayed.
    Message,
    /// Runs commands when composition starts.
    Compose,
    /// Runs commands just before a message is sent.
    Send,
    /// Runs commands every time the sending message changes.
    Send2,
    /// Names the default mailbox for saving a message.
    Save,
    /// Names the mailbox that keeps a copy of an outgoing message.
    Fcc,
    /// Runs commands when replying to a message.
    Reply,
    /// Command used to open a compressed archive mailbox.
    ArchiveOpen,
    /// Command used to append to a compressed archive mailbox.
    ArchiveAppend,
    /// Command used to close a compressed archive mailbox.
    ArchiveClose,
}

impl HookKind {
    /// Every category, in declaration order.
    pub const ALL: [HookKind; 16] = [
        HookKind::Folder,
        HookKind::Mbox,
        HookKind::Charset,
        HookKind::Iconv,
        HookKind::Account,
        HookKind::Crypt,
        HookKind::Message,
        HookKind::Compose,
        HookKind::Send,
        HookKind::Send2,
        HookKind::Save,
        HookKind::Fcc,
        HookKind::Reply,
        HookKind::ArchiveOpen,
        HookKind::ArchiveAppend,
        HookKind::ArchiveClose,
    ];

    /// The configuration command word for this category.
    pub fn name(self) -> &'static str {
        match self {
            HookKind::Folder => "folder-hook",
            HookKind::Mbox => "mbox-hook",
            HookKind::Charset => "charset-hook",
            HookKind::Iconv => "iconv-hook",
            HookKind::Account => "account-hook",
            HookKind::Crypt => "crypt-hook",
            HookKind::Message => "message-hook",
            HookKind::Compose => "compose-hook",
            HookKind::Send => "send-hook",
            HookKind::Send2 => "send2-hook",
            HookKind::Save => "save-hook",
            HookKind::Fcc => "fcc-hook",
            HookKind::Reply => "reply-hook",
            HookKind::ArchiveOpen => "open-hook",
            HookKind::ArchiveAppend => "append-hook",
            HookKind::ArchiveClose => "close-hook",
        }
    }

    /// Look up a category by its configuration command word.
    pub fn from_name(name: &str) -> Option<HookKind> {
        HookKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Categories whose entries carry a structured message predicate
    /// instead of a regular expression.
    pub fn uses_message_pattern(self) -> bool {
        matches!(
            self,
            HookKind::Message
                | HookKind::Compose
                | HookKind::Send
                | HookKind::Send2
                | HookKind::Save
                | HookKind::Fcc
                | HookKind::Reply
        )
    }

    /// Message-pattern categories whose predicates may inspect the full
    /// message body, not just headers. Send-time hooks run before the
    /// final body exists, so they compile without the full-message flag.
    pub fn full_message_pattern(self) -> bool {
        matches!(self, HookKind::Message | HookKind::Save | HookKind::Reply)
    }

    /// Categories whose regular expressions match case-insensitively.
    pub fn case_insensitive(self) -> bool {
        matches!(self, HookKind::Charset | HookKind::Iconv | HookKind::Crypt)
    }

    /// Categories that allow several commands on the same pattern. The
    /// remaining categories keep at most one command per pattern and
    /// overwrite it in place on re-registration.
    pub fn allows_multiple_commands(self) -> bool {
        matches!(
            self,
            HookKind::Folder
                | HookKind::Account
                | HookKind::Crypt
                | HookKind::Message
                | HookKind::Compose
                | HookKind::Send
                | HookKind::Send2
                | HookKind::Reply
        )
    }

    /// Categories whose pattern names a mailbox path and goes through
    /// shortcut expansion before being compiled.
    pub fn matches_mailbox_path(self) -> bool {
        matches!(self, HookKind::Folder | HookKind::Mbox)
    }

    /// Categories whose command text is a mailbox destination and goes
    /// through shortcut expansion before storage.
    pub fn command_is_mailbox_path(self) -> bool {
        matches!(self, HookKind::Mbox | HookKind::Save | HookKind::Fcc)
    }

    /// Archive-mailbox categories; their command is validated by the
    /// external command-syntax checker instead of being compiled.
    pub fn is_archive_hook(self) -> bool {
        matches!(
            self,
            HookKind::ArchiveOpen | HookKind::ArchiveAppend | HookKind::ArchiveClose
        )
    }

    /// Categories whose command consumes the rest of the configuration
    /// line instead of a single token.
    pub fn command_spans_line(self) -> bool {
        matches!(
            self,
            HookKind::Folder
                | HookKind::Account
                | HookKind::Send
                | HookKind::Send2
                | HookKind::Reply
        )
    }
}

/// A set of hook categories, used to filter dispatch queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindSet(u16);

impl KindSet {
    /// The empty set.
    pub const EMPTY: KindSet = KindSet(0);

    /// A set holding a single category.
    pub const fn single(kind: HookKind) -> KindSet {
        KindSet(1 << kind as u16)
    }

    /// This set plus one more category.
    pub const fn with(self, kind: HookKind) -> KindSet {
        KindSet(self.0 | 1 << kind as u16)
    }

    /// Whether the set contains the given category.
    pub fn contains(self, kind: HookKind) -> bool {
        self.0 & (1 << kind as u16) != 0
    }

    /// Whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<HookKind> for KindSet {
    fn from(kind: HookKind) -> Self {
        KindSet::single(kind)
    }
}

/// The matcher stored in a hook entry
///
/// Both variants keep the original pattern source text; registration uses
/// it for the dedup/overwrite equality checks.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// A compiled regular expression for string-subject categories.
    Regex {
        /// Original pattern text as the user wrote it (post-expansion).
        source: String,
        /// The compiled expression.
        regex: Regex,
    },
    /// A compiled message predicate for message-context categories. The
    /// predicate itself is opaque; it comes from the external pattern
    /// compiler.
    Message {
        /// Original pattern text (post template expansion).
        source: String,
        /// The compiled predicate.
        pattern: Arc<dyn CompiledPattern>,
    },
}

impl Matcher {
    /// The pattern source text this matcher was compiled from.
    pub fn source(&self) -> &str {
        match self {
            Matcher::Regex { source, .. } => source,
            Matcher::Message { source, .. } => source,
        }
    }
}

/// One registered hook rule
///
/// Entries live in a single ordered sequence; registration order is
/// execution order and entries are never reordered. A `None` command marks
/// a placeholder entry, which every matching pass skips.
#[derive(Debug, Clone)]
pub struct Hook {
    /// The event category this rule applies to.
    pub kind: HookKind,
    /// The compiled matcher plus its source text.
    pub matcher: Matcher,
    /// Invert the match result. Frozen at creation.
    pub negate: bool,
    /// Text handed to the command interpreter when the rule fires.
    pub command: Option<String>,
}

impl Hook {
    /// The pattern source text of this entry.
    pub fn pattern(&self) -> &str {
        self.matcher.source()
    }

    /// Whether this entry selects the given string subject, negation
    /// applied. Message-pattern entries never match a string subject.
    pub fn matches_subject(&self, subject: &str) -> bool {
        match &self.matcher {
            Matcher::Regex { regex, .. } => regex.is_match(subject) ^ self.negate,
            Matcher::Message { .. } => false,
        }
    }

    /// Whether this entry selects the given message, negation applied.
    /// Regex entries never match a message context.
    pub fn matches_message(&self, message: &Message, cache: &mut dyn PatternCache) -> bool {
        match &self.matcher {
            Matcher::Message { pattern, .. } => pattern.evaluate(message, cache) ^ self.negate,
            Matcher::Regex { .. } => false,
        }
    }
}

/// A single mail address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// The `user@host` part.
    pub mailbox: String,
    /// Optional display name.
    pub personal: Option<String>,
}

impl Address {
    /// An address with no display name.
    pub fn new(mailbox: impl Into<String>) -> Self {
        Self {
            mailbox: mailbox.into(),
            personal: None,
        }
    }

    /// Whether the address carries a usable mailbox.
    pub fn is_usable(&self) -> bool {
        !self.mailbox.is_empty()
    }
}

/// The address lists of a message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub from: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
}

impl Envelope {
    /// First usable address of a list, if any.
    pub fn first_usable(list: &[Address]) -> Option<&Address> {
        list.first().filter(|address| address.is_usable())
    }
}

/// The message context message-style hooks are evaluated against
///
/// Deliberately minimal: the structured predicates that inspect it are
/// compiled and evaluated by an external collaborator, so this type only
/// carries what the engine's own fallback heuristics need.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    pub envelope: Envelope,
    pub subject: Option<String>,
}

/// Engine configuration
///
/// Mirrors the user preferences the dispatch and resolver passes consult.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HookSettings {
    /// Template a simple (unstructured) pattern is substituted into when
    /// registering a message-style hook.
    pub default_hook: Option<String>,
    /// Derive outgoing-copy mailbox names from the recipient address.
    pub save_name: bool,
    /// Like `save_name`, but use the derived path even when it is not a
    /// writable mailbox.
    pub force_name: bool,
    /// Root directory derived outgoing-copy paths are placed under.
    pub folder_root: Option<String>,
    /// Default mailbox for copies of outgoing messages.
    pub outbox: String,
}
