//! Destination mailbox resolution
//!
//! Two lookups that answer "where should this message go": the default
//! save folder for a received message and the mailbox that keeps a copy
//! of an outgoing one. Both consult the registry first (save-hook and
//! fcc-hook entries) and fall back to deriving a name from the message's
//! addresses. They are pure lookups; no hook command is executed and no
//! dispatch state is touched.

use tracing::debug;

use crate::dispatcher::HookEngine;
use crate::types::{Envelope, HookKind, Message};

impl HookEngine {
    /// The default mailbox to save `message` into.
    ///
    /// A matching save-hook command wins. Otherwise the path is derived
    /// from the most interesting correspondent: for mail the user did
    /// not send, the reply-to or from address; for the user's own mail,
    /// the to or cc address. Returns an empty string when the message
    /// has no usable address at all, which callers treat as "no
    /// suggestion".
    pub fn default_save(&self, message: &Message) -> String {
        if let Some(path) = self.address_hook(HookKind::Save, message) {
            debug!(path = %path, "save destination from hook");
            return path;
        }

        let envelope = &message.envelope;
        let from_me = Envelope::first_usable(&envelope.from)
            .is_some_and(|address| self.environment().is_own_address(address));

        let address = if from_me {
            Envelope::first_usable(&envelope.to).or_else(|| Envelope::first_usable(&envelope.cc))
        } else {
            Envelope::first_usable(&envelope.reply_to)
                .or_else(|| Envelope::first_usable(&envelope.from))
                .or_else(|| Envelope::first_usable(&envelope.to))
                .or_else(|| Envelope::first_usable(&envelope.cc))
        };

        match address {
            Some(address) => format!("={}", self.environment().folder_name_for(address)),
            None => String::new(),
        }
    }

    /// The mailbox that should keep a copy of the outgoing `message`.
    ///
    /// A matching fcc-hook command wins. Otherwise, when the
    /// `save_name`/`force_name` settings ask for per-correspondent
    /// copies, a path is derived from the first recipient under
    /// `folder_root`; unless `force_name` is set, a derived path that is
    /// not a writable mailbox falls back to the configured outbox. The
    /// result is always abbreviated for display.
    pub fn select_fcc(&self, message: &Message) -> String {
        let path = match self.address_hook(HookKind::Fcc, message) {
            Some(path) => {
                debug!(path = %path, "copy destination from hook");
                path
            }
            None => self.derive_fcc(message),
        };
        self.environment().pretty_path(&path)
    }

    fn derive_fcc(&self, message: &Message) -> String {
        let settings = self.settings();
        if settings.save_name || settings.force_name {
            let envelope = &message.envelope;
            let address = Envelope::first_usable(&envelope.to)
                .or_else(|| Envelope::first_usable(&envelope.cc))
                .or_else(|| Envelope::first_usable(&envelope.bcc));
            if let Some(address) = address {
                let name = self.environment().folder_name_for(address);
                let root = settings.folder_root.as_deref().unwrap_or_default();
                let path = self.environment().join_path(root, &name);
                if settings.force_name || self.environment().is_writable_mailbox(&path) {
                    return path;
                }
            }
        }
        settings.outbox.clone()
    }
}
