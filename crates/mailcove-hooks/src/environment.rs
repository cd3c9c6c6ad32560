//! Mail environment collaborator seam
//!
//! Path and address utilities the engine depends on but does not
//! implement: mailbox shortcut expansion, display prettifying,
//! write-access checks, address helpers, and the user-facing error
//! channel. All path/string operations are pure with respect to the hook
//! registry.

use crate::types::Address;

/// Host-side utilities supplied by the mail client
pub trait MailEnvironment: Send + Sync {
    /// The currently open mailbox, if any. Consulted when a pattern uses
    /// the `^` current-mailbox shortcut.
    fn current_folder(&self) -> Option<String>;

    /// Expand mailbox shortcuts (`~`, `=`, `+`, `^`, ...) in a path. With
    /// `for_regex` set, characters special to regular expressions in the
    /// expansion are escaped, since the result is compiled as a pattern.
    fn expand_path(&self, path: &str, for_regex: bool) -> String;

    /// Abbreviate a path for display (the inverse of shortcut expansion).
    fn pretty_path(&self, path: &str) -> String;

    /// Derive a filesystem-safe mailbox name from an address.
    fn folder_name_for(&self, address: &Address) -> String;

    /// Join a mailbox name onto a root directory.
    fn join_path(&self, root: &str, name: &str) -> String;

    /// Whether the given mailbox path can be appended to.
    fn is_writable_mailbox(&self, path: &str) -> bool;

    /// Whether the address belongs to the current user.
    fn is_own_address(&self, address: &Address) -> bool;

    /// Validate an archive hook's command string (the external
    /// command-syntax check for open/append/close hooks).
    fn valid_archive_command(&self, command: &str) -> bool;

    /// Show an error message to the user. Implementations should hold the
    /// message on screen long enough to be read before the next redraw.
    fn report_error(&self, message: &str);
}
