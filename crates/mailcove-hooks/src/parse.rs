//! Hook-invocation argument extraction
//!
//! A hook configuration line looks like
//!
//! ```text
//! send-hook !'~t @lists\.' "set signature=~/.sig-lists"
//! ```
//!
//! after the command word is stripped, the remainder is parsed here: an
//! optional leading `!` sets the negation flag, the first token is the
//! pattern, and the command is either the next token or the rest of the
//! line, depending on the category. Tokens may be single- or
//! double-quoted and use backslash escapes.

use crate::error::{HookError, Result};
use crate::types::HookKind;

/// A parsed hook invocation, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCall {
    /// Invert the match result.
    pub negate: bool,
    /// Raw pattern text, quotes and escapes resolved.
    pub pattern: String,
    /// Raw command text.
    pub command: String,
}

/// Parse the argument text of a hook definition.
///
/// Fails with [`HookError::TooFewArguments`] when the pattern or command
/// is missing and [`HookError::TooManyArguments`] when a single-token
/// command is followed by unconsumed input.
pub fn parse_hook_args(kind: HookKind, args: &str) -> Result<HookCall> {
    let mut rest = args.trim_start();

    let mut negate = false;
    if let Some(stripped) = rest.strip_prefix('!') {
        negate = true;
        rest = stripped.trim_start();
    }

    let (pattern, after_pattern) = extract_token(rest);
    if pattern.is_empty() {
        return Err(HookError::TooFewArguments);
    }

    let rest = after_pattern.trim_start();
    if rest.is_empty() {
        return Err(HookError::TooFewArguments);
    }

    let command = if kind.command_spans_line() {
        rest.trim_end().to_string()
    } else {
        let (token, after_command) = extract_token(rest);
        if token.is_empty() {
            return Err(HookError::TooFewArguments);
        }
        if !after_command.trim().is_empty() {
            return Err(HookError::TooManyArguments);
        }
        token
    };

    Ok(HookCall {
        negate,
        pattern,
        command,
    })
}

/// Take one token off the front of `input`, resolving quotes and
/// backslash escapes, and return it with the unconsumed remainder. An
/// unterminated quote runs to the end of the input.
fn extract_token(input: &str) -> (String, &str) {
    let mut token = String::new();
    let mut chars = input.char_indices();
    let mut quote: Option<char> = None;
    let mut end = input.len();

    while let Some((index, ch)) = chars.next() {
        match quote {
            Some(open) => {
                if ch == open {
                    quote = None;
                } else if ch == '\\' && open == '"' {
                    if let Some((_, escaped)) = chars.next() {
                        token.push(escaped);
                    }
                } else {
                    token.push(ch);
                }
            }
            None => {
                if ch.is_whitespace() {
                    end = index;
                    break;
                } else if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                } else if ch == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        token.push(escaped);
                    }
                } else {
                    token.push(ch);
                }
            }
        }
    }

    if quote.is_none() && end < input.len() {
        (token, &input[end..])
    } else {
        (token, "")
    }
}
