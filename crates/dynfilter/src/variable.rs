//! Dynamic variable tokens.
//!
//! A dynamic variable is a string leaf that starts with one of the reserved
//! prefixes `$NOW`, `$CURRENT_USER` or `$CURRENT_ROLE`. The resolver replaces
//! it with a value known only at query time.

use serde_json::Value;

/// Token prefix for the current instant.
pub const NOW: &str = "$NOW";
/// Token prefix for the current user.
pub const CURRENT_USER: &str = "$CURRENT_USER";
/// Token prefix for the current role.
pub const CURRENT_ROLE: &str = "$CURRENT_ROLE";

const PREFIXES: [&str; 3] = [NOW, CURRENT_USER, CURRENT_ROLE];

/// Whether `value` is a string starting with a reserved variable prefix.
///
/// ```
/// use dynfilter::is_dynamic_variable;
/// use serde_json::json;
///
/// assert!(is_dynamic_variable(&json!("$NOW(+1 week)")));
/// assert!(is_dynamic_variable(&json!("$CURRENT_USER.email")));
/// assert!(!is_dynamic_variable(&json!("$CURRENCY")));
/// assert!(!is_dynamic_variable(&json!(42)));
/// ```
pub fn is_dynamic_variable(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| PREFIXES.iter().any(|prefix| s.starts_with(prefix)))
}

/// A parsed dynamic variable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicVariable<'a> {
    /// `$NOW`, optionally with a parenthesized adjustment like `$NOW(-1 day)`.
    Now {
        /// Text between the parentheses, when present and non-empty.
        adjustment: Option<&'a str>,
    },
    /// `$CURRENT_USER`, or a context path rooted at it.
    CurrentUser {
        /// The whole token when it is anything but the bare prefix.
        context_path: Option<&'a str>,
    },
    /// `$CURRENT_ROLE`, or a context path rooted at it.
    CurrentRole {
        /// The whole token when it is anything but the bare prefix.
        context_path: Option<&'a str>,
    },
}

impl<'a> DynamicVariable<'a> {
    /// Parse a token, returning `None` for strings outside the three families.
    pub fn parse(token: &'a str) -> Option<Self> {
        if token.starts_with(NOW) {
            let adjustment = if token.contains('(') && token.contains(')') {
                extract_adjustment(token)
            } else {
                None
            };
            return Some(Self::Now { adjustment });
        }

        if token.starts_with(CURRENT_USER) {
            return Some(Self::CurrentUser {
                context_path: (token != CURRENT_USER).then_some(token),
            });
        }

        if token.starts_with(CURRENT_ROLE) {
            return Some(Self::CurrentRole {
                context_path: (token != CURRENT_ROLE).then_some(token),
            });
        }

        None
    }
}

/// Text inside the first non-empty pair of parentheses.
///
/// `"$NOW(-1 day)"` yields `Some("-1 day")`; `"$NOW()"` yields `None`.
pub fn extract_adjustment(token: &str) -> Option<&str> {
    let mut rest = token;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let close = after.find(')')?;
        if close > 0 {
            return Some(&after[..close]);
        }
        rest = &after[close + 1..];
    }
    None
}
