//! Shell-like argument tokenizer with flags, quoting, and completion
//! tracking.
//!
//! `commandeer-context` turns a raw token vector (a command line already
//! split on spaces by the host) into a parsed view: ordered positional
//! arguments, boolean flags, value flags, and, in completion mode, a
//! [`SuggestionContext`] describing exactly what is being completed.
//!
//! # Parsing rules
//!
//! - Token 0 is the command name and is never scanned.
//! - A token opening with `"` or `\` starts a quoted span: following tokens
//!   are rejoined with single spaces until one ends with the opening
//!   character, producing one argument that may contain literal spaces.
//! - `-abc` sets the flags `a`, `b`, and `c`; letters declared as value
//!   flags consume the next token as their value. `--` ends flag parsing
//!   for the rest of the line.
//! - Empty tokens are dropped, except a final empty token in completion
//!   mode, which is kept as the (empty) text being completed.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use commandeer_context::CommandContext;
//!
//! let tokens: Vec<String> = ["give", "-q", "\"iron", "sword\"", "3"]
//!     .iter()
//!     .map(|t| t.to_string())
//!     .collect();
//! let ctx = CommandContext::parse(tokens, &HashSet::new(), false)?;
//!
//! assert!(ctx.has_flag('q'));
//! assert_eq!(ctx.get(0), Some("iron sword"));
//! assert_eq!(ctx.integer(1)?, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod error;
mod suggest;

pub use context::CommandContext;
pub use error::{NumberFormatError, ParseError};
pub use suggest::{complete_prefix, Cursor, SuggestionContext};
