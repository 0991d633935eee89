//! Error types for registration and dispatch.

use commandeer_context::{NumberFormatError, ParseError};

/// Errors surfaced by [`Dispatcher::execute`](crate::Dispatcher::execute).
///
/// Every dispatch-time failure is reported once, synchronously, to the
/// caller. Usage-carrying variants are enriched at the point of failure with
/// the path of the node actually reached.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No root command matched the first token.
    #[error("Unknown command.")]
    UnknownCommand,

    /// A nested lookup missed, or a sub-command was required and absent.
    #[error("{message}")]
    MissingNestedCommand {
        message: String,
        /// Synthesized `/<path> <child1|child2|...>` usage.
        usage: String,
    },

    /// The permission oracle denied the sender for the resolved node.
    #[error("You don't have permission to do that.")]
    PermissionDenied,

    /// Argument-count or flag violation, or a handler-raised usage problem.
    #[error("{message}")]
    Usage {
        message: String,
        /// Synthesized usage for the failing node. Filled in lazily by the
        /// engine when the handler did not provide one.
        usage: Option<String>,
    },

    /// A numeric accessor was given non-numeric text.
    #[error(transparent)]
    NumberFormat(#[from] NumberFormatError),

    /// The argument tokenizer rejected the input.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A command was used by a non-interactive sender that requires one.
    #[error("Only in-game senders can use that command.")]
    ConsoleRestricted,

    /// Opaque passthrough of a handler failure the engine does not
    /// recognize.
    #[error(transparent)]
    Wrapped(#[from] anyhow::Error),
}

impl CommandError {
    /// A usage error with no usage string attached yet; the engine fills in
    /// the usage for the node that was being executed.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            usage: None,
        }
    }

    /// The synthesized usage string, for variants that carry one.
    pub fn usage_string(&self) -> Option<&str> {
        match self {
            Self::MissingNestedCommand { usage, .. } => Some(usage),
            Self::Usage { usage, .. } => usage.as_deref(),
            _ => None,
        }
    }

    /// Attaches `usage` to a usage error that does not carry one yet. Every
    /// other kind, number-format failures included, passes through
    /// unmodified.
    pub(crate) fn offer_usage(self, synthesize: impl FnOnce() -> String) -> Self {
        match self {
            Self::Usage {
                message,
                usage: None,
            } => Self::Usage {
                message,
                usage: Some(synthesize()),
            },
            other => other,
        }
    }
}

/// Fatal errors raised while building a command registry. These indicate a
/// malformed tree at startup, never a runtime dispatch problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A node was declared without any name.
    #[error("command node declared without aliases")]
    NoAliases,

    /// A name or alias collided with one already registered at that level.
    #[error("duplicate command alias '{0}'")]
    DuplicateAlias(String),

    /// A flag spec string could not be parsed (e.g. a leading `:`).
    #[error("invalid flag spec '{0}'")]
    InvalidFlagSpec(String),

    /// A node has neither a handler nor children nor a redirection.
    #[error("command '{0}' has no handler, children, or redirect")]
    NoHandler(String),

    /// `execute_body` was set on a node with no handler to execute.
    #[error("command '{0}' sets execute_body but has no handler")]
    ExecuteBodyWithoutHandler(String),

    /// A redirecting node also declared a handler or children.
    #[error("command '{0}' redirects but also declares a handler or children")]
    RedirectConflict(String),

    /// A redirection to an empty token vector can never resolve.
    #[error("command '{0}' redirects to an empty token vector")]
    EmptyRedirect(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_is_attached_only_once() {
        let err = CommandError::usage("Too few arguments.");
        assert_eq!(err.usage_string(), None);

        let err = err.offer_usage(|| "/cmd <x>".to_string());
        assert_eq!(err.usage_string(), Some("/cmd <x>"));

        // A handler-provided usage string is not overwritten.
        let err = err.offer_usage(|| "/other".to_string());
        assert_eq!(err.usage_string(), Some("/cmd <x>"));
    }

    #[test]
    fn offer_usage_leaves_other_kinds_alone() {
        let err = CommandError::PermissionDenied.offer_usage(|| unreachable!());
        assert!(matches!(err, CommandError::PermissionDenied));
    }

    #[test]
    fn number_format_errors_keep_their_kind() {
        let err: CommandError = NumberFormatError {
            actual: "much".to_string(),
        }
        .into();
        let err = err.offer_usage(|| unreachable!());
        assert!(matches!(err, CommandError::NumberFormat(_)));
        assert_eq!(err.to_string(), "Number expected in place of 'much'");
        assert_eq!(err.usage_string(), None);
    }

    #[test]
    fn parse_and_number_errors_convert() {
        let parse: CommandError = ParseError::MissingFlagValue('f').into();
        assert!(matches!(parse, CommandError::Parse(_)));
        assert_eq!(parse.to_string(), "No value specified for the '-f' flag.");

        let num: CommandError = NumberFormatError {
            actual: "x".to_string(),
        }
        .into();
        assert_eq!(num.to_string(), "Number expected in place of 'x'");
    }
}
