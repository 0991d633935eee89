//! Error types for argument parsing.

/// Errors raised while tokenizing an argument vector.
///
/// These are kept distinct from argument-count errors so that callers can
/// format flag problems differently from usage problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A value flag appeared a second time after already being assigned.
    #[error("Value flag '{0}' already given")]
    DuplicateValueFlag(char),

    /// A value flag was never followed by its value. Carries the flag letter
    /// that was left without a value.
    #[error("No value specified for the '-{0}' flag.")]
    MissingFlagValue(char),
}

/// A numeric accessor was pointed at text that does not parse as a number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Number expected in place of '{actual}'")]
pub struct NumberFormatError {
    /// The literal text that failed to parse.
    pub actual: String,
}

impl NumberFormatError {
    pub(crate) fn new(actual: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages() {
        assert_eq!(
            ParseError::DuplicateValueFlag('f').to_string(),
            "Value flag 'f' already given"
        );
        assert_eq!(
            ParseError::MissingFlagValue('p').to_string(),
            "No value specified for the '-p' flag."
        );
    }

    #[test]
    fn number_format_error_keeps_literal() {
        let err = NumberFormatError::new("abc");
        assert_eq!(err.actual, "abc");
        assert_eq!(err.to_string(), "Number expected in place of 'abc'");
    }
}
