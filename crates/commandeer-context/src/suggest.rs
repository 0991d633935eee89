//! Completion cursor tracking for partially typed command lines.

use std::fmt;

/// Where the cursor sits in a partially typed command line.
///
/// The cursor always reflects the last position the parser assigned text to,
/// so a trailing flag pack leaves the cursor on the argument before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Over the positional argument at this parsed index.
    Argument(usize),
    /// Over the value of this flag.
    Flag(char),
    /// Not over any parsed argument or flag value. This happens when nothing
    /// was assigned before the final token, e.g. the line so far is only
    /// flags or a lone `--`.
    #[default]
    Detached,
}

/// Describes exactly what is being completed in a partial command line.
///
/// Produced by [`CommandContext::parse`](crate::CommandContext::parse) when
/// completion mode is active, and handed to handlers that want to propose
/// continuations. Exists only for the duration of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionContext {
    context: String,
    prefix: String,
    cursor: Cursor,
}

impl SuggestionContext {
    pub(crate) fn new(context: String, prefix: String, cursor: Cursor) -> Self {
        Self {
            context,
            prefix,
            cursor,
        }
    }

    /// The already-typed text before the token being completed, each token
    /// followed by a single space.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The literal text of the token being completed. May be empty when the
    /// line ends in a space.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// True if the cursor is over a positional argument.
    pub fn is_argument(&self) -> bool {
        matches!(self.cursor, Cursor::Argument(_))
    }

    /// True if the cursor is over the positional argument at `index`.
    pub fn is_argument_at(&self, index: usize) -> bool {
        self.cursor == Cursor::Argument(index)
    }

    /// True if the cursor is over any flag value.
    pub fn is_flag(&self) -> bool {
        matches!(self.cursor, Cursor::Flag(_))
    }

    /// True if the cursor is over the value of flag `flag`.
    pub fn is_flag_char(&self, flag: char) -> bool {
        self.cursor == Cursor::Flag(flag)
    }

    /// Filters `choices` down to the sorted subset that extends the typed
    /// prefix, ignoring ASCII case.
    pub fn complete<I, T>(&self, choices: I) -> Vec<String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        complete_prefix(&self.prefix, choices)
    }

    /// Completions for `choices` if the cursor is over argument `index`,
    /// `None` otherwise.
    pub fn suggest_argument<I, T>(&self, index: usize, choices: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.is_argument_at(index).then(|| self.complete(choices))
    }

    /// Completions for `choices` if the cursor is over the value of `flag`,
    /// `None` otherwise.
    pub fn suggest_flag<I, T>(&self, flag: char, choices: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.is_flag_char(flag).then(|| self.complete(choices))
    }
}

impl fmt::Display for SuggestionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cursor {
            Cursor::Argument(index) => write!(f, "argument {index}"),
            Cursor::Flag(flag) => write!(f, "flag -{flag}"),
            Cursor::Detached => write!(f, "detached"),
        }
    }
}

/// Case-insensitive prefix filter over candidate completions. The result is
/// sorted, whatever the order of the input choices.
pub fn complete_prefix<I, T>(prefix: &str, choices: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut matches: Vec<String> = choices
        .into_iter()
        .filter(|choice| starts_with_ignore_case(choice.as_ref(), prefix))
        .map(|choice| choice.as_ref().to_string())
        .collect();
    matches.sort();
    matches
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars();
    prefix
        .chars()
        .all(|p| chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_prefix_filters_case_insensitively() {
        let choices = ["North", "south", "northeast", "east"];
        assert_eq!(
            complete_prefix("no", choices),
            vec!["North".to_string(), "northeast".to_string()]
        );
        assert_eq!(complete_prefix("", choices).len(), 4);
        assert!(complete_prefix("w", choices).is_empty());
    }

    #[test]
    fn complete_prefix_longer_than_choice() {
        assert!(complete_prefix("northern", ["north"]).is_empty());
    }

    #[test]
    fn complete_prefix_sorts_the_matches() {
        assert_eq!(
            complete_prefix("s", ["swamp", "sand", "sea"]),
            vec!["sand".to_string(), "sea".to_string(), "swamp".to_string()]
        );
    }

    #[test]
    fn cursor_queries() {
        let ctx = SuggestionContext::new("a ".into(), "b".into(), Cursor::Argument(1));
        assert!(ctx.is_argument());
        assert!(ctx.is_argument_at(1));
        assert!(!ctx.is_argument_at(0));
        assert!(!ctx.is_flag());

        let ctx = SuggestionContext::new(String::new(), "va".into(), Cursor::Flag('f'));
        assert!(ctx.is_flag());
        assert!(ctx.is_flag_char('f'));
        assert!(!ctx.is_flag_char('g'));
        assert!(!ctx.is_argument());
    }

    #[test]
    fn suggest_helpers_gate_on_cursor() {
        let ctx = SuggestionContext::new(String::new(), "re".into(), Cursor::Argument(0));
        assert_eq!(
            ctx.suggest_argument(0, ["red", "green"]),
            Some(vec!["red".to_string()])
        );
        assert_eq!(ctx.suggest_argument(1, ["red", "green"]), None);
        assert_eq!(ctx.suggest_flag('f', ["red"]), None);
    }

    #[test]
    fn display_names_the_cursor() {
        let arg = SuggestionContext::new(String::new(), String::new(), Cursor::Argument(2));
        assert_eq!(arg.to_string(), "argument 2");
        let flag = SuggestionContext::new(String::new(), String::new(), Cursor::Flag('p'));
        assert_eq!(flag.to_string(), "flag -p");
    }
}
