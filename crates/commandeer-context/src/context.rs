//! Parsed view of a raw argument vector.
//!
//! [`CommandContext`] is produced fresh for each dispatch level from a token
//! sub-sequence. The raw tokens are expected to have been split on literal
//! spaces by the host, so any token past the first can be blank.

use std::collections::{HashMap, HashSet};

use crate::error::{NumberFormatError, ParseError};
use crate::suggest::{Cursor, SuggestionContext};

/// A parsed view of one level of a command line: positional arguments after
/// quote joining and flag extraction, boolean flags, value flags, and (when
/// completing) the completion cursor.
///
/// Immutable once constructed. The command name (token 0) is never part of
/// the parsed arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Raw tokens as received, command name included.
    original_args: Vec<String>,
    /// Name of the command, i.e. the first raw token.
    command: String,
    /// Arguments after quote joining and flag extraction. The last element
    /// can be blank when completing.
    parsed_args: Vec<String>,
    /// Starting index in `original_args` of each parsed argument.
    original_indices: Vec<usize>,
    boolean_flags: HashSet<char>,
    /// A flag may carry a blank value while it is being completed.
    value_flags: HashMap<char, String>,
    suggestion: Option<SuggestionContext>,
}

/// Incremental parse state, built once per [`CommandContext::parse`] call and
/// never shared across calls.
#[derive(Default)]
struct Accumulator {
    parsed_args: Vec<String>,
    original_indices: Vec<usize>,
    boolean_flags: HashSet<char>,
    value_flags: HashMap<char, String>,
    accepting_flags: bool,
    pending_value_flag: Option<char>,
    cursor: Cursor,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            accepting_flags: true,
            ..Self::default()
        }
    }

    /// Assigns parsed text either to the pending value flag or to the next
    /// positional slot, moving the completion cursor with it.
    fn assign(&mut self, text: String, source_index: usize, completing: bool) {
        match self.pending_value_flag.take() {
            Some(flag) => {
                if completing {
                    self.cursor = Cursor::Flag(flag);
                }
                self.value_flags.insert(flag, text);
            }
            None => {
                if completing {
                    self.cursor = Cursor::Argument(self.parsed_args.len());
                }
                self.parsed_args.push(text);
                self.original_indices.push(source_index);
            }
        }
    }

    fn take_flag_pack(
        &mut self,
        pack: &str,
        value_flag_names: &HashSet<char>,
    ) -> Result<(), ParseError> {
        for flag in pack.chars().skip(1) {
            if value_flag_names.contains(&flag) {
                if self.value_flags.contains_key(&flag) {
                    return Err(ParseError::DuplicateValueFlag(flag));
                }
                if self.pending_value_flag.is_some() {
                    return Err(ParseError::MissingFlagValue(flag));
                }
                self.pending_value_flag = Some(flag);
            } else {
                self.boolean_flags.insert(flag);
            }
        }
        Ok(())
    }
}

impl CommandContext {
    /// Parses a raw token vector. Token 0 is the command name and is not
    /// scanned; empty tokens are dropped unless the final token is being
    /// completed.
    ///
    /// `value_flag_names` is the set of flag letters that consume the next
    /// token as their value. With `completing` set, a [`SuggestionContext`]
    /// describing the completion point is attached; fewer than two tokens
    /// downgrade completion (there is nothing to complete after a bare
    /// command name).
    pub fn parse(
        args: Vec<String>,
        value_flag_names: &HashSet<char>,
        completing: bool,
    ) -> Result<Self, ParseError> {
        let command = args.first().cloned().unwrap_or_default();
        let completing = completing && args.len() >= 2;

        let mut acc = Accumulator::new();
        let mut i = 1;
        while i < args.len() {
            let start = i;
            let arg = &args[i];
            let mut value: Option<String> = None;

            if arg.is_empty() {
                if completing && i == args.len() - 1 {
                    value = Some(String::new());
                }
            } else if let Some(quote) = quote_opener(arg) {
                // Quoted span: consume tokens, rejoined with single spaces,
                // until one ends with the opening character. An unterminated
                // span runs to the end of input.
                let mut joined = String::new();
                let mut first_part = true;
                while i < args.len() {
                    let part: &str = if first_part {
                        &args[i][1..]
                    } else {
                        joined.push(' ');
                        &args[i]
                    };
                    first_part = false;
                    if let Some(body) = part.strip_suffix(quote) {
                        joined.push_str(body);
                        break;
                    }
                    joined.push_str(part);
                    i += 1;
                }
                value = Some(joined);
            } else if acc.pending_value_flag.is_none() {
                if arg == "--" {
                    // Everything after the terminator is positional, however
                    // flag-like it looks. The token itself is consumed.
                    acc.accepting_flags = false;
                } else if acc.accepting_flags && is_flag_pack(arg) {
                    acc.take_flag_pack(arg, value_flag_names)?;
                } else {
                    value = Some(arg.clone());
                }
            } else {
                // A pending value flag swallows the next token verbatim,
                // even one shaped like a flag.
                value = Some(arg.clone());
            }

            if let Some(text) = value {
                acc.assign(text, start, completing);
            }
            i += 1;
        }

        if let Some(flag) = acc.pending_value_flag {
            return Err(ParseError::MissingFlagValue(flag));
        }

        let suggestion = completing.then(|| {
            let mut context = String::new();
            for token in &args[1..args.len() - 1] {
                context.push_str(token);
                context.push(' ');
            }
            let prefix = args[args.len() - 1].clone();
            SuggestionContext::new(context, prefix, acc.cursor)
        });

        Ok(Self {
            command,
            original_args: args,
            parsed_args: acc.parsed_args,
            original_indices: acc.original_indices,
            boolean_flags: acc.boolean_flags,
            value_flags: acc.value_flags,
            suggestion,
        })
    }

    /// The command name, i.e. the first raw token.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Case-insensitive comparison against the command name.
    pub fn matches(&self, command: &str) -> bool {
        self.command.eq_ignore_ascii_case(command)
    }

    /// Number of parsed positional arguments.
    pub fn args_len(&self) -> usize {
        self.parsed_args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsed_args.is_empty()
    }

    /// The parsed argument at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.parsed_args.get(index).map(String::as_str)
    }

    /// The parsed argument at `index`, or `default` when out of range.
    pub fn get_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.get(index).unwrap_or(default)
    }

    /// The raw remainder starting at the raw token that produced parsed
    /// argument `index`, joined with single spaces. Unlike [`Self::range`],
    /// this preserves the original quoting text: a quoted span contributes
    /// its raw fragments, quote characters included.
    ///
    /// Empty when `index` is out of range.
    pub fn joined_from(&self, index: usize) -> String {
        match self.original_indices.get(index) {
            Some(&start) => self.original_args[start..].join(" "),
            None => String::new(),
        }
    }

    /// Parsed arguments from `start` through the end, joined with single
    /// spaces.
    pub fn remaining_from(&self, start: usize) -> String {
        self.range(start, self.parsed_args.len().saturating_sub(1))
    }

    /// Parsed arguments over the inclusive range `start..=end`, joined with
    /// single spaces. Out-of-range portions are dropped.
    pub fn range(&self, start: usize, end: usize) -> String {
        if self.parsed_args.is_empty() {
            return String::new();
        }
        let end = end.min(self.parsed_args.len() - 1);
        if start > end {
            return String::new();
        }
        self.parsed_args[start..=end].join(" ")
    }

    /// The parsed argument at `index` as an integer.
    pub fn integer(&self, index: usize) -> Result<i64, NumberFormatError> {
        parse_number(self.get(index).unwrap_or(""))
    }

    /// The parsed argument at `index` as an integer, or `default` when out
    /// of range.
    pub fn integer_or(&self, index: usize, default: i64) -> Result<i64, NumberFormatError> {
        match self.get(index) {
            Some(text) => parse_number(text),
            None => Ok(default),
        }
    }

    /// The parsed argument at `index` as a float.
    pub fn float(&self, index: usize) -> Result<f64, NumberFormatError> {
        parse_number(self.get(index).unwrap_or(""))
    }

    /// The parsed argument at `index` as a float, or `default` when out of
    /// range.
    pub fn float_or(&self, index: usize, default: f64) -> Result<f64, NumberFormatError> {
        match self.get(index) {
            Some(text) => parse_number(text),
            None => Ok(default),
        }
    }

    /// Raw tokens from raw index `index` onward, command name included at
    /// index 0.
    pub fn slice_from(&self, index: usize) -> &[String] {
        &self.original_args[index.min(self.original_args.len())..]
    }

    /// Like [`Self::slice_from`], with `padding` empty tokens prepended.
    /// Used by hosts that splice in synthetic leading tokens.
    pub fn padded_slice_from(&self, index: usize, padding: usize) -> Vec<String> {
        let mut out = vec![String::new(); padding];
        out.extend_from_slice(self.slice_from(index));
        out
    }

    /// Parsed arguments from `index` onward.
    pub fn parsed_slice_from(&self, index: usize) -> &[String] {
        &self.parsed_args[index.min(self.parsed_args.len())..]
    }

    /// True if `flag` is present as either a boolean or a value flag.
    pub fn has_flag(&self, flag: char) -> bool {
        self.boolean_flags.contains(&flag) || self.value_flags.contains_key(&flag)
    }

    /// The boolean flags present.
    pub fn flags(&self) -> &HashSet<char> {
        &self.boolean_flags
    }

    /// The value flags present, with their values.
    pub fn value_flags(&self) -> &HashMap<char, String> {
        &self.value_flags
    }

    /// The value of flag `flag`, if given.
    pub fn flag(&self, flag: char) -> Option<&str> {
        self.value_flags.get(&flag).map(String::as_str)
    }

    /// The value of flag `flag`, or `default` when absent.
    pub fn flag_or<'a>(&'a self, flag: char, default: &'a str) -> &'a str {
        self.flag(flag).unwrap_or(default)
    }

    /// The value of flag `flag` as an integer.
    pub fn flag_integer(&self, flag: char) -> Result<i64, NumberFormatError> {
        parse_number(self.flag(flag).unwrap_or(""))
    }

    /// The value of flag `flag` as an integer, or `default` when absent.
    pub fn flag_integer_or(&self, flag: char, default: i64) -> Result<i64, NumberFormatError> {
        match self.flag(flag) {
            Some(text) => parse_number(text),
            None => Ok(default),
        }
    }

    /// The value of flag `flag` as a float.
    pub fn flag_float(&self, flag: char) -> Result<f64, NumberFormatError> {
        parse_number(self.flag(flag).unwrap_or(""))
    }

    /// The value of flag `flag` as a float, or `default` when absent.
    pub fn flag_float_or(&self, flag: char, default: f64) -> Result<f64, NumberFormatError> {
        match self.flag(flag) {
            Some(text) => parse_number(text),
            None => Ok(default),
        }
    }

    /// The completion point, when parsed in completion mode.
    pub fn suggestion_context(&self) -> Option<&SuggestionContext> {
        self.suggestion.as_ref()
    }

    /// True when this context was parsed in completion mode.
    pub fn is_completing(&self) -> bool {
        self.suggestion.is_some()
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, NumberFormatError> {
    text.parse().map_err(|_| NumberFormatError::new(text))
}

fn quote_opener(arg: &str) -> Option<char> {
    match arg.chars().next() {
        Some(c @ ('"' | '\\')) => Some(c),
        _ => None,
    }
}

/// A dash followed by one or more letters or question marks.
fn is_flag_pack(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) => {
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic() || c == '?')
        }
        None => false,
    }
}
