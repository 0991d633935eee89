//! Property tests for the tokenizer.

use std::collections::HashSet;

use commandeer_context::CommandContext;
use proptest::prelude::*;

/// Tokens with no quote characters, no leading dash, and no empties.
fn plain_token() -> impl Strategy<Value = String> {
    "[a-z0-9_.]{1,12}"
}

proptest! {
    /// With no quoting and no flags, parsing is the identity on the tokens
    /// after the command name.
    #[test]
    fn plain_tokens_round_trip(tokens in prop::collection::vec(plain_token(), 0..8)) {
        let mut args = vec!["cmd".to_string()];
        args.extend(tokens.iter().cloned());
        let ctx = CommandContext::parse(args, &HashSet::new(), false).unwrap();

        prop_assert_eq!(ctx.args_len(), tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            prop_assert_eq!(ctx.get(i), Some(token.as_str()));
        }
        prop_assert!(ctx.flags().is_empty());
        prop_assert!(ctx.value_flags().is_empty());
    }

    /// The raw remainder from parsed index 0 reproduces the original line
    /// after the command name, whatever quoting or repeated spaces did to
    /// the parsed view.
    #[test]
    fn joined_from_zero_reproduces_raw_tail(
        tokens in prop::collection::vec(plain_token(), 1..8),
        quote_first in any::<bool>(),
    ) {
        let mut args = vec!["cmd".to_string()];
        if quote_first {
            args.push(format!("\"{}\"", tokens[0]));
            args.extend(tokens[1..].iter().cloned());
        } else {
            args.extend(tokens.iter().cloned());
        }
        let expected = args[1..].join(" ");
        let ctx = CommandContext::parse(args, &HashSet::new(), false).unwrap();

        prop_assert!(ctx.args_len() >= 1);
        prop_assert_eq!(ctx.joined_from(0), expected);
    }

    /// Completion mode never changes which arguments parse, beyond possibly
    /// keeping a trailing empty token.
    #[test]
    fn completion_mode_is_parse_compatible(tokens in prop::collection::vec(plain_token(), 1..8)) {
        let mut args = vec!["cmd".to_string()];
        args.extend(tokens.iter().cloned());
        let executing = CommandContext::parse(args.clone(), &HashSet::new(), false).unwrap();
        let completing = CommandContext::parse(args, &HashSet::new(), true).unwrap();

        prop_assert_eq!(executing.args_len(), completing.args_len());
        for i in 0..executing.args_len() {
            prop_assert_eq!(executing.get(i), completing.get(i));
        }
        prop_assert!(completing.is_completing());
        let suggestion = completing.suggestion_context().unwrap();
        prop_assert_eq!(suggestion.prefix(), tokens.last().unwrap().as_str());
    }
}
