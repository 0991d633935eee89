//! Command-line tokenizing, nested command dispatch, and tab completion for
//! hosted command shells.
//!
//! This is the umbrella crate: it re-exports the tokenizer from
//! [`commandeer_context`] and the registry, dispatcher, and sender
//! abstractions from [`commandeer_dispatch`], so hosts depend on a single
//! crate.
//!
//! The model: the host splits an input line on literal spaces and hands the
//! command name plus argument tokens to a [`Dispatcher`]. The dispatcher
//! resolves the tokens against a [`CommandRegistry`] of nested
//! [`CommandNode`]s, checks permissions and argument bounds, parses the
//! remaining tokens into a [`CommandContext`] (quote joining, `-abc` flag
//! packs, value flags, the `--` terminator), and invokes the registered
//! handler. The same walk, run in completion mode, produces tab-completion
//! candidates for a partially typed line.
//!
//! ```
//! use commandeer::{CommandNode, CommandRegistry, CommandSender, Dispatcher, Locals, SenderType};
//!
//! struct Console;
//!
//! impl CommandSender for Console {
//!     fn name(&self) -> &str {
//!         "console"
//!     }
//!     fn send_message(&self, message: &str) {
//!         println!("{message}");
//!     }
//!     fn has_permission(&self, _permission: &str) -> bool {
//!         true
//!     }
//!     fn sender_type(&self) -> SenderType {
//!         SenderType::Console
//!     }
//! }
//!
//! let registry = CommandRegistry::builder()
//!     .command(
//!         CommandNode::builder(["give"])
//!             .usage("<item> [count]")
//!             .min(1)
//!             .max(2)
//!             .flags("q")
//!             .handler(|ctx, sender: &Console, _locals| {
//!                 let count = ctx.integer_or(1, 1)?;
//!                 if !ctx.has_flag('q') {
//!                     sender.send_message(&format!("Gave {count} of {}", ctx.get_or(0, "?")));
//!                 }
//!                 Ok(())
//!             }),
//!     )
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(registry);
//! let mut locals = Locals::new();
//! let args: Vec<String> = vec!["apple".into(), "3".into()];
//! dispatcher.execute("give", &args, &Console, &mut locals)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use commandeer_context::{
    complete_prefix, CommandContext, Cursor, NumberFormatError, ParseError, SuggestionContext,
};
pub use commandeer_dispatch::{
    require_interactive, CommandError, CommandNode, CommandRegistry, CommandSender,
    CompletingHandlerFn, Dispatcher, HandlerFn, Locals, NodeBuilder, Outcome, Paginator,
    RegistrationError, RegistryBuilder, SenderType,
};
