//! Hierarchical command registration and dispatch.
//!
//! A [`CommandRegistry`] is built once at startup from [`CommandNode`]
//! declarations (names and aliases, argument bounds, flag declarations,
//! permissions, nested sub-commands), then handed to a [`Dispatcher`] that
//! resolves typed command lines against it: walking nested levels,
//! enforcing permissions and bounds, parsing the remaining tokens with
//! [`commandeer_context`], and invoking the registered handler. The same
//! walk drives tab completion through [`Dispatcher::complete`].
//!
//! ```
//! use commandeer_dispatch::{
//!     CommandNode, CommandRegistry, CommandSender, Dispatcher, Locals, SenderType,
//! };
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
//!         CommandNode::builder(["ping"]).handler(|_ctx, sender: &Console, _locals| {
//!             sender.send_message("Pong!");
//!             Ok(())
//!         }),
//!     )
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(registry);
//! let mut locals = Locals::new();
//! dispatcher.execute("ping", &[], &Console, &mut locals)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dispatch;
mod error;
mod handler;
mod node;
mod paginate;
mod registry;
mod sender;

pub use dispatch::Dispatcher;
pub use error::{CommandError, RegistrationError};
pub use handler::{CompletingHandlerFn, HandlerFn, Locals, Outcome};
pub use node::{CommandNode, NodeBuilder};
pub use paginate::Paginator;
pub use registry::{CommandRegistry, RegistryBuilder};
pub use sender::{require_interactive, CommandSender, SenderType};
