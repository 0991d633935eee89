//! Tree-walking command resolution.
//!
//! The dispatcher walks the registry level by level over the full token
//! vector (synthetic token 0 is the command name), re-parsing the remaining
//! tail at each leaf, enforcing bounds and permissions, and either invoking
//! the handler or collecting completions. It holds no mutable state of its
//! own, so concurrent dispatch over a shared registry is safe.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use commandeer_context::CommandContext;

use crate::error::CommandError;
use crate::handler::{Locals, Outcome};
use crate::node::CommandNode;
use crate::registry::CommandRegistry;
use crate::sender::CommandSender;

/// Bound on alias redirect chains; a registry wired into a cycle surfaces as
/// an error instead of recursing forever.
const MAX_REDIRECT_HOPS: usize = 8;

type Oracle<S> = Box<dyn Fn(&S, &str) -> bool + Send + Sync>;

/// Resolves and invokes commands against an immutable [`CommandRegistry`].
///
/// Resolution is a pure function of (registry, token vector, sender,
/// permission oracle); every failure is reported once, synchronously, to the
/// caller.
pub struct Dispatcher<S> {
    registry: CommandRegistry<S>,
    oracle: Oracle<S>,
}

/// Per-dispatch state threaded through the recursive walk.
struct Call<'a, S> {
    completing: bool,
    sender: &'a S,
    locals: &'a mut Locals,
}

impl<S: CommandSender> Dispatcher<S> {
    /// A dispatcher whose permission oracle asks the sender itself.
    pub fn new(registry: CommandRegistry<S>) -> Self {
        Self::with_oracle(registry, |sender: &S, permission: &str| {
            sender.has_permission(permission)
        })
    }
}

impl<S> Dispatcher<S> {
    /// A dispatcher with a host-supplied permission oracle.
    pub fn with_oracle<F>(registry: CommandRegistry<S>, oracle: F) -> Self
    where
        F: Fn(&S, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            registry,
            oracle: Box::new(oracle),
        }
    }

    pub fn registry(&self) -> &CommandRegistry<S> {
        &self.registry
    }

    /// Executes `command` with `args` for `sender`.
    ///
    /// `locals` carries host-supplied extra handler state; handlers may also
    /// write results back into it.
    pub fn execute(
        &self,
        command: &str,
        args: &[String],
        sender: &S,
        locals: &mut Locals,
    ) -> Result<(), CommandError> {
        self.run(false, command, args, sender, locals).map(|_| ())
    }

    /// Completes a partially typed `command` line.
    ///
    /// `None` defers to the host's default completion; any `Some` list,
    /// empty included, is authoritative. Completion is best effort: dispatch
    /// errors come back as an authoritative empty list, never as a failure.
    pub fn complete(
        &self,
        command: &str,
        args: &[String],
        sender: &S,
        locals: &mut Locals,
    ) -> Option<Vec<String>> {
        match self.run(true, command, args, sender, locals) {
            Ok(result) => result,
            Err(_) => Some(Vec::new()),
        }
    }

    fn run(
        &self,
        completing: bool,
        command: &str,
        args: &[String],
        sender: &S,
        locals: &mut Locals,
    ) -> Result<Option<Vec<String>>, CommandError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(command.to_string());
        full.extend_from_slice(args);

        let mut call = Call {
            completing,
            sender,
            locals,
        };
        self.resolve(&mut call, self.registry.roots(), true, &full, 0, 0)
    }

    fn resolve(
        &self,
        call: &mut Call<'_, S>,
        siblings: &HashMap<String, Arc<CommandNode<S>>>,
        at_root: bool,
        args: &[String],
        level: usize,
        hops: usize,
    ) -> Result<Option<Vec<String>>, CommandError> {
        let name = args.get(level).map(String::as_str).unwrap_or_default();
        let key = name.to_lowercase();
        let remaining = args.len().saturating_sub(level + 1);

        if call.completing && remaining == 0 {
            // Completing the command name itself at this level: offer every
            // permitted sibling that extends what was typed. A fully typed
            // name comes back alone, which just advances the cursor.
            let mut matches: Vec<String> = siblings
                .iter()
                .filter(|(child, node)| {
                    child.starts_with(&key) && self.permitted(node, call.sender)
                })
                .map(|(child, _)| child.clone())
                .collect();
            matches.sort();
            return Ok(Some(matches));
        }

        let Some(node) = siblings.get(&key) else {
            if at_root {
                return Err(CommandError::UnknownCommand);
            }
            return Err(CommandError::MissingNestedCommand {
                message: format!("Unknown command: {name}"),
                usage: self.nested_usage(args, level - 1, siblings, call.sender)?,
            });
        };

        if !self.permitted(node, call.sender) {
            return Err(CommandError::PermissionDenied);
        }

        if !node.children.is_empty() && (remaining > 0 || !node.execute_body) {
            if remaining == 0 {
                return Err(CommandError::MissingNestedCommand {
                    message: "Sub-command required.".to_string(),
                    usage: self.nested_usage(args, level, &node.children, call.sender)?,
                });
            }
            return self.resolve(call, &node.children, false, args, level + 1, hops);
        }

        if let Some(target) = &node.redirect {
            // Substitute the stored token vector and re-resolve at the same
            // level; whatever the sender typed past the alias is discarded.
            if hops >= MAX_REDIRECT_HOPS {
                return Err(CommandError::Wrapped(anyhow::anyhow!(
                    "alias redirect limit reached at '{name}'"
                )));
            }
            if target.len() <= level {
                return Err(CommandError::Wrapped(anyhow::anyhow!(
                    "alias redirect vector for '{name}' is shorter than its dispatch level"
                )));
            }
            return self.resolve(call, siblings, at_root, target, level, hops + 1);
        }

        let Some(handler) = &node.handler else {
            // Unreachable for registry-built trees; registration demands a
            // handler, children, or a redirect.
            return Err(CommandError::Wrapped(anyhow::anyhow!(
                "command '{name}' has no handler"
            )));
        };

        if call.completing && !handler.supports_completion() {
            // Defer to the host's default completion.
            return Ok(None);
        }

        let context =
            CommandContext::parse(args[level..].to_vec(), &node.flag_spec.value, call.completing)?;

        if !call.completing {
            if context.args_len() < node.min {
                return Err(usage_error("Too few arguments.", args, level, node));
            }
            if node.max.is_some_and(|max| context.args_len() > max) {
                return Err(usage_error("Too many arguments.", args, level, node));
            }
            if !node.any_flags {
                for &flag in context.flags() {
                    if !node.flag_spec.all.contains(&flag) {
                        return Err(usage_error(
                            format!("Unknown flag: {flag}"),
                            args,
                            level,
                            node,
                        ));
                    }
                }
            }
        }

        match handler.invoke(&context, call.sender, call.locals) {
            Ok(Outcome::Done) => Ok(call.completing.then(Vec::new)),
            Ok(Outcome::Suggestions(list)) => {
                if call.completing {
                    Ok(Some(list))
                } else {
                    Err(CommandError::Wrapped(anyhow::anyhow!(
                        "handler for '{name}' offered suggestions outside completion"
                    )))
                }
            }
            Err(err) => Err(err.offer_usage(|| command_usage(args, level, node))),
        }
    }

    fn permitted(&self, node: &CommandNode<S>, sender: &S) -> bool {
        node.permissions.is_empty()
            || node
                .permissions
                .iter()
                .any(|permission| (self.oracle)(sender, permission))
    }

    /// `/<path> <child1|child2|...>` restricted to permitted children, `<?>`
    /// when no children exist at all. Fails with a permission error when
    /// children exist but none are permitted to this sender.
    fn nested_usage(
        &self,
        args: &[String],
        level: usize,
        children: &HashMap<String, Arc<CommandNode<S>>>,
        sender: &S,
    ) -> Result<String, CommandError> {
        let mut out = String::from("/");
        for token in &args[..=level] {
            out.push_str(token);
            out.push(' ');
        }
        out.push('<');

        let allowed: BTreeSet<&str> = children
            .values()
            .filter(|node| self.permitted(node, sender))
            .map(|node| node.name())
            .collect();
        if !allowed.is_empty() {
            out.push_str(&allowed.into_iter().collect::<Vec<_>>().join("|"));
        } else if children.is_empty() {
            out.push('?');
        } else {
            return Err(CommandError::PermissionDenied);
        }

        out.push('>');
        Ok(out)
    }
}

fn usage_error<S>(
    message: impl Into<String>,
    args: &[String],
    level: usize,
    node: &CommandNode<S>,
) -> CommandError {
    CommandError::Usage {
        message: message.into(),
        usage: Some(command_usage(args, level, node)),
    }
}

/// `/<path tokens so far> [-flags] <declared usage>`, plus the help text
/// after a blank line when the node declares one.
fn command_usage<S>(args: &[String], level: usize, node: &CommandNode<S>) -> String {
    let mut out = String::from("/");
    for token in &args[..=level] {
        out.push_str(token);
        out.push(' ');
    }
    out.push_str(&node.arguments_string());
    let mut out = out.trim_end().to_string();
    if !node.help.is_empty() {
        out.push_str("\n\n");
        out.push_str(&node.help);
    }
    out
}
