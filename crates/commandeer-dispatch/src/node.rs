//! Command nodes and the builder that constructs them.
//!
//! Nodes are assembled once at startup through [`NodeBuilder`], validated,
//! and frozen; dispatch never mutates them.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use commandeer_context::CommandContext;

use crate::error::{CommandError, RegistrationError};
use crate::handler::{Handler, Locals, Outcome};

/// Declared flag letters for a node, split into boolean and value flags.
///
/// Parsed from a spec string like `"ab:c"`, where `:` marks the preceding
/// letter as taking a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlagSpec {
    /// Every declared letter, value flags included.
    pub(crate) all: HashSet<char>,
    /// The subset that consumes the next token as a value.
    pub(crate) value: HashSet<char>,
}

impl FlagSpec {
    fn parse(spec: &str) -> Result<Self, RegistrationError> {
        let mut all = HashSet::new();
        let mut value = HashSet::new();
        let mut prev: Option<char> = None;
        for c in spec.chars() {
            if c == ':' {
                match prev.take() {
                    Some(letter) => {
                        value.insert(letter);
                    }
                    None => return Err(RegistrationError::InvalidFlagSpec(spec.to_string())),
                }
            } else {
                all.insert(c);
                prev = Some(c);
            }
        }
        Ok(Self { all, value })
    }
}

/// A registered command: a primary name plus aliases, argument bounds, flag
/// declarations, a permission requirement, optional children, and a handler.
///
/// Constructed through [`NodeBuilder`]; immutable thereafter.
pub struct CommandNode<S> {
    pub(crate) aliases: Vec<String>,
    pub(crate) usage: String,
    pub(crate) desc: String,
    pub(crate) help: String,
    pub(crate) min: usize,
    pub(crate) max: Option<usize>,
    pub(crate) flag_spec: FlagSpec,
    pub(crate) any_flags: bool,
    /// Any-of permission list; empty means unrestricted.
    pub(crate) permissions: Vec<String>,
    /// Run this node's own handler when children exist and no further
    /// arguments were given, instead of requiring a sub-command.
    pub(crate) execute_body: bool,
    /// Full replacement token vector for pure-alias nodes.
    pub(crate) redirect: Option<Vec<String>>,
    /// Children keyed by lowercased alias; one entry per alias.
    pub(crate) children: HashMap<String, Arc<CommandNode<S>>>,
    pub(crate) handler: Option<Handler<S>>,
}

impl<S> std::fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("desc", &self.desc)
            .field("help", &self.help)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("flag_spec", &self.flag_spec)
            .field("any_flags", &self.any_flags)
            .field("permissions", &self.permissions)
            .field("execute_body", &self.execute_body)
            .field("redirect", &self.redirect)
            .field("children", &self.children)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl<S> CommandNode<S> {
    /// Starts building a node with the given name and aliases (the first is
    /// the primary name).
    pub fn builder<I, N>(aliases: I) -> NodeBuilder<S>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        NodeBuilder::new(aliases)
    }

    /// The primary name.
    pub fn name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or_default()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The bracketed-flags-plus-usage fragment, e.g. `[-fq] <item> [count]`.
    pub(crate) fn arguments_string(&self) -> String {
        let mut out = String::new();
        if !self.flag_spec.all.is_empty() {
            let letters: BTreeSet<char> = self.flag_spec.all.iter().copied().collect();
            out.push_str("[-");
            out.extend(letters);
            out.push_str("] ");
        }
        out.push_str(&self.usage);
        out
    }
}

/// Fluent construction of a [`CommandNode`]. Consumed by
/// [`RegistryBuilder::command`](crate::RegistryBuilder::command) or by
/// [`Self::child`] on a parent builder; validation happens at build time.
pub struct NodeBuilder<S> {
    aliases: Vec<String>,
    usage: String,
    desc: String,
    help: String,
    min: usize,
    max: Option<usize>,
    flags: String,
    any_flags: bool,
    permissions: Vec<String>,
    execute_body: bool,
    redirect: Option<Vec<String>>,
    children: Vec<NodeBuilder<S>>,
    handler: Option<Handler<S>>,
}

impl<S> NodeBuilder<S> {
    pub fn new<I, N>(aliases: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            usage: String::new(),
            desc: String::new(),
            help: String::new(),
            min: 0,
            max: None,
            flags: String::new(),
            any_flags: false,
            permissions: Vec::new(),
            execute_body: false,
            redirect: None,
            children: Vec::new(),
            handler: None,
        }
    }

    /// Declared usage text, shown after the flag brackets in usage strings.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// One-line description, used in the registry's description listing.
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Longer help text, appended to usage strings after a blank line.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Minimum number of positional arguments.
    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    /// Maximum number of positional arguments; unset means unbounded.
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Flag spec string: letters, with `:` after a letter marking it as a
    /// value flag (`"fq:p"` declares boolean `f`, value `q`, boolean `p`).
    pub fn flags(mut self, spec: impl Into<String>) -> Self {
        self.flags = spec.into();
        self
    }

    /// Accept flags that were not declared instead of rejecting them.
    pub fn any_flags(mut self) -> Self {
        self.any_flags = true;
        self
    }

    /// Adds a permission; the sender needs any one of the added permissions.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Run this node's own handler when no further arguments are given,
    /// even though children exist.
    pub fn execute_body(mut self) -> Self {
        self.execute_body = true;
        self
    }

    /// Makes this node a pure alias: dispatch substitutes `target` for the
    /// typed token vector and re-resolves at the same level.
    pub fn redirect<I, N>(mut self, target: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.redirect = Some(target.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a nested sub-command.
    pub fn child(mut self, child: NodeBuilder<S>) -> Self {
        self.children.push(child);
        self
    }

    /// Attaches the command body. Plain handlers cannot produce completions;
    /// completing a node with only a plain handler defers to the host.
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandContext, &S, &mut Locals) -> Result<(), CommandError>
            + Send
            + Sync
            + 'static,
    {
        self.handler = Some(Handler::Plain(Box::new(f)));
        self
    }

    /// Attaches a completion-aware command body, which may return
    /// [`Outcome::Suggestions`] while the line is being completed.
    pub fn completing_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&CommandContext, &S, &mut Locals) -> Result<Outcome, CommandError>
            + Send
            + Sync
            + 'static,
    {
        self.handler = Some(Handler::Completing(Box::new(f)));
        self
    }

    pub(crate) fn build(self) -> Result<CommandNode<S>, RegistrationError> {
        if self.aliases.is_empty() || self.aliases.iter().any(String::is_empty) {
            return Err(RegistrationError::NoAliases);
        }
        let name = self.aliases[0].clone();

        if let Some(target) = &self.redirect {
            if self.handler.is_some() || !self.children.is_empty() {
                return Err(RegistrationError::RedirectConflict(name));
            }
            if target.is_empty() {
                return Err(RegistrationError::EmptyRedirect(name));
            }
        }
        if self.execute_body && self.handler.is_none() {
            return Err(RegistrationError::ExecuteBodyWithoutHandler(name));
        }
        if self.handler.is_none() && self.children.is_empty() && self.redirect.is_none() {
            return Err(RegistrationError::NoHandler(name));
        }

        let flag_spec = FlagSpec::parse(&self.flags)?;

        let mut children = HashMap::new();
        for child in self.children {
            let built = Arc::new(child.build()?);
            for alias in &built.aliases {
                let key = alias.to_lowercase();
                if children.insert(key, Arc::clone(&built)).is_some() {
                    return Err(RegistrationError::DuplicateAlias(alias.clone()));
                }
            }
        }

        Ok(CommandNode {
            aliases: self.aliases,
            usage: self.usage,
            desc: self.desc,
            help: self.help,
            min: self.min,
            max: self.max,
            flag_spec,
            any_flags: self.any_flags,
            permissions: self.permissions,
            execute_body: self.execute_body,
            redirect: self.redirect,
            children,
            handler: self.handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> NodeBuilder<()> {
        NodeBuilder::new([name]).handler(|_, _, _| Ok(()))
    }

    #[test]
    fn flag_spec_splits_boolean_and_value() {
        let spec = FlagSpec::parse("fq:p").unwrap();
        assert_eq!(spec.all, ['f', 'q', 'p'].into());
        assert_eq!(spec.value, ['q'].into());

        let empty = FlagSpec::parse("").unwrap();
        assert!(empty.all.is_empty());
    }

    #[test]
    fn flag_spec_rejects_leading_or_doubled_colon() {
        assert_eq!(
            FlagSpec::parse(":f"),
            Err(RegistrationError::InvalidFlagSpec(":f".to_string()))
        );
        assert_eq!(
            FlagSpec::parse("f::"),
            Err(RegistrationError::InvalidFlagSpec("f::".to_string()))
        );
    }

    #[test]
    fn build_requires_a_name() {
        let err = NodeBuilder::<()>::new(Vec::<String>::new())
            .handler(|_, _, _| Ok(()))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::NoAliases);
    }

    #[test]
    fn build_requires_a_body_or_children() {
        let err = NodeBuilder::<()>::new(["bare"]).build().unwrap_err();
        assert_eq!(err, RegistrationError::NoHandler("bare".to_string()));
    }

    #[test]
    fn redirect_excludes_handler_and_children() {
        let err = leaf("a").redirect(["b"]).build().unwrap_err();
        assert_eq!(err, RegistrationError::RedirectConflict("a".to_string()));

        let err = NodeBuilder::<()>::new(["a"])
            .redirect(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::EmptyRedirect("a".to_string()));
    }

    #[test]
    fn execute_body_needs_a_handler() {
        let err = NodeBuilder::<()>::new(["box"])
            .execute_body()
            .child(leaf("open"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::ExecuteBodyWithoutHandler("box".to_string())
        );
    }

    #[test]
    fn children_register_under_every_alias() {
        let node = NodeBuilder::<()>::new(["parent"])
            .child(
                NodeBuilder::new(["list", "ls"])
                    .handler(|_, _, _| Ok(())),
            )
            .build()
            .unwrap();
        assert!(node.children.contains_key("list"));
        assert!(node.children.contains_key("ls"));
        assert_eq!(node.children["ls"].name(), "list");
    }

    #[test]
    fn duplicate_child_alias_is_rejected() {
        let err = NodeBuilder::<()>::new(["parent"])
            .child(leaf("x"))
            .child(NodeBuilder::new(["X", "y"]).handler(|_, _, _| Ok(())))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateAlias("X".to_string()));
    }

    #[test]
    fn arguments_string_sorts_flags_and_appends_usage() {
        let node = NodeBuilder::<()>::new(["give"])
            .flags("qf:a")
            .usage("<item> [count]")
            .handler(|_, _, _| Ok(()))
            .build()
            .unwrap();
        assert_eq!(node.arguments_string(), "[-afq] <item> [count]");
    }
}
