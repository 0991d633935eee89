//! The command tree and its build-time construction API.
//!
//! The registry replaces runtime reflection with an explicit builder: the
//! host declares the whole tree at startup, registration validates it, and
//! dispatch reads it immutably from then on.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::node::{CommandNode, NodeBuilder};

/// An immutable tree of registered commands, plus the description and help
/// listings derived from the root-level nodes at registration time.
pub struct CommandRegistry<S> {
    roots: HashMap<String, Arc<CommandNode<S>>>,
    /// Primary name -> "usage - desc" (or bare desc), root commands only.
    descriptions: BTreeMap<String, String>,
    /// Alias -> "/alias [-flags] usage\n\nhelp", root commands only.
    help_messages: HashMap<String, String>,
}

impl<S> std::fmt::Debug for CommandRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("roots", &self.roots)
            .field("descriptions", &self.descriptions)
            .field("help_messages", &self.help_messages)
            .finish()
    }
}

impl<S> CommandRegistry<S> {
    pub fn builder() -> RegistryBuilder<S> {
        RegistryBuilder::new()
    }

    /// True if a root command with this name or alias exists.
    pub fn has_command(&self, name: &str) -> bool {
        self.roots.contains_key(&name.to_lowercase())
    }

    /// Root-command descriptions, keyed by primary name.
    pub fn descriptions(&self) -> &BTreeMap<String, String> {
        &self.descriptions
    }

    /// The help message for a root command name or alias.
    pub fn help_message(&self, name: &str) -> Option<&str> {
        self.help_messages.get(name).map(String::as_str)
    }

    pub(crate) fn roots(&self) -> &HashMap<String, Arc<CommandNode<S>>> {
        &self.roots
    }
}

/// Collects root nodes and freezes them into a [`CommandRegistry`].
pub struct RegistryBuilder<S> {
    nodes: Vec<NodeBuilder<S>>,
}

impl<S> Default for RegistryBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RegistryBuilder<S> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds a root command.
    pub fn command(mut self, node: NodeBuilder<S>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Validates and freezes the tree. Any malformed node fails the whole
    /// build; a partially registered tree is never observable.
    pub fn build(self) -> Result<CommandRegistry<S>, RegistrationError> {
        let mut roots = HashMap::new();
        let mut descriptions = BTreeMap::new();
        let mut help_messages = HashMap::new();

        for node in self.nodes {
            let built = Arc::new(node.build()?);

            let description = if built.usage.is_empty() {
                built.desc.clone()
            } else {
                format!("{} - {}", built.usage, built.desc)
            };
            descriptions.insert(built.name().to_string(), description);

            let help = if built.help.is_empty() {
                &built.desc
            } else {
                &built.help
            };
            for alias in &built.aliases {
                let message = format!("/{} {}\n\n{}", alias, built.arguments_string(), help);
                help_messages.insert(alias.replace('/', ""), message);

                let key = alias.to_lowercase();
                if roots.insert(key, Arc::clone(&built)).is_some() {
                    return Err(RegistrationError::DuplicateAlias(alias.clone()));
                }
            }
        }

        Ok(CommandRegistry {
            roots,
            descriptions,
            help_messages,
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
    fn lookup_is_alias_aware_and_case_folded() {
        let registry = CommandRegistry::<()>::builder()
            .command(
                NodeBuilder::new(["teleport", "tp"])
                    .usage("<destination>")
                    .handler(|_, _, _| Ok(())),
            )
            .build()
            .unwrap();

        assert!(registry.has_command("teleport"));
        assert!(registry.has_command("TP"));
        assert!(!registry.has_command("warp"));
    }

    #[test]
    fn duplicate_root_alias_is_rejected() {
        let err = CommandRegistry::<()>::builder()
            .command(leaf("go"))
            .command(NodeBuilder::new(["travel", "GO"]).handler(|_, _, _| Ok(())))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateAlias("GO".to_string()));
    }

    #[test]
    fn descriptions_prefix_usage_when_present() {
        let registry = CommandRegistry::<()>::builder()
            .command(leaf("bare").desc("does a thing"))
            .command(
                leaf("give")
                    .usage("<item>")
                    .desc("gives an item"),
            )
            .build()
            .unwrap();

        assert_eq!(registry.descriptions()["bare"], "does a thing");
        assert_eq!(registry.descriptions()["give"], "<item> - gives an item");
    }

    #[test]
    fn help_messages_cover_every_alias() {
        let registry = CommandRegistry::<()>::builder()
            .command(
                NodeBuilder::new(["give", "g"])
                    .usage("<item>")
                    .flags("q")
                    .desc("gives an item")
                    .help("Gives the named item to you.")
                    .handler(|_, _, _| Ok(())),
            )
            .build()
            .unwrap();

        let help = registry.help_message("give").unwrap();
        assert_eq!(help, "/give [-q] <item>\n\nGives the named item to you.");
        let alias_help = registry.help_message("g").unwrap();
        assert!(alias_help.starts_with("/g "));
        assert!(registry.help_message("missing").is_none());
    }

    #[test]
    fn help_falls_back_to_desc() {
        let registry = CommandRegistry::<()>::builder()
            .command(leaf("ping").desc("measures latency"))
            .build()
            .unwrap();
        assert_eq!(
            registry.help_message("ping").unwrap(),
            "/ping \n\nmeasures latency"
        );
    }
}
