//! The minimal capability set a command issuer must expose.

use crate::error::CommandError;

/// Coarse classification of who is issuing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    /// Non-interactive host console.
    Console,
    /// An interactive in-world user.
    Player,
    /// A scripted world entity.
    WorldEntity,
    Unknown,
}

/// What the framework needs from a command issuer: a display name, a way to
/// deliver message lines, a permission check, and a coarse classification.
///
/// The dispatcher's default permission oracle delegates to
/// [`Self::has_permission`]; the resolution core never interprets the
/// permission string itself.
pub trait CommandSender {
    fn name(&self) -> &str;

    /// Delivers one message line.
    fn send_message(&self, message: &str);

    /// Delivers several message lines.
    fn send_messages(&self, messages: &[String]) {
        for message in messages {
            self.send_message(message);
        }
    }

    fn has_permission(&self, permission: &str) -> bool;

    fn sender_type(&self) -> SenderType;
}

/// Fails with [`CommandError::ConsoleRestricted`] when the sender is the
/// console. For command bodies that only make sense for an in-world sender.
pub fn require_interactive<S: CommandSender>(sender: &S) -> Result<(), CommandError> {
    match sender.sender_type() {
        SenderType::Console => Err(CommandError::ConsoleRestricted),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    pub(crate) struct RecordingSender {
        pub(crate) kind: SenderType,
        pub(crate) lines: RefCell<Vec<String>>,
    }

    impl CommandSender for RecordingSender {
        fn name(&self) -> &str {
            "tester"
        }

        fn send_message(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }

        fn has_permission(&self, _permission: &str) -> bool {
            true
        }

        fn sender_type(&self) -> SenderType {
            self.kind
        }
    }

    #[test]
    fn send_messages_delivers_each_line() {
        let sender = RecordingSender {
            kind: SenderType::Player,
            lines: RefCell::new(Vec::new()),
        };
        sender.send_messages(&["one".to_string(), "two".to_string()]);
        assert_eq!(*sender.lines.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn require_interactive_rejects_console() {
        let console = RecordingSender {
            kind: SenderType::Console,
            lines: RefCell::new(Vec::new()),
        };
        assert!(matches!(
            require_interactive(&console),
            Err(CommandError::ConsoleRestricted)
        ));

        let player = RecordingSender {
            kind: SenderType::Player,
            lines: RefCell::new(Vec::new()),
        };
        assert!(require_interactive(&player).is_ok());
    }
}
