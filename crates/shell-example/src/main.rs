//! An interactive shell over a small command tree.
//!
//! Reads lines from stdin and dispatches them: `give apple 3`,
//! `warp to home`, `region claim "my base"`. Prefix a line with
//! `complete ` to see what tab completion would offer for it, `op` toggles
//! the pretend permission level, and `quit` exits.

use std::cell::Cell;
use std::io::{self, BufRead, Write};

use commandeer::{
    require_interactive, CommandError, CommandNode, CommandRegistry, CommandSender, Dispatcher,
    Locals, Outcome, Paginator, SenderType,
};

/// One row per registered command, handed to the `help` handler through
/// [`Locals`] so the handler stays decoupled from the registry.
struct CommandListing(Vec<(String, String)>);

struct ShellSender {
    name: String,
    op: Cell<bool>,
}

impl CommandSender for ShellSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, message: &str) {
        println!("{message}");
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.op.get() || permission.starts_with("shell.basic")
    }

    fn sender_type(&self) -> SenderType {
        SenderType::Player
    }
}

fn build_registry() -> Result<CommandRegistry<ShellSender>, commandeer::RegistrationError> {
    CommandRegistry::builder()
        .command(
            CommandNode::builder(["help", "?"])
                .usage("[page]")
                .desc("Lists commands")
                .max(1)
                .handler(|ctx, sender, locals| {
                    let listing = locals.get_required::<CommandListing>()?;
                    let page = ctx.integer_or(0, 1)? as usize;
                    Paginator::new("Commands", |(name, desc): &(String, String), _| {
                        format!("/{name}: {desc}")
                    })
                    .per_page(5)
                    .display(sender, &listing.0, page)
                }),
        )
        .command(
            CommandNode::builder(["give", "i"])
                .usage("<item> [count]")
                .desc("Gives an item")
                .help("Gives the named item. The -q flag suppresses the chat message.")
                .min(1)
                .max(2)
                .flags("q")
                .completing_handler(|ctx, sender: &ShellSender, _locals| {
                    if let Some(suggestion) = ctx.suggestion_context() {
                        if let Some(list) = suggestion
                            .suggest_argument(0, ["apple", "arrow", "bread", "bucket", "stone"])
                        {
                            return Ok(Outcome::Suggestions(list));
                        }
                        return Ok(Outcome::Done);
                    }
                    let item = ctx.get_or(0, "?");
                    let count = ctx.integer_or(1, 1)?;
                    if !ctx.has_flag('q') {
                        sender.send_message(&format!("Gave {count} x {item} to {}", sender.name()));
                    }
                    Ok(Outcome::Done)
                }),
        )
        .command(
            CommandNode::builder(["msg", "tell", "w"])
                .usage("<target> <message...>")
                .desc("Sends a private message")
                .min(2)
                .handler(|ctx, sender: &ShellSender, _locals| {
                    // joined_from keeps the raw spelling past the target, so
                    // quoted fragments arrive as typed.
                    sender.send_message(&format!(
                        "[{} -> {}] {}",
                        sender.name(),
                        ctx.get_or(0, "?"),
                        ctx.joined_from(1),
                    ));
                    Ok(())
                }),
        )
        .command(
            CommandNode::builder(["warp"])
                .desc("Warps around")
                .child(
                    CommandNode::builder(["to"])
                        .usage("<destination>")
                        .min(1)
                        .max(1)
                        .completing_handler(|ctx, sender: &ShellSender, _locals| {
                            if let Some(suggestion) = ctx.suggestion_context() {
                                if let Some(list) =
                                    suggestion.suggest_argument(0, ["home", "spawn", "market"])
                                {
                                    return Ok(Outcome::Suggestions(list));
                                }
                                return Ok(Outcome::Done);
                            }
                            require_interactive(sender)?;
                            sender.send_message(&format!("Warped to {}", ctx.get_or(0, "?")));
                            Ok(Outcome::Done)
                        }),
                )
                .child(
                    CommandNode::builder(["set"])
                        .usage("<name>")
                        .permission("shell.warp.admin")
                        .min(1)
                        .max(1)
                        .handler(|ctx, sender: &ShellSender, _locals| {
                            sender.send_message(&format!("Warp '{}' set", ctx.get_or(0, "?")));
                            Ok(())
                        }),
                ),
        )
        .command(
            CommandNode::builder(["region", "rg"])
                .desc("Region management")
                .child(
                    CommandNode::builder(["claim"])
                        .usage("<name>")
                        .min(1)
                        .max(1)
                        .handler(|ctx, sender: &ShellSender, _locals| {
                            sender.send_message(&format!("Claimed '{}'", ctx.get_or(0, "?")));
                            Ok(())
                        }),
                )
                .child(
                    CommandNode::builder(["flag"])
                        .usage("<name> <flag> <value>")
                        .permission("shell.region.admin")
                        .min(3)
                        .any_flags()
                        .handler(|ctx, sender: &ShellSender, _locals| {
                            sender.send_message(&format!(
                                "Set {} = {} on '{}'",
                                ctx.get_or(1, "?"),
                                ctx.get_or(2, "?"),
                                ctx.get_or(0, "?"),
                            ));
                            Ok(())
                        }),
                ),
        )
        .command(CommandNode::builder(["spawn"]).redirect(["warp", "to", "spawn"]))
        .build()
}

fn dispatch_line(dispatcher: &Dispatcher<ShellSender>, sender: &ShellSender, line: &str) {
    let mut tokens = line.split(' ');
    let Some(command) = tokens.next() else {
        return;
    };
    let args: Vec<String> = tokens.map(str::to_string).collect();

    let mut locals = Locals::new();
    locals.insert(CommandListing(
        dispatcher
            .registry()
            .descriptions()
            .iter()
            .map(|(name, desc)| (name.clone(), desc.clone()))
            .collect(),
    ));

    if command == "complete" {
        let Some((inner, rest)) = args.split_first() else {
            println!("usage: complete <line>");
            return;
        };
        match dispatcher.complete(inner, rest, sender, &mut locals) {
            Some(list) if list.is_empty() => println!("(no completions)"),
            Some(list) => println!("{}", list.join("  ")),
            None => println!("(host default completion)"),
        }
        return;
    }

    match dispatcher.execute(command, &args, sender, &mut locals) {
        Ok(()) => {}
        Err(err) => {
            println!("Error: {err}");
            if let Some(usage) = err.usage_string() {
                println!("{usage}");
            }
            if matches!(err, CommandError::UnknownCommand) {
                println!("Try 'help'.");
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let registry = build_registry()?;
    let dispatcher = Dispatcher::new(registry);
    let sender = ShellSender {
        name: "steve".to_string(),
        op: Cell::new(false),
    };

    println!("cmdsh - type 'help', 'complete <line>', 'op', or 'quit'");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "op" => {
                sender.op.set(!sender.op.get());
                println!("op: {}", sender.op.get());
            }
            _ => dispatch_line(&dispatcher, &sender, line),
        }
    }
    Ok(())
}
