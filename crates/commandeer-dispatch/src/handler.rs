//! Handler types and per-dispatch state.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use commandeer_context::CommandContext;

use crate::error::CommandError;

/// What a completion-aware handler produced.
///
/// Suggestion handling is an explicit result variant rather than a non-local
/// exit: the engine matches on it in completion mode and treats a
/// `Suggestions` return outside completion mode as an unexpected error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command body ran to completion.
    Done,
    /// Completions proposed for the line being typed.
    Suggestions(Vec<String>),
}

/// A plain handler: runs the command body, cannot produce completions.
pub type HandlerFn<S> =
    Box<dyn Fn(&CommandContext, &S, &mut Locals) -> Result<(), CommandError> + Send + Sync>;

/// A completion-aware handler: may return [`Outcome::Suggestions`] when the
/// context is in completion mode.
pub type CompletingHandlerFn<S> =
    Box<dyn Fn(&CommandContext, &S, &mut Locals) -> Result<Outcome, CommandError> + Send + Sync>;

/// The handler attached to a command node.
///
/// The two shapes decide completion behavior at the leaf: completing a node
/// whose handler is `Plain` defers to the host's default completion, while a
/// `Completing` handler is invoked and its suggestions (possibly none) are
/// authoritative.
pub(crate) enum Handler<S> {
    Plain(HandlerFn<S>),
    Completing(CompletingHandlerFn<S>),
}

impl<S> Handler<S> {
    pub(crate) fn supports_completion(&self) -> bool {
        matches!(self, Self::Completing(_))
    }

    pub(crate) fn invoke(
        &self,
        ctx: &CommandContext,
        sender: &S,
        locals: &mut Locals,
    ) -> Result<Outcome, CommandError> {
        match self {
            Self::Plain(f) => f(ctx, sender, locals).map(|()| Outcome::Done),
            Self::Completing(f) => f(ctx, sender, locals),
        }
    }
}

/// Type-keyed container for host-supplied extra handler state.
///
/// The host passes a `Locals` into each `execute`/`complete` call; handlers
/// read and write it by type. One value per type; inserting again replaces.
#[derive(Default)]
pub struct Locals {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of that type if any.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Like [`Self::get`], but failing with an error a handler can propagate
    /// with `?`.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "local missing: type {} not supplied by the host",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Locals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locals")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);
    #[derive(Debug)]
    struct Label(String);

    #[test]
    fn locals_insert_get_remove() {
        let mut locals = Locals::new();
        assert!(locals.is_empty());

        locals.insert(Counter(1));
        locals.insert(Label("a".into()));
        assert_eq!(locals.len(), 2);
        assert_eq!(locals.get::<Counter>().unwrap().0, 1);
        assert!(locals.contains::<Label>());

        if let Some(counter) = locals.get_mut::<Counter>() {
            counter.0 += 1;
        }
        assert_eq!(locals.get::<Counter>().unwrap().0, 2);

        let old = locals.insert(Counter(9)).unwrap();
        assert_eq!(old.0, 2);

        let removed = locals.remove::<Label>().unwrap();
        assert_eq!(removed.0, "a");
        assert!(!locals.contains::<Label>());
    }

    #[test]
    fn locals_get_required() {
        let mut locals = Locals::new();
        locals.insert(Counter(7));
        assert!(locals.get_required::<Counter>().is_ok());

        let err = locals.get_required::<Label>().unwrap_err();
        assert!(err.to_string().contains("local missing"));
    }

    #[test]
    fn plain_handler_maps_to_done() {
        let handler: Handler<()> = Handler::Plain(Box::new(|_, _, _| Ok(())));
        assert!(!handler.supports_completion());

        let ctx = commandeer_context::CommandContext::parse(
            vec!["cmd".to_string()],
            &Default::default(),
            false,
        )
        .unwrap();
        let out = handler.invoke(&ctx, &(), &mut Locals::new()).unwrap();
        assert_eq!(out, Outcome::Done);
    }
}
