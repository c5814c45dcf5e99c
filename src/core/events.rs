//! Synchronous subscriber registry.
//!
//! An [`EventRegistry`] holds an ordered list of handlers and calls each of them in
//! subscription order when [`EventRegistry::emit`] runs. Emitting with no subscribers
//! iterates an empty list and does nothing.
//!
//! The handler list is snapshotted before dispatch, so a handler may subscribe,
//! unsubscribe, or re-enter whatever emitted the event without hitting a `RefCell`
//! borrow conflict. Changes made during dispatch apply from the next `emit`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to remove the handler later.
///
/// Ids are unique per thread, so an id from one registry never matches a handler in
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

thread_local! {
    static NEXT_SUBSCRIPTION: Cell<u64> = const { Cell::new(0) };
}

impl SubscriptionId {
    fn next() -> Self {
        NEXT_SUBSCRIPTION.with(|next| {
            let id = next.get();
            next.set(id + 1);
            SubscriptionId(id)
        })
    }
}

type Handler<A> = Rc<dyn Fn(&A)>;

pub struct EventRegistry<A> {
    handlers: RefCell<Vec<(SubscriptionId, Handler<A>)>>,
}

impl<A> EventRegistry<A> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&A) + 'static,
    {
        let id = SubscriptionId::next();
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Returns `false` when the id was not (or no longer) registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn emit(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(args);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Default for EventRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}
