//! Transport seam.
//!
//! The [`Transport`] trait is the only way the session core reaches the
//! connection: subscribe and unsubscribe listeners by inbound event kind, and
//! emit outbound events. Methods take `&self` over interior mutability; every
//! handler runs to completion on one event loop.
//!
//! [`EventBus`] is the in-process implementation. It keeps the listener
//! registry and queues emitted events in an outbox that the runtime flushes to
//! the real connection.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use iochat_proto::{ClientEvent, ServerEvent, ServerEventKind};

/// Callback invoked for each inbound event of the kind it was registered for.
///
/// Listener identity is the `Rc` allocation: unsubscribing requires the same
/// `Rc` (or a clone of it) that was subscribed.
pub type Listener = Rc<dyn Fn(&ServerEvent)>;

/// Connection primitives used by the session core.
pub trait Transport {
    /// True while the connection is usable.
    ///
    /// Callers check this before every other call; operations on a
    /// disconnected transport are skipped rather than reported.
    fn is_connected(&self) -> bool;

    /// Register `listener` for events of `kind`.
    fn subscribe(&self, kind: ServerEventKind, listener: Listener);

    /// Remove a previously registered listener.
    ///
    /// Returns `false` if `listener` is not registered for `kind`, which
    /// includes passing a different closure with the same behavior.
    fn unsubscribe(&self, kind: ServerEventKind, listener: &Listener) -> bool;

    /// Send an event to the server.
    fn emit(&self, event: ClientEvent);
}

/// In-process transport: listener registry plus outbound queue.
pub struct EventBus {
    connected: Cell<bool>,
    listeners: RefCell<BTreeMap<ServerEventKind, Vec<Listener>>>,
    outgoing: RefCell<Vec<ClientEvent>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a connected bus with no listeners.
    pub fn new() -> Self {
        Self {
            connected: Cell::new(true),
            listeners: RefCell::new(BTreeMap::new()),
            outgoing: RefCell::new(Vec::new()),
        }
    }

    /// Mark the underlying connection as up or down.
    pub fn set_connected(&self, connected: bool) {
        if self.connected.replace(connected) != connected {
            tracing::info!(connected, "transport connection state changed");
        }
    }

    /// Deliver an inbound event to every listener registered for its kind.
    ///
    /// Listeners run in registration order. The registry is snapshotted first,
    /// so a listener may subscribe or unsubscribe while being dispatched.
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &ServerEvent) -> usize {
        let listeners: Vec<Listener> =
            self.listeners.borrow().get(&event.kind()).cloned().unwrap_or_default();

        if listeners.is_empty() {
            tracing::debug!(kind = %event.kind(), "no listeners for server event");
        }
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    /// Take emitted events not yet sent to the server.
    pub fn take_outgoing(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.outgoing.borrow_mut())
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: ServerEventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }
}

impl Transport for EventBus {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn subscribe(&self, kind: ServerEventKind, listener: Listener) {
        self.listeners.borrow_mut().entry(kind).or_default().push(listener);
    }

    fn unsubscribe(&self, kind: ServerEventKind, listener: &Listener) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(registered) = listeners.get_mut(&kind) else {
            return false;
        };
        let Some(index) = registered.iter().position(|l| Rc::ptr_eq(l, listener)) else {
            return false;
        };
        registered.remove(index);
        if registered.is_empty() {
            listeners.remove(&kind);
        }
        true
    }

    fn emit(&self, event: ClientEvent) {
        self.outgoing.borrow_mut().push(event);
    }
}
