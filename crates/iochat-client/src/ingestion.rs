//! Event ingestion.
//!
//! [`Ingestion`] subscribes the session to `sMessage` and `sLogin` and holds
//! the release handle for those subscriptions. Dropping it (or calling
//! [`Ingestion::unmount`]) unsubscribes with the exact listeners that were
//! registered, so a remount never leaves duplicate or orphaned listeners
//! behind.

use std::{cell::RefCell, rc::Rc};

use iochat_proto::{ServerEvent, ServerEventKind};

use crate::{Listener, Session, Transport};

/// Mounted subscription folding inbound events into a [`Session`].
///
/// At most one listener per [`ServerEventKind`] while mounted; zero after
/// drop.
pub struct Ingestion<T: Transport> {
    transport: Rc<T>,
    listeners: Vec<(ServerEventKind, Listener)>,
}

impl<T: Transport> Ingestion<T> {
    /// Subscribe `session` to every inbound event kind on `transport`.
    ///
    /// Returns `None` without registering anything if the transport is not
    /// connected.
    pub fn mount(transport: Rc<T>, session: Rc<RefCell<Session>>) -> Option<Self> {
        if !transport.is_connected() {
            tracing::debug!("transport not connected, skipping ingestion mount");
            return None;
        }

        let listeners = ServerEventKind::ALL
            .into_iter()
            .map(|kind| {
                let session = Rc::clone(&session);
                let listener: Listener =
                    Rc::new(move |event: &ServerEvent| session.borrow_mut().ingest(event));
                transport.subscribe(kind, Rc::clone(&listener));
                (kind, listener)
            })
            .collect();

        tracing::debug!("ingestion mounted");
        Some(Self { transport, listeners })
    }

    /// Event kinds this ingestion is subscribed to.
    pub fn kinds(&self) -> impl Iterator<Item = ServerEventKind> + '_ {
        self.listeners.iter().map(|(kind, _)| *kind)
    }

    /// Release the subscriptions now.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<T: Transport> Drop for Ingestion<T> {
    fn drop(&mut self) {
        for (kind, listener) in self.listeners.drain(..) {
            if !self.transport.unsubscribe(kind, &listener) {
                tracing::warn!(%kind, "listener already removed from transport");
            }
        }
        tracing::debug!("ingestion unmounted");
    }
}
