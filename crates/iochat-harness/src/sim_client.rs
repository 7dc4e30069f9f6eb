//! Fully wired simulated client.

use std::{cell::RefCell, rc::Rc};

use iochat_client::{
    Dispatcher, EventBus, Ingestion, ServerEvent, Session, SessionAction, TranscriptEntry,
};

/// A client wired the way a runtime wires it: one bus, one session, one
/// mounted ingestion, one dispatcher.
pub struct SimClient {
    bus: Rc<EventBus>,
    dispatcher: Dispatcher<EventBus>,
    ingestion: Option<Ingestion<EventBus>>,
}

impl Default for SimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClient {
    /// Create a connected client with ingestion mounted.
    pub fn new() -> Self {
        let bus = Rc::new(EventBus::new());
        let session = Rc::new(RefCell::new(Session::new()));
        let ingestion = Ingestion::mount(Rc::clone(&bus), Rc::clone(&session));
        let dispatcher = Dispatcher::new(Rc::clone(&bus), session);
        Self { bus, dispatcher, ingestion }
    }

    /// Submit the login form.
    pub fn login(&self, name: &str) -> Vec<SessionAction> {
        self.dispatcher.submit_login(name)
    }

    /// Type `text` into the draft and submit it.
    pub fn send(&self, text: &str) -> Vec<SessionAction> {
        let _ = self.dispatcher.edit_draft(text);
        self.dispatcher.submit_message()
    }

    /// Deliver an inbound event through the bus. Returns listeners invoked.
    pub fn receive(&self, event: &ServerEvent) -> usize {
        self.bus.dispatch(event)
    }

    /// Drop the ingestion subscriptions.
    pub fn unmount(&mut self) {
        if let Some(ingestion) = self.ingestion.take() {
            ingestion.unmount();
        }
    }

    /// Mark the connection down. Later emits are dropped.
    pub fn disconnect(&self) {
        self.bus.set_connected(false);
    }

    /// True while ingestion subscriptions are held.
    pub fn is_mounted(&self) -> bool {
        self.ingestion.is_some()
    }

    /// The client's transport.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Display name. Empty before login.
    pub fn identity(&self) -> String {
        self.dispatcher.session().borrow().identity().to_owned()
    }

    /// True once a login has been submitted.
    pub fn is_authenticated(&self) -> bool {
        self.dispatcher.session().borrow().is_authenticated()
    }

    /// Copy of the transcript in display order.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.dispatcher.session().borrow().transcript().entries().to_vec()
    }
}
