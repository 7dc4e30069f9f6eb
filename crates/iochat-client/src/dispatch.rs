//! Action dispatch.
//!
//! [`Dispatcher`] turns user actions into [`SessionEvent`]s, runs them through
//! the [`Session`], and executes the resulting [`SessionAction::Emit`]s on the
//! [`Transport`]. Local state always changes, even if the transport is down:
//! login is optimistic and sent messages are echoed into the transcript
//! immediately.

use std::{cell::RefCell, rc::Rc};

use crate::{Session, SessionAction, SessionEvent, Transport};

/// Executes user actions against a session and a transport.
pub struct Dispatcher<T: Transport> {
    transport: Rc<T>,
    session: Rc<RefCell<Session>>,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher sharing `session` and `transport`.
    pub fn new(transport: Rc<T>, session: Rc<RefCell<Session>>) -> Self {
        Self { transport, session }
    }

    /// Submit the login form with `name`.
    pub fn submit_login(&self, name: impl Into<String>) -> Vec<SessionAction> {
        self.dispatch(SessionEvent::SubmitLogin { name: name.into() })
    }

    /// Replace the message draft.
    pub fn edit_draft(&self, text: impl Into<String>) -> Vec<SessionAction> {
        self.dispatch(SessionEvent::DraftEdited(text.into()))
    }

    /// Send the current draft.
    ///
    /// Does not check authentication: the message form is only reachable after
    /// login.
    pub fn submit_message(&self) -> Vec<SessionAction> {
        self.dispatch(SessionEvent::SubmitMessage)
    }

    /// Process a session event, emit its outbound events, and return the
    /// remaining actions for presentation.
    pub fn dispatch(&self, event: SessionEvent) -> Vec<SessionAction> {
        let actions = self.session.borrow_mut().handle(event);

        let mut remaining = Vec::new();
        for action in actions {
            match action {
                SessionAction::Emit(event) => {
                    if self.transport.is_connected() {
                        self.transport.emit(event);
                    } else {
                        tracing::debug!(
                            event = event.name(),
                            "transport disconnected, dropping emit"
                        );
                    }
                },
                SessionAction::Render => remaining.push(action),
            }
        }
        remaining
    }

    /// Shared session handle.
    pub fn session(&self) -> &Rc<RefCell<Session>> {
        &self.session
    }
}
