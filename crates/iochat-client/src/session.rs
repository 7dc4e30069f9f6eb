//! Session state machine.
//!
//! [`Session`] owns the identity, the authentication flag, the pending message
//! draft, and the transcript. It is a pure state machine: it consumes
//! [`SessionEvent`] inputs and produces [`SessionAction`] instructions. It
//! never touches a connection; [`crate::Dispatcher`] executes the emitted
//! events against a [`crate::Transport`].
//!
//! # State machine
//!
//! ```text
//! [Unauthenticated] --SubmitLogin--> [Authenticated]
//! ```
//!
//! There is no way back. Inbound events are folded into the transcript in both
//! states.

use iochat_proto::{ChatMessage, ClientEvent, ServerEvent};

use crate::{SessionError, Transcript, TranscriptEntry};

/// Authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No login submitted yet.
    #[default]
    Unauthenticated,
    /// Login submitted. Terminal.
    Authenticated,
}

/// Events processed by the Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Event broadcast by the server.
    Inbound(ServerEvent),

    /// Message input changed.
    DraftEdited(String),

    /// User submitted the login form.
    SubmitLogin {
        /// Candidate display name. May be empty.
        name: String,
    },

    /// User submitted the current draft as a chat message.
    SubmitMessage,
}

/// Actions produced by the Session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Emit an event to the server.
    Emit(ClientEvent),

    /// Observable state changed; presentation should redraw.
    Render,
}

/// Single-room chat session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Display name chosen at login. Empty until then.
    identity: String,
    /// Authentication flag.
    auth: AuthState,
    /// Pending message input.
    draft: String,
    /// Ordered chat history.
    transcript: Transcript,
}

impl Session {
    /// Create an unauthenticated session with an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Inbound(event) => {
                self.ingest(&event);
                vec![SessionAction::Render]
            },
            SessionEvent::DraftEdited(text) => {
                self.set_draft(text);
                vec![SessionAction::Render]
            },
            SessionEvent::SubmitLogin { name } => match self.login(name.clone()) {
                Ok(()) => {
                    vec![SessionAction::Emit(ClientEvent::Login(name)), SessionAction::Render]
                },
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring login submission");
                    vec![]
                },
            },
            SessionEvent::SubmitMessage => {
                let text = std::mem::take(&mut self.draft);
                let message = ChatMessage::new(text.clone(), self.identity.clone());
                self.append_entry(TranscriptEntry::own(text, self.identity.clone()));
                vec![SessionAction::Emit(ClientEvent::Message(message)), SessionAction::Render]
            },
        }
    }

    /// Authenticate as `name`.
    ///
    /// Any string is accepted, including the empty string. Fails only if the
    /// session is already authenticated, in which case nothing changes.
    pub fn login(&mut self, name: String) -> Result<(), SessionError> {
        if self.auth == AuthState::Authenticated {
            return Err(SessionError::AlreadyAuthenticated { identity: self.identity.clone() });
        }
        self.identity = name;
        self.auth = AuthState::Authenticated;
        Ok(())
    }

    /// Fold a server broadcast into the transcript.
    ///
    /// Unconditional: applies before login too, and does not filter echoes of
    /// our own messages or our own join.
    pub fn ingest(&mut self, event: &ServerEvent) {
        tracing::debug!(kind = %event.kind(), "ingesting server event");
        let entry = match event {
            ServerEvent::Message(ChatMessage { data, id }) => TranscriptEntry::peer(data, id),
            ServerEvent::Login(name) => TranscriptEntry::join_announcement(name),
        };
        self.append_entry(entry);
    }

    /// Append an entry to the transcript.
    pub fn append_entry(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    /// Replace the pending message input.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Display name. Empty before login.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Authentication state.
    pub fn auth_state(&self) -> AuthState {
        self.auth
    }

    /// True once a login has been submitted.
    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthState::Authenticated
    }

    /// Pending message input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Chat history in display order.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
