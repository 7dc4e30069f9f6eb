//! Property-based tests for the Session state machine.
//!
//! Tests verify that transcript invariants hold under arbitrary interleavings
//! of user actions and server broadcasts.

use iochat_client::{
    AuthState, ChatMessage, EntryKind, ServerEvent, Session, SessionEvent, TranscriptEntry,
};
use proptest::prelude::*;

/// Generate a server broadcast.
fn server_event_strategy() -> impl Strategy<Value = ServerEvent> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(ServerEvent::Login),
        ("[a-z ]{0,16}", "[a-z]{0,8}")
            .prop_map(|(data, id)| ServerEvent::Message(ChatMessage::new(data, id))),
    ]
}

/// Generate any session input.
fn event_strategy() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        4 => server_event_strategy().prop_map(SessionEvent::Inbound),
        2 => "[a-z ]{0,16}".prop_map(SessionEvent::DraftEdited),
        1 => "[a-z]{0,8}".prop_map(|name| SessionEvent::SubmitLogin { name }),
        2 => Just(SessionEvent::SubmitMessage),
    ]
}

/// Entry Ingestion derives from a server event.
fn expected_entry(event: &ServerEvent) -> TranscriptEntry {
    match event {
        ServerEvent::Login(name) => TranscriptEntry::join_announcement(name),
        ServerEvent::Message(ChatMessage { data, id }) => TranscriptEntry::peer(data, id),
    }
}

proptest! {
    #[test]
    fn prop_transcript_is_append_only(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut session = Session::new();
        let mut previous: Vec<TranscriptEntry> = Vec::new();

        for event in events {
            let _ = session.handle(event);
            let current = session.transcript().entries();

            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current[..previous.len()], previous.as_slice());
            previous = current.to_vec();
        }
    }

    #[test]
    fn prop_inbound_order_is_preserved(
        events in prop::collection::vec(server_event_strategy(), 0..40),
    ) {
        let mut session = Session::new();
        for event in &events {
            let _ = session.handle(SessionEvent::Inbound(event.clone()));
        }

        let expected: Vec<TranscriptEntry> = events.iter().map(expected_entry).collect();
        prop_assert_eq!(session.transcript().entries(), expected.as_slice());
    }

    #[test]
    fn prop_reordering_input_reorders_transcript(
        events in prop::collection::vec(server_event_strategy(), 1..20),
    ) {
        let mut forward = Session::new();
        let mut backward = Session::new();
        for event in &events {
            forward.ingest(event);
        }
        for event in events.iter().rev() {
            backward.ingest(event);
        }

        let reversed: Vec<TranscriptEntry> =
            backward.transcript().entries().iter().rev().cloned().collect();
        prop_assert_eq!(forward.transcript().entries(), reversed.as_slice());
    }

    #[test]
    fn prop_authentication_never_reverts(events in prop::collection::vec(event_strategy(), 0..60)) {
        let mut session = Session::new();
        let mut seen_login = false;

        for event in events {
            let is_login = matches!(event, SessionEvent::SubmitLogin { .. });
            let _ = session.handle(event);
            seen_login |= is_login;

            let expected =
                if seen_login { AuthState::Authenticated } else { AuthState::Unauthenticated };
            prop_assert_eq!(session.auth_state(), expected);
        }
    }

    #[test]
    fn prop_join_announcement_ignores_auth_state(name in "[a-zA-Z0-9 ]{0,12}", logged_in in any::<bool>()) {
        let mut session = Session::new();
        if logged_in {
            let _ = session.handle(SessionEvent::SubmitLogin { name: "alice".into() });
        }
        let _ = session.handle(SessionEvent::Inbound(ServerEvent::Login(name.clone())));

        let last = session.transcript().entries().last().cloned();
        prop_assert_eq!(last, Some(TranscriptEntry::join_announcement(&name)));
        let expected_text = format!("{name} joins the chat");
        let first = session.transcript().get(0).map(TranscriptEntry::text);
        prop_assert_eq!(first, Some(expected_text.as_str()));
    }

    #[test]
    fn prop_own_entries_match_identity(
        name in "[a-z]{0,8}",
        drafts in prop::collection::vec("[a-z]{0,10}", 0..10),
    ) {
        let mut session = Session::new();
        let _ = session.handle(SessionEvent::SubmitLogin { name: name.clone() });
        for draft in &drafts {
            let _ = session.handle(SessionEvent::DraftEdited(draft.clone()));
            let _ = session.handle(SessionEvent::SubmitMessage);
        }

        prop_assert_eq!(session.transcript().len(), drafts.len());
        for (entry, draft) in session.transcript().iter().zip(&drafts) {
            prop_assert_eq!(entry.kind(), EntryKind::Own);
            prop_assert_eq!(entry.sender_id(), name.as_str());
            prop_assert_eq!(entry.text(), draft.as_str());
        }
    }
}
