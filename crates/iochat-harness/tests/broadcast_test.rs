//! End-to-end tests against the simulated broadcast server.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Each client's transcript holds exactly the expected entries, in order
//! - Remote entries agree across clients once all inboxes drain

use iochat_client::{EntryKind, TranscriptEntry};
use iochat_harness::{ClientId, SimServer, SystemSnapshot};
use iochat_proto::{ChatMessage, ServerEvent};

/// Transcript of a client.
fn transcript(server: &SimServer, id: ClientId) -> Vec<TranscriptEntry> {
    server.client(id).unwrap().transcript()
}

/// Log `id` in as `name`.
fn login(server: &SimServer, id: ClientId, name: &str) {
    let _ = server.client(id).map(|client| client.login(name));
}

/// Send `text` from `id`.
fn send(server: &SimServer, id: ClientId, text: &str) {
    let _ = server.client(id).map(|client| client.send(text));
}

#[test]
fn sender_sees_own_message_twice() {
    let mut server = SimServer::new();
    let alice = server.connect();

    login(&server, alice, "alice");
    server.run_in_order();
    send(&server, alice, "hi");
    assert_eq!(transcript(&server, alice).last(), Some(&TranscriptEntry::own("hi", "alice")));

    server.run_in_order();

    assert_eq!(transcript(&server, alice), vec![
        TranscriptEntry::join_announcement("alice"),
        TranscriptEntry::own("hi", "alice"),
        TranscriptEntry::peer("hi", "alice"),
    ]);
}

#[test]
fn two_clients_chat() {
    let mut server = SimServer::new();
    let alice = server.connect();
    let bob = server.connect();

    login(&server, alice, "alice");
    server.run_in_order();
    login(&server, bob, "bob");
    server.run_in_order();
    send(&server, bob, "hey");
    server.run_in_order();

    assert_eq!(transcript(&server, alice), vec![
        TranscriptEntry::join_announcement("alice"),
        TranscriptEntry::join_announcement("bob"),
        TranscriptEntry::peer("hey", "bob"),
    ]);
    assert_eq!(transcript(&server, bob), vec![
        TranscriptEntry::join_announcement("alice"),
        TranscriptEntry::join_announcement("bob"),
        TranscriptEntry::own("hey", "bob"),
        TranscriptEntry::peer("hey", "bob"),
    ]);
}

#[test]
fn observer_sees_chat_without_logging_in() {
    let mut server = SimServer::new();
    let alice = server.connect();
    let lurker = server.connect();

    login(&server, alice, "alice");
    send(&server, alice, "hello?");
    server.run_in_order();

    assert!(server.client(lurker).is_some_and(|c| !c.is_authenticated()));
    assert_eq!(transcript(&server, lurker), vec![
        TranscriptEntry::join_announcement("alice"),
        TranscriptEntry::peer("hello?", "alice"),
    ]);
}

#[test]
fn unmounted_client_stops_recording() {
    let mut server = SimServer::new();
    let alice = server.connect();
    let bob = server.connect();

    login(&server, alice, "alice");
    server.run_in_order();
    if let Some(client) = server.client_mut(bob) {
        client.unmount();
    }
    send(&server, alice, "still there?");
    server.run_in_order();

    assert_eq!(transcript(&server, bob), vec![TranscriptEntry::join_announcement("alice")]);
    assert!(server.client(bob).is_some_and(|c| !c.is_mounted()));
}

#[test]
fn disconnected_sender_keeps_local_echo_only() {
    let mut server = SimServer::new();
    let alice = server.connect();
    let bob = server.connect();

    login(&server, alice, "alice");
    server.run_in_order();
    server.disconnect(alice);
    send(&server, alice, "into the void");
    server.run_in_order();

    let last = transcript(&server, alice).last().cloned();
    assert_eq!(last, Some(TranscriptEntry::own("into the void", "alice")));
    assert_eq!(transcript(&server, bob), vec![TranscriptEntry::join_announcement("alice")]);
    assert_eq!(server.broadcasts(), [ServerEvent::Login("alice".into())]);
}

#[test]
fn remote_entries_converge_under_random_delivery() {
    let mut server = SimServer::with_seed(7);
    let ids: Vec<ClientId> = (0..3).map(|_| server.connect()).collect();

    for (n, &id) in ids.iter().enumerate() {
        login(&server, id, &format!("user{n}"));
    }
    for round in 0..3 {
        for &id in &ids {
            send(&server, id, &format!("round {round}"));
        }
    }
    server.run_until_idle();

    let snapshot = SystemSnapshot::capture(&server);
    let views: Vec<_> = snapshot.clients.iter().map(|c| c.remote_entries()).collect();
    assert!(views.windows(2).all(|pair| pair[0] == pair[1]));

    let expected: Vec<TranscriptEntry> = server
        .broadcasts()
        .iter()
        .map(|event| match event {
            ServerEvent::Login(name) => TranscriptEntry::join_announcement(name),
            ServerEvent::Message(ChatMessage { data, id }) => TranscriptEntry::peer(data, id),
        })
        .collect();
    let first: Vec<TranscriptEntry> = views[0].iter().map(|&entry| entry.clone()).collect();
    assert_eq!(first, expected);

    for client in &snapshot.clients {
        let own = client.transcript.iter().filter(|e| e.kind() == EntryKind::Own).count();
        assert_eq!(own, 3);
    }
}
