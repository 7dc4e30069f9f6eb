//! Simulated broadcast server.
//!
//! `SimServer` plays the server side of the protocol for any number of
//! in-process [`SimClient`]s:
//!
//! - `login(name)` is answered with `sLogin(name)` to every connected client,
//!   the sender included.
//! - `message(m)` is answered with `sMessage(m)` to every connected client,
//!   the sender included.
//!
//! Every event crosses the simulated wire as an encoded packet. Each client's
//! inbox is FIFO, like a stream socket; the order in which different clients'
//! inboxes drain is chosen by a seeded RNG so interleavings are reproducible.
//!
//! This server is designed for test-driven usage where tests explicitly drive
//! pumping and delivery rather than having it run autonomously.

use std::collections::VecDeque;

use iochat_proto::{ClientEvent, ServerEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::SimClient;

/// Index of a client connected to a [`SimServer`].
pub type ClientId = usize;

/// Per-client server-side state.
struct Seat {
    /// The client itself.
    client: SimClient,
    /// Encoded packets awaiting delivery, oldest first.
    inbox: VecDeque<Vec<u8>>,
    /// `false` once the server has dropped this client.
    connected: bool,
}

/// In-process broadcast server.
pub struct SimServer {
    seats: Vec<Seat>,
    rng: ChaCha8Rng,
    /// Every event broadcast, in broadcast order.
    broadcasts: Vec<ServerEvent>,
}

impl Default for SimServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimServer {
    /// Create a server with a fixed default seed.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create a server whose delivery interleaving is driven by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self { seats: Vec::new(), rng: ChaCha8Rng::seed_from_u64(seed), broadcasts: Vec::new() }
    }

    /// Connect a new client and return its ID.
    pub fn connect(&mut self) -> ClientId {
        let id = self.seats.len();
        self.seats.push(Seat { client: SimClient::new(), inbox: VecDeque::new(), connected: true });
        tracing::debug!(client = id, "client connected");
        id
    }

    /// Drop a client: pending packets are discarded and its transport is
    /// marked disconnected.
    pub fn disconnect(&mut self, id: ClientId) {
        if let Some(seat) = self.seats.get_mut(id) {
            seat.connected = false;
            seat.inbox.clear();
            seat.client.disconnect();
            tracing::debug!(client = id, "client disconnected");
        }
    }

    /// Client with the given ID.
    pub fn client(&self, id: ClientId) -> Option<&SimClient> {
        self.seats.get(id).map(|seat| &seat.client)
    }

    /// Mutable client with the given ID.
    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut SimClient> {
        self.seats.get_mut(id).map(|seat| &mut seat.client)
    }

    /// IDs of every client ever connected.
    pub fn client_ids(&self) -> impl Iterator<Item = ClientId> {
        0..self.seats.len()
    }

    /// Events broadcast so far, in order.
    pub fn broadcasts(&self) -> &[ServerEvent] {
        &self.broadcasts
    }

    /// Packets waiting in a client's inbox.
    pub fn pending(&self, id: ClientId) -> usize {
        self.seats.get(id).map_or(0, |seat| seat.inbox.len())
    }

    /// Collect emitted events from every client (in ID order) and broadcast
    /// the server's responses. Returns the number of packets processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        for id in 0..self.seats.len() {
            let packets: Vec<Vec<u8>> = match self.seats.get(id) {
                Some(seat) if seat.connected => seat
                    .client
                    .bus()
                    .take_outgoing()
                    .iter()
                    .filter_map(|event| match event.encode() {
                        Ok(bytes) => Some(bytes),
                        Err(e) => {
                            tracing::warn!(client = id, error = %e, "packet failed to encode");
                            None
                        },
                    })
                    .collect(),
                _ => continue,
            };

            for packet in packets {
                self.handle_packet(id, &packet);
                processed += 1;
            }
        }
        processed
    }

    /// Deliver the oldest pending packet to `id`. Returns `false` if none.
    pub fn deliver_next(&mut self, id: ClientId) -> bool {
        let Some(seat) = self.seats.get_mut(id) else {
            return false;
        };
        let Some(packet) = seat.inbox.pop_front() else {
            return false;
        };

        match ServerEvent::decode(&packet) {
            Ok(event) => {
                seat.client.receive(&event);
            },
            Err(e) => tracing::warn!(client = id, error = %e, "server packet failed to decode"),
        }
        true
    }

    /// Deliver one packet to a randomly chosen client with pending packets.
    /// Returns `false` if every inbox is empty.
    pub fn deliver_random(&mut self) -> bool {
        let ready: Vec<ClientId> =
            (0..self.seats.len()).filter(|&id| self.pending(id) > 0).collect();
        if ready.is_empty() {
            return false;
        }
        let pick = ready[self.rng.gen_range(0..ready.len())];
        self.deliver_next(pick)
    }

    /// Pump and deliver in seeded random order until nothing is left.
    pub fn run_until_idle(&mut self) {
        loop {
            let pumped = self.pump();
            let delivered = self.deliver_random();
            if pumped == 0 && !delivered {
                break;
            }
        }
    }

    /// Pump and then drain every inbox in ID order.
    pub fn run_in_order(&mut self) {
        while self.pump() > 0 || self.seats.iter().any(|seat| !seat.inbox.is_empty()) {
            for id in 0..self.seats.len() {
                while self.deliver_next(id) {}
            }
        }
    }

    /// Apply the server's response to one client packet.
    fn handle_packet(&mut self, from: ClientId, packet: &[u8]) {
        match ClientEvent::decode(packet) {
            Ok(ClientEvent::Login(name)) => {
                tracing::debug!(client = from, name = %name, "login");
                self.broadcast(ServerEvent::Login(name));
            },
            Ok(ClientEvent::Message(message)) => self.broadcast(ServerEvent::Message(message)),
            Err(e) => tracing::warn!(client = from, error = %e, "dropping client packet"),
        }
    }

    /// Queue `event` for every connected client.
    fn broadcast(&mut self, event: ServerEvent) {
        match event.encode() {
            Ok(packet) => {
                for seat in self.seats.iter_mut().filter(|seat| seat.connected) {
                    seat.inbox.push_back(packet.clone());
                }
                self.broadcasts.push(event);
            },
            Err(e) => tracing::warn!(error = %e, "broadcast failed to encode"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use iochat_client::TranscriptEntry;

    use super::*;

    #[test]
    fn login_is_broadcast_to_sender() {
        let mut server = SimServer::new();
        let alice = server.connect();

        let _ = server.client(alice).map(|c| c.login("alice"));
        server.run_in_order();

        let transcript = server.client(alice).unwrap().transcript();
        assert_eq!(transcript, vec![TranscriptEntry::join_announcement("alice")]);
    }

    #[test]
    fn disconnected_client_receives_nothing() {
        let mut server = SimServer::new();
        let alice = server.connect();
        let bob = server.connect();
        server.disconnect(bob);

        let _ = server.client(alice).map(|c| c.login("alice"));
        server.run_in_order();

        assert_eq!(server.pending(bob), 0);
        assert!(server.client(bob).is_some_and(|c| c.transcript().is_empty()));
    }
}
