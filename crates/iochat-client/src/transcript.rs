//! Ordered chat transcript.
//!
//! The transcript is append-only: insertion order is display order is arrival
//! order. Entries expose read accessors only, so nothing outside this module
//! can change an entry once it has been pushed.

use std::slice;

/// Rendering class of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Sent by this client (optimistic local echo).
    Own,
    /// Received from the server broadcast.
    Peer,
    /// Synthesized when someone joins the room.
    JoinAnnouncement,
}

/// A single line in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    text: String,
    kind: EntryKind,
    sender_id: String,
}

impl TranscriptEntry {
    /// Message typed and sent locally by `sender_id`.
    pub fn own(text: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self { text: text.into(), kind: EntryKind::Own, sender_id: sender_id.into() }
    }

    /// Message broadcast by the server on behalf of `sender_id`.
    pub fn peer(text: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self { text: text.into(), kind: EntryKind::Peer, sender_id: sender_id.into() }
    }

    /// `"{name} joins the chat"`, with no sender.
    pub fn join_announcement(name: &str) -> Self {
        Self {
            text: format!("{name} joins the chat"),
            kind: EntryKind::JoinAnnouncement,
            sender_id: String::new(),
        }
    }

    /// Message body or announcement text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rendering class.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Display name of the author. Empty for join announcements.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }
}

/// Append-only sequence of [`TranscriptEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end. Never fails, never bounded.
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Entry at `index`. `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&TranscriptEntry> {
        self.entries.get(index)
    }

    /// Entries appended at or after `index`.
    ///
    /// Presentation uses this to render only what changed since its last pass.
    pub fn since(&self, index: usize) -> &[TranscriptEntry] {
        self.entries.get(index..).unwrap_or_default()
    }

    /// Iterate entries in display order.
    pub fn iter(&self) -> slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
