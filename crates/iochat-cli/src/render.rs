//! Line rendering.
//!
//! [`Renderer`] remembers how much of the transcript it has already written
//! and prints only entries appended since its last pass.

use std::io::{self, Write};

use iochat_client::{EntryKind, Session, TranscriptEntry};

/// Writes transcript entries and status lines to an output stream.
pub struct Renderer<W: Write> {
    out: W,
    rendered: usize,
    greeted: bool,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, rendered: 0, greeted: false }
    }

    /// Ask for a display name.
    pub fn prompt_login(&mut self) -> io::Result<()> {
        writeln!(self.out, "Enter your name:")?;
        self.out.flush()
    }

    /// Write everything that changed in `session` since the previous call.
    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        if session.is_authenticated() && !self.greeted {
            writeln!(self.out, "Logged in as {}", session.identity())?;
            self.greeted = true;
        }

        let transcript = session.transcript();
        for entry in transcript.since(self.rendered) {
            writeln!(self.out, "{}", format_entry(entry))?;
        }
        self.rendered = transcript.len();

        self.out.flush()
    }

    /// Write a status line outside the transcript.
    pub fn status(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "** {message} **")?;
        self.out.flush()
    }

    /// Underlying output stream.
    pub fn output(&self) -> &W {
        &self.out
    }
}

/// Format a single transcript entry as one line.
pub fn format_entry(entry: &TranscriptEntry) -> String {
    match entry.kind() {
        EntryKind::Own => format!("> {}", entry.text()),
        EntryKind::Peer => format!("{}: {}", entry.sender_id(), entry.text()),
        EntryKind::JoinAnnouncement => format!("-- {} --", entry.text()),
    }
}
