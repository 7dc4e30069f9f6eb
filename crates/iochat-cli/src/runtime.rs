//! Async runtime
//!
//! Event loop that feeds stdin lines and server events into the session core
//! and flushes the resulting emits to the server. Uses `tokio::select!` to
//! wait on both sources; the core itself stays single-threaded and
//! synchronous, so every step runs to completion before the next one starts.

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
    time::Duration,
};

use iochat_client::{
    Dispatcher, EventBus, Ingestion, ServerEvent, Session,
    tcp::{self, Connection, TransportError},
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::Renderer;

/// How long shutdown waits for queued events to reach the server.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from stdin or stdout.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Drives one chat session against one server connection.
pub struct Runtime<W: Write> {
    bus: Rc<EventBus>,
    dispatcher: Dispatcher<EventBus>,
    ingestion: Option<Ingestion<EventBus>>,
    connection: Option<Connection>,
    renderer: Renderer<W>,
}

impl<W: Write> Runtime<W> {
    /// Connect to `server_addr` and mount a fresh session on the connection.
    pub async fn connect(server_addr: &str, out: W) -> Result<Self, RuntimeError> {
        let connection = tcp::connect(server_addr).await?;
        Ok(Self::build(Some(connection), out))
    }

    /// Runtime without a socket.
    ///
    /// The bus reports connected, so emits queue in its outbox instead of
    /// being written anywhere.
    pub fn detached(out: W) -> Self {
        Self::build(None, out)
    }

    fn build(connection: Option<Connection>, out: W) -> Self {
        let bus = Rc::new(EventBus::new());
        let session = Rc::new(RefCell::new(Session::new()));
        let ingestion = Ingestion::mount(Rc::clone(&bus), Rc::clone(&session));
        let dispatcher = Dispatcher::new(Rc::clone(&bus), session);

        Self { bus, dispatcher, ingestion, connection, renderer: Renderer::new(out) }
    }

    /// Run until stdin closes.
    ///
    /// With `name`, logs in before reading any input.
    pub async fn run(&mut self, name: Option<String>) -> Result<(), RuntimeError> {
        self.run_with_input(name, BufReader::new(tokio::io::stdin())).await
    }

    /// Run until `input` reaches EOF, then close the connection once every
    /// submitted event has been written.
    pub async fn run_with_input<R>(
        &mut self,
        name: Option<String>,
        input: R,
    ) -> Result<(), RuntimeError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        match name {
            Some(name) => self.handle_line(name),
            None => self.renderer.prompt_login()?,
        }
        self.flush_outgoing().await?;
        self.render()?;

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(line),
                    None => break,
                },

                event = recv_event(self.connection.as_mut()) => match event {
                    Some(event) => self.handle_server_event(&event),
                    None => self.handle_disconnect()?,
                },
            }

            self.flush_outgoing().await?;
            self.render()?;
        }

        self.shutdown().await;
        Ok(())
    }

    /// Feed one line of user input to the session.
    ///
    /// Before login the line is the display name; afterwards it is a message.
    pub fn handle_line(&mut self, line: String) {
        let authenticated = self.dispatcher.session().borrow().is_authenticated();
        if authenticated {
            self.dispatcher.edit_draft(line);
            self.dispatcher.submit_message();
        } else {
            self.dispatcher.submit_login(line);
        }
    }

    /// Hand a server event to the subscribed listeners.
    pub fn handle_server_event(&mut self, event: &ServerEvent) {
        let delivered = self.bus.dispatch(event);
        if delivered == 0 {
            tracing::debug!(kind = %event.kind(), "no listener for server event");
        }
    }

    /// Mark the connection as lost. Later emits are dropped by the dispatcher.
    fn handle_disconnect(&mut self) -> Result<(), RuntimeError> {
        if let Some(connection) = self.connection.take() {
            connection.stop();
        }
        self.bus.set_connected(false);
        self.renderer.status("disconnected from server")?;
        Ok(())
    }

    async fn flush_outgoing(&mut self) -> Result<(), RuntimeError> {
        let mut closed = false;
        if let Some(connection) = &self.connection {
            for event in self.bus.take_outgoing() {
                if connection.to_server.send(event).await.is_err() {
                    closed = true;
                    break;
                }
            }
        }

        if closed {
            self.handle_disconnect()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let session = self.dispatcher.session().borrow();
        self.renderer.render(&session)
    }

    async fn shutdown(&mut self) {
        if let Some(ingestion) = self.ingestion.take() {
            ingestion.unmount();
        }
        if let Some(connection) = self.connection.take()
            && tokio::time::timeout(CLOSE_TIMEOUT, connection.close()).await.is_err()
        {
            tracing::warn!("timed out flushing events on close");
        }
    }

    /// Event bus shared by the session's listeners and the dispatcher.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Everything rendered so far.
    pub fn output(&self) -> &W {
        self.renderer.output()
    }
}

async fn recv_event(connection: Option<&mut Connection>) -> Option<ServerEvent> {
    match connection {
        Some(connection) => connection.from_server.recv().await,
        None => std::future::pending().await,
    }
}
