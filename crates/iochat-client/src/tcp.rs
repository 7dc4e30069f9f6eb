//! TCP transport for the client.
//!
//! Provides [`Connection`] which carries protocol events over a TCP stream as
//! newline-delimited packets. This is a thin layer that just moves events
//! across the socket; subscription and session logic stay in the
//! single-threaded core, which is fed through the channels.

use futures::StreamExt;
use iochat_proto::{ClientEvent, ServerEvent};
use thiserror::Error;
use tokio::{
    io::AsyncWriteExt,
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

/// Capacity of each direction's event channel.
const CHANNEL_CAPACITY: usize = 32;

/// Longest inbound packet accepted, in bytes, excluding the newline.
///
/// Longer lines are discarded up to the next newline.
pub const MAX_PACKET_LEN: usize = 64 * 1024;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket I/O failed (connect, read, or write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] iochat_proto::ProtocolError),
}

/// Handle to a connected client with TCP transport.
///
/// Events are sent/received via the channels, and an internal task handles
/// the socket I/O. `from_server` yields `None` once the server closes the
/// connection.
pub struct Connection {
    /// Send events to the server.
    pub to_server: mpsc::Sender<ClientEvent>,
    /// Receive events from the server.
    pub from_server: mpsc::Receiver<ServerEvent>,
    /// Connection task.
    task: JoinHandle<()>,
}

impl Connection {
    /// Stop the connection immediately. Events still queued on `to_server`
    /// are lost.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Close the connection after every event already queued on `to_server`
    /// has been written to the socket.
    pub async fn close(self) {
        let Self { to_server, from_server, task } = self;
        drop(to_server);
        drop(from_server);

        if let Err(e) = task.await
            && !e.is_cancelled()
        {
            tracing::warn!(error = %e, "connection task failed");
        }
        tracing::info!("connection closed");
    }
}

/// Connect to an IOChat server over TCP.
///
/// Returns a [`Connection`] with channels for event transport.
pub async fn connect(server_addr: &str) -> Result<Connection, TransportError> {
    let stream = TcpStream::connect(server_addr).await?;
    stream.set_nodelay(true)?;
    tracing::info!(server_addr, "connected");

    let (to_server_tx, to_server_rx) = mpsc::channel::<ClientEvent>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<ServerEvent>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    Ok(Connection {
        to_server: to_server_tx,
        from_server: from_server_rx,
        task: handle,
    })
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    stream: TcpStream,
    mut to_server: mpsc::Receiver<ClientEvent>,
    from_server: mpsc::Sender<ServerEvent>,
) {
    let (reader, mut writer) = stream.into_split();

    let recv_handle = tokio::spawn(async move {
        if let Err(e) = handle_incoming(reader, from_server).await {
            tracing::warn!(error = %e, "incoming stream closed with error");
        }
    });

    while let Some(event) = to_server.recv().await {
        if let Err(e) = send_event(&mut writer, &event).await {
            tracing::warn!(error = %e, event = event.name(), "send failed");
            break;
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "write shutdown failed");
    }
    recv_handle.abort();
}

/// Read packets (server -> client) until EOF.
///
/// Undecodable and oversized packets are logged and skipped; they never reach
/// the session.
async fn handle_incoming(
    reader: OwnedReadHalf,
    tx: mpsc::Sender<ServerEvent>,
) -> Result<(), TransportError> {
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_PACKET_LEN));

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                tracing::warn!(max_len = MAX_PACKET_LEN, "dropping oversized packet");
                continue;
            },
            Err(LinesCodecError::Io(e)) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        match ServerEvent::decode(line.as_bytes()) {
            Ok(event) => {
                tx.send(event)
                    .await
                    .map_err(|e| TransportError::Stream(format!("channel send failed: {e}")))?;
            },
            Err(e) => tracing::warn!(error = %e, "dropping undecodable packet"),
        }
    }

    tracing::info!("server closed connection");
    Ok(())
}

/// Write one packet followed by a newline.
async fn send_event(
    writer: &mut OwnedWriteHalf,
    event: &ClientEvent,
) -> Result<(), TransportError> {
    let mut buf = event.encode()?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
