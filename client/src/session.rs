use crate::{Error, Result};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use groupclick_types::{
    api::ServerMessage,
    economy::{Currency, GroupId},
    Instruction,
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One connected player.
///
/// Incoming frames are decoded by a background task; replies and
/// broadcasts arrive on [Session::next] in the order the server sent them.
pub struct Session {
    sink: SplitSink<Socket, Message>,
    receiver: mpsc::Receiver<Result<ServerMessage>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

impl Session {
    pub(crate) fn new(ws: Socket) -> Self {
        let (sink, mut stream) = ws.split();
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        debug!("Received text message: {} bytes", text.len());
                        let message = serde_json::from_str::<ServerMessage>(&text).map_err(|e| {
                            error!("Failed to decode server message: {}", e);
                            Error::Json(e)
                        });
                        if tx.send(message).await.is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!("WebSocket closed");
                        let _ = tx.send(Err(Error::ConnectionClosed)).await;
                        break;
                    }
                    Ok(_) => {} // Ignore other message types
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        let _ = tx.send(Err(e.into())).await;
                        break;
                    }
                }
            }
        });

        Self {
            sink,
            receiver: rx,
            _handle: handle,
        }
    }

    /// Receive the next message, reply or broadcast.
    pub async fn next(&mut self) -> Result<ServerMessage> {
        self.receiver
            .recv()
            .await
            .unwrap_or(Err(Error::ConnectionClosed))
    }

    pub async fn send(&mut self, instruction: &Instruction) -> Result<()> {
        let text = serde_json::to_string(instruction)?;
        self.send_text(text).await
    }

    /// Send a raw text frame.
    pub async fn send_text(&mut self, text: String) -> Result<()> {
        self.sink.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Send `instruction` and wait for its reply, skipping broadcasts.
    pub async fn request(&mut self, instruction: &Instruction) -> Result<ServerMessage> {
        self.send(instruction).await?;
        self.reply().await
    }

    /// Next reply, skipping broadcasts and the initial state.
    pub async fn reply(&mut self) -> Result<ServerMessage> {
        loop {
            let message = self.next().await?;
            if message.is_reply() {
                return Ok(message);
            }
            debug!("Skipping non-reply message");
        }
    }

    pub async fn select_group(&mut self, group: GroupId) -> Result<ServerMessage> {
        self.request(&Instruction::SelectGroup { group }).await
    }

    pub async fn click(&mut self) -> Result<ServerMessage> {
        self.request(&Instruction::Click).await
    }

    pub async fn trade(&mut self, from: Currency, to: Currency, amount: i64) -> Result<ServerMessage> {
        self.request(&Instruction::Trade { from, to, amount }).await
    }

    pub async fn close(mut self) -> Result<()> {
        self.sink.close().await?;
        Ok(())
    }
}
