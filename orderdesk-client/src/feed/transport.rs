//! Push channel transport
//!
//! The worker only needs "connect" and "next text frame", so the socket sits
//! behind two small traits. Production uses [`WsConnector`]; tests script
//! sessions directly.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::ClientResult;

/// One live connection
#[async_trait]
pub trait FeedSession: Send {
    /// Next text frame. `None` once the peer has closed the connection.
    async fn next_text(&mut self) -> Option<ClientResult<String>>;

    /// Close the connection from our side
    async fn close(&mut self);
}

/// Opens connections for the feed worker
#[async_trait]
pub trait FeedConnector: Send + Sync + 'static {
    async fn connect(&self) -> ClientResult<Box<dyn FeedSession>>;
}

/// WebSocket connector for the backend's order channel
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedConnector for WsConnector {
    async fn connect(&self) -> ClientResult<Box<dyn FeedSession>> {
        tracing::debug!(url = %self.url, "Connecting to order channel");
        let (ws, _response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        Ok(Box::new(WsSession { ws }))
    }
}

struct WsSession {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FeedSession for WsSession {
    async fn next_text(&mut self) -> Option<ClientResult<String>> {
        loop {
            match self.ws.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "Order channel closed by server");
                    return None;
                }
                // Ping is answered by tungstenite; Pong, Binary ignored
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!("Order channel close failed: {e}");
        }
    }
}
