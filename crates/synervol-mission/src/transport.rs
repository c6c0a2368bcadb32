use async_trait::async_trait;
use futures_util::SinkExt;
use std::time::Duration;
pub use synervol_config::DEFAULT_MISSION_ENDPOINT;
use synervol_core::SvError;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection did not open within {0:?}")]
    Timeout(Duration),
}

impl From<TransportError> for SvError {
    fn from(value: TransportError) -> Self {
        SvError::transport(value.to_string())
    }
}

#[async_trait]
pub trait MissionTransport: Send + Sync {
    async fn open(&self) -> Result<Box<dyn MissionConnection>, TransportError>;

    fn endpoint(&self) -> &str;
}

#[async_trait]
pub trait MissionConnection: Send {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    async fn close(self: Box<Self>) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    endpoint: String,
}

impl WebSocketTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(DEFAULT_MISSION_ENDPOINT)
    }
}

#[async_trait]
impl MissionTransport for WebSocketTransport {
    async fn open(&self) -> Result<Box<dyn MissionConnection>, TransportError> {
        let (stream, _response) = connect_async(self.endpoint.as_str()).await?;
        Ok(Box::new(WebSocketConnection { stream }))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

struct WebSocketConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl MissionConnection for WebSocketConnection {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.stream.send(Message::text(text)).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        let mut connection = self;
        connection.stream.close(None).await?;
        Ok(())
    }
}
