//! Room-addressed snapshot transport

use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::LinkError;

/// Default time allowed for one delivery (connect + write)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers serialized snapshots to a renderer relay.
///
/// Every delivery uses a fresh connection: the room name line goes first so the
/// relay can route the payload line that follows, then the connection closes.
#[derive(Debug, Clone)]
pub struct RoomClient {
    addr: String,
    timeout: Duration,
}

impl RoomClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set delivery timeout (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Relay address
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one payload to `room`
    pub async fn deliver(&self, room: &str, payload: &str) -> Result<(), LinkError> {
        tokio::time::timeout(self.timeout, self.deliver_inner(room, payload))
            .await
            .map_err(|_| LinkError::Timeout(self.timeout))?
    }

    async fn deliver_inner(&self, room: &str, payload: &str) -> Result<(), LinkError> {
        let mut stream = TcpStream::connect(&self.addr).await?;
        log::debug!("Connected to relay {}, joining room {}", self.addr, room);

        stream.write_all(room.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.write_all(payload.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;
        stream.shutdown().await?;

        log::debug!("Sent {} bytes to room {}", payload.len(), room);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_room_line_precedes_payload() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let relay = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(stream).lines();
            let mut received = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                received.push(line);
            }
            received
        });

        let client = RoomClient::new(addr.to_string());
        client.deliver("1000", r#"{"boxes":[]}"#).await.unwrap();

        let received = relay.await.unwrap();
        assert_eq!(received, vec!["1000".to_string(), r#"{"boxes":[]}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RoomClient::new(addr.to_string()).with_timeout(Duration::from_secs(2));
        assert!(client.deliver("1000", "{}").await.is_err());
    }
}
