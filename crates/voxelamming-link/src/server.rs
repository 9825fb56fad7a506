//! TCP command server

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::error::LinkError;
use crate::protocol::{CommandResponse, VoxelCommand};

/// Trait that a voxel session implements to handle host commands
pub trait CommandHandler: Send + Sync + 'static {
    fn handle_command(&mut self, cmd: VoxelCommand) -> CommandResponse;
}

/// Command server handle - keep this alive to keep the server running
pub struct CommandServer {
    local_addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl CommandServer {
    /// Bind the command server on the given port (0 picks a free one).
    /// Commands from every connection go to the same handler, one at a time.
    /// Returns once bound -- the accept loop runs in background.
    pub async fn bind(
        handler: Arc<Mutex<dyn CommandHandler>>,
        port: u16,
    ) -> Result<Self, LinkError> {
        let addr = format!("127.0.0.1:{}", port);
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        log::info!("Command server listening on {}", local_addr);

        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        log::info!("Command client connected from {}", peer);
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, handler).await;
                            log::info!("Command client disconnected: {}", peer);
                        });
                    }
                    Err(e) => {
                        log::error!("Command server accept error: {}", e);
                    }
                }
            }
        });

        Ok(Self { local_addr, handle })
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn handle_connection(stream: TcpStream, handler: Arc<Mutex<dyn CommandHandler>>) {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Command server read error: {}", e);
                break;
            }
        };

        let Some(reply) = respond(&line, &handler).await else {
            continue;
        };
        if let Err(e) = writer.write_all(reply.as_bytes()).await {
            log::error!("Command server write error: {}", e);
            break;
        }
    }
}

/// Answer one request line with one newline-terminated JSON reply.
/// Blank lines are skipped without a reply.
async fn respond(line: &str, handler: &Mutex<dyn CommandHandler>) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<VoxelCommand>(line) {
        Ok(cmd) => {
            log::debug!("Command: {}", cmd.name());
            handler.lock().await.handle_command(cmd)
        }
        Err(e) => CommandResponse::error(format!("Invalid command JSON: {}", e)),
    };

    let mut reply = serde_json::to_string(&response).unwrap_or_else(|e| {
        serde_json::json!({ "status": "error", "message": format!("Serialize error: {}", e) })
            .to_string()
    });
    reply.push('\n');
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseData;

    struct CountingHandler {
        handled: usize,
    }

    impl CommandHandler for CountingHandler {
        fn handle_command(&mut self, cmd: VoxelCommand) -> CommandResponse {
            self.handled += 1;
            match cmd {
                VoxelCommand::Ping => CommandResponse::pong(),
                other => CommandResponse::ok(ResponseData::Queued {
                    room: other.name().to_string(),
                    pending: self.handled,
                }),
            }
        }
    }

    async fn roundtrip(stream: &mut TcpStream, request: &str) -> serde_json::Value {
        let (reader, mut writer) = stream.split();
        writer.write_all(request.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn test_ping_and_dispatch() {
        let handler = Arc::new(Mutex::new(CountingHandler { handled: 0 }));
        let server = CommandServer::bind(handler.clone(), 0).await.unwrap();
        let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();

        let pong = roundtrip(&mut stream, r#"{"cmd":"ping"}"#).await;
        assert_eq!(pong["status"], "ok");
        assert_eq!(pong["data"]["message"], "pong");

        let queued = roundtrip(&mut stream, r#"{"cmd":"sendData"}"#).await;
        assert_eq!(queued["data"]["room"], "sendData");
        assert_eq!(queued["data"]["pending"], 2);

        assert_eq!(handler.lock().await.handled, 2);
        server.shutdown();
    }

    #[tokio::test]
    async fn test_respond_skips_blank_lines() {
        let handler = Mutex::new(CountingHandler { handled: 0 });
        assert!(respond("  \t ", &handler).await.is_none());

        let reply = respond(r#"  {"cmd":"ping"}  "#, &handler).await.unwrap();
        assert!(reply.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(handler.lock().await.handled, 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let handler = Arc::new(Mutex::new(CountingHandler { handled: 0 }));
        let server = CommandServer::bind(handler.clone(), 0).await.unwrap();
        let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();

        let resp = roundtrip(&mut stream, r#"{"cmd":"fly"}"#).await;
        assert_eq!(resp["status"], "error");
        assert!(resp["message"].as_str().unwrap().starts_with("Invalid command JSON"));
        assert_eq!(handler.lock().await.handled, 0);
        server.shutdown();
    }
}
