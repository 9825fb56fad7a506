//! Voxelamming session server
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    JSON config file (defaults apply to missing keys)
//!   --room <NAME>      Room to route snapshots to (default: "1000")
//!   --server <ADDR>    Renderer relay address (default: 127.0.0.1:9744)
//!   --port <PORT>      Command server port (default: 9743)
//!   --surface <NAME>   box | animated | turtle (default: turtle)
//!   --interval <MS>    Snapshot drain period in milliseconds (default: 1000)
//!
//! Commands arrive as JSON lines on the command port, for example
//!   {"cmd":"forward","params":{"length":10}}
//!   {"cmd":"sendData"}

use std::sync::Arc;

use tokio::sync::Mutex;
use voxelamming::core::{logging, EngineConfig, Error};
use voxelamming::sender::DrainTimer;
use voxelamming::session::{Session, Surface};
use voxelamming_link::{CommandServer, RoomClient};

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let args: Vec<String> = std::env::args().collect();
    let config = load_config(&args)?;
    log::info!(
        "Room {}, surface {}, relay {}, drain every {} ms",
        config.room_name,
        config.surface.name(),
        config.server_addr,
        config.drain_interval_ms
    );

    let session = Session::new(config.room_name.clone(), config.surface);
    let queue = session.queue().clone();
    let session = Arc::new(Mutex::new(session));

    let timer = DrainTimer::spawn(
        queue.clone(),
        RoomClient::new(config.server_addr.clone()),
        config.drain_interval(),
    );
    let server = CommandServer::bind(session, config.listen_port).await?;
    log::info!("Accepting commands on {}", server.local_addr());

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down, {} snapshots undelivered", queue.len());
    server.shutdown();
    timer.stop();
    Ok(())
}

fn load_config(args: &[String]) -> Result<EngineConfig, Error> {
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(room) = parse_str_arg(args, "--room") {
        config.room_name = room;
    }
    if let Some(addr) = parse_str_arg(args, "--server") {
        config.server_addr = addr;
    }
    if let Some(port) = parse_str_arg(args, "--port") {
        config.listen_port = port
            .parse()
            .map_err(|_| Error::Config(format!("invalid --port {}", port)))?;
    }
    if let Some(name) = parse_str_arg(args, "--surface") {
        config.surface = Surface::parse(&name)
            .ok_or_else(|| Error::Config(format!("unknown --surface {}", name)))?;
    }
    if let Some(ms) = parse_str_arg(args, "--interval") {
        config.drain_interval_ms = ms
            .parse()
            .ok()
            .filter(|&ms: &u64| ms > 0)
            .ok_or_else(|| Error::Config(format!("invalid --interval {}", ms)))?;
    }

    Ok(config)
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
