//! Prints what a Kodi device is playing and follows its notifications.
//!
//! Demonstrates:
//! - Building a ConnectionConfig from command-line arguments
//! - Choosing HTTP or WebSocket via the WebSocket port
//! - Pinging, listing players and reading the playing item
//! - Receiving push notifications over WebSocket
//!
//! Usage:
//!   cargo run --example now_playing -- --host 192.168.1.20
//!   cargo run --example now_playing -- --host kodi.lan --ws-port 9090
//!   cargo run --example now_playing -- --host kodi.lan --user kodi --pass secret --debug

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, bail};
use kodi_remote::{Client, Connection, ConnectionConfig, Notification};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const ITEM_PROPERTIES: &[&str] = &["title", "artist", "album", "thumbnail"];
const PLAYER_PROPERTIES: &[&str] = &["time", "totaltime", "speed"];

// ============================================================================
// Args
// ============================================================================

#[derive(Debug, Clone, Default)]
struct Args {
    host: Option<String>,
    port: Option<u16>,
    ws_port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    debug: bool,
    no_wait: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = Self::default();
        let mut iter = std::env::args().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" => args.debug = true,
                "--no-wait" => args.no_wait = true,
                "--host" => args.host = iter.next(),
                "--user" => args.username = iter.next(),
                "--pass" => args.password = iter.next(),
                "--port" => {
                    let value = iter.next().context("--port needs a value")?;
                    args.port = Some(value.parse().context("invalid --port")?);
                }
                "--ws-port" => {
                    let value = iter.next().context("--ws-port needs a value")?;
                    args.ws_port = Some(value.parse().context("invalid --ws-port")?);
                }
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(args)
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "kodi_remote=debug"
    } else {
        "kodi_remote=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            std::process::exit(2);
        }
    };
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    println!("=== Kodi: Now Playing ===\n");

    let mut builder = ConnectionConfig::builder().host(args.host.unwrap_or_default());
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(ws_port) = args.ws_port {
        builder = builder.ws_port(ws_port);
    }
    if let Some(username) = args.username {
        builder = builder.username(username);
    }
    if let Some(password) = args.password {
        builder = builder.password(password);
    }
    let config = builder.build().context("invalid connection settings")?;

    // ========================================================================
    // Connect
    // ========================================================================

    let mut client = Client::new(Connection::new(&config));
    println!("[1] Connecting ({})...", if client.can_subscribe() { "websocket" } else { "http" });
    client.connect().await?;

    if !client.ping().await? {
        bail!("device answered ping with an unexpected reply");
    }
    println!("    ✓ Device reachable\n");

    // ========================================================================
    // Players
    // ========================================================================

    println!("[2] Active players...");
    let players = client.get_players().await?;
    if players.is_empty() {
        println!("    Nothing is playing");
    }

    for player in &players {
        let item = client
            .get_playing_item_properties(player.player_id, ITEM_PROPERTIES)
            .await?;
        let props = client
            .get_player_properties(player.player_id, PLAYER_PROPERTIES)
            .await?;

        println!("    Player {} ({})", player.player_id, player.kind);
        println!("      Title: {}", item["title"].as_str().unwrap_or("-"));
        println!("      Speed: {}", props["speed"]);

        let thumbnail = item["thumbnail"].as_str();
        if let Some(url) = client.thumbnail_url(thumbnail) {
            println!("      Thumbnail: {url}");
        }
    }
    println!();

    // ========================================================================
    // Notifications
    // ========================================================================

    if client.can_subscribe() && !args.no_wait {
        client
            .connection()
            .set_notification_handler(Box::new(|notification: Notification| {
                println!("    [push] {}", notification.method);
            }))?;

        println!("[3] Listening for notifications. Press Ctrl+C to exit...");
        tokio::signal::ctrl_c().await.ok();
    }

    client.close().await;
    println!("\n=== Done ===");
    Ok(())
}
