//! Terminal client for the zone assistant.
//!
//! Reads one request per line from stdin and prints the agent's replies.
//! Lines starting with `/` are client commands (`/help` lists them).
//!
//! All tracing output goes to stderr so stdout stays a readable transcript.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use zone_agent::{
    AgentConfig, Assistant, CaptureToggle, Navigator, RemoteSession, RuntimeEvent,
    SessionBoundary,
};
use zone_sources::SourceClients;

/// Prints host navigation instead of changing a real location.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        println!("  → now at {path}");
    }

    fn open_url(&self, url: &str) {
        println!("  → opening {url}");
    }
}

const CLIENT_HELP: &str = "\
/mic                 toggle voice capture
/mode                show the current view mode
/login <user> <pw>   sign in to sync progress
/logout              sign out
/quit                exit";

fn config_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("zone_agent=info,zone_sources=warn")),
        )
        .init();

    let path = config_path().unwrap_or_else(AgentConfig::default_config_path);
    let config = if path.exists() {
        AgentConfig::from_file(&path)?
    } else {
        tracing::info!("no config at {}, using defaults", path.display());
        AgentConfig::default()
    };

    let clients = SourceClients::new(&config.sources)?;
    let session = Arc::new(RemoteSession::new(clients.auth, clients.progress));
    let assistant = Assistant::builder(config)
        .session(Arc::clone(&session) as Arc<dyn SessionBoundary>)
        .navigator(Arc::new(TerminalNavigator))
        .build()?;

    let mut events = assistant.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let RuntimeEvent::NavigationCancelled { zone } = event {
                println!("  (trip to {zone} cancelled)");
            }
        }
    });

    let zone = assistant.current_zone();
    println!("You're in {}. {}", zone.label(), assistant.mode_indicator());
    println!("Type a request, /help for client commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(command) = line.strip_prefix('/') {
            let mut parts = command.split_whitespace();
            match parts.next().unwrap_or_default() {
                "quit" | "exit" => break,
                "help" => println!("{CLIENT_HELP}"),
                "mode" => println!("{}", assistant.mode_indicator()),
                "mic" => match assistant.toggle_capture() {
                    CaptureToggle::Started(_) => println!("  (listening)"),
                    CaptureToggle::Stopped => println!("  (stopped listening)"),
                    CaptureToggle::Unavailable => {
                        if let Some(last) = assistant.history().last() {
                            println!("{}", last.content);
                        }
                    }
                },
                "login" => match (parts.next(), parts.next()) {
                    (Some(user), Some(password)) => match session.login(user, password).await {
                        Ok(identity) => println!("Signed in as {}.", identity.display_name),
                        Err(e) => println!("Sign-in failed: {e}"),
                    },
                    _ => println!("usage: /login <user> <password>"),
                },
                "logout" => {
                    session.logout();
                    println!("Signed out.");
                }
                other => println!("unknown command /{other}; try /help"),
            }
            continue;
        }

        let response = assistant.submit(line).await;
        if !response.fragments.is_empty() {
            println!("{}\n", response.body());
        }
    }

    assistant.cancel();
    tracing::info!("zone-agent shut down cleanly");
    Ok(())
}
