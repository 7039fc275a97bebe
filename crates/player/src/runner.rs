//! Terminal runner: owns the store and drives it from the connection, stdin,
//! and a keep-alive timer.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

use crate::application::sfx::SoundBoard;
use crate::application::store::Store;
use crate::infrastructure::messaging::{ConnectionState, EventBus, SessionEvent};
use crate::infrastructure::websocket::create_connection;
use crate::presentation::TerminalView;
use crate::state::Platform;

/// Configuration types for the player runner.
pub mod config {
    use std::path::PathBuf;
    use std::str::FromStr;
    use std::time::Duration;

    use crate::application::sfx::DEFAULT_SFX_DIR;

    pub const DEFAULT_HOST: &str = "localhost";
    pub const DEV_PORT: u16 = 8081;
    pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub enum Environment {
        #[default]
        Development,
        Production,
    }

    impl FromStr for Environment {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "production" | "prod" => Ok(Self::Production),
                "development" | "dev" => Ok(Self::Development),
                other => Err(format!("unknown environment: {other}")),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub struct ClientConfig {
        pub environment: Environment,
        pub host: String,
        /// Full URL that replaces the computed one
        pub ws_url_override: Option<String>,
        pub sfx_dir: PathBuf,
        pub keep_alive: Duration,
    }

    impl Default for ClientConfig {
        fn default() -> Self {
            Self {
                environment: Environment::Development,
                host: DEFAULT_HOST.to_string(),
                ws_url_override: None,
                sfx_dir: PathBuf::from(DEFAULT_SFX_DIR),
                keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
            }
        }
    }

    impl ClientConfig {
        /// Read `ARMERIA_*` variables from the process environment.
        pub fn from_env() -> Self {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
            let defaults = Self::default();

            let environment = match lookup("ARMERIA_ENV") {
                Some(value) => value.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}, using development", e);
                    Environment::Development
                }),
                None if lookup("ARMERIA_PRODUCTION").is_some_and(|v| is_truthy(&v)) => {
                    Environment::Production
                }
                None => Environment::Development,
            };

            let keep_alive = lookup("ARMERIA_KEEP_ALIVE_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.keep_alive);

            Self {
                environment,
                host: lookup("ARMERIA_HOST")
                    .filter(|h| !h.trim().is_empty())
                    .unwrap_or(defaults.host),
                ws_url_override: lookup("ARMERIA_WS_URL").filter(|u| !u.trim().is_empty()),
                sfx_dir: lookup("ARMERIA_SFX_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.sfx_dir),
                keep_alive,
            }
        }

        pub fn is_production(&self) -> bool {
            self.environment == Environment::Production
        }

        /// The single WebSocket endpoint this client connects to.
        pub fn ws_url(&self) -> String {
            if let Some(url) = &self.ws_url_override {
                return url.clone();
            }
            match self.environment {
                Environment::Production => format!("wss://{}/ws", self.host),
                Environment::Development => format!("ws://{}:{}/ws", self.host, DEV_PORT),
            }
        }
    }

    fn is_truthy(value: &str) -> bool {
        matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
    }
}

use config::ClientConfig;

/// How long to wait for the close frame to go out on exit.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RunnerDeps {
    pub platform: Platform,
    pub config: ClientConfig,
}

/// Turn a line of user input into a slash command.
///
/// Slash commands pass through; anything else is spoken with `/say`.
pub fn input_to_command(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        None
    } else if line.starts_with('/') {
        Some(line.to_string())
    } else {
        Some(format!("/say {line}"))
    }
}

pub async fn run(deps: RunnerDeps) -> Result<()> {
    let RunnerDeps { platform, config } = deps;

    let url = config.ws_url();
    tracing::info!(url = %url, production = config.is_production(), "Connecting");

    let sounds = SoundBoard::load(platform.clone(), &config.sfx_dir);

    let event_bus = EventBus::new();
    let (event_tx, mut events) = mpsc::unbounded_channel::<SessionEvent>();
    event_bus
        .subscribe(move |event| {
            let _ = event_tx.send(event);
        })
        .await;

    let connection = create_connection(&url, event_bus);
    let mut store = Store::new(
        config.is_production(),
        platform,
        Arc::new(connection.command_bus.clone()),
        sounds,
    );

    let mut view = TerminalView::new();
    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut keep_alive = interval_at(Instant::now() + config.keep_alive, config.keep_alive);

    // Any exit from the loop, including an error, still closes the socket.
    let outcome = async {
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let closed = matches!(
                        event,
                        SessionEvent::StateChanged(ConnectionState::Disconnected | ConnectionState::Failed)
                    );
                    if let Err(e) = store.handle_session_event(event) {
                        tracing::warn!("Session event not handled: {}", e);
                    }
                    view.render(store.state(), &mut stdout)?;
                    if closed {
                        break;
                    }
                }

                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if let Some(command) = input_to_command(&line) {
                                if let Err(e) = store.send_slash_command(&command) {
                                    tracing::warn!("Command not sent: {}", e);
                                }
                                view.render(store.state(), &mut stdout)?;
                            }
                        }
                        Ok(None) => {
                            tracing::info!("Input closed");
                            break;
                        }
                        Err(e) => {
                            tracing::error!("Failed to read input: {}", e);
                            break;
                        }
                    }
                }

                _ = keep_alive.tick() => {
                    if let Err(e) = store.send_keep_alive() {
                        tracing::warn!("Keep-alive not sent: {}", e);
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    if tokio::time::timeout(CLOSE_TIMEOUT, connection.handle.disconnect())
        .await
        .is_err()
    {
        tracing::warn!("Close handshake timed out after {:?}", CLOSE_TIMEOUT);
    }
    stdout.flush()?;
    tracing::info!(ping_ms = store.state().ping_time_ms, "Session ended");

    outcome
}
