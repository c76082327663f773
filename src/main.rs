//! Entry point for the **vesktop-keybinds** binary.
//!
//! `listen` (the default) runs the endpoint listener on a single-threaded
//! runtime and logs every action it would hand to the application.
//! `send <ACTION>` is the writer side, for hotkey daemons that prefer
//! running a command over writing to the endpoint themselves.

use clap::{Parser, Subcommand};
use log::{error, info};
use tokio::sync::mpsc;
use vesktop_keybinds::action::Action;
use vesktop_keybinds::config::Config;
use vesktop_keybinds::ipc::endpoint::{Endpoint, Platform};
use vesktop_keybinds::ipc::{self, writer};

#[derive(Debug, Parser)]
#[command(name = "vesktop-keybinds", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Listen for actions and log them (default).
    Listen,
    /// Send one action to a running listener.
    Send {
        /// `mute`, `deafen`, or a full identifier such as `VCD_TOGGLE_SELF_MUTE`.
        #[arg(value_parser = parse_action_arg)]
        action: Action,
    },
}

fn parse_action_arg(s: &str) -> Result<Action, String> {
    match s.to_ascii_lowercase().as_str() {
        "mute" => Ok(Action::ToggleSelfMute),
        "deaf" | "deafen" => Ok(Action::ToggleSelfDeaf),
        _ => s.parse().map_err(|e| format!("{}", e)),
    }
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/vesktop-keybinds`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("vesktop-keybinds")
}

/// Try to load the config from `config.json`, falling back to defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config();

    match cli.command.unwrap_or(Cmd::Listen) {
        Cmd::Listen => run_listener(config).await,
        Cmd::Send { action } => {
            let endpoint = Endpoint::resolve(
                Platform::current(),
                &config.ipc.name,
                config.ipc.runtime_dir.as_deref(),
            );
            if let Err(e) = writer::send(&endpoint, action).await {
                error!("failed to send {}: {}", action, e);
                std::process::exit(1);
            }
        }
    }
}

/// Listener mode.  Runs until Ctrl-C / SIGTERM.
async fn run_listener(config: Config) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let Some(listener) = ipc::init(&config.ipc, tx) else {
        std::process::exit(1);
    };
    info!("accepting keybinds on {}", listener.endpoint());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            action = rx.recv() => match action {
                Some(action) => info!("action: {}", action),
                None => break,
            },
            () = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    // Removes the FIFO.
    drop(listener);
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            error!("cannot install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
