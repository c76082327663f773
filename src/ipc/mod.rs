//! Endpoint listeners that receive keybind triggers from other processes.
//!
//! External tools (hotkey daemons, window-manager bindings, scripts) write
//! a single action token to the endpoint:
//!
//! * Unix: the FIFO `$XDG_RUNTIME_DIR/vesktop-ipc` (see [`fifo`]).
//! * Windows: the named pipe `\\.\pipe\vesktop-ipc` (see [`named_pipe`]).
//!
//! [`start`] provisions the endpoint, spawns the accept loop on the current
//! tokio runtime and returns a [`KeybindListener`].  The listener lives as
//! long as that handle; dropping it at shutdown stops the loop and removes
//! the FIFO.

pub mod endpoint;
#[cfg(unix)]
pub mod fifo;
#[cfg(windows)]
pub mod named_pipe;
pub mod session;
pub mod writer;

use crate::config::IpcConfig;
use crate::traits::ActionSink;
use endpoint::{Endpoint, Platform};
use log::error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Errors that keep a listener from starting.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("failed to provision {}: {source}", .path.display())]
    Provision {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to listen on {endpoint}: {source}")]
    Listen {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("{0:?} endpoints are not supported on this platform")]
    Unsupported(Platform),
}

/// A running listener.
///
/// There is no stop method: keep the handle for as long as the process
/// should accept keybinds and drop it during shutdown.
#[derive(Debug)]
pub struct KeybindListener {
    endpoint: Endpoint,
    task: JoinHandle<()>,
    #[cfg(unix)]
    _cleanup: fifo::FifoGuard,
}

impl KeybindListener {
    /// The endpoint writers should connect to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Drop for KeybindListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Provision `endpoint` and start accepting writers.
///
/// Must be called from within a tokio runtime.  Every recognized action is
/// handed to `sink`.
pub fn start<S: ActionSink>(
    endpoint: Endpoint,
    sink: S,
    read_buffer: usize,
) -> Result<KeybindListener, IpcError> {
    let sink: Arc<dyn ActionSink> = Arc::new(sink);
    match endpoint.clone() {
        #[cfg(unix)]
        Endpoint::Fifo(path) => {
            let guard = fifo::provision(&path)?;
            let first = fifo::open(&path)?;
            let task = tokio::spawn(fifo::accept_loop(path, first, sink, read_buffer));
            Ok(KeybindListener {
                endpoint,
                task,
                _cleanup: guard,
            })
        }
        #[cfg(windows)]
        Endpoint::NamedPipe(name) => {
            let first = named_pipe::bind(&name)?;
            let task = tokio::spawn(named_pipe::accept_loop(
                name,
                first,
                sink,
                read_buffer,
            ));
            Ok(KeybindListener { endpoint, task })
        }
        #[allow(unreachable_patterns)]
        other => Err(IpcError::Unsupported(other.platform())),
    }
}

/// Start the listener for this platform, logging instead of failing.
///
/// Returns `None` when the endpoint could not be set up; the application
/// keeps running without external keybinds.
pub fn init<S: ActionSink>(config: &IpcConfig, sink: S) -> Option<KeybindListener> {
    let endpoint = Endpoint::resolve(
        Platform::current(),
        &config.name,
        config.runtime_dir.as_deref(),
    );
    match start(endpoint, sink, config.read_buffer) {
        Ok(listener) => Some(listener),
        Err(e) => {
            error!("failed to initialize keybinds: {}", e);
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::action::Action;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn config_in(dir: &std::path::Path) -> IpcConfig {
        IpcConfig {
            runtime_dir: Some(dir.to_path_buf()),
            ..IpcConfig::default()
        }
    }

    #[tokio::test]
    async fn init_over_stale_file_then_cleanup_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vesktop-ipc");
        std::fs::write(&path, b"stale").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let listener = init(&config_in(dir.path()), tx).expect("listener starts");
        assert_eq!(listener.endpoint(), &Endpoint::Fifo(path.clone()));

        writer::send(listener.endpoint(), Action::ToggleSelfMute)
            .await
            .unwrap();
        let got = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(got.ok().flatten(), Some(Action::ToggleSelfMute));

        drop(listener);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn init_in_missing_directory_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        assert!(init(&config_in(&dir.path().join("gone")), tx).is_none());
    }

    #[tokio::test]
    async fn named_pipe_is_unsupported_here() {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let err = start(Endpoint::NamedPipe(r"\\.\pipe\x".into()), tx, 1024).unwrap_err();
        assert!(matches!(err, IpcError::Unsupported(Platform::NamedPipe)));
    }

    #[tokio::test]
    async fn many_sends_through_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listener = init(&config_in(dir.path()), tx).unwrap();

        for _ in 0..3 {
            for action in Action::ALL {
                writer::send(listener.endpoint(), action).await.unwrap();
                let got = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
                assert_eq!(got.ok().flatten(), Some(action));
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
