//! The writer side: deliver one action to a running listener.
//!
//! Hotkey daemons can simply `echo VCD_TOGGLE_SELF_MUTE > $XDG_RUNTIME_DIR/vesktop-ipc`;
//! this module backs the `send` subcommand for setups where a binary is
//! more convenient than a shell redirect.

use super::endpoint::Endpoint;
use crate::action::Action;
use log::debug;
use std::io;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// How often to retry while the listener is between writers.
const RETRIES: u32 = 10;
const RETRY_DELAY: Duration = Duration::from_millis(20);

/// Errors produced when sending an action.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("no listener on {0}")]
    NoListener(String),
    #[error("{0} endpoints are not supported on this platform")]
    Unsupported(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Write `action` to `endpoint` as one message.
pub async fn send(endpoint: &Endpoint, action: Action) -> Result<(), SendError> {
    let message = format!("{}\n", action.as_str());
    match endpoint {
        #[cfg(unix)]
        Endpoint::Fifo(path) => {
            let mut tx = open_fifo(path).await?;
            tx.write_all(message.as_bytes()).await?;
        }
        #[cfg(windows)]
        Endpoint::NamedPipe(name) => {
            let mut client = connect_pipe(name).await?;
            client.write_all(message.as_bytes()).await?;
            client.flush().await?;
        }
        #[allow(unreachable_patterns)]
        other => return Err(SendError::Unsupported(format!("{:?}", other.platform()))),
    }
    debug!("sent {} to {}", action, endpoint);
    Ok(())
}

/// Open the write end without blocking.
///
/// `ENXIO` means nobody has the read end open.  The listener briefly closes
/// its read end between writers, so that case is retried a few times.
#[cfg(unix)]
async fn open_fifo(path: &std::path::Path) -> Result<tokio::net::unix::pipe::Sender, SendError> {
    use tokio::net::unix::pipe;

    let mut attempt = 0;
    loop {
        match pipe::OpenOptions::new().open_sender(path) {
            Ok(tx) => return Ok(tx),
            Err(e) if e.raw_os_error() == Some(nix::libc::ENXIO) && attempt < RETRIES => {
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) if e.raw_os_error() == Some(nix::libc::ENXIO) || e.kind() == io::ErrorKind::NotFound => {
                return Err(SendError::NoListener(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Connect to a named-pipe server, waiting while every instance is busy.
#[cfg(windows)]
pub async fn connect_pipe(
    name: &str,
) -> Result<tokio::net::windows::named_pipe::NamedPipeClient, SendError> {
    use tokio::net::windows::named_pipe::ClientOptions;

    // winerror.h
    const ERROR_PIPE_BUSY: i32 = 231;

    let mut attempt = 0;
    loop {
        match ClientOptions::new().open(name) {
            Ok(client) => return Ok(client),
            Err(e) if e.raw_os_error() == Some(ERROR_PIPE_BUSY) && attempt < RETRIES => {
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SendError::NoListener(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ipc::fifo;

    #[tokio::test]
    async fn send_without_reader_reports_no_listener() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vesktop-ipc");
        let _guard = fifo::provision(&path).unwrap();

        let err = send(&Endpoint::Fifo(path), Action::ToggleSelfMute)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::NoListener(_)));
    }

    #[tokio::test]
    async fn send_to_missing_path_reports_no_listener() {
        let dir = tempfile::tempdir().unwrap();
        let err = send(&Endpoint::Fifo(dir.path().join("absent")), Action::ToggleSelfDeaf)
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::NoListener(_)));
    }

    #[tokio::test]
    async fn named_pipe_endpoint_is_unsupported() {
        let ep = Endpoint::NamedPipe(r"\\.\pipe\vesktop-ipc".into());
        let err = send(&ep, Action::ToggleSelfDeaf).await.unwrap_err();
        assert!(matches!(err, SendError::Unsupported(_)));
    }
}
