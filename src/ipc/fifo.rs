//! FIFO-backed listener for Unix platforms.
//!
//! A FIFO serves one writer at a time and reports end-of-stream when that
//! writer closes.  To accept the next writer the read end has to be opened
//! again, so the listener runs an explicit loop:
//!
//! ```text
//!   provision ──▶ AwaitingWriter ──(data)──▶ Connected
//!                      ▲                         │
//!                      └──────(end-of-stream)────┘
//! ```
//!
//! The read end is opened with `O_NONBLOCK`, so opening never waits for a
//! writer; the task then parks on the reactor until one shows up.

use super::session;
use super::IpcError;
use crate::traits::ActionSink;
use log::{debug, error, info, warn};
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::unix::pipe;

/// Removes the FIFO when dropped.
///
/// Held by the listener handle for the life of the process, so the path is
/// unlinked during shutdown.  Removal errors are ignored: the file may
/// already be gone and nothing useful can be done about it at exit.
#[derive(Debug)]
pub struct FifoGuard {
    path: PathBuf,
}

impl Drop for FifoGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Create a fresh FIFO at `path`, removing whatever is there first.
pub fn provision(path: &Path) -> Result<FifoGuard, IpcError> {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed stale endpoint {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(IpcError::Provision {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|errno| IpcError::Provision {
        path: path.to_path_buf(),
        source: io::Error::from(errno),
    })?;

    Ok(FifoGuard {
        path: path.to_path_buf(),
    })
}

/// Open the read end without waiting for a writer.
///
/// Must be called from within a tokio runtime.
pub fn open(path: &Path) -> Result<pipe::Receiver, IpcError> {
    pipe::OpenOptions::new()
        .open_receiver(path)
        .map_err(|e| IpcError::Open {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Serve writers one after another, forever.
///
/// `first` is the already-open read end.  Each end-of-stream drops the
/// current handle and opens a new one.  A failed re-open is logged and ends
/// the loop; there is no retry.
pub async fn accept_loop(
    path: PathBuf,
    first: pipe::Receiver,
    sink: Arc<dyn ActionSink>,
    read_buffer: usize,
) {
    info!("listening for keybinds on {}", path.display());

    let mut rx = first;
    loop {
        match session::pump(rx, &*sink, read_buffer).await {
            Ok(n) => debug!("writer disconnected after {} action(s)", n),
            Err(e) => warn!("read error on {}: {}", path.display(), e),
        }

        rx = match open(&path) {
            Ok(rx) => rx,
            Err(e) => {
                error!("error reopening pipe, keybinds disabled: {}", e);
                return;
            }
        };
    }
}
