//! Named-pipe listener for Windows.
//!
//! Every client gets its own pipe instance, so sessions run concurrently
//! and independently.  A fresh instance is created as soon as one is
//! connected, keeping the name available to the next client.

use super::session;
use super::IpcError;
use crate::traits::ActionSink;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::net::windows::named_pipe::{NamedPipeServer, ServerOptions};

/// Create the first server instance.
///
/// Fails if another process already owns `name`.
pub fn bind(name: &str) -> Result<NamedPipeServer, IpcError> {
    ServerOptions::new()
        .first_pipe_instance(true)
        .create(name)
        .map_err(|e| IpcError::Listen {
            endpoint: name.to_string(),
            source: e,
        })
}

/// Accept clients forever, one task per session.
///
/// A session error only ends that session.  Failing to create the next
/// server instance is a server-level error: it is logged and ends the loop.
pub async fn accept_loop(
    name: String,
    first: NamedPipeServer,
    sink: Arc<dyn ActionSink>,
    read_buffer: usize,
) {
    info!("pipe server is listening on {}", name);

    let mut server = first;
    loop {
        let connected = server.connect().await;

        let next = match ServerOptions::new().create(&name) {
            Ok(next) => next,
            Err(e) => {
                error!("server error on {}, keybinds disabled: {}", name, e);
                return;
            }
        };
        let current = std::mem::replace(&mut server, next);

        if let Err(e) = connected {
            warn!("pipe error while accepting a client: {}", e);
            continue;
        }

        let sink = Arc::clone(&sink);
        tokio::spawn(async move {
            info!("client connected to the pipe");
            match session::pump(current, &*sink, read_buffer).await {
                Ok(_) => info!("client disconnected from the pipe"),
                Err(e) => error!("pipe error: {}", e),
            }
        });
    }
}
