//! Reading one writer session and forwarding what it sends.
//!
//! Shared by both endpoint kinds: the FIFO listener runs one session at a
//! time, the named-pipe server runs one per client.

use crate::action::{decode, Action, Decoded};
use crate::config::MAX_READ_BUFFER;
use crate::traits::ActionSink;
use log::{debug, warn};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Classify one chunk and deliver it if it names an action.
///
/// Returns the delivered action, if any.  Unknown text is logged and
/// dropped; a closed sink is logged and otherwise ignored.
pub fn forward<S>(sink: &S, chunk: &[u8]) -> Option<Action>
where
    S: ActionSink + ?Sized,
{
    match decode(chunk) {
        Decoded::Action(action) => {
            if sink.deliver(action) {
                debug!("forwarded {}", action);
            } else {
                debug!("sink closed, dropped {}", action);
            }
            Some(action)
        }
        Decoded::Unknown(text) => {
            warn!("unknown action received: {}", text);
            None
        }
        Decoded::Empty => None,
    }
}

/// Read `reader` until end-of-stream, forwarding every chunk.
///
/// `read_buffer` is clamped to `1..=MAX_READ_BUFFER`.
///
/// Returns the number of recognized actions on a clean end-of-stream.
/// A read error ends the session and is returned to the caller.
pub async fn pump<R, S>(mut reader: R, sink: &S, read_buffer: usize) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    S: ActionSink + ?Sized,
{
    let mut buf = vec![0u8; read_buffer.clamp(1, MAX_READ_BUFFER)];
    let mut forwarded = 0;
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => return Ok(forwarded),
            Ok(n) => {
                if forward(sink, &buf[..n]).is_some() {
                    forwarded += 1;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn forward_delivers_only_recognized_tokens() {
        let (tx, rx) = mpsc::channel();
        assert_eq!(forward(&tx, b"VCD_TOGGLE_SELF_MUTE\n"), Some(Action::ToggleSelfMute));
        assert_eq!(forward(&tx, b"TOGGLE_SELF_MUTE"), None);
        assert_eq!(forward(&tx, b"\n"), None);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(got, vec![Action::ToggleSelfMute]);
    }

    #[test]
    fn forward_survives_closed_sink() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert_eq!(forward(&tx, b"VCD_TOGGLE_SELF_DEAF"), Some(Action::ToggleSelfDeaf));
    }

    #[tokio::test]
    async fn pump_reads_chunks_until_eof() {
        let (mut client, server) = tokio::io::duplex(64);
        let (tx, rx) = mpsc::channel();

        let reader = tokio::spawn(async move { pump(server, &tx, 64).await });

        // Wait for each chunk to be consumed so writes are not coalesced.
        for chunk in [&b" VCD_TOGGLE_SELF_DEAF \n"[..], b"bogus", b"VCD_TOGGLE_SELF_MUTE"] {
            client.write_all(chunk).await.unwrap();
            client.flush().await.unwrap();
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        drop(client);

        let forwarded = reader.await.unwrap().unwrap();
        assert_eq!(forwarded, 2);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(got, vec![Action::ToggleSelfDeaf, Action::ToggleSelfMute]);
    }

    #[tokio::test]
    async fn pump_with_huge_read_buffer_does_not_panic() {
        let (mut client, server) = tokio::io::duplex(64);
        let (tx, rx) = mpsc::channel();

        let reader = tokio::spawn(async move { pump(server, &tx, usize::MAX).await });

        client.write_all(b"VCD_TOGGLE_SELF_MUTE").await.unwrap();
        drop(client);

        assert_eq!(reader.await.unwrap().unwrap(), 1);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Action::ToggleSelfMute]);
    }
}
