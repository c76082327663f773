//! The seam between the listener and the application that consumes actions.
//!
//! Listeners never know what the application does with an action; they
//! hand every recognized [`Action`] to an [`ActionSink`] and move on.

use crate::action::Action;
use std::sync::mpsc;
use tokio::sync::mpsc as tokio_mpsc;

/// Receives recognized actions from a listener.
///
/// # Contract
///
/// * [`deliver`](ActionSink::deliver) is fire-and-forget.  It must return
///   promptly and must never block, because it is called from the read
///   loop of an endpoint.
/// * A sink whose consumer has gone away simply drops the action.  The
///   listener does not retry.
/// * Implementations must be `Send + Sync` so a single sink can be shared
///   between concurrent named-pipe sessions.
pub trait ActionSink: Send + Sync + 'static {
    /// Forward `action` to the application.  Returns `false` if the
    /// application side is no longer listening.
    fn deliver(&self, action: Action) -> bool;
}

impl ActionSink for tokio_mpsc::UnboundedSender<Action> {
    fn deliver(&self, action: Action) -> bool {
        self.send(action).is_ok()
    }
}

impl ActionSink for mpsc::Sender<Action> {
    fn deliver(&self, action: Action) -> bool {
        self.send(action).is_ok()
    }
}

/// Wraps a closure as a sink, for hosts that dispatch by callback.
///
/// ```no_run
/// # async fn demo() {
/// use vesktop_keybinds::action::Action;
/// use vesktop_keybinds::config::IpcConfig;
/// use vesktop_keybinds::traits::FnSink;
///
/// let sink = FnSink(|action: Action| println!("send {} to the renderer", action));
/// let _listener = vesktop_keybinds::ipc::init(&IpcConfig::default(), sink);
/// # }
/// ```
pub struct FnSink<F>(pub F);

impl<F> ActionSink for FnSink<F>
where
    F: Fn(Action) + Send + Sync + 'static,
{
    fn deliver(&self, action: Action) -> bool {
        (self.0)(action);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn tokio_sender_reports_closed_receiver() {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        assert!(tx.deliver(Action::ToggleSelfMute));
        drop(rx);
        assert!(!tx.deliver(Action::ToggleSelfMute));
    }

    #[test]
    fn std_sender_delivers_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.deliver(Action::ToggleSelfDeaf);
        tx.deliver(Action::ToggleSelfMute);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(got, vec![Action::ToggleSelfDeaf, Action::ToggleSelfMute]);
    }

    #[test]
    fn closure_sink_sees_every_action() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            FnSink(move |a| seen.lock().unwrap().push(a))
        };
        assert!(sink.deliver(Action::ToggleSelfMute));
        assert_eq!(*seen.lock().unwrap(), vec![Action::ToggleSelfMute]);
    }
}
