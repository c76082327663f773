//! **vesktop-keybinds** — deliver global keybinds to Vesktop from outside.
//!
//! Vesktop cannot register true global hotkeys on every platform (Wayland
//! in particular), so it exposes a local endpoint instead.  Any process on
//! the same machine can write an action token to it, and the action is
//! forwarded to the application as if a keybind had fired.
//!
//! # Architecture
//!
//! * [`action`] — the closed set of recognized actions and the decoder.
//! * [`traits::ActionSink`] — where recognized actions go.  The listener
//!   is not coupled to how the application consumes them.
//! * [`ipc`] — the endpoint listeners: a FIFO on Unix, a named-pipe server
//!   on Windows, selected once at startup by [`ipc::endpoint::Platform`].
//!
//! ```no_run
//! # async fn demo() {
//! use vesktop_keybinds::action::Action;
//! use vesktop_keybinds::config::IpcConfig;
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
//! let _listener = vesktop_keybinds::ipc::init(&IpcConfig::default(), tx);
//! while let Some(action) = rx.recv().await {
//!     println!("{}", action);
//! }
//! # }
//! ```

pub mod action;
pub mod config;
pub mod ipc;
pub mod traits;
