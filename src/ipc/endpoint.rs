//! Endpoint addresses and how they are resolved from the environment.

use std::fmt;
use std::path::{Path, PathBuf};

/// Which endpoint strategy a process uses.  Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// A FIFO special file in the runtime directory (Linux, macOS, BSD).
    Fifo,
    /// A Windows named-pipe server.
    NamedPipe,
}

impl Platform {
    /// The strategy for the platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::NamedPipe
        } else {
            Platform::Fifo
        }
    }
}

/// Address of the rendezvous object writers connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Filesystem path of a FIFO.
    Fifo(PathBuf),
    /// Full named-pipe address, e.g. `\\.\pipe\vesktop-ipc`.
    NamedPipe(String),
}

impl Endpoint {
    /// Build the endpoint for `platform` from a base `name`.
    ///
    /// `runtime_dir` is only consulted for [`Platform::Fifo`]; pass `None`
    /// to resolve it from the process environment.
    pub fn resolve(platform: Platform, name: &str, runtime_dir: Option<&Path>) -> Self {
        match platform {
            Platform::Fifo => {
                let dir = match runtime_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => runtime_dir_from(|key| std::env::var(key).ok()),
                };
                Endpoint::Fifo(dir.join(name))
            }
            Platform::NamedPipe => Endpoint::NamedPipe(pipe_address(name)),
        }
    }

    /// The platform this endpoint belongs to.
    pub fn platform(&self) -> Platform {
        match self {
            Endpoint::Fifo(_) => Platform::Fifo,
            Endpoint::NamedPipe(_) => Platform::NamedPipe,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Fifo(path) => write!(f, "{}", path.display()),
            Endpoint::NamedPipe(name) => f.write_str(name),
        }
    }
}

/// Resolve the FIFO directory: `XDG_RUNTIME_DIR`, then `TMP`, then `/tmp`.
///
/// Empty variables count as unset.  `lookup` abstracts the environment so
/// the fallback chain can be tested without touching process state.
pub fn runtime_dir_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    ["XDG_RUNTIME_DIR", "TMP"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// `\\.\pipe\<name>`.
pub fn pipe_address(name: &str) -> String {
    format!(r"\\.\pipe\{}", name)
}
