//! The action vocabulary shared by every endpoint.
//!
//! Writers send one plain-text token per write.  The token is trimmed and
//! compared case-sensitively against [`Action::ALL`]; anything else is
//! rejected.

use std::fmt;
use std::str::FromStr;

/// An action an external trigger can ask the application to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Toggle the local user's microphone mute.
    ToggleSelfMute,
    /// Toggle the local user's deafen state.
    ToggleSelfDeaf,
}

impl Action {
    /// Every recognized action.  Fixed at compile time.
    pub const ALL: [Action; 2] = [Action::ToggleSelfDeaf, Action::ToggleSelfMute];

    /// The wire identifier, which doubles as the application event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::ToggleSelfMute => "VCD_TOGGLE_SELF_MUTE",
            Action::ToggleSelfDeaf => "VCD_TOGGLE_SELF_DEAF",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The token did not name a recognized action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = trim_token(s);
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == token)
            .ok_or_else(|| UnknownAction(token.to_string()))
    }
}

/// Strip whitespace and byte-order marks from both ends.
///
/// Some editors and shells on Windows prepend U+FEFF, which `str::trim`
/// keeps.
fn trim_token(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Outcome of decoding one chunk read from an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The chunk named a recognized action.
    Action(Action),
    /// The chunk was empty after trimming.
    Empty,
    /// The chunk held some other text (already trimmed).
    Unknown(String),
}

/// Decode a single chunk of bytes.
///
/// Chunks are not buffered across reads: a token split over two reads is
/// treated as two unknown tokens.  Triggers write a short fixed token in one
/// `write`, which always arrives in one chunk.
pub fn decode(chunk: &[u8]) -> Decoded {
    let text = String::from_utf8_lossy(chunk);
    let text = trim_token(&text);
    if text.is_empty() {
        return Decoded::Empty;
    }
    match text.parse::<Action>() {
        Ok(action) => Decoded::Action(action),
        Err(UnknownAction(t)) => Decoded::Unknown(t),
    }
}
