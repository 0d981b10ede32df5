use std::time::Duration;

use thiserror::Error;

pub type MpdResult<T> = Result<T, MpdError>;

/// Everything that can go wrong between us and the server.
///
/// `Connect`, `Greeting` and `Protocol` leave the session unusable; the rest
/// are reported and the connection stays up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MpdError {
    #[error("connect to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },

    #[error("unexpected greeting: {0:?}")]
    Greeting(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server's `ACK ...` line, verbatim.
    #[error("{0}")]
    Command(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("command would break framing: {0:?}")]
    InvalidCommand(String),

    #[error("not connected")]
    NotConnected,

    #[error("nothing to enqueue")]
    EmptyEnqueue,
}

impl MpdError {
    /// Errors after which the session must be thrown away.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MpdError::Connect { .. } | MpdError::Greeting(_) | MpdError::Protocol(_)
        )
    }

    /// Numeric code out of an `ACK [code@index] {command} message` line.
    pub fn ack_code(&self) -> Option<u32> {
        let MpdError::Command(line) = self else {
            return None;
        };
        let rest = line.strip_prefix("ACK [")?;
        let end = rest.find('@')?;
        rest[..end].parse().ok()
    }

    pub fn is_permission_denied(&self) -> bool {
        match self {
            // ACK_ERROR_PERMISSION
            MpdError::Command(line) => {
                self.ack_code() == Some(4) || line.to_ascii_lowercase().contains("permission")
            }
            _ => false,
        }
    }
}

impl From<std::io::Error> for MpdError {
    fn from(e: std::io::Error) -> Self {
        MpdError::Protocol(e.to_string())
    }
}
