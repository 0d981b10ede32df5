//! MPD protocol client: line codec, response field parsing and the TCP
//! session that carries command cycles and the `idle` long-poll.

mod client;
mod codec;
mod error;
mod fields;
mod session;
mod types;

pub use client::{Connection, Connector, MpdSession, TcpConnector};
pub use error::{MpdError, MpdResult};
pub use session::TcpSession;
pub use types::{NowPlaying, PlayState};
#[cfg(test)]
pub use types::SongInfo;

#[cfg(test)]
pub mod fake;
#[cfg(test)]
pub mod mock;
