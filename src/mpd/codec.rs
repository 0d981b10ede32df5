//! Command framing and response decoding for the MPD text protocol.
//!
//! A request is one line. A response is zero or more content lines followed
//! by either `OK` or a single `ACK ...` line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::error::{MpdError, MpdResult};

pub const OK: &str = "OK";
pub const ACK_PREFIX: &str = "ACK ";
pub const GREETING_PREFIX: &str = "OK MPD ";

/// What a single response line means for the cycle it belongs to.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Ok,
    Ack(&'a str),
    Content(&'a str),
}

pub fn classify(line: &str) -> Line<'_> {
    if line == OK {
        Line::Ok
    } else if line.starts_with(ACK_PREFIX) {
        Line::Ack(line)
    } else {
        Line::Content(line)
    }
}

/// Quote a command argument: backslashes doubled, quotes escaped, wrapped in quotes.
pub fn quote(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Bytes to put on the wire for `command`.
pub fn encode(command: &str) -> MpdResult<Vec<u8>> {
    if command.contains(['\n', '\r']) {
        return Err(MpdError::InvalidCommand(command.to_string()));
    }
    let mut buf = Vec::with_capacity(command.len() + 1);
    buf.extend_from_slice(command.as_bytes());
    buf.push(b'\n');
    Ok(buf)
}

/// Decode a response that has already been split into lines.
pub fn decode<'a, I>(lines: I) -> MpdResult<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut content = Vec::new();
    for line in lines {
        match classify(line) {
            Line::Ok => return Ok(content),
            Line::Ack(ack) => return Err(MpdError::Command(ack.to_string())),
            Line::Content(c) => content.push(c.to_string()),
        }
    }
    Err(MpdError::Protocol("response ended before OK".to_string()))
}

/// Read one line, without its terminator. `None` on end of stream.
pub async fn read_line<R>(reader: &mut R) -> MpdResult<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = String::new();
    let n = reader.read_line(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    let trimmed = buf.trim_end_matches(['\r', '\n']).len();
    buf.truncate(trimmed);
    Ok(Some(buf))
}

/// Read one full response off the stream.
pub async fn read_response<R>(reader: &mut R) -> MpdResult<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    loop {
        let Some(line) = read_line(reader).await? else {
            return Err(MpdError::Protocol(
                "connection closed before OK".to_string(),
            ));
        };
        let terminal = !matches!(classify(&line), Line::Content(_));
        lines.push(line);
        if terminal {
            return decode(lines.iter().map(String::as_str));
        }
    }
}
