//! Header framing and status-line parsing.
//!
//! Replies carry no length prefix: the header block ends at the first blank
//! line (`\r\n\r\n`) and everything after it is body.

use crate::error::ResponseError;

/// Blank line separating the header block from the body.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Split a raw reply into `(header block, body)`.
///
/// Returns `None` when there is no terminator or the header block is empty.
pub fn split(raw: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = raw
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)?;
    if pos == 0 {
        return None;
    }
    Some((&raw[..pos], &raw[pos + HEADER_TERMINATOR.len()..]))
}

/// Parsed status line and header fields of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    protocol: String,
    status_code: u16,
    status_message: String,
    /// Insertion-ordered; names are unique ignoring ASCII case.
    fields: Vec<(String, String)>,
}

impl ResponseHeader {
    /// Parse a header block (without the trailing blank line).
    ///
    /// Field lines without a colon, or with an empty name, are skipped. A
    /// repeated field keeps its first position and takes the last value.
    pub fn parse(block: &[u8]) -> Result<Self, ResponseError> {
        let text = String::from_utf8_lossy(block);
        let mut lines = text.split('\n').map(|l| l.trim_end_matches('\r'));

        let status_line = lines.next().unwrap_or_default();
        let mut header = Self::parse_status_line(status_line)?;

        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            header.set(name, value.trim());
        }

        Ok(header)
    }

    fn parse_status_line(line: &str) -> Result<Self, ResponseError> {
        let malformed = || ResponseError::MalformedStatusLine(line.to_string());

        let (protocol, rest) = line.trim().split_once(char::is_whitespace).ok_or_else(malformed)?;
        let rest = rest.trim_start();
        let (code, status_message) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        let status_code = code.parse::<u16>().map_err(|_| malformed())?;
        let status_message = status_message.trim();

        Ok(Self {
            protocol: protocol.to_string(),
            status_code,
            status_message: status_message.to_string(),
            fields: Vec::new(),
        })
    }

    fn set(&mut self, name: &str, value: &str) {
        match self
            .fields
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Protocol token from the status line, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Look up a field by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fields in the order they first appeared.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
