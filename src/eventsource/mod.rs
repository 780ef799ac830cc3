//! Server-Sent Events framing.
//!
//! [`EventBuffer`] accumulates raw bytes as they arrive and hands out complete
//! blank-line-terminated blocks. [`Field`] classifies the individual lines of a
//! block. Interpreting the fields is left to the consumer so that it can act on
//! a `data:` line the moment it is seen.

use memchr::memmem;
use std::fmt::{self, Display, Formatter};

const EVENT_DELIMITER: &[u8] = b"\n\n";
const FIELD_SEPARATOR: char = ':';

/// Growing byte buffer holding not-yet-terminated event text.
///
/// Bytes are kept undecoded until a full block is extracted, so a chunk that
/// ends in the middle of a multi-byte character is harmless.
#[derive(Debug, Default)]
pub struct EventBuffer {
    buffer: Vec<u8>,
    /// Offset up to which the buffer is known to hold no delimiter
    scanned: usize,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
            scanned: 0,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Removes and returns the first complete block, without its terminator.
    pub fn next_block(&mut self) -> Option<String> {
        // A delimiter may straddle the previous scan end by one byte
        let start = self.scanned.saturating_sub(EVENT_DELIMITER.len() - 1);
        match memmem::find(&self.buffer[start..], EVENT_DELIMITER) {
            Some(offset) => {
                let event_end = start + offset;
                let block = String::from_utf8_lossy(&self.buffer[..event_end]).into_owned();
                self.buffer.drain(..event_end + EVENT_DELIMITER.len());
                self.scanned = 0;
                Some(block)
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Drains whatever is left once the stream has ended.
    ///
    /// Returns `None` when the remainder is only whitespace.
    pub fn take_remaining(&mut self) -> Option<String> {
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buffer);
        let rest = String::from_utf8_lossy(&rest);
        (!rest.trim().is_empty()).then(|| rest.into_owned())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// A single classified line of an event block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// `event: <name>`
    Event(&'a str),
    /// `data: <payload>`
    Data(&'a str),
    /// Comments, `id:`, `retry:` and unknown fields
    Ignored,
}

impl<'a> Field<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line.split_once(FIELD_SEPARATOR) {
            Some(("event", value)) => Self::Event(value.trim_start()),
            Some(("data", value)) => Self::Data(value.trim_start()),
            _ => Self::Ignored,
        }
    }
}

/// One logical event, alive only for the duration of its dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    /// `None` when the block carried no `event:` line
    pub event_type: Option<&'a str>,
    pub data: &'a str,
}

impl Display for Event<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event {{ event_type: {:?}, data: {} }}",
            self.event_type, self.data
        )
    }
}
