//! Incremental decoder for the Messages streaming protocol.
//!
//! Bytes are pushed in with [`StreamDecoder::feed`] as the transport delivers
//! them. Every complete event is dispatched immediately and the resulting
//! [`MessageChunk`]s are handed back in arrival order, while the reasoning
//! trace and the answer are accumulated for [`StreamDecoder::finalize`].

use log::trace;

use super::types::{ContentBlockDelta, DeltaEvent, CONTENT_BLOCK_DELTA};
use crate::eventsource::{Event, EventBuffer, Field};
use crate::providers::{AccumulatedResult, MessageChunk};

#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: EventBuffer,
    result: AccumulatedResult,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            pending: EventBuffer::new(),
            result: AccumulatedResult::new(),
        }
    }

    /// Ingests one chunk and dispatches every event it completes.
    ///
    /// A trailing partial event stays buffered until a later chunk finishes it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<MessageChunk> {
        let mut updates = Vec::new();
        self.pending.push(chunk);
        while let Some(block) = self.pending.next_block() {
            self.dispatch_block(&block, &mut updates);
        }
        updates
    }

    /// Dispatches a final block the stream never terminated with a blank line.
    ///
    /// Unlike [`feed`](Self::feed), which never dispatches a partial block,
    /// this treats whatever is still buffered as complete: a well-formed
    /// trailing event is counted, a truncated payload fails to parse and is
    /// dropped.
    pub fn flush(&mut self) -> Vec<MessageChunk> {
        let mut updates = Vec::new();
        if let Some(block) = self.pending.take_remaining() {
            self.dispatch_block(&block, &mut updates);
        }
        updates
    }

    /// Text accumulated so far.
    pub const fn result(&self) -> &AccumulatedResult {
        &self.result
    }

    /// Consumes the decoder and returns everything accumulated.
    ///
    /// Calls [`flush`](Self::flush) first, so an unterminated but valid final
    /// event is included in the result.
    pub fn finalize(mut self) -> AccumulatedResult {
        self.flush();
        self.result
    }

    fn dispatch_block(&mut self, block: &str, updates: &mut Vec<MessageChunk>) {
        // The event type never carries over from a previous block
        let mut event_type = None;
        for line in block.lines() {
            match Field::parse(line) {
                Field::Event(name) => event_type = Some(name),
                Field::Data(data) => self.dispatch(Event { event_type, data }, updates),
                Field::Ignored => {}
            }
        }
    }

    fn dispatch(&mut self, event: Event<'_>, updates: &mut Vec<MessageChunk>) {
        if event.event_type != Some(CONTENT_BLOCK_DELTA) {
            trace!("[Decoder] skipping {event}");
            return;
        }

        let payload: ContentBlockDelta = match serde_json::from_str(event.data) {
            Ok(payload) => payload,
            Err(e) => {
                trace!("[Decoder] dropping malformed {event}: {e}");
                return;
            }
        };

        match payload.delta {
            DeltaEvent::ThinkingDelta { thinking } => self.push_thinking(thinking, updates),
            DeltaEvent::TextDelta { text } => self.push_text(text, updates),
            DeltaEvent::Unknown => trace!("[Decoder] ignoring unknown delta in {event}"),
        }
    }

    fn push_thinking(&mut self, thinking: String, updates: &mut Vec<MessageChunk>) {
        if !self.result.thinking_started && !thinking.is_empty() {
            self.result.thinking_started = true;
            updates.push(MessageChunk::ThinkingStart);
        }
        self.result.thinking.push_str(&thinking);
        updates.push(MessageChunk::Thinking(thinking));
    }

    fn push_text(&mut self, text: String, updates: &mut Vec<MessageChunk>) {
        if !self.result.response_started {
            self.result.response_started = true;
            if self.result.thinking_started {
                updates.push(MessageChunk::TextStart);
            }
        }
        self.result.response.push_str(&text);
        updates.push(MessageChunk::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THINKING_STREAM: &str = concat!(
        "event: content_block_delta\n",
        "data: {\"delta\":{\"type\":\"thinking_delta\",\"thinking\":\"Let me \"}}\n\n",
        "event: content_block_delta\n",
        "data: {\"delta\":{\"type\":\"thinking_delta\",\"thinking\":\"think.\"}}\n\n",
        "event: content_block_delta\n",
        "data: {\"delta\":{\"type\":\"text_delta\",\"text\":\"42\"}}\n\n",
    );

    fn text_event(text: &str) -> String {
        format!(
            "event: content_block_delta\ndata: {}\n\n",
            serde_json::json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "text_delta", "text": text}
            })
        )
    }

    fn decode_whole(stream: &str) -> AccumulatedResult {
        let mut decoder = StreamDecoder::new();
        decoder.feed(stream.as_bytes());
        decoder.finalize()
    }

    #[test]
    fn test_thinking_then_text() {
        let result = decode_whole(THINKING_STREAM);
        assert_eq!(result.thinking, "Let me think.");
        assert_eq!(result.response, "42");
        assert!(result.thinking_started);
        assert!(result.response_started);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let stream = format!(
            "event: message_start\ndata: {{\"type\":\"message_start\"}}\n\n{THINKING_STREAM}{}",
            text_event("ünïcødé ✓")
        );
        let expected = decode_whole(&stream);
        assert_eq!(expected.response, "42ünïcødé ✓");

        let bytes = stream.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = StreamDecoder::new();
            decoder.feed(&bytes[..split]);
            decoder.feed(&bytes[split..]);
            assert_eq!(decoder.finalize(), expected, "split at byte {split}");
        }

        let mut decoder = StreamDecoder::new();
        for byte in bytes {
            decoder.feed(std::slice::from_ref(byte));
        }
        assert_eq!(decoder.finalize(), expected);
    }

    #[test]
    fn test_order_preserved_across_arbitrary_chunks() {
        let stream: String = ["a", "b", "c"].iter().map(|t| text_event(t)).collect();
        let bytes = stream.as_bytes();
        let mut decoder = StreamDecoder::new();
        for chunk in bytes.chunks(7) {
            decoder.feed(chunk);
        }
        assert_eq!(decoder.finalize().response, "abc");
    }

    #[test]
    fn test_malformed_event_does_not_abort() {
        let stream = format!(
            "{}event: content_block_delta\ndata: {{\"delta\": {{not json\n\n{}",
            text_event("before "),
            text_event("after")
        );
        assert_eq!(decode_whole(&stream).response, "before after");
    }

    #[test]
    fn test_unknown_events_are_noops() {
        let stream = concat!(
            "event: ping\ndata: {\"type\": \"ping\"}\n\n",
            "event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n",
            "event: content_block_delta\n",
            "data: {\"delta\":{\"type\":\"input_json_delta\",\"partial_json\":\"{}\"}}\n\n",
            "event: content_block_delta\ndata: {\"index\":0}\n\n",
        );
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(stream.as_bytes()).is_empty());
        assert_eq!(decoder.finalize(), AccumulatedResult::default());
    }

    #[test]
    fn test_event_type_is_scoped_to_its_block() {
        // The second block has no `event:` line and must not inherit the first one's type
        let stream = concat!(
            "event: content_block_delta\n",
            "data: {\"delta\":{\"type\":\"text_delta\",\"text\":\"kept\"}}\n\n",
            "data: {\"delta\":{\"type\":\"text_delta\",\"text\":\"leaked\"}}\n\n",
        );
        assert_eq!(decode_whole(stream).response, "kept");
    }

    #[test]
    fn test_each_data_line_in_a_block_is_dispatched() {
        let data = |text: &str| {
            serde_json::json!({"type": "content_block_delta", "delta": {"type": "text_delta", "text": text}})
        };
        let stream = format!(
            "event: content_block_delta\ndata: {}\ndata: {}\n\n",
            data("a"),
            data("b")
        );
        let mut decoder = StreamDecoder::new();
        assert_eq!(
            decoder.feed(stream.as_bytes()),
            vec![
                MessageChunk::Text("a".to_string()),
                MessageChunk::Text("b".to_string())
            ]
        );
        assert_eq!(decoder.finalize().response, "ab");
    }

    #[test]
    fn test_updates_surface_per_feed() {
        let mut decoder = StreamDecoder::new();
        let bytes = THINKING_STREAM.as_bytes();
        let (first, rest) = bytes.split_at(20);

        assert!(decoder.feed(first).is_empty());
        assert_eq!(
            decoder.feed(rest),
            vec![
                MessageChunk::ThinkingStart,
                MessageChunk::Thinking("Let me ".to_string()),
                MessageChunk::Thinking("think.".to_string()),
                MessageChunk::TextStart,
                MessageChunk::Text("42".to_string()),
            ]
        );
        assert_eq!(decoder.result().response, "42");
    }

    #[test]
    fn test_no_text_start_without_thinking() {
        let mut decoder = StreamDecoder::new();
        let updates = decoder.feed(format!("{}{}", text_event("a"), text_event("b")).as_bytes());
        assert_eq!(
            updates,
            vec![
                MessageChunk::Text("a".to_string()),
                MessageChunk::Text("b".to_string())
            ]
        );
    }

    #[test]
    fn test_empty_thinking_fragment_is_not_announced() {
        let stream = concat!(
            "event: content_block_delta\n",
            "data: {\"delta\":{\"type\":\"thinking_delta\",\"thinking\":\"\"}}\n\n",
        );
        let mut decoder = StreamDecoder::new();
        let updates = decoder.feed(stream.as_bytes());
        assert_eq!(updates, vec![MessageChunk::Thinking(String::new())]);
        assert!(!decoder.finalize().thinking_started);
    }

    #[test]
    fn test_flush_dispatches_unterminated_block() {
        let stream = text_event("tail");
        let stream = stream.trim_end();
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(stream.as_bytes()).is_empty());
        assert_eq!(decoder.flush(), vec![MessageChunk::Text("tail".to_string())]);
        assert_eq!(decoder.finalize().response, "tail");
    }

    #[test]
    fn test_truncated_tail_is_dropped() {
        let stream = format!(
            "{}event: content_block_delta\ndata: {{\"delta\":{{\"type\":\"text_delta\",\"te",
            text_event("whole")
        );
        assert_eq!(decode_whole(&stream).response, "whole");
    }

    #[test]
    fn test_crlf_lines() {
        let stream = "event: content_block_delta\r\ndata: {\"delta\":{\"type\":\"text_delta\",\"text\":\"x\"}}\r\n\n";
        assert_eq!(decode_whole(stream).response, "x");
    }
}
