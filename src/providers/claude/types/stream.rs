use serde::Deserialize;

/// Event name carrying incremental content.
pub const CONTENT_BLOCK_DELTA: &str = "content_block_delta";

/// Payload of a `content_block_delta` event. Only the delta itself matters here.
#[derive(Debug, Deserialize)]
pub struct ContentBlockDelta {
    pub delta: DeltaEvent,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum DeltaEvent {
    #[serde(rename = "thinking_delta")]
    ThinkingDelta { thinking: String },
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    /// `input_json_delta`, `signature_delta` and anything newer
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deltas() {
        let payload: ContentBlockDelta = serde_json::from_str(
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#,
        )
        .unwrap();
        assert_eq!(
            payload.delta,
            DeltaEvent::TextDelta {
                text: "Hi".to_string()
            }
        );

        let payload: ContentBlockDelta = serde_json::from_str(
            r#"{"delta":{"type":"thinking_delta","thinking":"Let me "}}"#,
        )
        .unwrap();
        assert_eq!(
            payload.delta,
            DeltaEvent::ThinkingDelta {
                thinking: "Let me ".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_delta_type() {
        let payload: ContentBlockDelta = serde_json::from_str(
            r#"{"delta":{"type":"input_json_delta","partial_json":"{\"a\""}}"#,
        )
        .unwrap();
        assert_eq!(payload.delta, DeltaEvent::Unknown);
    }
}
