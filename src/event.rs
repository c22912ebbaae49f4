// event.rs - outbound payloads for the onSpeechEvent signal
use serde::Serialize;

/// One outbound notification. Serialized with the variant name under `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpeechEvent {
    Listening { active: bool },
    Transcription { text: String },
    Error { message: String },
}

impl SpeechEvent {
    pub fn listening(active: bool) -> Self {
        SpeechEvent::Listening { active }
    }

    pub fn transcription(text: impl Into<String>) -> Self {
        SpeechEvent::Transcription { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SpeechEvent::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SpeechEvent::Listening { .. } => "listening",
            SpeechEvent::Transcription { .. } => "transcription",
            SpeechEvent::Error { .. } => "error",
        }
    }

    /// JSON string handed to the host. Never fails: a serialization error
    /// degrades to an empty object.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Failed to encode {} event: {}", self.kind(), e);
            "{}".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn listening_payload_carries_active_flag() {
        let payload = SpeechEvent::listening(true).to_payload();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value, json!({ "type": "listening", "active": true }));
    }

    #[test]
    fn transcription_payload_matches_wire_format() {
        let payload = SpeechEvent::transcription("open the door").to_payload();
        assert_eq!(payload, r#"{"type":"transcription","text":"open the door"}"#);
    }

    #[test]
    fn error_payload_keeps_raw_code() {
        let payload = SpeechEvent::error("7").to_payload();
        assert_eq!(payload, r#"{"type":"error","message":"7"}"#);
    }

    #[test]
    fn text_is_json_escaped() {
        let payload = SpeechEvent::transcription("say \"hi\"\n").to_payload();
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["text"], "say \"hi\"\n");
    }

    #[test]
    fn kind_matches_serialized_type() {
        for event in [
            SpeechEvent::listening(false),
            SpeechEvent::transcription(""),
            SpeechEvent::error("1"),
        ] {
            let value: Value = serde_json::from_str(&event.to_payload()).unwrap();
            assert_eq!(value["type"], event.kind());
        }
    }
}
