//! JSON envelopes exchanged between the relay and the bridge client.
//!
//! Commands flow server → client; responses and events flow client →
//! server. Command ids are opaque strings chosen by the sender and are not
//! checked for uniqueness.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What the client should do with the open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Save the document.
    Save,
    /// Replace (or append to) the document body.
    Replace,
}

/// Encoding of [`ReplacePayload::content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain UTF-8 text.
    #[default]
    Text,
    /// HTML markup.
    Html,
    /// Base64-encoded binary document.
    Base64,
}

impl ContentType {
    /// Parses the wire name (`text`, `html`, `base64`), ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "html" => Some(Self::Html),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }

    /// Picks a content type from an uploaded file name.
    ///
    /// `.txt`/`.md` are sent as text, `.html`/`.htm` as HTML, and anything
    /// else travels base64-encoded.
    #[must_use]
    pub fn infer_from_filename(filename: &str) -> Self {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt" | "md") => Self::Text,
            Some("html" | "htm") => Self::Html,
            _ => Self::Base64,
        }
    }
}

/// Where new content lands in the document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Clear the body first.
    #[default]
    Replace,
    /// Insert after the existing body.
    Append,
}

/// Optional knobs carried by a `replace` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOptions {
    /// Font family forced onto the whole body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Font size in points forced onto the whole body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Abort unless the open document lives at this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_path: Option<String>,
    /// Replace the body or append to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

/// Body of a `replace` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReplacePayload {
    /// Document content, encoded according to `type`.
    pub content: String,
    /// Encoding of `content`.
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    /// Optional styling and safety options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ReplaceOptions>,
}

/// Server → client command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Requested action.
    pub action: Action,
    /// Correlation id echoed in the client's response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Replace payload; absent for `save`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ReplacePayload>,
}

impl Command {
    /// Builds a `save` command.
    #[must_use]
    pub fn save(id: impl Into<String>) -> Self {
        Self {
            action: Action::Save,
            id: Some(id.into()),
            payload: None,
        }
    }

    /// Builds a `replace` command.
    #[must_use]
    pub fn replace(id: impl Into<String>, payload: ReplacePayload) -> Self {
        Self {
            action: Action::Replace,
            id: Some(id.into()),
            payload: Some(payload),
        }
    }
}

/// Outcome reported in a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    /// The command was applied.
    Success,
    /// The command failed; see `message`.
    Error,
}

/// Client's answer to a command, correlated by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    /// Id of the command being answered.
    pub id: String,
    /// Outcome.
    pub status: ReplyStatus,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Unsolicited notifications a client may raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The document went from dirty to saved.
    Saved,
}

/// Client → server envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Response to a command.
    Response(CommandReply),
    /// Unsolicited event.
    Event {
        /// Event discriminator.
        event: EventKind,
        /// Full path of the document concerned.
        path: String,
    },
}

impl ClientMessage {
    /// Success response for command `id`.
    #[must_use]
    pub fn success(id: impl Into<String>) -> Self {
        Self::Response(CommandReply {
            id: id.into(),
            status: ReplyStatus::Success,
            message: None,
        })
    }

    /// Error response for command `id`.
    #[must_use]
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Response(CommandReply {
            id: id.into(),
            status: ReplyStatus::Error,
            message: Some(message.into()),
        })
    }

    /// `saved` event for the document at `path`.
    #[must_use]
    pub fn saved(path: impl Into<String>) -> Self {
        Self::Event {
            event: EventKind::Saved,
            path: path.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn save_command_has_no_payload_on_the_wire() {
        let Ok(json) = serde_json::to_value(Command::save("c1")) else {
            panic!("serialization failed");
        };
        assert_eq!(json, serde_json::json!({"action": "save", "id": "c1"}));
    }

    #[test]
    fn replace_command_uses_camel_case_options() {
        let payload = ReplacePayload {
            content: "hi".into(),
            content_type: ContentType::Html,
            options: Some(ReplaceOptions {
                font_name: Some("Arial".into()),
                check_path: Some("C:/a.docx".into()),
                ..ReplaceOptions::default()
            }),
        };
        let Ok(json) = serde_json::to_value(Command::replace("c2", payload)) else {
            panic!("serialization failed");
        };
        assert_eq!(json["action"], "replace");
        assert_eq!(json["payload"]["type"], "html");
        assert_eq!(json["payload"]["options"]["fontName"], "Arial");
        assert_eq!(json["payload"]["options"]["checkPath"], "C:/a.docx");
        assert!(json["payload"]["options"].get("fontSize").is_none());
    }

    #[test]
    fn command_without_id_or_type_parses() {
        let raw = r#"{"action":"replace","payload":{"content":"x"}}"#;
        let Ok(cmd) = serde_json::from_str::<Command>(raw) else {
            panic!("should parse");
        };
        assert!(cmd.id.is_none());
        let Some(payload) = cmd.payload else {
            panic!("payload expected");
        };
        assert_eq!(payload.content_type, ContentType::Text);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let raw = r#"{"action":"print","id":"1"}"#;
        assert!(serde_json::from_str::<Command>(raw).is_err());
    }

    #[test]
    fn response_envelope_shape() {
        let Ok(json) = serde_json::to_value(ClientMessage::error("7", "Document path mismatch"))
        else {
            panic!("serialization failed");
        };
        assert_eq!(
            json,
            serde_json::json!({
                "type": "response",
                "id": "7",
                "status": "error",
                "message": "Document path mismatch"
            })
        );
    }

    #[test]
    fn saved_event_parses() {
        let raw = r#"{"type":"event","event":"saved","path":"C:\\docs\\a.docx"}"#;
        let Ok(msg) = serde_json::from_str::<ClientMessage>(raw) else {
            panic!("should parse");
        };
        assert_eq!(msg, ClientMessage::saved("C:\\docs\\a.docx"));
    }

    #[test]
    fn content_type_parse_and_infer() {
        assert_eq!(ContentType::parse(" HTML "), Some(ContentType::Html));
        assert_eq!(ContentType::parse("pdf"), None);
        assert_eq!(ContentType::infer_from_filename("notes.TXT"), ContentType::Text);
        assert_eq!(ContentType::infer_from_filename("page.htm"), ContentType::Html);
        assert_eq!(ContentType::infer_from_filename("report.docx"), ContentType::Base64);
        assert_eq!(ContentType::infer_from_filename("no_extension"), ContentType::Base64);
    }
}
