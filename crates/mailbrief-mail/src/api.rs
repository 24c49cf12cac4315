//! Gmail API response types and their mapping onto the core payload tree.

use serde::{Deserialize, Serialize};

use mailbrief_core::types::Payload;

/// Response from listing messages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Option<Vec<MessageRef>>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u32>,
}

/// Reference to a message (just ID and thread ID).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: Option<String>,
}

/// Full message from the Gmail API (`format=full`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    pub thread_id: Option<String>,
    pub label_ids: Option<Vec<String>>,
    pub snippet: Option<String>,
    pub payload: Option<MessagePart>,
}

impl GmailMessage {
    /// First header value named `name` on the top-level part (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .as_ref()?
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Email header (name-value pair).
#[derive(Debug, Deserialize, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Message body. `data` is URL-safe base64; large attachments carry an
/// `attachmentId` instead.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub size: Option<u64>,
    pub data: Option<String>,
    pub attachment_id: Option<String>,
}

/// One MIME part; the top-level payload has the same shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub part_id: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<MessageBody>,
    pub parts: Option<Vec<MessagePart>>,
}

impl From<&MessagePart> for Payload {
    /// A part with a `parts` array is a container, even if the array is empty.
    fn from(part: &MessagePart) -> Self {
        let content_type = part.mime_type.clone().unwrap_or_default();
        match &part.parts {
            Some(children) => Payload::Container {
                content_type,
                children: children.iter().map(Payload::from).collect(),
            },
            None => Payload::Leaf {
                content_type,
                data: part.body.as_ref().and_then(|b| b.data.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_message() -> GmailMessage {
        serde_json::from_value(json!({
            "id": "18c1",
            "threadId": "18c1",
            "labelIds": ["INBOX", "UNREAD"],
            "snippet": "Hello there",
            "payload": {
                "partId": "",
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "From", "value": "Alice <alice@example.com>"},
                    {"name": "Subject", "value": "Lunch tomorrow?"}
                ],
                "body": {"size": 0},
                "parts": [
                    {"partId": "0", "mimeType": "text/plain", "body": {"size": 5, "data": "SGVsbG8="}},
                    {"partId": "1", "mimeType": "text/html", "body": {"size": 12, "data": "PGI-SGk8L2I-"}}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_header_lookup() {
        let msg = sample_message();
        assert_eq!(msg.header("Subject"), Some("Lunch tomorrow?"));
        assert_eq!(msg.header("subject"), Some("Lunch tomorrow?"));
        assert_eq!(msg.header("Cc"), None);
    }

    #[test]
    fn test_header_without_payload() {
        let msg: GmailMessage = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(msg.header("Subject"), None);
    }

    #[test]
    fn test_payload_conversion() {
        let msg = sample_message();
        let payload = Payload::from(msg.payload.as_ref().unwrap());

        match payload {
            Payload::Container {
                content_type,
                children,
            } => {
                assert_eq!(content_type, "multipart/alternative");
                assert_eq!(children.len(), 2);
                assert_eq!(children[0], Payload::leaf("text/plain", "SGVsbG8="));
            }
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_parts_array_is_container() {
        let part: MessagePart = serde_json::from_value(json!({
            "mimeType": "multipart/mixed",
            "body": {"data": "SGk="},
            "parts": []
        }))
        .unwrap();
        assert_eq!(
            Payload::from(&part),
            Payload::container("multipart/mixed", vec![])
        );
    }

    #[test]
    fn test_attachment_part_has_no_data() {
        let part: MessagePart = serde_json::from_value(json!({
            "mimeType": "application/pdf",
            "filename": "invoice.pdf",
            "body": {"size": 40000, "attachmentId": "ANGjdJ8"}
        }))
        .unwrap();
        assert_eq!(Payload::from(&part), Payload::empty_leaf("application/pdf"));
    }

    #[test]
    fn test_list_response_without_messages() {
        let resp: ListMessagesResponse =
            serde_json::from_value(json!({"resultSizeEstimate": 0})).unwrap();
        assert!(resp.messages.is_none());
    }
}
