use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ClientError;
use crate::utils::truncate_chars;

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 50;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    System,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self { role: Role::Ai, text: text.into() }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self { role: Role::System, text: text.into() }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Chat {
    pub title: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(model: String, messages: Vec<Message>) -> Self {
        Self {
            title: Self::derive_title(&messages),
            model,
            messages,
        }
    }

    /// Title is the first line of the first user message, or of the first
    /// message when nobody has spoken yet.
    pub fn derive_title(messages: &[Message]) -> String {
        let source = messages
            .iter()
            .find(|m| m.role == Role::User)
            .or_else(|| messages.first());

        let first_line = source
            .and_then(|m| m.text.lines().map(str::trim).find(|l| !l.is_empty()))
            .unwrap_or("");

        if first_line.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            truncate_chars(first_line, TITLE_MAX_CHARS).to_string()
        }
    }
}

/// All chats keyed by their creation timestamp id.
pub type ChatStore = BTreeMap<String, Chat>;

/// Chat ids, newest first.
pub fn ids_newest_first(store: &ChatStore) -> Vec<String> {
    let mut ids: Vec<&String> = store.keys().collect();
    ids.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        _ => b.cmp(a),
    });
    ids.into_iter().cloned().collect()
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AppSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub selected_model: String,
    #[serde(default = "default_true")]
    pub search_enabled: bool,
    #[serde(default = "default_document_context_chars")]
    pub document_context_chars: usize,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_true() -> bool {
    true
}

fn default_document_context_chars() -> usize {
    3000
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            selected_model: String::new(),
            search_enabled: true,
            document_context_chars: default_document_context_chars(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::Text
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Text => "text",
        }
    }
}

/// A document attached to the open chat. Lives in memory only.
#[derive(Clone, PartialEq, Debug)]
pub struct UploadedDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub text: String,
}

// Inference server DTOs

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ModelTag {
    pub name: String,
}

#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateChunk {
    /// A chunk carrying `error` means the server gave up mid-stream.
    pub fn into_result(self) -> Result<Self, ClientError> {
        match self.error {
            Some(err) => Err(ClientError::Server(err)),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::ai("hi")).unwrap();
        assert_eq!(json, r#"{"role":"ai","text":"hi"}"#);

        let msg: Message = serde_json::from_str(r#"{"role":"system","text":"x"}"#).unwrap();
        assert_eq!(msg.role, Role::System);
    }

    #[test]
    fn title_prefers_first_user_message() {
        let messages = vec![
            Message::system("🔍 Web search: something"),
            Message::user("How do I sort a vec?\nwith details"),
            Message::ai("Use sort()"),
        ];
        assert_eq!(Chat::derive_title(&messages), "How do I sort a vec?");
    }

    #[test]
    fn title_falls_back_and_truncates() {
        assert_eq!(Chat::derive_title(&[]), DEFAULT_TITLE);
        assert_eq!(Chat::derive_title(&[Message::user("   ")]), DEFAULT_TITLE);

        let long = "x".repeat(80);
        let title = Chat::derive_title(&[Message::system(long)]);
        assert_eq!(title.chars().count(), 50);
    }

    #[test]
    fn ids_sort_numerically_newest_first() {
        let mut store = ChatStore::new();
        for id in &["999", "1700000000000", "1700000000500"] {
            store.insert(id.to_string(), Chat::new(String::new(), vec![]));
        }
        assert_eq!(
            ids_newest_first(&store),
            vec!["1700000000500", "1700000000000", "999"]
        );
    }

    #[test]
    fn store_round_trips_as_json_object() {
        let mut store = ChatStore::new();
        store.insert(
            "1".into(),
            Chat::new("llama3".into(), vec![Message::user("hello")]),
        );
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["1"]["title"], "hello");
        assert_eq!(json["1"]["model"], "llama3");
        assert_eq!(json["1"]["messages"][0]["role"], "user");
    }

    #[test]
    fn settings_fill_missing_fields() {
        let s: AppSettings = serde_json::from_str(r#"{"selected_model":"mistral"}"#).unwrap();
        assert_eq!(s.base_url, "http://localhost:11434");
        assert_eq!(s.selected_model, "mistral");
        assert!(s.search_enabled);
        assert_eq!(s.document_context_chars, 3000);
    }

    #[test]
    fn document_kind_by_suffix() {
        assert_eq!(DocumentKind::from_filename("Report.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("notes.docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("notes.doc"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_filename("README"), DocumentKind::Text);
    }

    #[test]
    fn generate_chunk_tolerates_missing_fields() {
        let c: GenerateChunk = serde_json::from_str(r#"{"model":"m","done":true}"#).unwrap();
        assert!(c.done);
        assert_eq!(c.response, None);
    }
}
