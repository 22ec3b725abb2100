use std::rc::Rc;
use yew::Reducible;

use crate::models::{Chat, ChatStore, Message, Role, UploadedDocument};

/// Everything the chat view renders. Async tasks dispatch into it so their
/// updates land on the latest state rather than a captured copy.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Session {
    pub chats: ChatStore,
    pub current_id: String,
    pub messages: Vec<Message>,
    pub model: String,
    pub models: Vec<String>,
    pub document: Option<UploadedDocument>,
    pub is_loading: bool,
    /// Bumped whenever `chats` should be written back to storage.
    pub revision: u64,
}

pub enum SessionAction {
    SetModels(Vec<String>),
    SelectModel(String),
    Push(Message),
    /// Replaces the text of the newest AI message, used while a reply
    /// streams. Notices pushed meanwhile are left alone.
    SetReplyText(String),
    Attach(UploadedDocument),
    SetLoading(bool),
    Save,
    NewChat(String),
    Load { id: String, fallback_id: String },
    Delete { id: String, fallback_id: String },
    ClearAll(String),
}

impl Session {
    pub fn restore(chats: ChatStore, current_id: Option<String>, model: String, new_id: String) -> Self {
        let session = Session { chats, model, ..Session::default() };
        match current_id {
            Some(id) if session.chats.contains_key(&id) => session.open(&id),
            _ => session.start(new_id),
        }
    }

    fn open(mut self, id: &str) -> Self {
        if let Some(chat) = self.chats.get(id) {
            self.messages = chat.messages.clone();
            if !chat.model.is_empty() {
                self.model = chat.model.clone();
            }
            self.current_id = id.to_string();
            self.document = None;
        }
        self
    }

    fn start(mut self, id: String) -> Self {
        self.current_id = id;
        self.messages.clear();
        self.document = None;
        self.save()
    }

    fn save(mut self) -> Self {
        if !self.current_id.is_empty() {
            let chat = Chat::new(self.model.clone(), self.messages.clone());
            self.chats.insert(self.current_id.clone(), chat);
        }
        self.revision += 1;
        self
    }
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let next = match action {
            SessionAction::SetModels(models) => {
                if !models.contains(&next.model) {
                    next.model = models.first().cloned().unwrap_or_default();
                }
                next.models = models;
                next
            }
            SessionAction::SelectModel(model) => {
                next.model = model;
                next
            }
            SessionAction::Push(message) => {
                next.messages.push(message);
                next
            }
            SessionAction::SetReplyText(text) => {
                match next.messages.iter_mut().rev().find(|m| m.role == Role::Ai) {
                    Some(reply) => reply.text = text,
                    None => log::warn!("no AI message to stream into"),
                }
                next
            }
            SessionAction::Attach(doc) => {
                next.document = Some(doc);
                next
            }
            SessionAction::SetLoading(loading) => {
                next.is_loading = loading;
                next
            }
            SessionAction::Save => next.save(),
            SessionAction::NewChat(id) => next.start(id),
            SessionAction::Load { id, fallback_id } => {
                if next.chats.contains_key(&id) {
                    next.open(&id)
                } else {
                    log::warn!("chat {} not found, starting a new one", id);
                    next.start(fallback_id)
                }
            }
            SessionAction::Delete { id, fallback_id } => {
                next.chats.remove(&id);
                if id == next.current_id {
                    next.start(fallback_id)
                } else {
                    next.revision += 1;
                    next
                }
            }
            SessionAction::ClearAll(id) => {
                next.chats.clear();
                next.start(id)
            }
        };
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentKind;

    fn reduce(state: Session, action: SessionAction) -> Session {
        (*Rc::new(state).reduce(action)).clone()
    }

    fn with_chat(id: &str, model: &str, text: &str) -> ChatStore {
        let mut store = ChatStore::new();
        store.insert(id.into(), Chat::new(model.into(), vec![Message::user(text)]));
        store
    }

    #[test]
    fn restore_opens_saved_chat() {
        let s = Session::restore(with_chat("10", "llama3", "hi"), Some("10".into()), "other".into(), "99".into());
        assert_eq!(s.current_id, "10");
        assert_eq!(s.model, "llama3");
        assert_eq!(s.messages, vec![Message::user("hi")]);
        assert_eq!(s.revision, 0);
    }

    #[test]
    fn restore_without_saved_chat_starts_and_saves_one() {
        let s = Session::restore(ChatStore::new(), Some("missing".into()), "m".into(), "99".into());
        assert_eq!(s.current_id, "99");
        assert!(s.messages.is_empty());
        assert_eq!(s.chats["99"].title, "New Chat");
        assert_eq!(s.revision, 1);
    }

    #[test]
    fn streaming_replaces_last_message_then_save_persists() {
        let s = Session::restore(ChatStore::new(), None, "m".into(), "1".into());
        let s = reduce(s, SessionAction::Push(Message::user("Tell me a joke")));
        let s = reduce(s, SessionAction::Push(Message::ai("")));
        let s = reduce(s, SessionAction::SetReplyText("Why".into()));
        let s = reduce(s, SessionAction::SetReplyText("Why did".into()));
        assert_eq!(s.messages.last().unwrap().text, "Why did");
        assert_eq!(s.chats["1"].messages.len(), 0);

        let rev = s.revision;
        let s = reduce(s, SessionAction::Save);
        assert_eq!(s.revision, rev + 1);
        let chat = &s.chats["1"];
        assert_eq!(chat.title, "Tell me a joke");
        assert_eq!(chat.model, "m");
        assert_eq!(chat.messages[1].role, Role::Ai);
    }

    #[test]
    fn notices_pushed_mid_stream_do_not_take_the_reply() {
        let s = Session::restore(ChatStore::new(), None, "m".into(), "1".into());
        let s = reduce(s, SessionAction::Push(Message::user("q")));
        let s = reduce(s, SessionAction::Push(Message::ai("")));
        let s = reduce(s, SessionAction::Push(Message::system("📄 Loaded: \"a.txt\"")));
        let s = reduce(s, SessionAction::SetReplyText("Hello".into()));
        let s = reduce(s, SessionAction::Push(Message::system("❌ Ollama error: offline. Is it running?")));
        let s = reduce(s, SessionAction::SetReplyText("Hello there".into()));

        assert_eq!(s.messages[1], Message::ai("Hello there"));
        assert_eq!(s.messages[2].text, "📄 Loaded: \"a.txt\"");
        assert_eq!(s.messages[3].role, Role::System);

        let s = reduce(s, SessionAction::Save);
        assert_eq!(s.chats["1"].messages[1].text, "Hello there");
    }

    #[test]
    fn reply_text_without_ai_message_is_ignored() {
        let s = Session::restore(ChatStore::new(), None, "m".into(), "1".into());
        let s = reduce(s, SessionAction::Push(Message::system("note")));
        let s = reduce(s, SessionAction::SetReplyText("lost".into()));
        assert_eq!(s.messages, vec![Message::system("note")]);
    }

    #[test]
    fn new_chat_clears_transcript_and_document() {
        let s = Session::restore(with_chat("1", "m", "hi"), Some("1".into()), "m".into(), "x".into());
        let s = reduce(
            s,
            SessionAction::Attach(UploadedDocument { name: "a".into(), kind: DocumentKind::Text, text: "t".into() }),
        );
        let s = reduce(s, SessionAction::NewChat("2".into()));
        assert_eq!(s.current_id, "2");
        assert!(s.messages.is_empty());
        assert!(s.document.is_none());
        assert_eq!(s.chats.len(), 2);
    }

    #[test]
    fn load_unknown_chat_falls_back() {
        let s = Session::restore(with_chat("1", "m", "hi"), Some("1".into()), "m".into(), "x".into());
        let s = reduce(s, SessionAction::Load { id: "nope".into(), fallback_id: "5".into() });
        assert_eq!(s.current_id, "5");
    }

    #[test]
    fn deleting_open_chat_starts_fresh() {
        let mut store = with_chat("1", "m", "first");
        store.insert("2".into(), Chat::new("m".into(), vec![Message::user("second")]));
        let s = Session::restore(store, Some("2".into()), "m".into(), "x".into());

        let s = reduce(s, SessionAction::Delete { id: "1".into(), fallback_id: "3".into() });
        assert_eq!(s.current_id, "2");
        assert!(!s.chats.contains_key("1"));

        let s = reduce(s, SessionAction::Delete { id: "2".into(), fallback_id: "3".into() });
        assert_eq!(s.current_id, "3");
        assert_eq!(s.chats.keys().collect::<Vec<_>>(), vec!["3"]);
    }

    #[test]
    fn clear_all_keeps_only_the_new_chat() {
        let s = Session::restore(with_chat("1", "m", "hi"), Some("1".into()), "m".into(), "x".into());
        let s = reduce(s, SessionAction::ClearAll("7".into()));
        assert_eq!(s.chats.len(), 1);
        assert_eq!(s.current_id, "7");
    }

    #[test]
    fn model_list_keeps_valid_selection() {
        let s = Session { model: "b".into(), ..Session::default() };
        let s = reduce(s, SessionAction::SetModels(vec!["a".into(), "b".into()]));
        assert_eq!(s.model, "b");

        let s = reduce(s, SessionAction::SetModels(vec!["c".into()]));
        assert_eq!(s.model, "c");

        let s = reduce(s, SessionAction::SelectModel("z".into()));
        assert_eq!(s.model, "z");
    }
}
