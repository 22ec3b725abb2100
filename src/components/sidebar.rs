use yew::prelude::*;

use crate::models::Chat;
use crate::utils::relative_age;

/// One row of the history list.
#[derive(Clone, PartialEq, Debug)]
pub struct ChatListItem {
    pub id: String,
    pub title: String,
    pub model: String,
    pub message_count: usize,
    pub age: String,
}

impl ChatListItem {
    /// Ids are creation timestamps; an id that is not one gets no age.
    pub fn new(id: String, chat: &Chat, now_ms: u64) -> Self {
        let age = id.parse::<u64>().map(|created| relative_age(created, now_ms)).unwrap_or_default();
        ChatListItem {
            title: chat.title.clone(),
            model: chat.model.clone(),
            message_count: chat.messages.len(),
            age,
            id,
        }
    }

    fn meta(&self) -> String {
        let mut parts = Vec::new();
        if !self.model.is_empty() {
            parts.push(self.model.clone());
        }
        parts.push(match self.message_count {
            1 => "1 message".to_string(),
            n => format!("{} messages", n),
        });
        if !self.age.is_empty() {
            parts.push(self.age.clone());
        }
        parts.join(" · ")
    }
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub open: bool,
    pub chats: Vec<ChatListItem>,
    pub active_chat_id: String,
    pub on_select: Callback<String>,
    pub on_delete: Callback<(MouseEvent, String)>,
    pub on_new: Callback<()>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let css = r#"
        .history { background: var(--bg-sidebar); border-right: 1px solid var(--border-color); flex-shrink: 0; overflow: hidden; transition: width 0.25s ease; }
        .history-inner { width: 270px; height: 100%; display: flex; flex-direction: column; padding: 12px; box-sizing: border-box; }
        .history-heading { font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.04em; color: var(--text-secondary); margin: 14px 4px 6px 4px; }
        .history-list { list-style: none; margin: 0; padding: 0; flex-grow: 1; overflow-y: auto; }
        .history-entry { display: flex; align-items: flex-start; gap: 6px; padding: 8px; border-radius: 6px; cursor: pointer; border-left: 3px solid transparent; }
        .history-entry:hover { background: rgba(0,0,0,0.04); }
        .history-entry.current { background: rgba(0,0,0,0.07); border-left-color: var(--accent-color); }
        .history-text { flex-grow: 1; min-width: 0; }
        .history-title { font-size: 0.9rem; color: var(--text-primary); overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }
        .history-meta { font-size: 0.72rem; color: var(--text-secondary); overflow: hidden; white-space: nowrap; text-overflow: ellipsis; margin-top: 2px; }
        .history-delete { visibility: hidden; border: none; background: none; color: var(--text-secondary); cursor: pointer; font-size: 1rem; line-height: 1; }
        .history-entry:hover .history-delete { visibility: visible; }
        .history-delete:hover { color: var(--danger-color); }
        .history-empty { font-size: 0.85rem; color: var(--text-secondary); padding: 8px 4px; }
    "#;

    let rows = props.chats.iter().map(|chat| {
        let current = chat.id == props.active_chat_id;
        let onclick = {
            let id = chat.id.clone();
            props.on_select.reform(move |_: MouseEvent| id.clone())
        };
        let ondelete = {
            let id = chat.id.clone();
            props.on_delete.reform(move |e: MouseEvent| (e, id.clone()))
        };
        html! {
            <li key={chat.id.clone()} class={classes!("history-entry", current.then_some("current"))} {onclick} title={chat.title.clone()}>
                <div class="history-text">
                    <div class="history-title">{ &chat.title }</div>
                    <div class="history-meta">{ chat.meta() }</div>
                </div>
                <button class="history-delete" title="Delete chat" onclick={ondelete}>{ "×" }</button>
            </li>
        }
    });

    html! {
        <>
            <style>{ css }</style>
            <aside class="history" style={if props.open { "width: 270px;" } else { "width: 0;" }}>
                <div class="history-inner">
                    <button id="new-chat" class="btn" onclick={props.on_new.reform(|_| ())}>{ "+ New Chat" }</button>
                    <div class="history-heading">{ format!("History ({})", props.chats.len()) }</div>
                    if props.chats.is_empty() {
                        <div class="history-empty">{ "No saved chats" }</div>
                    } else {
                        <ul id="chat-list" class="history-list">{ for rows }</ul>
                    }
                </div>
            </aside>
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    #[test]
    fn row_summarises_model_size_and_age() {
        let chat = Chat::new("llama3".into(), vec![Message::user("hi"), Message::ai("hello")]);
        let row = ChatListItem::new("1000".into(), &chat, 1000 + 3 * 60_000);
        assert_eq!(row.title, "hi");
        assert_eq!(row.meta(), "llama3 · 2 messages · 3m ago");
    }

    #[test]
    fn row_without_timestamp_id_or_model() {
        let chat = Chat::new(String::new(), vec![Message::user("x")]);
        let row = ChatListItem::new("imported".into(), &chat, 5);
        assert_eq!(row.age, "");
        assert_eq!(row.meta(), "1 message");
    }
}
