use yew::prelude::*;
use web_sys::{File, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use crate::components::message::MessageView;
use crate::models::Message;

const ACCEPTED_FILES: &str = ".pdf,.docx,.txt,.md,.csv,.json,.log";

#[derive(Properties, PartialEq)]
pub struct ChatAreaProps {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub document_name: Option<String>,
    pub on_send: Callback<String>,
    pub on_file: Callback<File>,
}

#[function_component(ChatArea)]
pub fn chat_area(props: &ChatAreaProps) -> Html {
    let input_text = use_state(String::new);
    let scroll_ref = use_node_ref();

    // Keep the newest text in view, including while a reply streams.
    {
        let div_ref = scroll_ref.clone();
        let last_len = props.messages.last().map(|m| m.text.len()).unwrap_or(0);
        let len = props.messages.len();

        use_effect_with((len, last_len), move |_| {
            if let Some(div) = div_ref.cast::<HtmlElement>() {
                div.set_scroll_top(div.scroll_height());
            }
        });
    }

    let send = {
        let text = input_text.clone();
        let on_send = props.on_send.clone();
        move || {
            let value = (*text).clone();
            if !value.trim().is_empty() {
                on_send.emit(value);
                text.set(String::new());
            }
        }
    };

    let on_submit = {
        let send = send.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            send();
        })
    };

    let on_keydown = {
        let is_loading = props.is_loading;
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                if !is_loading {
                    send();
                }
            }
        })
    };

    let on_input = {
        let text = input_text.clone();
        Callback::from(move |e: InputEvent| {
            let i: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(i.value());
        })
    };

    let on_file_change = {
        let on_file = props.on_file.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                log::info!("selected file: {}", file.name());
                on_file.emit(file);
            }
            // allow picking the same file again
            input.set_value("");
        })
    };

    let css = r#"
        .messages { flex-grow: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 12px; }
        .message { max-width: 900px; width: 100%; margin: 0 auto; line-height: 1.5; overflow-wrap: anywhere; }
        .message p { margin: 0 0 0.6em 0; }
        .user-msg { background: var(--bg-user); padding: 10px 15px; border-radius: 12px; }
        .ai-msg { background: var(--bg-assistant); padding: 10px 15px; border-radius: 12px; border: 1px solid var(--border-color); }
        .system-msg { text-align: center; color: var(--text-secondary); font-size: 0.85em; }
        .code-block { position: relative; background: #2d2d2d; color: #fff; padding: 15px; padding-top: 28px; border-radius: 6px; overflow-x: auto; }
        .code-block code { font-family: monospace; font-size: 0.9em; white-space: pre; }
        .code-lang { position: absolute; top: 6px; left: 12px; font-size: 0.7rem; color: #aaa; text-transform: uppercase; }
        .copy-btn { position: absolute; top: 6px; right: 8px; font-size: 0.75rem; border: none; border-radius: 4px; padding: 2px 8px; cursor: pointer; background: #555; color: #fff; }
        .copy-btn:hover { background: #777; }
        .thinking { color: #888; font-style: italic; }

        .input-wrapper { border-top: 1px solid var(--border-color); padding: 20px; display: flex; justify-content: center; background: white; }
        .input-container { width: 100%; max-width: 900px; position: relative; display: flex; gap: 8px; align-items: flex-end; }
        .chat-input { flex-grow: 1; padding: 12px; border: 1px solid var(--border-color); border-radius: 8px; resize: none; font-family: inherit; outline: none; height: 50px; }
        .chat-input:focus { border-color: var(--accent-color); box-shadow: 0 0 0 2px rgba(16, 163, 127, 0.1); }
        .attach-btn { cursor: pointer; padding: 10px; border-radius: 6px; color: var(--text-secondary); }
        .attach-btn:hover { background: #f0f0f0; }
        .attach-btn.disabled { opacity: 0.4; cursor: default; pointer-events: none; }
        .send-btn { background: var(--accent-color); color: white; border: none; border-radius: 6px; padding: 10px 14px; cursor: pointer; }
        .send-btn:disabled { background: #ccc; cursor: default; }
        .attached-doc { font-size: 0.75rem; color: var(--text-secondary); max-width: 900px; width: 100%; margin: 0 auto 6px auto; }
    "#;

    let waiting_for_first_token = props.is_loading
        && props.messages.last().map(|m| m.text.is_empty()).unwrap_or(false);

    html! {
        <>
            <style>{ css }</style>

            <div id="messages" class="messages" ref={scroll_ref}>
                { for props.messages.iter().map(|msg| html! { <MessageView message={msg.clone()} /> }) }

                if waiting_for_first_token {
                    <div class="message thinking">{ "Thinking..." }</div>
                }
            </div>

            <div class="input-wrapper" style="flex-direction: column;">
                if let Some(name) = &props.document_name {
                    <div class="attached-doc">{ format!("📎 {}", name) }</div>
                }
                <form class="input-container" onsubmit={on_submit}>
                    <label class={classes!("attach-btn", props.is_loading.then_some("disabled"))} for="file-input" title="Attach a document">{ "📎" }</label>
                    <input id="file-input" type="file" accept={ACCEPTED_FILES} onchange={on_file_change} disabled={props.is_loading} style="display: none;" />
                    <textarea
                        id="prompt-input"
                        class="chat-input"
                        rows="1"
                        placeholder="Ask the local model..."
                        value={(*input_text).clone()}
                        oninput={on_input}
                        onkeydown={on_keydown}
                        disabled={props.is_loading}
                    />
                    <button id="send-btn" type="submit" class="send-btn" disabled={props.is_loading || input_text.trim().is_empty()}>
                        { "Send" }
                    </button>
                </form>
            </div>
        </>
    }
}
