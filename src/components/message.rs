use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::models::{Message, Role};
use crate::services::clipboard;
use crate::utils::{alert, set_timeout, split_code_blocks, Segment};

const COPIED_RESET_MS: i32 = 2000;

#[derive(Properties, PartialEq)]
pub struct MessageViewProps {
    pub message: Message,
}

#[function_component(MessageView)]
pub fn message_view(props: &MessageViewProps) -> Html {
    let msg = &props.message;
    match msg.role {
        Role::User => html! {
            <div class="message user-msg">
                <p><strong>{ "You:" }</strong>{ " " }{ &msg.text }</p>
            </div>
        },
        Role::Ai => html! {
            <div class="message ai-msg">
                <p><strong>{ "AI:" }</strong></p>
                { for split_code_blocks(&msg.text).into_iter().map(render_segment) }
            </div>
        },
        Role::System => html! {
            <div class="message system-msg">
                <em>{ &msg.text }</em>
            </div>
        },
    }
}

fn render_segment(segment: Segment) -> Html {
    match segment {
        Segment::Prose(text) => prose(&text),
        Segment::Code { lang, body } => {
            let copy_text = AttrValue::from(body.clone());
            html! {
                <pre class="code-block">
                    if let Some(lang) = lang {
                        <span class="code-lang">{ lang }</span>
                    }
                    <code>{ body }</code>
                    <CopyButton text={copy_text} />
                </pre>
            }
        }
    }
}

/// Newlines become line breaks; text is escaped by the renderer.
fn prose(text: &str) -> Html {
    html! {
        <p>
            { for text.split('\n').enumerate().map(|(i, line)| html! {
                <>
                    if i > 0 { <br /> }
                    { line.to_string() }
                </>
            }) }
        </p>
    }
}

#[derive(Properties, PartialEq)]
pub struct CopyButtonProps {
    pub text: AttrValue,
}

#[function_component(CopyButton)]
pub fn copy_button(props: &CopyButtonProps) -> Html {
    let copied = use_state(|| false);

    let onclick = {
        let text = props.text.clone();
        let copied = copied.clone();
        Callback::from(move |_: MouseEvent| {
            let text = text.clone();
            let copied = copied.clone();
            spawn_local(async move {
                match clipboard::write_text(&text).await {
                    Ok(()) => {
                        copied.set(true);
                        set_timeout(COPIED_RESET_MS, move || copied.set(false));
                    }
                    Err(err) => {
                        log::warn!("copy failed: {}", err);
                        alert(&format!("Copy failed: {}", err));
                    }
                }
            });
        })
    };

    html! {
        <button class="copy-btn" {onclick}>
            { if *copied { "Copied!" } else { "Copy" } }
        </button>
    }
}
