use yew::prelude::*;
use futures_util::StreamExt;
use js_sys::Uint8Array;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, HtmlSelectElement};

use crate::components::{chat_area::ChatArea, settings::SettingsModal, sidebar::{ChatListItem, Sidebar}};
use crate::error::ClientError;
use crate::models::*;
use crate::services::{
    document_service::DocumentService,
    llm::{LlmService, NdjsonDecoder},
    prompt,
    search::{needs_search, search_notice, search_web},
    storage::{ChatHistory, SettingsStore},
};
use crate::state::{Session, SessionAction};
use crate::utils::{confirm, timestamp_id};

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #ffffff;
        --bg-sidebar: #f9f9f9;
        --bg-user: #f4f4f4;
        --bg-assistant: #ffffff;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #10a37f;
        --accent-hover: #1a7f64;
        --danger-color: #ef4444;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; color: var(--text-primary); }

    .app-container { display: flex; height: 100vh; overflow: hidden; }
    .main-content { flex-grow: 1; display: flex; flex-direction: column; position: relative; background: var(--bg-app); }
    .header { padding: 10px 20px; border-bottom: 1px solid var(--border-color); display: flex; justify-content: space-between; align-items: center; height: 60px; gap: 10px; }
    .header h2 { font-size: 1rem; margin: 0; font-weight: 600; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; max-width: 500px; }

    .btn { cursor: pointer; border: 1px solid var(--border-color); background: white; padding: 8px 12px; border-radius: 6px; font-size: 0.9rem; transition: all 0.2s; color: var(--text-primary); }
    .btn:hover { background: #f0f0f0; }
    .btn-danger { color: var(--danger-color); border-color: var(--danger-color); }
    .btn-danger:hover { background: #fef2f2; }
    .btn-icon { border: none; background: transparent; font-size: 1.2rem; padding: 5px; color: var(--text-secondary); cursor: pointer; }
    .btn-icon:hover { background: rgba(0,0,0,0.05); color: var(--text-primary); }

    .form-input, .form-select { width: 100%; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; font-family: inherit; margin-bottom: 10px; }
    .form-input:focus { outline: 2px solid var(--accent-color); border-color: transparent; }
    .model-select { width: auto; min-width: 180px; margin-bottom: 0; }
"#;

/// Streams one reply into the newest AI message. `text` holds whatever
/// arrived so far, so callers can still show it when the stream fails.
async fn stream_reply(
    base_url: &str,
    request: &GenerateRequest,
    session: &UseReducerHandle<Session>,
    text: &mut String,
) -> anyhow::Result<()> {
    let resp = LlmService::generate(base_url, request).await?;
    let mut stream = resp.bytes_stream();
    let mut decoder = NdjsonDecoder::new();

    let apply = |chunk: GenerateChunk, text: &mut String| -> Result<(), ClientError> {
        if let Some(piece) = chunk.into_result()?.response.filter(|p| !p.is_empty()) {
            text.push_str(&piece);
            session.dispatch(SessionAction::SetReplyText(text.clone()));
        }
        Ok(())
    };

    while let Some(item) = stream.next().await {
        let bytes = item.map_err(ClientError::from)?;
        for chunk in decoder.push(&bytes) {
            apply(chunk, text)?;
        }
    }
    if let Some(chunk) = decoder.finish() {
        apply(chunk, text)?;
    }

    log::info!("reply complete: {} chars", text.chars().count());
    Ok(())
}

async fn read_file(file: &File) -> Result<Vec<u8>, ClientError> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

#[function_component(App)]
pub fn app() -> Html {
    let settings = use_state(SettingsStore::load);
    let session = use_reducer({
        let model = settings.selected_model.clone();
        move || Session::restore(ChatHistory::load(), ChatHistory::current_id(), model, timestamp_id())
    });

    let sidebar_open = use_state(|| true);
    let show_settings = use_state(|| false);
    let models_reload = use_state(|| 0u32);

    // --- EFFECTS ---

    // Model list, on startup and whenever the server URL changes
    {
        let session = session.clone();
        let base_url = settings.base_url.clone();
        use_effect_with((base_url, *models_reload), move |(url, _)| {
            let url = url.clone();
            spawn_local(async move {
                match LlmService::fetch_models(&url).await {
                    Ok(models) => {
                        log::info!("{} models available at {}", models.len(), url);
                        session.dispatch(SessionAction::SetModels(models));
                    }
                    Err(err) => {
                        log::error!("model listing failed: {:#}", err);
                        session.dispatch(SessionAction::Push(Message::system(format!(
                            "❌ Ollama error: {}. Is it running?",
                            err
                        ))));
                    }
                }
            });
        });
    }

    {
        let chats = session.clone();
        use_effect_with(session.revision, move |_| {
            ChatHistory::save(&chats.chats);
            ChatHistory::set_current_id(&chats.current_id);
        });
    }

    {
        let settings = settings.clone();
        use_effect_with(session.model.clone(), move |model| {
            if !model.is_empty() && settings.selected_model != *model {
                settings.set(AppSettings { selected_model: model.clone(), ..(*settings).clone() });
            }
        });
    }

    {
        let s = settings.clone();
        use_effect_with(s, |s| SettingsStore::save(&**s));
    }

    // --- ACTIONS ---

    let on_new_chat = {
        let session = session.clone();
        Callback::from(move |_| {
            if session.is_loading { return; }
            session.dispatch(SessionAction::NewChat(timestamp_id()));
        })
    };

    let on_select_chat = {
        let session = session.clone();
        Callback::from(move |id: String| {
            if session.is_loading || id == session.current_id { return; }
            session.dispatch(SessionAction::Load { id, fallback_id: timestamp_id() });
        })
    };

    let on_delete_chat = {
        let session = session.clone();
        Callback::from(move |(e, id): (MouseEvent, String)| {
            e.stop_propagation();
            if session.is_loading { return; }
            session.dispatch(SessionAction::Delete { id, fallback_id: timestamp_id() });
        })
    };

    let on_model_change = {
        let session = session.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            session.dispatch(SessionAction::SelectModel(select.value()));
        })
    };

    let on_file = {
        let session = session.clone();
        Callback::from(move |file: File| {
            let session = session.clone();
            spawn_local(async move {
                let name = file.name();
                let kind = DocumentKind::from_filename(&name);

                let bytes = match read_file(&file).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        log::error!("reading {} failed: {}", name, err);
                        session.dispatch(SessionAction::Push(Message::system("❌ Error reading file")));
                        return;
                    }
                };

                match DocumentService::extract_text(&name, &bytes).await {
                    Ok(doc) => {
                        log::info!("{} loaded, {} chars", doc.name, doc.text.chars().count());
                        session.dispatch(SessionAction::Push(Message::system(DocumentService::load_notice(&doc))));
                        session.dispatch(SessionAction::Attach(doc));
                    }
                    Err(err) => {
                        log::error!("extracting {} failed: {:#}", name, err);
                        session.dispatch(SessionAction::Push(Message::system(DocumentService::failure_notice(kind, &err))));
                    }
                }
            });
        })
    };

    // --- MAIN CHAT LOGIC ---
    let run_chat = {
        let session = session.clone();
        let settings = settings.clone();

        Callback::from(move |raw: String| {
            let user_prompt = raw.trim().to_string();
            if user_prompt.is_empty() || session.is_loading { return; }

            let search_result = if settings.search_enabled && needs_search(&user_prompt) {
                let result = search_web(&user_prompt);
                session.dispatch(SessionAction::Push(Message::system(search_notice(&user_prompt, &result))));
                Some(result)
            } else {
                None
            };

            let full_prompt = prompt::compose(
                &user_prompt,
                search_result.as_deref(),
                session.document.as_ref(),
                settings.document_context_chars,
            );

            session.dispatch(SessionAction::Push(Message::user(user_prompt)));
            session.dispatch(SessionAction::Push(Message::ai("")));
            session.dispatch(SessionAction::SetLoading(true));

            let request = GenerateRequest {
                model: session.model.clone(),
                prompt: full_prompt,
                stream: true,
            };
            let base_url = settings.base_url.clone();
            let session = session.clone();

            spawn_local(async move {
                let mut text = String::new();
                if let Err(err) = stream_reply(&base_url, &request, &session, &mut text).await {
                    log::error!("generation failed: {:#}", err);
                    text.push_str(&format!("\n\n❌ Error: {}", err));
                    session.dispatch(SessionAction::SetReplyText(text));
                }
                session.dispatch(SessionAction::Save);
                session.dispatch(SessionAction::SetLoading(false));
            });
        })
    };
    // -------------------------

    let on_settings_save = {
        let settings = settings.clone();
        Callback::from(move |next: AppSettings| settings.set(next))
    };

    let on_refresh_models = {
        let reload = models_reload.clone();
        Callback::from(move |_| reload.set(reload.wrapping_add(1)))
    };

    let on_reset_settings = {
        let settings = settings.clone();
        Callback::from(move |_| {
            if confirm("Reset all settings to default?") {
                settings.set(AppSettings::default());
            }
        })
    };

    let on_clear_all_chats = {
        let session = session.clone();
        Callback::from(move |_| {
            if session.is_loading { return; }
            if confirm("Irreversibly delete ALL chat history?") {
                ChatHistory::clear();
                session.dispatch(SessionAction::ClearAll(timestamp_id()));
            }
        })
    };

    let close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_| show_settings.set(false))
    };

    let toggle_settings = show_settings.clone();
    let toggle_sidebar = sidebar_open.clone();

    let now_ms = js_sys::Date::now() as u64;
    let chat_list: Vec<ChatListItem> = ids_newest_first(&session.chats)
        .into_iter()
        .filter_map(|id| {
            let chat = session.chats.get(&id)?;
            Some(ChatListItem::new(id, chat, now_ms))
        })
        .collect();

    let title = Chat::derive_title(&session.messages);

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class="app-container">
                <Sidebar
                    open={*sidebar_open}
                    chats={chat_list}
                    active_chat_id={session.current_id.clone()}
                    on_select={on_select_chat}
                    on_new={on_new_chat}
                    on_delete={on_delete_chat}
                />

                <div class="main-content">
                    <div class="header">
                        <div style="display: flex; gap: 10px; align-items: center; min-width: 0;">
                            <button class="btn-icon" onclick={Callback::from(move |_| toggle_sidebar.set(!*toggle_sidebar))} title="Toggle Menu">{ "☰" }</button>
                            <h2>{ title }</h2>
                        </div>
                        <div style="display: flex; gap: 10px; align-items: center;">
                            <select id="model-select" class="form-select model-select" onchange={on_model_change} disabled={session.is_loading}>
                                if session.models.is_empty() {
                                    <option value={session.model.clone()} selected=true>
                                        { if session.model.is_empty() { "No models" } else { session.model.as_str() } }
                                    </option>
                                } else {
                                    { for session.models.iter().map(|m| html! {
                                        <option value={m.clone()} selected={*m == session.model}>{ m }</option>
                                    }) }
                                }
                            </select>
                            <button class="btn-icon" onclick={Callback::from(move |_| toggle_settings.set(!*toggle_settings))} title="Settings">{ "⚙" }</button>
                        </div>
                    </div>

                    if *show_settings {
                        <SettingsModal
                            settings={(*settings).clone()}
                            model_count={session.models.len()}
                            on_save={on_settings_save}
                            on_refresh_models={on_refresh_models}
                            on_close={close_settings}
                            on_reset={on_reset_settings}
                            on_clear_chats={on_clear_all_chats}
                        />
                    }

                    <ChatArea
                        messages={session.messages.clone()}
                        is_loading={session.is_loading}
                        document_name={session.document.as_ref().map(|d| d.name.clone())}
                        on_send={run_chat}
                        on_file={on_file}
                    />
                </div>
            </div>
        </>
    }
}
