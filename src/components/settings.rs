use yew::prelude::*;
use web_sys::HtmlInputElement;

use crate::models::AppSettings;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsProps {
    pub settings: AppSettings,
    pub model_count: usize,
    pub on_save: Callback<AppSettings>,
    pub on_refresh_models: Callback<()>,
    pub on_close: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_clear_chats: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsProps) -> Html {
    let on_url_change = {
        let on_save = props.on_save.clone();
        let settings = props.settings.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_save.emit(AppSettings { base_url: input.value().trim().to_string(), ..settings.clone() });
        })
    };

    let on_search_change = {
        let on_save = props.on_save.clone();
        let settings = props.settings.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_save.emit(AppSettings { search_enabled: input.checked(), ..settings.clone() });
        })
    };

    let on_limit_change = {
        let on_save = props.on_save.clone();
        let settings = props.settings.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.value().trim().parse::<usize>() {
                Ok(limit) => on_save.emit(AppSettings { document_context_chars: limit, ..settings.clone() }),
                Err(_) => input.set_value(&settings.document_context_chars.to_string()),
            }
        })
    };

    let css = r#"
        .settings-backdrop { position: absolute; top: 0; left: 0; width: 100%; height: 100%; background: rgba(255,255,255,0.6); backdrop-filter: blur(2px); z-index: 99; cursor: pointer; }
        .settings-panel { position: absolute; top: 60px; right: 20px; width: 340px; background: white; border: 1px solid var(--border-color); border-radius: 8px; box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1); padding: 20px; z-index: 100; display: flex; flex-direction: column; gap: 15px; }
        .settings-header { display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid var(--border-color); padding-bottom: 10px; margin-bottom: 5px; }
        .settings-header h3 { margin: 0; font-size: 1.1rem; }
        .close-btn { background: none; border: none; font-size: 1.5rem; line-height: 1; cursor: pointer; color: var(--text-secondary); padding: 0 5px; }
        .close-btn:hover { color: var(--text-primary); }
        .form-label { display: block; font-size: 0.85rem; font-weight: 600; margin-bottom: 5px; color: var(--text-secondary); }
        .form-hint { font-size: 0.75rem; color: var(--text-secondary); }
        .fetch-group { display: flex; gap: 8px; }
        .actions { margin-top: 10px; display: flex; flex-direction: column; gap: 8px; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="settings-backdrop" onclick={props.on_close.reform(|_| ())}></div>

            <div class="settings-panel">
                <div class="settings-header">
                    <h3>{ "Configuration" }</h3>
                    <button class="close-btn" onclick={props.on_close.reform(|_| ())} title="Close">{"×"}</button>
                </div>

                <div>
                    <label class="form-label">{ "Server URL" }</label>
                    <div class="fetch-group">
                        <input class="form-input" type="text" value={props.settings.base_url.clone()} onchange={on_url_change} style="margin-bottom:0;" />
                        <button class="btn" onclick={props.on_refresh_models.reform(|_| ())} title="Refresh Models">{ "⟳" }</button>
                    </div>
                    <div class="form-hint">{ format!("{} models available", props.model_count) }</div>
                </div>

                <div>
                    <label class="form-label">{ "Document context (characters)" }</label>
                    <input class="form-input" type="number" min="0" value={props.settings.document_context_chars.to_string()} onchange={on_limit_change} />
                </div>

                <label style="display: flex; gap: 8px; align-items: center; cursor: pointer; font-size: 0.9rem;">
                    <input type="checkbox" checked={props.settings.search_enabled} onchange={on_search_change}/>
                    { "Web search for time-sensitive questions" }
                </label>

                <div class="actions">
                    <hr style="width: 100%; border: 0; border-top: 1px solid var(--border-color);" />
                    <button class="btn btn-danger" onclick={props.on_clear_chats.reform(|_| ())}>{ "Delete All Chats" }</button>
                    <button class="btn" onclick={props.on_reset.reform(|_| ())}>{ "Reset Settings" }</button>
                </div>
            </div>
        </>
    }
}
