use serde::{Deserialize, Serialize};
use web_sys::{window, Storage};

use crate::models::{AppSettings, ChatStore};

pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<Storage> {
        window()?.local_storage().ok()?
    }

    pub fn get<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
        let json = Self::get_raw(key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring unreadable '{}' in localStorage: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => Self::set_raw(key, &json),
            Err(e) => log::error!("could not serialize '{}': {}", key, e),
        }
    }

    pub fn get_raw(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    pub fn set_raw(key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::error!("localStorage write failed for '{}'", key);
            }
        }
    }

    pub fn remove(key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Every chat lives in one JSON object, rewritten whole on each save.
pub struct ChatHistory;

impl ChatHistory {
    const KEY_CHATS: &'static str = "chats";
    const KEY_CURRENT: &'static str = "currentChatId";

    pub fn load() -> ChatStore {
        LocalStorage::get(Self::KEY_CHATS).unwrap_or_default()
    }

    pub fn save(chats: &ChatStore) {
        LocalStorage::set(Self::KEY_CHATS, chats);
    }

    pub fn current_id() -> Option<String> {
        LocalStorage::get_raw(Self::KEY_CURRENT).filter(|id| !id.is_empty())
    }

    pub fn set_current_id(id: &str) {
        LocalStorage::set_raw(Self::KEY_CURRENT, id);
    }

    pub fn clear() {
        LocalStorage::remove(Self::KEY_CHATS);
        LocalStorage::remove(Self::KEY_CURRENT);
    }
}

pub struct SettingsStore;

impl SettingsStore {
    const KEY_SETTINGS: &'static str = "settings";

    pub fn load() -> AppSettings {
        LocalStorage::get(Self::KEY_SETTINGS).unwrap_or_default()
    }

    pub fn save(settings: &AppSettings) {
        LocalStorage::set(Self::KEY_SETTINGS, settings);
    }
}
