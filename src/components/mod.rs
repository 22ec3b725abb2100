pub mod chat_area;
pub mod message;
pub mod settings;
pub mod sidebar;
