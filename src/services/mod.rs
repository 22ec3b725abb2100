pub mod clipboard;
pub mod document_service;
pub mod llm;
pub mod pdfjs;
pub mod prompt;
pub mod search;
pub mod storage;
