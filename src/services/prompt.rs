use crate::models::UploadedDocument;
use crate::utils::truncate_chars;

/// Builds the text sent to the model from the user's prompt, an optional
/// search result and an optional attached document.
pub fn compose(
    prompt: &str,
    search_result: Option<&str>,
    document: Option<&UploadedDocument>,
    document_limit: usize,
) -> String {
    let mut full = match search_result {
        Some(result) => format!(
            "Use this information to answer the user's question:\nWeb Context: \"{}\"\nUser Question: {}",
            result, prompt
        ),
        None => prompt.to_string(),
    };

    if let Some(doc) = document.filter(|d| !d.text.is_empty()) {
        full.push_str("\n\nAdditional context from document:\n");
        full.push_str(truncate_chars(&doc.text, document_limit));
    }

    full
}
