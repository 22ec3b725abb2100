//! Bindings to the pdf.js global (`pdfjsLib`) that the host page loads.

use js_sys::{Array, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::ClientError;

#[wasm_bindgen]
extern "C" {
    type PdfLoadingTask;

    #[wasm_bindgen(catch, js_namespace = pdfjsLib, js_name = getDocument)]
    fn get_document(data: &Uint8Array) -> Result<PdfLoadingTask, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &PdfLoadingTask) -> Promise;

    type PdfDocument;

    #[wasm_bindgen(method, getter, js_name = numPages)]
    fn num_pages(this: &PdfDocument) -> u32;

    #[wasm_bindgen(method, js_name = getPage)]
    fn get_page(this: &PdfDocument, number: u32) -> Promise;

    type PdfPage;

    #[wasm_bindgen(method, js_name = getTextContent)]
    fn get_text_content(this: &PdfPage) -> Promise;
}

/// Raw text of every page in order. Items within a page and pages themselves
/// are joined by single spaces; callers normalise whitespace.
pub async fn extract_text(bytes: &[u8]) -> Result<String, ClientError> {
    let data = Uint8Array::from(bytes);
    let task = get_document(&data).map_err(|e| ClientError::Pdf(crate::error::js_message(&e)))?;
    let pdf: PdfDocument = JsFuture::from(task.promise()).await?.unchecked_into();

    let pages = pdf.num_pages();
    log::debug!("pdf: {} pages", pages);

    let mut text = String::new();
    for number in 1..=pages {
        let page: PdfPage = JsFuture::from(pdf.get_page(number)).await?.unchecked_into();
        let content = JsFuture::from(page.get_text_content()).await?;
        let items: Array = Reflect::get(&content, &JsValue::from_str("items"))?.unchecked_into();

        let strings: Vec<String> = items
            .iter()
            .filter_map(|item| Reflect::get(&item, &JsValue::from_str("str")).ok())
            .filter_map(|s| s.as_string())
            .collect();
        text.push_str(&strings.join(" "));
        text.push(' ');
    }
    Ok(text)
}
