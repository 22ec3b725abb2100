use crate::error::ClientError;
use crate::models::{GenerateChunk, GenerateRequest, TagsResponse};
use anyhow::Result;
use reqwest::{Client, Response};

pub struct LlmService;

impl LlmService {
    fn get_clean_url(base: &str) -> String {
        base.trim().trim_end_matches('/').to_string()
    }

    /// Names of the models installed on the server, in server order.
    pub async fn fetch_models(base_url: &str) -> Result<Vec<String>> {
        let client = Client::new();
        let url = format!("{}/api/tags", Self::get_clean_url(base_url));
        let resp = Self::check_status(client.get(url).send().await.map_err(ClientError::from)?).await?;
        let body = resp.text().await.map_err(ClientError::from)?;
        Ok(Self::parse_tags(&body)?)
    }

    fn parse_tags(body: &str) -> std::result::Result<Vec<String>, ClientError> {
        let data: TagsResponse = serde_json::from_str(body)?;
        Ok(data.models.into_iter().map(|m| m.name).collect())
    }

    /// Starts a generation. The body is an NDJSON stream of `GenerateChunk`s,
    /// feed it through an `NdjsonDecoder`.
    pub async fn generate(base_url: &str, request: &GenerateRequest) -> Result<Response> {
        let client = Client::new();
        let url = format!("{}/api/generate", Self::get_clean_url(base_url));

        log::debug!(
            "generate: model={} prompt_chars={}",
            request.model,
            request.prompt.chars().count()
        );

        let resp = client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::from)?;

        Ok(Self::check_status(resp).await?)
    }

    async fn check_status(resp: Response) -> std::result::Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Status { status: status.as_u16(), body: body.trim().to_string() })
    }
}

/// Incremental decoder for newline-delimited JSON bodies.
///
/// Bytes are buffered raw so a line (or a UTF-8 sequence) split across
/// network chunks is decoded only once it is complete.
#[derive(Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a network chunk, returning every chunk completed by it in
    /// arrival order. Server error chunks are returned like any other so
    /// text decoded ahead of them in the same read is not lost.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<GenerateChunk> {
        self.buffer.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(chunk) = Self::parse_line(&line) {
                out.push(chunk);
            }
        }
        out
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<GenerateChunk> {
        let rest = std::mem::take(&mut self.buffer);
        Self::parse_line(&rest)
    }

    fn parse_line(raw: &[u8]) -> Option<GenerateChunk> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<GenerateChunk>(line) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                log::warn!("Parse error: {} ({})", line, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[GenerateChunk]) -> Vec<String> {
        chunks.iter().filter_map(|c| c.response.clone()).collect()
    }

    #[test]
    fn decodes_lines_split_across_chunks() {
        let mut dec = NdjsonDecoder::new();
        assert!(dec.push(br#"{"response":"Hel"}"#).is_empty());

        let second = dec.push(b"\n{\"response\":\"lo\"}\n{\"response\":\" wo");
        assert_eq!(texts(&second), vec!["Hel", "lo"]);

        let third = dec.push(b"rld\",\"done\":false}\n");
        assert_eq!(texts(&third), vec![" world"]);
    }

    #[test]
    fn keeps_utf8_sequences_intact() {
        let line = "{\"response\":\"caf\u{e9} \u{1f600}\"}\n".as_bytes().to_vec();
        let (a, b) = line.split_at(17);
        let mut dec = NdjsonDecoder::new();
        assert!(dec.push(a).is_empty());
        let out = dec.push(b);
        assert_eq!(texts(&out), vec!["caf\u{e9} \u{1f600}"]);
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let mut dec = NdjsonDecoder::new();
        let out = dec.push(b"\n  \nnot json\n{\"response\":\"ok\"}\r\n");
        assert_eq!(texts(&out), vec!["ok"]);
    }

    #[test]
    fn finish_flushes_trailing_line() {
        let mut dec = NdjsonDecoder::new();
        assert!(dec.push(br#"{"response":"","done":true}"#).is_empty());
        let last = dec.finish().unwrap();
        assert!(last.done);
        assert!(dec.finish().is_none());
    }

    #[test]
    fn server_error_chunk_becomes_error() {
        let mut dec = NdjsonDecoder::new();
        let out = dec.push(b"{\"error\":\"model 'x' not found\"}\n");
        assert_eq!(out.len(), 1);
        let err = out[0].clone().into_result().unwrap_err();
        assert!(matches!(err, ClientError::Server(_)));
        assert_eq!(err.to_string(), "model 'x' not found");
    }

    #[test]
    fn text_before_error_in_same_read_is_kept() {
        let mut dec = NdjsonDecoder::new();
        let out = dec.push(b"{\"response\":\"partial\"}\n{\"error\":\"oom\"}\n{\"response\":\"late\"}\n");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].clone().into_result().unwrap().response.as_deref(), Some("partial"));
        assert_eq!(out[1].clone().into_result().unwrap_err().to_string(), "oom");
    }

    #[test]
    fn tags_body_lists_model_names() {
        let body = r#"{"models":[{"name":"llama3:latest","size":1},{"name":"mistral"}]}"#;
        assert_eq!(LlmService::parse_tags(body).unwrap(), vec!["llama3:latest", "mistral"]);
        assert!(LlmService::parse_tags(r#"{"models":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_tags_body_is_a_parse_error() {
        let err = LlmService::parse_tags("<html>proxy error</html>").unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.to_string().starts_with("invalid response"));
    }

    #[test]
    fn base_url_is_trimmed() {
        assert_eq!(LlmService::get_clean_url(" http://host:11434/ "), "http://host:11434");
    }
}
