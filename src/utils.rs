use log::{Level, LevelFilter, Metadata, Record};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::console;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `log` backend that writes to the browser devtools console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Runs `f` once after `ms` milliseconds.
pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) {
    if let Some(window) = web_sys::window() {
        let callback = Closure::once_into_js(f);
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
            .is_err()
        {
            log::warn!("setTimeout failed");
        }
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        window.alert_with_message(message).ok();
    }
}

/// Millisecond timestamp as a decimal string, used as chat id.
pub fn timestamp_id() -> String {
    format!("{}", js_sys::Date::now() as u64)
}

/// Coarse age of a chat for the history list, e.g. `5m ago`.
pub fn relative_age(created_ms: u64, now_ms: u64) -> String {
    let secs = now_ms.saturating_sub(created_ms) / 1000;
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone, PartialEq, Debug)]
pub enum Segment {
    Prose(String),
    Code { lang: Option<String>, body: String },
}

const FENCE: &str = "```";

/// Splits a response on code fences. Odd parts are code, so an unterminated
/// fence still renders as code while it streams in.
pub fn split_code_blocks(text: &str) -> Vec<Segment> {
    text.split(FENCE)
        .enumerate()
        .filter_map(|(i, part)| {
            if i % 2 == 1 {
                Some(code_segment(part))
            } else if part.trim().is_empty() {
                None
            } else {
                Some(Segment::Prose(part.trim_matches('\n').to_string()))
            }
        })
        .collect()
}

fn code_segment(part: &str) -> Segment {
    let (lang, body) = match part.split_once('\n') {
        Some((first, rest)) if is_lang_tag(first) => (Some(first.trim().to_string()), rest),
        Some(("", rest)) => (None, rest),
        _ => (None, part),
    };
    Segment::Code {
        lang,
        body: body.trim_end_matches('\n').to_string(),
    }
}

fn is_lang_tag(line: &str) -> bool {
    let tag = line.trim();
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '+' | '-' | '_' | '#' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_prose_segment() {
        assert_eq!(
            split_code_blocks("Hello\nworld"),
            vec![Segment::Prose("Hello\nworld".into())]
        );
        assert!(split_code_blocks("").is_empty());
    }

    #[test]
    fn closed_fence_with_language() {
        let text = "Try this:\n```rust\nfn main() {}\n```\nDone.";
        assert_eq!(
            split_code_blocks(text),
            vec![
                Segment::Prose("Try this:".into()),
                Segment::Code { lang: Some("rust".into()), body: "fn main() {}".into() },
                Segment::Prose("Done.".into()),
            ]
        );
    }

    #[test]
    fn unterminated_fence_renders_as_code() {
        let segs = split_code_blocks("Here:\n```\nlet x = 1;");
        assert_eq!(
            segs,
            vec![
                Segment::Prose("Here:".into()),
                Segment::Code { lang: None, body: "let x = 1;".into() },
            ]
        );
    }

    #[test]
    fn inline_fence_keeps_body() {
        let segs = split_code_blocks("```a b```");
        assert_eq!(segs, vec![Segment::Code { lang: None, body: "a b".into() }]);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ab", 10), "ab");
        assert_eq!(truncate_chars("📄📄📄", 1), "📄");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
    }

    #[test]
    fn relative_age_buckets() {
        let now = 10 * 86_400_000;
        assert_eq!(relative_age(now - 5_000, now), "just now");
        assert_eq!(relative_age(now - 125_000, now), "2m ago");
        assert_eq!(relative_age(now - 3 * 3_600_000, now), "3h ago");
        assert_eq!(relative_age(now - 2 * 86_400_000 - 1, now), "2d ago");
        // clock skew
        assert_eq!(relative_age(now + 60_000, now), "just now");
    }
}
