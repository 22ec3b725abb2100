//! Canned "web search". There is no retrieval behind it: a fixed answer for
//! recent Python questions, a stock reply for everything else.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::truncate_chars;

static NEEDS_SEARCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)today|now|current|news|2024|2025|update|recent|latest|what is|who is|how to|first minister")
        .expect("static regex")
});

static RECENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"2024|2025|latest|new").expect("static regex"));

const PYTHON_SUMMARY: &str = "As of 2025, Python 3.13 has been released with key updates:\
\n- Faster startup and execution\
\n- Improved pattern matching (PEP 707)\
\n- New 'tomllib' standard library module\
\n- Enhanced error messages\
\n- Security improvements\
\nFor full details, visit: https://docs.python.org/3.13/";

const NO_RESULT: &str = "No direct public summary found. For current info, check official sources.";

const NOTICE_PREVIEW_CHARS: usize = 120;

/// Whether the prompt looks like it asks about something time-sensitive.
pub fn needs_search(prompt: &str) -> bool {
    NEEDS_SEARCH.is_match(prompt)
}

pub fn search_web(query: &str) -> String {
    if query.to_lowercase().contains("python") && RECENT.is_match(query) {
        PYTHON_SUMMARY.to_string()
    } else {
        NO_RESULT.to_string()
    }
}

pub fn search_notice(prompt: &str, result: &str) -> String {
    format!(
        "🔍 Web search: \"{}\" → \"{}...\"",
        prompt,
        truncate_chars(result, NOTICE_PREVIEW_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_words_are_case_insensitive() {
        assert!(needs_search("What is a monad?"));
        assert!(needs_search("LATEST rust release"));
        assert!(needs_search("who is the First Minister of Wales"));
        assert!(!needs_search("Write a haiku about autumn"));
    }

    #[test]
    fn python_questions_get_the_canned_summary() {
        assert!(search_web("Python latest version").starts_with("As of 2025, Python 3.13"));
        assert!(search_web("what's new in python").contains("tomllib"));
    }

    #[test]
    fn recent_match_is_case_sensitive_like_the_stub() {
        assert_eq!(search_web("Python LATEST"), NO_RESULT);
        assert_eq!(search_web("rust 2025"), NO_RESULT);
    }

    #[test]
    fn notice_truncates_result() {
        let notice = search_notice("python 2025", PYTHON_SUMMARY);
        assert!(notice.starts_with("🔍 Web search: \"python 2025\" → \"As of 2025"));
        assert!(notice.ends_with("...\""));

        let quoted = notice.split(" → \"").nth(1).unwrap();
        assert_eq!(quoted.trim_end_matches("...\"").chars().count(), 120);
    }
}
