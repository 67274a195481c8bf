//! Log Redaction Layer
//!
//! Diary text is user-sensitive and routinely contains phone numbers or
//! pasted credentials; scrub those plus our own provider keys before any
//! string reaches a log line.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});

/// OpenAI-style `sk-` keys, HuggingFace `hf_` tokens, and bearer headers.
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{20,})|(hf_[a-zA-Z0-9]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = TELEPHONE_RE.replace_all(input, "[REDACTED_PHONE]");
    let redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    redacted.into_owned()
}
