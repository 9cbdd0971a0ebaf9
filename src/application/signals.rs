//! Mention and citation signals for a tracked domain in an AI response

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::Signal;
use crate::util::unique;

/// Chars kept on each side of a mention
const CONTEXT_CHARS: usize = 100;

/// `\s` is ASCII-only here, so Unicode spaces are listed explicitly
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)https?://[^\s<>"{}|\\^`\[\]"#,
        "\u{a0}\u{1680}\u{2000}-\u{200a}\u{2028}\u{2029}\u{202f}\u{205f}\u{3000}\u{feff}",
        "]+"
    ))
    .unwrap()
});

/// Lowercase, without protocol, leading `www.` or trailing slash
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.strip_suffix('/').unwrap_or(rest).to_string()
}

/// Unique URLs in order of first appearance
pub fn extract_urls(text: &str) -> Vec<String> {
    unique(URL_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Byte offset `n` chars before `idx`
fn chars_before(text: &str, idx: usize, n: usize) -> usize {
    text[..idx].char_indices().rev().nth(n.saturating_sub(1)).map(|(i, _)| i).unwrap_or(0)
}

/// Byte offset `n` chars after `idx`
fn chars_after(text: &str, idx: usize, n: usize) -> usize {
    text[idx..].char_indices().nth(n).map(|(i, _)| idx + i).unwrap_or(text.len())
}

/// Lowercased copy of `text` plus, for every byte of it, the byte offset of
/// the source char it came from. The table ends with `text.len()`.
fn fold_case(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);

    for (idx, c) in text.char_indices() {
        for lower in c.to_lowercase() {
            folded.push(lower);
            offsets.extend(std::iter::repeat(idx).take(lower.len_utf8()));
        }
    }
    offsets.push(text.len());

    (folded, offsets)
}

/// Byte ranges in `text` of every case-insensitive occurrence of `needle`
fn find_occurrences(text: &str, needle: &str) -> Vec<(usize, usize)> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let (haystack, offsets) = fold_case(text);
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(pos) = haystack[cursor..].find(&needle) {
        let start = cursor + pos;
        let end = start + needle.len();
        // A match ending inside one char's expansion still covers that char
        let source_end = if end < offsets.len() - 1 && offsets[end] == offsets[end - 1] {
            text[offsets[end]..]
                .chars()
                .next()
                .map(|c| offsets[end] + c.len_utf8())
                .unwrap_or(text.len())
        } else {
            offsets[end]
        };
        found.push((offsets[start], source_end));
        cursor = end;
    }

    found
}

/// Excerpts around every occurrence of `domain`, marked with `...` where clipped
pub fn extract_context(text: &str, domain: &str) -> Vec<String> {
    find_occurrences(text, domain)
        .into_iter()
        .map(|(index, match_end)| {
            let start = chars_before(text, index, CONTEXT_CHARS);
            let end = chars_after(text, match_end, CONTEXT_CHARS);

            let prefix = if start > 0 { "..." } else { "" };
            let suffix = if end < text.len() { "..." } else { "" };
            format!("{}{}{}", prefix, text[start..end].trim(), suffix)
        })
        .collect()
}

/// Signals for `tracked_domain` in `response_text`. No I/O.
pub fn extract_signals(response_text: &str, tracked_domain: &str) -> Signal {
    let urls = extract_urls(response_text);
    let domain = normalize_domain(tracked_domain);

    if domain.is_empty() {
        return Signal {
            mentioned: false,
            cited: false,
            urls,
            context: Vec::new(),
        };
    }

    let context = extract_context(response_text, &domain);
    let mentioned = !context.is_empty();
    let cited = urls.iter().any(|url| url.to_lowercase().contains(&domain));

    Signal {
        mentioned,
        cited,
        urls,
        context,
    }
}
