use crate::config::{PARAGRAPH_BREAK, WIKI_BASE_URL};

/// Returns the first paragraph (text before the first blank line), trimmed.
/// `None` if that paragraph is empty.
pub fn extract_abstract(text: &str) -> Option<String> {
    let lead = text
        .split_once(PARAGRAPH_BREAK)
        .map_or(text, |(lead, _)| lead)
        .trim();

    if lead.is_empty() {
        None
    } else {
        Some(lead.to_string())
    }
}

/// Spaces become underscores; nothing else is escaped.
pub fn page_url(title: &str) -> String {
    let mut url = String::with_capacity(WIKI_BASE_URL.len() + title.len());
    url.push_str(WIKI_BASE_URL);
    url.push_str(&title.replace(' ', "_"));
    url
}
