use crate::content::{extract_abstract, page_url};

/// One `<page>` element as read from the dump, before any filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    pub title: String,
    pub text: String,
}

/// One `<doc>` entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub url: String,
    /// Always non-empty.
    pub abstract_text: String,
}

impl Summary {
    /// Returns `None` when the page has no usable first paragraph.
    pub fn from_page(page: RawPage) -> Option<Self> {
        let abstract_text = extract_abstract(&page.text)?;
        let url = page_url(&page.title);
        Some(Self {
            title: page.title,
            url,
            abstract_text,
        })
    }
}
