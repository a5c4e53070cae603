//! HTML helpers shared by the classifier and the extractors
//!
//! Documents are parsed with `scraper::Html`, which is not `Send`. Callers
//! parse, query and drop a document without crossing an `.await`.

use scraper::{ElementRef, Html, Selector};

/// Parses a raw document into a queryable tree
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// Extracts the page title from the HTML document
///
/// Leading whitespace is removed; trailing text is kept verbatim because
/// classification matches on prefixes that end in a space.
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("head title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim_start().to_string())
}

/// Concatenated text of an element and all of its descendants
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// First descendant of `element` matching `selector`
pub(crate) fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Attribute value of an element, owned
pub(crate) fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}
