//! DOM helpers shared by the static-page sources.

use ionian_wx::extract::normalize_ws;
use scraper::{ElementRef, Html, Selector};

/// Parse a selector literal.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector literal is valid")
}

/// Whitespace-normalized text content of an element. Text nodes are joined
/// with a space so adjacent `<span>`s ("71.2" + "°F") stay separate tokens.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

fn contains_label(text: &str, label: &str) -> bool {
    text.contains(label) || text.contains(&label.replace('\'', "\u{2019}"))
}

/// The innermost `<td>` whose text contains `label`.
///
/// Layout tables nest, so an outer cell contains every label on the page;
/// only a cell with no labelled cell inside it is the label cell itself.
pub fn label_cell<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    let td = selector("td");
    document.select(&td).find(|cell| {
        contains_label(&element_text(cell), label)
            && !cell
                .select(&td)
                .any(|inner| contains_label(&element_text(&inner), label))
    })
}

/// The next sibling element of `el` with tag `name`.
pub fn next_sibling_named<'a>(el: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name() == name)
}

/// Text of the cell following the label cell for `label`.
pub fn value_after_label(document: &Html, label: &str) -> Option<String> {
    let cell = label_cell(document, label)?;
    next_sibling_named(&cell, "td").map(|v| element_text(&v))
}
