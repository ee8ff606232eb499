//! Listing parser: rendered HTML -> ordered `DocumentRecord`s for one section.
//!
//! The target page lists documents as table rows. A section starts at a
//! marker row carrying `data-folder-id="<section>"` and runs until the next
//! row classed `folder`.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::domain::{extract_document_id, DocumentRecord};

/// Extracts every document row of `section` from the rendered page.
///
/// A missing section marker is not fatal: it logs a warning and yields an
/// empty list, so the cycle proceeds. Rows without a primary-action download
/// anchor are skipped silently.
pub fn parse_listing(html: &str, section: &str, base_url: &str) -> Vec<DocumentRecord> {
    let doc = Html::parse_document(html);

    let tr_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    let span_sel = Selector::parse("span").unwrap();
    let anchor_sel = Selector::parse("a.btn.btn-primary").unwrap();

    let Some(marker) = doc
        .select(&tr_sel)
        .find(|tr| tr.value().attr("data-folder-id") == Some(section))
    else {
        warn!(section, "section marker row not found");
        return Vec::new();
    };

    let mut records = Vec::new();

    for sibling in marker.next_siblings().filter_map(ElementRef::wrap) {
        if sibling.value().name() != "tr" {
            continue;
        }
        // A `folder` row opens the next top-level section.
        if sibling.value().classes().any(|c| c == "folder") {
            break;
        }

        let Some(record) = parse_row(&sibling, &td_sel, &span_sel, &anchor_sel, base_url) else {
            continue;
        };
        records.push(record);
    }

    records
}

fn parse_row(
    row: &ElementRef<'_>,
    td_sel: &Selector,
    span_sel: &Selector,
    anchor_sel: &Selector,
    base_url: &str,
) -> Option<DocumentRecord> {
    let first_cell = row.select(td_sel).next()?;

    // Primary title is the first direct text node of the cell; text inside
    // nested tags belongs to the description, not the title.
    let main_title = first_cell
        .children()
        .find_map(|child| {
            let text = child.value().as_text()?.trim();
            (!text.is_empty()).then(|| text.to_string())
        })?;

    let description = first_cell
        .select(span_sel)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let title = if description.is_empty() {
        main_title
    } else {
        format!("{main_title} ({description})")
    };

    let href = row
        .select(anchor_sel)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    let url = format!("{base_url}{href}");
    let document_id = extract_document_id(&url);

    Some(DocumentRecord {
        title,
        url,
        document_id,
        filename: None,
    })
}
