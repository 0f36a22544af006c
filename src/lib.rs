use crate::extract::element_model::{Page, PageExtraction, RawElement, WRAPPER_TAG};
use crate::extract::extractor::extract_page;
use crate::extract::scan_context::ScanContext;
use crate::rules::dom::{DomDocument, DomField};
use crate::trace::logger::TraceLogger;

pub mod cli;
pub mod crawl;
pub mod extract;
pub mod markup;
pub mod matcher;
pub mod report;
pub mod rules;
pub mod trace;

/// Scan a single page's markup in isolation: fresh dedup scope, no tracing.
/// The crawler drives `extract_page` directly when scanning a whole site.
pub fn scan_page(markup: &str, page: &Page) -> PageExtraction {
    let mut ctx = ScanContext::new();
    let tracer = TraceLogger::disabled();
    extract_page(markup, page, &mut ctx, &tracer)
}

/// Build a live-document model from scanned elements, so a site's rule set
/// can be previewed host-side against exactly what the scan observed.
///
/// Wrapper elements become wrappers; radio groups expand back into one
/// radio per option so the engine's group re-derivation works.
pub fn document_from_elements(elements: &[RawElement]) -> DomDocument {
    let mut doc = DomDocument::default();

    for el in elements {
        if el.r#type == WRAPPER_TAG {
            doc.add_wrapper(&el.id);
            continue;
        }

        if el.r#type == "radio" {
            let options = el.options.clone().unwrap_or_default();
            if options.is_empty() {
                doc.fields.push(DomField::radio(&el.id, &el.name, ""));
            }
            for (i, value) in options.iter().enumerate() {
                let id = if i == 0 {
                    el.id.clone()
                } else {
                    format!("{}-{}", el.id, i)
                };
                doc.fields.push(DomField::radio(&id, &el.name, value));
            }
            continue;
        }

        let mut field = DomField::new(&el.id, &el.name, &el.tag_name, &el.r#type);
        if let Some(value) = &el.value {
            field.value = value.clone();
        }
        doc.fields.push(field);
    }

    doc
}
