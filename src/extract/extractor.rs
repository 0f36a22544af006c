use regex::RegexBuilder;

use crate::extract::element_model::{FormObservation, Page, PageExtraction, RawElement, WRAPPER_TAG};
use crate::extract::scan_context::ScanContext;
use crate::markup::tokenizer::{attribute, inner_text, tag_fragments, void_tags};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{now_ms, ScanEvent};

/// Input types that are never data fields.
const NON_DATA_INPUT_TYPES: [&str; 4] = ["submit", "reset", "button", "image"];

/// Extract every form, field, and wrapper container from one page's markup.
///
/// Forms without an id are skipped and traced — they are not merged into the
/// outside-forms bucket. The shared `ScanContext` enforces first-seen-wins
/// de-duplication across the whole site scan.
pub fn extract_page(
    markup: &str,
    page: &Page,
    ctx: &mut ScanContext,
    tracer: &TraceLogger,
) -> PageExtraction {
    let mut elements: Vec<RawElement> = Vec::new();
    let mut forms: Vec<FormObservation> = Vec::new();

    let form_fragments = tag_fragments(markup, "form");

    // ---- Form-scoped pass ----
    for fragment in &form_fragments {
        let open = match open_tag(fragment) {
            Some(o) => o,
            None => continue,
        };

        let form_id = match attribute(open, "id") {
            Some(id) if !id.is_empty() => id,
            _ => {
                ctx.forms_skipped_no_id += 1;
                tracer.log(&ScanEvent::FormSkippedNoId {
                    timestamp_ms: now_ms(),
                    page_url: page.url.clone(),
                });
                continue;
            }
        };

        let display_name = attribute(open, "data-name")
            .or_else(|| attribute(open, "name"))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| form_id.clone());

        let fields = extract_fields(
            fragment,
            Some(&form_id),
            Some(&display_name),
            page,
            ctx,
            tracer,
        );

        elements.extend(fields.clone());
        forms.push(FormObservation {
            form_id,
            display_name,
            fields,
        });
    }

    // ---- Outside-forms pass ----
    // Fields living outside any <form> tag are still rule targets; strip the
    // form fragments so their fields are not observed twice.
    let mut remainder = markup.to_string();
    for fragment in &form_fragments {
        remainder = remainder.replacen(fragment.as_str(), "", 1);
    }
    elements.extend(extract_fields(&remainder, None, None, page, ctx, tracer));

    // ---- Wrapper pass ----
    elements.extend(extract_wrappers(markup, page, ctx, tracer));

    PageExtraction { elements, forms }
}

/// Scan one markup scope for input/select/textarea fields.
///
/// Radio inputs sharing a `name` coalesce into a single logical field whose
/// `options` accumulate each radio's value.
fn extract_fields(
    scope: &str,
    form_id: Option<&str>,
    form_name: Option<&str>,
    page: &Page,
    ctx: &mut ScanContext,
    tracer: &TraceLogger,
) -> Vec<RawElement> {
    let mut fields: Vec<RawElement> = Vec::new();

    // ---- <input> ----
    for tag in void_tags(scope, "input") {
        let input_type = attribute(&tag, "type").unwrap_or_else(|| "text".to_string());
        if NON_DATA_INPUT_TYPES.contains(&input_type.to_lowercase().as_str()) {
            continue;
        }

        let id = attribute(&tag, "id").unwrap_or_default();
        let name = attribute(&tag, "name").unwrap_or_default();

        if id.is_empty() && name.is_empty() {
            ctx.unreferenceable_dropped += 1;
            continue;
        }

        if input_type.eq_ignore_ascii_case("radio") && !name.is_empty() {
            let value = attribute(&tag, "value").unwrap_or_default();

            // Coalesce into an existing radio group observed in this scope.
            if let Some(group) = fields
                .iter_mut()
                .find(|f| f.r#type == "radio" && f.name == name)
            {
                if !value.is_empty() {
                    group.options.get_or_insert_with(Vec::new).push(value);
                }
                // Later radios' ids still count as seen for dedup purposes.
                if !id.is_empty() {
                    ctx.claim(&id);
                }
                continue;
            }

            let mut group = build_element(&id, "input", "radio", &name, form_id, form_name, page);
            if !value.is_empty() {
                group.options = Some(vec![value]);
            }
            if claim_element(&group, ctx, tracer, page) {
                fields.push(group);
            }
            continue;
        }

        let mut el = build_element(&id, "input", &input_type, &name, form_id, form_name, page);
        el.value = attribute(&tag, "value");
        if claim_element(&el, ctx, tracer, page) {
            fields.push(el);
        }
    }

    // ---- <select> ----
    for fragment in tag_fragments(scope, "select") {
        let open = match open_tag(&fragment) {
            Some(o) => o,
            None => continue,
        };
        let id = attribute(open, "id").unwrap_or_default();
        let name = attribute(open, "name").unwrap_or_default();

        if id.is_empty() && name.is_empty() {
            ctx.unreferenceable_dropped += 1;
            continue;
        }

        let mut el = build_element(&id, "select", "select", &name, form_id, form_name, page);
        el.options = Some(parse_select_options(&fragment));
        if claim_element(&el, ctx, tracer, page) {
            fields.push(el);
        }
    }

    // ---- <textarea> ----
    for fragment in tag_fragments(scope, "textarea") {
        let open = match open_tag(&fragment) {
            Some(o) => o,
            None => continue,
        };
        let id = attribute(open, "id").unwrap_or_default();
        let name = attribute(open, "name").unwrap_or_default();

        if id.is_empty() && name.is_empty() {
            ctx.unreferenceable_dropped += 1;
            continue;
        }

        let el = build_element(&id, "textarea", "textarea", &name, form_id, form_name, page);
        if claim_element(&el, ctx, tracer, page) {
            fields.push(el);
        }
    }

    fields
}

/// Parse a `<select>` fragment's options: prefer each option's `value`
/// attribute, fall back to its text content, and drop placeholder entries
/// ("Select...", "Choose one", "--").
pub fn parse_select_options(select_fragment: &str) -> Vec<String> {
    let mut options = Vec::new();

    let closed = tag_fragments(select_fragment, "option");
    if !closed.is_empty() {
        for opt in &closed {
            let open = match open_tag(opt) {
                Some(o) => o,
                None => continue,
            };
            let text = inner_text(&opt[open.len()..]);
            let value = attribute(open, "value").filter(|v| !v.is_empty());
            push_option(&mut options, value, &text);
        }
        return options;
    }

    // Sloppy markup drops </option>; fall back to open tags with value attrs.
    for open in void_tags(select_fragment, "option") {
        let value = attribute(&open, "value").filter(|v| !v.is_empty());
        push_option(&mut options, value, "");
    }

    options
}

fn push_option(options: &mut Vec<String>, value: Option<String>, text: &str) {
    let candidate = match value {
        Some(v) => v,
        None => text.trim().to_string(),
    };

    if candidate.is_empty() || is_placeholder_option(&candidate) || is_placeholder_option(text) {
        return;
    }

    options.push(candidate);
}

/// Placeholder options ("Select...", "Choose one", "Pick a plan", "-- none --")
/// are prompts, not values.
pub fn is_placeholder_option(text: &str) -> bool {
    let re = match RegexBuilder::new(r"^\s*(select|choose|pick|--)")
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return false,
    };
    re.is_match(text)
}

/// Find `div`/`span` containers with an id that wrap at least one field tag.
/// These are show/hide targets and label sources, not data fields.
fn extract_wrappers(
    markup: &str,
    page: &Page,
    ctx: &mut ScanContext,
    tracer: &TraceLogger,
) -> Vec<RawElement> {
    let mut wrappers = Vec::new();

    for tag in ["div", "span"] {
        for fragment in tag_fragments(markup, tag) {
            let open = match open_tag(&fragment) {
                Some(o) => o,
                None => continue,
            };
            let id = match attribute(open, "id") {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };

            let inner = &fragment[open.len()..];
            let lower = inner.to_lowercase();
            if !lower.contains("<input") && !lower.contains("<select") && !lower.contains("<textarea")
            {
                continue;
            }

            let label = wrapper_label(inner);

            let mut el = build_element(&id, tag, WRAPPER_TAG, "", None, None, page);
            el.value = label;
            if claim_element(&el, ctx, tracer, page) {
                wrappers.push(el);
            }
        }
    }

    wrappers
}

/// Human-readable label for a wrapper: enclosed <label> text, then the
/// wrapped field's data-name, then its name.
fn wrapper_label(inner: &str) -> Option<String> {
    if let Some(label_fragment) = tag_fragments(inner, "label").into_iter().next() {
        let text = inner_text(&label_fragment);
        if !text.is_empty() {
            return Some(text);
        }
    }

    for tag in void_tags(inner, "input")
        .into_iter()
        .chain(tag_fragments(inner, "select").into_iter())
        .chain(tag_fragments(inner, "textarea").into_iter())
    {
        if let Some(data_name) = attribute(&tag, "data-name").filter(|n| !n.is_empty()) {
            return Some(data_name);
        }
        if let Some(name) = attribute(&tag, "name").filter(|n| !n.is_empty()) {
            return Some(name);
        }
    }

    None
}

fn build_element(
    id: &str,
    tag_name: &str,
    input_type: &str,
    name: &str,
    form_id: Option<&str>,
    form_name: Option<&str>,
    page: &Page,
) -> RawElement {
    RawElement {
        id: id.to_string(),
        tag_name: tag_name.to_string(),
        r#type: input_type.to_string(),
        name: name.to_string(),
        value: None,
        options: None,
        form_id: form_id.map(|s| s.to_string()),
        form_name: form_name.map(|s| s.to_string()),
        page_url: Some(page.url.clone()),
    }
}

/// First-seen-wins: claim the element's dedup key, tracing suppressed
/// duplicates. Name-only elements are keyed by name so the same anonymous
/// field is not emitted twice either.
fn claim_element(
    el: &RawElement,
    ctx: &mut ScanContext,
    tracer: &TraceLogger,
    page: &Page,
) -> bool {
    let key = if el.id.is_empty() {
        format!("name:{}", el.name)
    } else {
        el.id.clone()
    };

    if ctx.claim(&key) {
        true
    } else {
        tracer.log(&ScanEvent::DuplicateIdSuppressed {
            timestamp_ms: now_ms(),
            id: key,
            page_url: page.url.clone(),
        });
        false
    }
}

/// The open tag of a fragment, through its first `>`.
fn open_tag(fragment: &str) -> Option<&str> {
    fragment.find('>').map(|i| &fragment[..=i])
}
