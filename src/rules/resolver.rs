use crate::matcher::normalize::normalize_key;
use crate::rules::dom::DomDocument;

/// What a rule reference resolved to in the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTarget {
    Field(usize),
    Wrapper(usize),
}

/// Live-DOM variant of the reconciliation cascade, run once per rule per
/// page load. Priority: id, name, data-attribute, case-insensitive id/name,
/// label association, placeholder containment, fuzzy id/name containment.
pub fn resolve_field(doc: &DomDocument, reference: &str) -> Option<usize> {
    if reference.is_empty() {
        return None;
    }

    // 1. Exact id
    if let Some(i) = doc.fields.iter().position(|f| f.id == reference) {
        return Some(i);
    }

    // 2. Exact name
    if let Some(i) = doc.fields.iter().position(|f| f.name == reference) {
        return Some(i);
    }

    // 3. Data attribute
    if let Some(i) = doc.fields.iter().position(|f| f.data_name == reference) {
        return Some(i);
    }

    // 4. Case-insensitive id/name
    if let Some(i) = doc.fields.iter().position(|f| {
        f.id.eq_ignore_ascii_case(reference) || f.name.eq_ignore_ascii_case(reference)
    }) {
        return Some(i);
    }

    let needle = normalize_key(reference);
    if needle.is_empty() {
        return None;
    }

    // 5. Label association
    if let Some(i) = doc.fields.iter().position(|f| {
        f.label
            .as_deref()
            .map(|l| normalize_key(l) == needle)
            .unwrap_or(false)
    }) {
        return Some(i);
    }

    // 6. Placeholder containment
    if let Some(i) = doc.fields.iter().position(|f| {
        !f.placeholder.is_empty() && normalize_key(&f.placeholder).contains(&needle)
    }) {
        return Some(i);
    }

    // 7. Fuzzy id/name containment
    doc.fields.iter().position(|f| {
        let id = normalize_key(&f.id);
        let name = normalize_key(&f.name);
        (!id.is_empty() && (id.contains(&needle) || needle.contains(&id)))
            || (!name.is_empty() && (name.contains(&needle) || needle.contains(&name)))
    })
}

/// Resolve an action target: a field first, then a wrapper container by id
/// (exact, then normalized).
pub fn resolve_target(doc: &DomDocument, reference: &str) -> Option<ResolvedTarget> {
    if let Some(i) = resolve_field(doc, reference) {
        return Some(ResolvedTarget::Field(i));
    }

    if let Some(i) = doc.wrapper_index(reference) {
        return Some(ResolvedTarget::Wrapper(i));
    }

    let needle = normalize_key(reference);
    doc.wrappers
        .iter()
        .position(|w| normalize_key(&w.id) == needle)
        .map(ResolvedTarget::Wrapper)
}
