use crate::extract::element_model::RawElement;
use crate::matcher::match_model::{FieldIdentity, MatchMethod, MatchResult, ReconcileOutcome};
use crate::matcher::normalize::{fuzzy_token_overlap, normalize_key, normalize_suffix_stripped};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{now_ms, ScanEvent};

/// Scoping for one reconciliation attempt.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// The form the rule is bound to. Candidates tagged with a different
    /// form are excluded before the cascade runs.
    pub form_id: Option<String>,
    /// Legacy rules carry no form association; only they may fall back to
    /// matching across forms.
    pub allow_cross_form: bool,
}

/// Reconcile a stored field identity against the current flat element list.
///
/// Strict priority cascade — the first strategy yielding any candidate wins,
/// ties broken by first-seen order. No match is a valid outcome meaning
/// "field absent from this page", never an error.
pub fn reconcile<'a>(
    identity: &FieldIdentity,
    elements: &'a [RawElement],
    opts: &MatchOptions,
) -> Option<MatchResult<'a>> {
    let names = identity.known_names();
    if names.is_empty() {
        return None;
    }

    let candidates: Vec<&RawElement> = elements
        .iter()
        .filter(|el| in_scope(el, opts))
        .collect();

    // The case-sensitive exact pass runs over every candidate before the
    // case-insensitive one; both report as the exact strategy.
    let strategies: [(MatchMethod, MatchFn); 6] = [
        (MatchMethod::Exact, match_exact_sensitive),
        (MatchMethod::Exact, match_exact_insensitive),
        (MatchMethod::Normalized, match_normalized),
        (MatchMethod::SuffixStripped, match_suffix_stripped),
        (MatchMethod::Containment, match_containment),
        (MatchMethod::FuzzyKeyword, match_fuzzy_keyword),
    ];

    for (method, strategy) in strategies {
        // The keyword fallback only applies when the identity carries no
        // id/name metadata beyond its display name.
        if method == MatchMethod::FuzzyKeyword
            && (identity.field_name.is_some() || identity.technical_id.is_some())
        {
            continue;
        }

        for el in &candidates {
            if strategy(&names, el) {
                return Some(MatchResult {
                    element: el,
                    confidence: method.confidence(),
                    method,
                });
            }
        }
    }

    None
}

/// Reconcile a whole set of identities, updating each technical pointer only
/// on a successful (non-zero-confidence) match. Misses are reported and
/// traced but never delete stored state.
pub fn reconcile_all(
    identities: &mut [FieldIdentity],
    elements: &[RawElement],
    opts: &MatchOptions,
    tracer: &TraceLogger,
) -> Vec<ReconcileOutcome> {
    let mut outcomes = Vec::with_capacity(identities.len());

    for identity in identities.iter_mut() {
        match reconcile(identity, elements, opts) {
            Some(result) => {
                let technical_id = if result.element.id.is_empty() {
                    result.element.name.clone()
                } else {
                    result.element.id.clone()
                };
                identity.technical_id = Some(technical_id.clone());
                outcomes.push(ReconcileOutcome::Matched {
                    stored_id: identity.stored_id.clone(),
                    technical_id,
                    method: result.method,
                    confidence: result.confidence,
                });
            }
            None => {
                tracer.log(&ScanEvent::FieldUnresolved {
                    timestamp_ms: now_ms(),
                    field: identity.display_name.clone(),
                });
                outcomes.push(ReconcileOutcome::Unresolved {
                    stored_id: identity.stored_id.clone(),
                });
            }
        }
    }

    outcomes
}

fn in_scope(el: &RawElement, opts: &MatchOptions) -> bool {
    if opts.allow_cross_form {
        return true;
    }
    match (&opts.form_id, &el.form_id) {
        (Some(bound), Some(actual)) => bound == actual,
        // Elements outside any form stay candidates for form-bound rules.
        _ => true,
    }
}

type MatchFn = fn(&[&str], &RawElement) -> bool;

fn element_keys(el: &RawElement) -> [&str; 2] {
    [el.id.as_str(), el.name.as_str()]
}

/// Strategy 1a: exact id/name equality, case-sensitive.
fn match_exact_sensitive(names: &[&str], el: &RawElement) -> bool {
    let keys = element_keys(el);
    names
        .iter()
        .any(|n| keys.iter().any(|k| !k.is_empty() && k == n))
}

/// Strategy 1b: exact id/name equality, ignoring case.
fn match_exact_insensitive(names: &[&str], el: &RawElement) -> bool {
    let keys = element_keys(el);
    names.iter().any(|n| {
        keys.iter()
            .any(|k| !k.is_empty() && k.eq_ignore_ascii_case(n))
    })
}

/// Strategy 2: equality after lower-casing and stripping non-alphanumerics.
fn match_normalized(names: &[&str], el: &RawElement) -> bool {
    let keys: Vec<String> = element_keys(el)
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| normalize_key(k))
        .collect();

    names
        .iter()
        .map(|n| normalize_key(n))
        .any(|n| !n.is_empty() && keys.contains(&n))
}

/// Strategy 3: normalized equality after dropping trailing digits on both
/// sides ("FullName" vs "FullName2").
fn match_suffix_stripped(names: &[&str], el: &RawElement) -> bool {
    let keys: Vec<String> = element_keys(el)
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| normalize_suffix_stripped(k))
        .collect();

    names
        .iter()
        .map(|n| normalize_suffix_stripped(n))
        .any(|n| !n.is_empty() && keys.contains(&n))
}

/// Strategy 4: normalized containment either way ("full-name" inside
/// "your-full-name-field").
fn match_containment(names: &[&str], el: &RawElement) -> bool {
    let keys: Vec<String> = element_keys(el)
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| normalize_key(k))
        .collect();

    for name in names {
        let n = normalize_key(name);
        if n.is_empty() {
            continue;
        }
        for k in &keys {
            if k.contains(&n) || n.contains(k) {
                return true;
            }
        }
    }

    false
}

/// Strategy 5: token-overlap fallback for identities known only by a human
/// display name.
fn match_fuzzy_keyword(names: &[&str], el: &RawElement) -> bool {
    let keys = element_keys(el);

    names.iter().any(|n| {
        keys.iter()
            .any(|k| !k.is_empty() && fuzzy_token_overlap(n, k))
    })
}
