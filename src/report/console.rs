use crate::crawl::crawler::ScanResult;
use crate::matcher::match_model::ReconcileOutcome;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format a site scan for terminal output.
///
/// Produces output like:
/// ```text
/// === Scan: my-site (3 pages) ===
///
///   https://my-site.webflow.io — 2 forms
///   https://my-site.webflow.io/contact — 1 form
///
/// 14 elements, fingerprint 3c2a…
/// Diagnostics: 1 duplicate suppressed, 0 forms skipped, 0 pages failed
/// ```
pub fn format_scan_report(site_id: &str, result: &ScanResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Scan: {} ({} pages) ===\n\n",
        site_id, result.pages_scanned
    ));

    for page in &result.forms_per_page {
        let noun = if page.forms == 1 { "form" } else { "forms" };
        out.push_str(&format!("  {} — {} {}\n", page.url, page.forms, noun));
    }

    out.push_str(&format!(
        "\n{} elements, fingerprint {}\n",
        result.elements.len(),
        result.fingerprint
    ));

    let d = &result.diagnostics;
    out.push_str(&format!(
        "Diagnostics: {} duplicates suppressed, {} forms skipped (no id), {} unreferenceable dropped, {} pages failed\n",
        d.duplicates_suppressed, d.forms_skipped_no_id, d.unreferenceable_dropped, d.pages_failed
    ));

    out
}

/// Format a reconciliation run. Unresolved fields are shown, never hidden —
/// they mean "field absent from this site", which the user needs to see.
pub fn format_reconcile_report(outcomes: &[ReconcileOutcome]) -> String {
    let mut out = String::new();
    let mut matched = 0usize;
    let mut unresolved = 0usize;

    out.push_str("=== Field reconciliation ===\n\n");

    for outcome in outcomes {
        match outcome {
            ReconcileOutcome::Matched {
                stored_id,
                technical_id,
                method,
                confidence,
            } => {
                matched += 1;
                out.push_str(&format!(
                    "\u{2713} {} -> {} ({:?}, confidence {:.2})\n",
                    stored_id, technical_id, method, confidence
                ));
            }
            ReconcileOutcome::Unresolved { stored_id } => {
                unresolved += 1;
                out.push_str(&format!("\u{2717} {} — field not found\n", stored_id));
            }
        }
    }

    out.push_str(&format!(
        "\n=== {} matched, {} unresolved ({} total) ===\n",
        matched,
        unresolved,
        outcomes.len()
    ));

    out
}
