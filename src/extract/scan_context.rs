use std::collections::HashSet;

/// Per-scan shared state: the seen-id set that enforces first-seen-wins
/// de-duplication across every page of one site scan, plus diagnostics
/// counters surfaced in the scan report.
///
/// Passed `&mut` through the extractor/crawler chain so repeated scans can
/// never leak ids between invocations.
#[derive(Debug, Default)]
pub struct ScanContext {
    seen_ids: HashSet<String>,

    pub duplicates_suppressed: usize,
    pub forms_skipped_no_id: usize,
    pub unreferenceable_dropped: usize,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an id for this scan. Returns false (and counts the duplicate)
    /// if the id was already emitted, on this page or any earlier one.
    pub fn claim(&mut self, id: &str) -> bool {
        if self.seen_ids.insert(id.to_string()) {
            true
        } else {
            self.duplicates_suppressed += 1;
            false
        }
    }
}
