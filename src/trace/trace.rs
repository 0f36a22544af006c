use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One diagnostics event from a scan or a rule-evaluation run, written as a
/// JSONL line. These are advisory only — nothing in the pipeline branches on
/// whether tracing succeeded.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    PageFetched {
        timestamp_ms: u128,
        url: String,
        elements: usize,
        forms: usize,
    },
    PageFailed {
        timestamp_ms: u128,
        url: String,
        error: String,
    },
    FormSkippedNoId {
        timestamp_ms: u128,
        page_url: String,
    },
    DuplicateIdSuppressed {
        timestamp_ms: u128,
        id: String,
        page_url: String,
    },
    FieldUnresolved {
        timestamp_ms: u128,
        field: String,
    },
    RuleGatedOut {
        timestamp_ms: u128,
        rule: String,
        unresolved_field: String,
    },
    UnknownOperator {
        timestamp_ms: u128,
        rule: String,
        operator: String,
    },
}

pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
