use serde::{Deserialize, Serialize};

/// A fetchable location discovered for one scan. Never mutated; dropped when
/// the scan completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub slug: String,
    pub title: String,
}

/// One scan-time observation of an HTML element, tagged with its owning form
/// and page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    pub id: String,
    #[serde(rename = "tagName")]
    pub tag_name: String,
    pub r#type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "formId", skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(rename = "formName", skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,
    #[serde(rename = "pageUrl", skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl RawElement {
    /// An element with neither id nor name cannot be referenced by any rule
    /// or stored field — it must not be surfaced to the matcher.
    pub fn is_referenceable(&self) -> bool {
        !self.id.is_empty() || !self.name.is_empty()
    }
}

/// Everything discovered inside one `<form>` tag on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormObservation {
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub fields: Vec<RawElement>,
}

/// Result of extracting one page: the flat element list (form fields,
/// outside-form fields, and wrapper containers) plus per-form groupings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageExtraction {
    pub elements: Vec<RawElement>,
    pub forms: Vec<FormObservation>,
}

/// Tag name used for wrapper containers in the flat list. Wrappers are not
/// data fields; they exist as show/hide targets and label sources.
pub const WRAPPER_TAG: &str = "wrapper";
