use serde::{Deserialize, Serialize};

use crate::extract::element_model::RawElement;

/// The stable, rule-facing identity of a form field, independent of whatever
/// id the field carries in the currently published markup. Persisted by the
/// dashboard; the matcher only ever updates its technical pointer, never
/// deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldIdentity {
    #[serde(rename = "storedId")]
    pub stored_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "fieldName", skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(rename = "technicalId", skip_serializing_if = "Option::is_none")]
    pub technical_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

impl FieldIdentity {
    pub fn named(stored_id: &str, display_name: &str) -> Self {
        Self {
            stored_id: stored_id.to_string(),
            display_name: display_name.to_string(),
            field_name: None,
            technical_id: None,
            aliases: None,
        }
    }

    /// Every name this identity is known by, primary names first.
    pub fn known_names(&self) -> Vec<&str> {
        let mut names = vec![self.display_name.as_str()];
        if let Some(n) = &self.field_name {
            names.push(n);
        }
        if let Some(t) = &self.technical_id {
            names.push(t);
        }
        if let Some(aliases) = &self.aliases {
            names.extend(aliases.iter().map(|a| a.as_str()));
        }
        names.retain(|n| !n.is_empty());
        names
    }
}

/// Which cascade strategy produced a match. Confidence is a relative tier,
/// not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    Exact,
    Normalized,
    SuffixStripped,
    Containment,
    FuzzyKeyword,
}

impl MatchMethod {
    pub fn confidence(self) -> f32 {
        match self {
            MatchMethod::Exact => 1.0,
            MatchMethod::Normalized => 0.85,
            MatchMethod::SuffixStripped => 0.7,
            MatchMethod::Containment => 0.5,
            MatchMethod::FuzzyKeyword => 0.3,
        }
    }
}

/// One reconciliation attempt's outcome. Ephemeral: used to update a
/// FieldIdentity's technical pointer, never persisted itself.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub element: &'a RawElement,
    pub confidence: f32,
    pub method: MatchMethod,
}

/// Per-identity outcome of a whole-scan reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    Matched {
        stored_id: String,
        technical_id: String,
        method: MatchMethod,
        confidence: f32,
    },
    /// No live element matched. The identity's previous technical pointer is
    /// left untouched so existing rules keep working.
    Unresolved { stored_id: String },
}
