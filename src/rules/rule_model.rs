use serde::{Deserialize, Serialize};

/// The active rule set for one site, as delivered by the rule store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(rename = "logicType", default)]
    pub logic_type: LogicType,
    pub conditions: Vec<Condition>,
    pub actions: Vec<RuleAction>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    /// Form the rule is bound to. Legacy rules have none and fall back to
    /// cross-form matching.
    #[serde(rename = "formId", skip_serializing_if = "Option::is_none", default)]
    pub form_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicType {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleAction {
    pub r#type: String,
    #[serde(rename = "targetFieldId")]
    pub target_field_id: String,
}

fn default_true() -> bool {
    true
}

/// Condition operators. Only the keyword itself is normalized (lower-case,
/// whitespace collapsed to underscores); value comparisons stay
/// case-sensitive as authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Unknown,
}

impl Operator {
    pub fn parse(raw: &str) -> Self {
        let keyword = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match keyword.as_str() {
            "equals" | "is" | "==" => Operator::Equals,
            "not_equals" | "is_not" | "!=" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            _ => Operator::Unknown,
        }
    }

    /// Unknown operators evaluate to false, never throw.
    pub fn evaluate(self, actual: &str, expected: &str) -> bool {
        match self {
            Operator::Equals => actual == expected,
            Operator::NotEquals => actual != expected,
            Operator::Contains => actual.contains(expected),
            Operator::NotContains => !actual.contains(expected),
            Operator::Unknown => false,
        }
    }
}

/// What an action does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Show,
    Hide,
    Enable,
    Disable,
    Require,
    MakeOptional,
}

impl ActionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        let keyword = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match keyword.as_str() {
            "show" => Some(ActionKind::Show),
            "hide" => Some(ActionKind::Hide),
            "enable" => Some(ActionKind::Enable),
            "disable" => Some(ActionKind::Disable),
            "require" => Some(ActionKind::Require),
            "make_optional" | "optional" => Some(ActionKind::MakeOptional),
            _ => None,
        }
    }
}
