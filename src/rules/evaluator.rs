use std::collections::HashMap;

use crate::rules::dom::DomDocument;
use crate::rules::resolver::{resolve_field, resolve_target, ResolvedTarget};
use crate::rules::rule_model::{ActionKind, LogicType, Operator, Rule};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{now_ms, ScanEvent};

/// Free-text input re-evaluation waits this long after the last keystroke.
pub const DEBOUNCE_MS: u64 = 300;

/// One condition, resolved to a live field.
#[derive(Debug, Clone)]
struct ResolvedCondition {
    field: usize,
    operator: Operator,
    raw_operator: String,
    value: String,
}

/// One action, resolved to a live field or wrapper.
#[derive(Debug, Clone)]
struct ResolvedAction {
    kind: ActionKind,
    target: ResolvedTarget,
}

#[derive(Debug, Clone)]
struct ApplicableRule {
    id: String,
    name: String,
    logic_type: LogicType,
    conditions: Vec<ResolvedCondition>,
    actions: Vec<ResolvedAction>,
}

/// Evaluates the active rule set against a live document.
///
/// Rules whose condition fields or action targets cannot be resolved are
/// gated out once, for the lifetime of the page load — fields do not appear
/// mid-session on a static page. Each run recomputes everything from the
/// document itself; the engine retains no per-run state.
pub struct RuleEngine {
    applicable: Vec<ApplicableRule>,
    gated_out: usize,
    pending_deadline: Option<u64>,
}

impl RuleEngine {
    pub fn new(rules: &[Rule], doc: &DomDocument, tracer: &TraceLogger) -> Self {
        let mut applicable = Vec::new();
        let mut gated_out = 0;

        'rules: for rule in rules.iter().filter(|r| r.is_active) {
            let mut conditions = Vec::with_capacity(rule.conditions.len());
            for cond in &rule.conditions {
                match resolve_field(doc, &cond.field_id) {
                    Some(field) => conditions.push(ResolvedCondition {
                        field,
                        operator: Operator::parse(&cond.operator),
                        raw_operator: cond.operator.clone(),
                        value: cond.value.clone(),
                    }),
                    None => {
                        gated_out += 1;
                        tracer.log(&ScanEvent::RuleGatedOut {
                            timestamp_ms: now_ms(),
                            rule: rule.name.clone(),
                            unresolved_field: cond.field_id.clone(),
                        });
                        continue 'rules;
                    }
                }
            }

            let mut actions = Vec::with_capacity(rule.actions.len());
            for action in &rule.actions {
                let kind = match ActionKind::parse(&action.r#type) {
                    Some(k) => k,
                    None => {
                        eprintln!(
                            "Warning: rule '{}' has unknown action type '{}'; skipping action",
                            rule.name, action.r#type
                        );
                        continue;
                    }
                };
                match resolve_target(doc, &action.target_field_id) {
                    Some(target) => actions.push(ResolvedAction { kind, target }),
                    None => {
                        gated_out += 1;
                        tracer.log(&ScanEvent::RuleGatedOut {
                            timestamp_ms: now_ms(),
                            rule: rule.name.clone(),
                            unresolved_field: action.target_field_id.clone(),
                        });
                        continue 'rules;
                    }
                }
            }

            applicable.push(ApplicableRule {
                id: rule.id.clone(),
                name: rule.name.clone(),
                logic_type: rule.logic_type,
                conditions,
                actions,
            });
        }

        Self {
            applicable,
            gated_out,
            pending_deadline: None,
        }
    }

    pub fn applicable_count(&self) -> usize {
        self.applicable.len()
    }

    pub fn gated_out_count(&self) -> usize {
        self.gated_out
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.applicable.iter().map(|r| r.id.as_str()).collect()
    }

    /// Evaluate every applicable rule in authored order and apply its
    /// actions. Later rules may override earlier ones on the same target
    /// within one pass; last write wins.
    pub fn run_all(&self, doc: &mut DomDocument, tracer: &TraceLogger) {
        for rule in &self.applicable {
            let met = self.rule_is_met(rule, doc, tracer);
            for action in &rule.actions {
                apply_action(doc, action, met);
            }
        }
    }

    /// Whether one rule's conditions are satisfied against the current
    /// document.
    fn rule_is_met(&self, rule: &ApplicableRule, doc: &DomDocument, tracer: &TraceLogger) -> bool {
        if rule.conditions.is_empty() {
            return false;
        }

        // Conditions grouped by target field: OR within a group, the rule's
        // logic type across groups.
        let mut groups: Vec<(usize, Vec<&ResolvedCondition>)> = Vec::new();
        for cond in &rule.conditions {
            match groups.iter_mut().find(|(field, _)| *field == cond.field) {
                Some((_, conds)) => conds.push(cond),
                None => groups.push((cond.field, vec![cond])),
            }
        }

        let group_satisfied = |conds: &[&ResolvedCondition]| {
            conds.iter().any(|c| {
                if c.operator == Operator::Unknown {
                    tracer.log(&ScanEvent::UnknownOperator {
                        timestamp_ms: now_ms(),
                        rule: rule.name.clone(),
                        operator: c.raw_operator.clone(),
                    });
                    return false;
                }
                let actual = extract_value(doc, c.field);
                c.operator.evaluate(&actual, &c.value)
            })
        };

        match rule.logic_type {
            LogicType::And => groups.iter().all(|(_, conds)| group_satisfied(conds)),
            LogicType::Or => groups.iter().any(|(_, conds)| group_satisfied(conds)),
        }
    }

    // ------------------------------------------------------------------
    // Re-evaluation triggers
    // ------------------------------------------------------------------

    /// A `change` event re-runs all applicable rules immediately.
    pub fn on_change(&mut self, doc: &mut DomDocument, tracer: &TraceLogger) {
        self.pending_deadline = None;
        self.run_all(doc, tracer);
    }

    /// An `input` event on a free-text field schedules a debounced run.
    pub fn on_input(&mut self, now: u64) {
        self.pending_deadline = Some(now + DEBOUNCE_MS);
    }

    /// Run the pending debounced evaluation if its window has expired.
    /// Returns whether a run happened.
    pub fn flush(&mut self, now: u64, doc: &mut DomDocument, tracer: &TraceLogger) -> bool {
        match self.pending_deadline {
            Some(deadline) if now >= deadline => {
                self.pending_deadline = None;
                self.run_all(doc, tracer);
                true
            }
            _ => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending_deadline.is_some()
    }
}

/// Current value of a field, with the per-kind extraction rules.
pub fn extract_value(doc: &DomDocument, field: usize) -> String {
    let f = match doc.fields.get(field) {
        Some(f) => f,
        None => return String::new(),
    };

    match f.input_type.as_str() {
        "checkbox" => {
            if f.checked {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        // The referenced radio may not be the checked one; re-derive from
        // the group by name.
        "radio" => doc
            .checked_radio_value(&f.name)
            .unwrap_or_default()
            .to_string(),
        "select" => f.value.clone(),
        _ => {
            if f.value.is_empty() {
                f.text.clone()
            } else {
                f.value.clone()
            }
        }
    }
}

fn apply_action(doc: &mut DomDocument, action: &ResolvedAction, met: bool) {
    match action.kind {
        ActionKind::Show => set_visibility(doc, action.target, met),
        ActionKind::Hide => set_visibility(doc, action.target, !met),
        ActionKind::Enable => set_disabled(doc, action.target, !met),
        ActionKind::Disable => set_disabled(doc, action.target, met),
        ActionKind::Require => set_required(doc, action.target, met),
        ActionKind::MakeOptional => set_required(doc, action.target, !met),
    }
}

/// Show/hide toggles the target, its wrapper, and its label, and suppresses
/// the required flag while hidden so a hidden field can never block submit.
/// The prior required state is stored on the field and restored exactly.
fn set_visibility(doc: &mut DomDocument, target: ResolvedTarget, visible: bool) {
    match target {
        ResolvedTarget::Field(i) => {
            let wrapper_id = doc.fields[i].wrapper_id.clone();
            set_field_visibility(doc, i, visible);
            if let Some(wi) = wrapper_id.and_then(|id| doc.wrapper_index(&id)) {
                doc.wrappers[wi].visible = visible;
            }
        }
        ResolvedTarget::Wrapper(i) => {
            doc.wrappers[i].visible = visible;
            let wrapper_id = doc.wrappers[i].id.clone();
            let children: Vec<usize> = doc
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.wrapper_id.as_deref() == Some(wrapper_id.as_str()))
                .map(|(idx, _)| idx)
                .collect();
            for idx in children {
                set_field_visibility(doc, idx, visible);
            }
        }
    }
}

fn set_field_visibility(doc: &mut DomDocument, i: usize, visible: bool) {
    let f = &mut doc.fields[i];
    f.visible = visible;
    f.label_visible = visible;

    if visible {
        if let Some(prior) = f.prior_required.take() {
            f.required = prior;
        }
    } else if f.prior_required.is_none() {
        f.prior_required = Some(f.required);
        f.required = false;
    }
}

fn set_disabled(doc: &mut DomDocument, target: ResolvedTarget, disabled: bool) {
    if let ResolvedTarget::Field(i) = target {
        doc.fields[i].disabled = disabled;
    }
}

fn set_required(doc: &mut DomDocument, target: ResolvedTarget, required: bool) {
    if let ResolvedTarget::Field(i) = target {
        doc.fields[i].required = required;
    }
}
