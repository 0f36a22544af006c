use formscan::rules::dom::{DomDocument, DomField};
use formscan::rules::evaluator::{extract_value, RuleEngine, DEBOUNCE_MS};
use formscan::rules::resolver::{resolve_field, resolve_target, ResolvedTarget};
use formscan::rules::rule_model::{
    ActionKind, Condition, LogicType, Operator, Rule, RuleAction,
};
use formscan::trace::logger::TraceLogger;

fn cond(field: &str, operator: &str, value: &str) -> Condition {
    Condition {
        field_id: field.to_string(),
        operator: operator.to_string(),
        value: value.to_string(),
    }
}

fn action(kind: &str, target: &str) -> RuleAction {
    RuleAction {
        r#type: kind.to_string(),
        target_field_id: target.to_string(),
    }
}

fn rule(id: &str, logic: LogicType, conditions: Vec<Condition>, actions: Vec<RuleAction>) -> Rule {
    Rule {
        id: id.to_string(),
        name: id.to_string(),
        logic_type: logic,
        conditions,
        actions,
        is_active: true,
        form_id: None,
    }
}

// ====================================================================
// Operators and action kinds
// ====================================================================

#[test]
fn operator_aliases_parse() {
    assert_eq!(Operator::parse("equals"), Operator::Equals);
    assert_eq!(Operator::parse("is"), Operator::Equals);
    assert_eq!(Operator::parse("=="), Operator::Equals);
    assert_eq!(Operator::parse("not_equals"), Operator::NotEquals);
    assert_eq!(Operator::parse("is not"), Operator::NotEquals);
    assert_eq!(Operator::parse("!="), Operator::NotEquals);
    assert_eq!(Operator::parse("Contains"), Operator::Contains);
    assert_eq!(Operator::parse("NOT CONTAINS"), Operator::NotContains);
    assert_eq!(Operator::parse("matches_regex"), Operator::Unknown);
}

#[test]
fn unknown_operator_evaluates_false() {
    assert!(!Operator::Unknown.evaluate("anything", "anything"));
}

#[test]
fn operator_value_comparison_is_case_sensitive() {
    assert!(Operator::Equals.evaluate("Yes", "Yes"));
    assert!(!Operator::Equals.evaluate("yes", "Yes"));
    assert!(Operator::Contains.evaluate("United States", "State"));
    assert!(!Operator::Contains.evaluate("United States", "state"));
    assert!(Operator::NotContains.evaluate("United States", "Canada"));
}

#[test]
fn action_kind_aliases() {
    assert_eq!(ActionKind::parse("show"), Some(ActionKind::Show));
    assert_eq!(ActionKind::parse("HIDE"), Some(ActionKind::Hide));
    assert_eq!(ActionKind::parse("make optional"), Some(ActionKind::MakeOptional));
    assert_eq!(ActionKind::parse("optional"), Some(ActionKind::MakeOptional));
    assert_eq!(ActionKind::parse("explode"), None);
}

// ====================================================================
// Value extraction
// ====================================================================

#[test]
fn checkbox_extracts_true_false() {
    let mut doc = DomDocument::with_fields(vec![DomField::checkbox("agree", "agree")]);
    assert_eq!(extract_value(&doc, 0), "false");
    doc.set_checked("agree", true);
    assert_eq!(extract_value(&doc, 0), "true");
}

#[test]
fn radio_value_comes_from_checked_group_member() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::radio("size-s", "size", "small"),
        DomField::radio("size-m", "size", "medium"),
    ]);
    // No member checked yet.
    assert_eq!(extract_value(&doc, 0), "");

    doc.set_checked("size-m", true);
    // Extracting through the *unchecked* member still reports the group's
    // checked value.
    assert_eq!(extract_value(&doc, 0), "medium");

    // Group exclusivity: checking one unchecks the other.
    doc.set_checked("size-s", true);
    assert_eq!(extract_value(&doc, 1), "small");
}

#[test]
fn text_field_falls_back_to_text_content() {
    let mut field = DomField::text_input("notes", "notes");
    field.text = "typed text".to_string();
    let mut doc = DomDocument::with_fields(vec![field]);
    assert_eq!(extract_value(&doc, 0), "typed text");

    doc.set_value("notes", "a value");
    assert_eq!(extract_value(&doc, 0), "a value");
}

#[test]
fn select_extracts_current_value() {
    let doc = DomDocument::with_fields(vec![
        DomField::select("country", "country").with_value("US"),
    ]);
    assert_eq!(extract_value(&doc, 0), "US");
}

// ====================================================================
// Applicability gate
// ====================================================================

#[test]
fn rule_with_unresolvable_condition_is_gated_out() {
    let doc = DomDocument::with_fields(vec![DomField::text_input("email", "email")]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("no-such-field", "equals", "x")],
        vec![action("hide", "email")],
    )];

    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    assert_eq!(engine.applicable_count(), 0);
    assert_eq!(engine.gated_out_count(), 1);
}

#[test]
fn rule_with_unresolvable_action_target_is_gated_out() {
    let doc = DomDocument::with_fields(vec![DomField::text_input("email", "email")]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("email", "equals", "x")],
        vec![action("hide", "no-such-target")],
    )];

    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    assert_eq!(engine.applicable_count(), 0);
    assert_eq!(engine.gated_out_count(), 1);
}

#[test]
fn inactive_rule_is_neither_applicable_nor_gated() {
    let doc = DomDocument::with_fields(vec![DomField::text_input("email", "email")]);
    let mut r = rule(
        "r1",
        LogicType::And,
        vec![cond("email", "equals", "x")],
        vec![action("hide", "email")],
    );
    r.is_active = false;

    let engine = RuleEngine::new(&[r], &doc, &TraceLogger::disabled());
    assert_eq!(engine.applicable_count(), 0);
    assert_eq!(engine.gated_out_count(), 0);
}

#[test]
fn gating_one_rule_keeps_the_others() {
    let doc = DomDocument::with_fields(vec![
        DomField::text_input("email", "email"),
        DomField::text_input("phone", "phone"),
    ]);
    let rules = vec![
        rule(
            "broken",
            LogicType::And,
            vec![cond("missing", "equals", "x")],
            vec![action("hide", "email")],
        ),
        rule(
            "ok",
            LogicType::And,
            vec![cond("email", "equals", "x")],
            vec![action("hide", "phone")],
        ),
    ];

    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    assert_eq!(engine.applicable_count(), 1);
    assert_eq!(engine.rule_ids(), vec!["ok"]);
}

// ====================================================================
// Condition grouping and logic types
// ====================================================================

#[test]
fn same_field_conditions_are_or_within_the_group() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::select("plan", "plan").with_value("pro"),
        DomField::text_input("coupon", "coupon"),
    ]);
    // Two conditions on the same field: either value satisfies the group,
    // even under AND logic.
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![
            cond("plan", "equals", "pro"),
            cond("plan", "equals", "enterprise"),
        ],
        vec![action("show", "coupon")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("coupon").unwrap().visible);

    doc.set_value("plan", "free");
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("coupon").unwrap().visible);
}

#[test]
fn and_requires_every_group_or_requires_one() {
    let doc = DomDocument::with_fields(vec![
        DomField::select("plan", "plan").with_value("pro"),
        DomField::text_input("company", "company").with_value(""),
        DomField::text_input("coupon", "coupon"),
    ]);
    let conditions = vec![
        cond("plan", "equals", "pro"),        // satisfied
        cond("company", "equals", "Acme"),    // not satisfied
    ];

    let mut and_doc = doc.clone();
    let and_rules = vec![rule(
        "r-and",
        LogicType::And,
        conditions.clone(),
        vec![action("show", "coupon")],
    )];
    let engine = RuleEngine::new(&and_rules, &and_doc, &TraceLogger::disabled());
    engine.run_all(&mut and_doc, &TraceLogger::disabled());
    assert!(!and_doc.field_by_id("coupon").unwrap().visible);

    let mut or_doc = doc.clone();
    let or_rules = vec![rule(
        "r-or",
        LogicType::Or,
        conditions,
        vec![action("show", "coupon")],
    )];
    let engine = RuleEngine::new(&or_rules, &or_doc, &TraceLogger::disabled());
    engine.run_all(&mut or_doc, &TraceLogger::disabled());
    assert!(or_doc.field_by_id("coupon").unwrap().visible);
}

#[test]
fn rule_with_no_conditions_is_never_met() {
    let mut doc = DomDocument::with_fields(vec![DomField::text_input("email", "email")]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![],
        vec![action("hide", "email")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    engine.run_all(&mut doc, &TraceLogger::disabled());
    // "hide" with an unmet rule means stay visible.
    assert!(doc.field_by_id("email").unwrap().visible);
}

#[test]
fn unknown_operator_condition_does_not_satisfy_its_group() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::select("plan", "plan").with_value("pro"),
        DomField::text_input("coupon", "coupon"),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("plan", "matches_regex", "pro")],
        vec![action("show", "coupon")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("coupon").unwrap().visible);
}

// ====================================================================
// Actions
// ====================================================================

#[test]
fn show_and_hide_toggle_visibility_both_ways() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("other", "other"),
        DomField::text_input("details", "details"),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("other", "equals", "true")],
        vec![action("show", "details")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("details").unwrap().visible);
    assert!(!doc.field_by_id("details").unwrap().label_visible);

    doc.set_checked("other", true);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("details").unwrap().visible);
    assert!(doc.field_by_id("details").unwrap().label_visible);
}

#[test]
fn hiding_suppresses_required_and_showing_restores_it_exactly() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("ssn", "ssn").required(),
        DomField::text_input("nickname", "nickname"),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("toggle", "equals", "true")],
        vec![action("show", "ssn"), action("show", "nickname")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    // Hidden: a required field must never block submission.
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("ssn").unwrap().visible);
    assert!(!doc.field_by_id("ssn").unwrap().required);

    // Shown again: required restored for the field that had it, and only
    // that one.
    doc.set_checked("toggle", true);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("ssn").unwrap().required);
    assert!(!doc.field_by_id("nickname").unwrap().required);
    assert!(doc.field_by_id("ssn").unwrap().prior_required.is_none());
}

#[test]
fn hiding_a_field_hides_its_wrapper() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("details", "details").with_wrapper("details-wrapper"),
    ]);
    doc.add_wrapper("details-wrapper");

    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("toggle", "equals", "true")],
        vec![action("hide", "details")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    doc.set_checked("toggle", true);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    let wi = doc.wrapper_index("details-wrapper").unwrap();
    assert!(!doc.wrappers[wi].visible);
    assert!(!doc.field_by_id("details").unwrap().visible);
}

#[test]
fn wrapper_target_toggles_every_child_field() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("street", "street").with_wrapper("address-wrapper"),
        DomField::text_input("city", "city").with_wrapper("address-wrapper"),
        DomField::text_input("unrelated", "unrelated"),
    ]);
    doc.add_wrapper("address-wrapper");

    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("toggle", "equals", "true")],
        vec![action("hide", "address-wrapper")],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    doc.set_checked("toggle", true);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("street").unwrap().visible);
    assert!(!doc.field_by_id("city").unwrap().visible);
    assert!(doc.field_by_id("unrelated").unwrap().visible);
}

#[test]
fn enable_disable_and_require_optional_actions() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("a", "a"),
        DomField::text_input("b", "b").required(),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("toggle", "equals", "true")],
        vec![
            action("disable", "a"),
            action("require", "a"),
            action("make_optional", "b"),
        ],
    )];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    doc.set_checked("toggle", true);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("a").unwrap().disabled);
    assert!(doc.field_by_id("a").unwrap().required);
    assert!(!doc.field_by_id("b").unwrap().required);

    // Unmet rule inverts each action.
    doc.set_checked("toggle", false);
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("a").unwrap().disabled);
    assert!(!doc.field_by_id("a").unwrap().required);
    assert!(doc.field_by_id("b").unwrap().required);
}

#[test]
fn later_rule_overrides_earlier_on_same_target() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("details", "details"),
    ]);
    doc.set_checked("toggle", true);

    let rules = vec![
        rule(
            "first",
            LogicType::And,
            vec![cond("toggle", "equals", "true")],
            vec![action("hide", "details")],
        ),
        rule(
            "second",
            LogicType::And,
            vec![cond("toggle", "equals", "true")],
            vec![action("show", "details")],
        ),
    ];
    let engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("details").unwrap().visible);
}

// ====================================================================
// Re-evaluation triggers
// ====================================================================

#[test]
fn change_event_runs_immediately() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::checkbox("toggle", "toggle"),
        DomField::text_input("details", "details"),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("toggle", "equals", "true")],
        vec![action("show", "details")],
    )];
    let mut engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    doc.set_checked("toggle", true);
    engine.on_change(&mut doc, &TraceLogger::disabled());
    assert!(doc.field_by_id("details").unwrap().visible);
}

#[test]
fn input_event_is_debounced() {
    let mut doc = DomDocument::with_fields(vec![
        DomField::text_input("promo", "promo"),
        DomField::text_input("discount-note", "discount-note"),
    ]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("promo", "equals", "SAVE10")],
        vec![action("show", "discount-note")],
    )];
    let mut engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());
    engine.run_all(&mut doc, &TraceLogger::disabled());
    assert!(!doc.field_by_id("discount-note").unwrap().visible);

    doc.set_value("promo", "SAVE10");
    engine.on_input(1_000);
    assert!(engine.has_pending());

    // Window not elapsed: nothing runs.
    assert!(!engine.flush(1_000 + DEBOUNCE_MS - 1, &mut doc, &TraceLogger::disabled()));
    assert!(!doc.field_by_id("discount-note").unwrap().visible);

    // Window elapsed: the pending run fires once.
    assert!(engine.flush(1_000 + DEBOUNCE_MS, &mut doc, &TraceLogger::disabled()));
    assert!(doc.field_by_id("discount-note").unwrap().visible);
    assert!(!engine.has_pending());
    assert!(!engine.flush(2_000, &mut doc, &TraceLogger::disabled()));
}

#[test]
fn fresh_input_resets_the_debounce_window() {
    let mut doc = DomDocument::with_fields(vec![DomField::text_input("promo", "promo")]);
    let rules = vec![rule(
        "r1",
        LogicType::And,
        vec![cond("promo", "equals", "x")],
        vec![action("hide", "promo")],
    )];
    let mut engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    engine.on_input(1_000);
    engine.on_input(1_200);
    // First keystroke's deadline has passed, but the second pushed it out.
    assert!(!engine.flush(1_350, &mut doc, &TraceLogger::disabled()));
    assert!(engine.flush(1_500, &mut doc, &TraceLogger::disabled()));
}

#[test]
fn change_event_clears_a_pending_debounce() {
    let mut doc = DomDocument::with_fields(vec![DomField::text_input("promo", "promo")]);
    let rules: Vec<Rule> = vec![];
    let mut engine = RuleEngine::new(&rules, &doc, &TraceLogger::disabled());

    engine.on_input(1_000);
    engine.on_change(&mut doc, &TraceLogger::disabled());
    assert!(!engine.has_pending());
}

// ====================================================================
// Live-DOM reference resolution
// ====================================================================

#[test]
fn resolver_prefers_exact_id_over_everything() {
    let doc = DomDocument::with_fields(vec![
        DomField::text_input("other", "email"),
        DomField::text_input("email", "e"),
    ]);
    assert_eq!(resolve_field(&doc, "email"), Some(1));
}

#[test]
fn resolver_falls_through_name_then_data_attribute() {
    let doc = DomDocument::with_fields(vec![
        DomField::text_input("f1", "first-name"),
        DomField::text_input("f2", "n2").with_data_name("Last Name"),
    ]);
    assert_eq!(resolve_field(&doc, "first-name"), Some(0));
    assert_eq!(resolve_field(&doc, "Last Name"), Some(1));
}

#[test]
fn resolver_matches_case_insensitively_then_by_label() {
    let doc = DomDocument::with_fields(vec![
        DomField::text_input("Full-Name", "fn"),
        DomField::text_input("f2", "n2").with_label("Work Email"),
    ]);
    assert_eq!(resolve_field(&doc, "full-name"), Some(0));
    assert_eq!(resolve_field(&doc, "work_email"), Some(1));
}

#[test]
fn resolver_uses_placeholder_and_fuzzy_containment_last() {
    let doc = DomDocument::with_fields(vec![
        DomField::text_input("f1", "n1").with_placeholder("Enter your phone number"),
        DomField::text_input("billing-address-line", "n2"),
    ]);
    assert_eq!(resolve_field(&doc, "phone number"), Some(0));
    assert_eq!(resolve_field(&doc, "billing-address"), Some(1));
    assert_eq!(resolve_field(&doc, "unrelated"), None);
    assert_eq!(resolve_field(&doc, ""), None);
}

#[test]
fn action_target_resolves_field_before_wrapper() {
    let mut doc = DomDocument::with_fields(vec![DomField::text_input("details", "details")]);
    doc.add_wrapper("details");
    doc.add_wrapper("Address-Wrapper");

    assert_eq!(resolve_target(&doc, "details"), Some(ResolvedTarget::Field(0)));
    assert_eq!(
        resolve_target(&doc, "Address-Wrapper"),
        Some(ResolvedTarget::Wrapper(1))
    );
    assert_eq!(
        resolve_target(&doc, "address wrapper"),
        Some(ResolvedTarget::Wrapper(1))
    );
    assert_eq!(resolve_target(&doc, "nothing-here"), None);
}
