use crate::rules::rule_model::Rule;

/// Emit the self-executing script served to the published site. The rule
/// set is baked in as a JSON literal at generation time — the script never
/// fetches configuration at run time. The embedded engine mirrors the
/// host-side evaluator: same resolution cascade, same condition semantics,
/// same debounce window.
pub fn generate(rules: &[Rule], site_id: &str) -> String {
    let config = serde_json::to_string(rules).unwrap_or_else(|_| "[]".to_string());

    SCRIPT_TEMPLATE
        .replace("__SITE_ID__", &site_id.replace('"', ""))
        .replace("__RULES_JSON__", &config)
}

pub const SCRIPT_CONTENT_TYPE: &str = "application/javascript";

const SCRIPT_TEMPLATE: &str = r#"(function () {
  'use strict';
  var SITE_ID = "__SITE_ID__";
  var RULES = __RULES_JSON__;
  var DEBOUNCE_MS = 300;

  function norm(s) {
    return (s || '').toLowerCase().replace(/[^a-z0-9]/g, '');
  }

  // Live-DOM field resolution: id, name, data attribute, case-insensitive
  // id/name, label association, placeholder containment, fuzzy containment.
  function findField(ref) {
    if (!ref) return null;
    var el = document.getElementById(ref);
    if (el) return el;
    el = document.querySelector('[name="' + CSS.escape(ref) + '"]');
    if (el) return el;
    el = document.querySelector('[data-name="' + CSS.escape(ref) + '"]');
    if (el) return el;
    var all = document.querySelectorAll('input, select, textarea');
    var i, lower = ref.toLowerCase();
    for (i = 0; i < all.length; i++) {
      if ((all[i].id || '').toLowerCase() === lower) return all[i];
      if ((all[i].name || '').toLowerCase() === lower) return all[i];
    }
    var labels = document.querySelectorAll('label[for]');
    for (i = 0; i < labels.length; i++) {
      if (norm(labels[i].textContent) === norm(ref)) {
        var labelled = document.getElementById(labels[i].htmlFor);
        if (labelled) return labelled;
      }
    }
    for (i = 0; i < all.length; i++) {
      var ph = all[i].getAttribute('placeholder');
      if (ph && norm(ph).indexOf(norm(ref)) !== -1) return all[i];
    }
    var needle = norm(ref);
    for (i = 0; i < all.length; i++) {
      var id = norm(all[i].id), name = norm(all[i].name);
      if (id && (id.indexOf(needle) !== -1 || needle.indexOf(id) !== -1)) return all[i];
      if (name && (name.indexOf(needle) !== -1 || needle.indexOf(name) !== -1)) return all[i];
    }
    return null;
  }

  function findTarget(ref) {
    return findField(ref) || document.getElementById(ref);
  }

  function fieldValue(el) {
    if (!el) return '';
    if (el.type === 'checkbox') return el.checked ? 'true' : 'false';
    if (el.type === 'radio') {
      var group = document.querySelectorAll('input[type="radio"][name="' + CSS.escape(el.name) + '"]');
      for (var i = 0; i < group.length; i++) {
        if (group[i].checked) return group[i].value;
      }
      return '';
    }
    return el.value !== undefined && el.value !== '' ? el.value : (el.textContent || '');
  }

  function evalCondition(cond) {
    var op = (cond.operator || '').toLowerCase().trim().replace(/\s+/g, '_');
    var actual = fieldValue(findField(cond.fieldId));
    switch (op) {
      case 'equals': case 'is': case '==': return actual === cond.value;
      case 'not_equals': case 'is_not': case '!=': return actual !== cond.value;
      case 'contains': return actual.indexOf(cond.value) !== -1;
      case 'not_contains': return actual.indexOf(cond.value) === -1;
      default:
        if (window.console) console.warn('[formscan] unknown operator:', cond.operator);
        return false;
    }
  }

  function ruleIsMet(rule) {
    var groups = {};
    rule.conditions.forEach(function (c) {
      (groups[c.fieldId] = groups[c.fieldId] || []).push(c);
    });
    var keys = Object.keys(groups);
    if (keys.length === 0) return false;
    var satisfied = function (key) {
      return groups[key].some(evalCondition);
    };
    return rule.logicType === 'OR' ? keys.some(satisfied) : keys.every(satisfied);
  }

  function wrapperOf(el) {
    return el.closest ? el.closest('.w-input-wrapper, .form-field, .field-wrapper') : null;
  }

  function labelOf(el) {
    return el.id ? document.querySelector('label[for="' + CSS.escape(el.id) + '"]') : null;
  }

  function setVisible(el, visible) {
    var display = visible ? '' : 'none';
    el.style.display = display;
    var wrapper = wrapperOf(el);
    if (wrapper) wrapper.style.display = display;
    var label = labelOf(el);
    if (label) label.style.display = display;
    if (!visible) {
      if (el.dataset.fsPriorRequired === undefined) {
        el.dataset.fsPriorRequired = el.required ? '1' : '0';
      }
      el.required = false;
    } else if (el.dataset.fsPriorRequired !== undefined) {
      el.required = el.dataset.fsPriorRequired === '1';
      delete el.dataset.fsPriorRequired;
    }
  }

  function applyAction(action, met) {
    var el = findTarget(action.targetFieldId);
    if (!el) return;
    var type = (action.type || '').toLowerCase().trim().replace(/\s+/g, '_');
    switch (type) {
      case 'show': setVisible(el, met); break;
      case 'hide': setVisible(el, !met); break;
      case 'enable': el.disabled = !met; break;
      case 'disable': el.disabled = met; break;
      case 'require': el.required = met; break;
      case 'make_optional': case 'optional': el.required = !met; break;
      default:
        if (window.console) console.warn('[formscan] unknown action:', action.type);
    }
  }

  // Applicability gate: rules referencing fields absent from this page are
  // skipped for the lifetime of the page load.
  var applicable = RULES.filter(function (rule) {
    if (rule.isActive === false) return false;
    var resolvable = rule.conditions.every(function (c) { return findField(c.fieldId); });
    return resolvable && rule.actions.every(function (a) { return findTarget(a.targetFieldId); });
  });

  function runAll() {
    applicable.forEach(function (rule) {
      var met = ruleIsMet(rule);
      rule.actions.forEach(function (action) { applyAction(action, met); });
    });
  }

  var debounceTimer = null;
  function onInput() {
    if (debounceTimer) clearTimeout(debounceTimer);
    debounceTimer = setTimeout(runAll, DEBOUNCE_MS);
  }

  document.addEventListener('change', function (ev) {
    if (ev.target.matches && ev.target.matches('input, select, textarea')) runAll();
  });
  document.addEventListener('input', function (ev) {
    if (ev.target.matches && ev.target.matches('input[type="text"], input[type="email"], input:not([type]), textarea')) onInput();
  });

  // Submission capture shares the same field-matching helper.
  document.addEventListener('submit', function (ev) {
    var form = ev.target;
    if (!form || !form.id) return;
    var payload = { siteId: SITE_ID, formId: form.id, fields: {} };
    var inputs = form.querySelectorAll('input, select, textarea');
    for (var i = 0; i < inputs.length; i++) {
      var key = inputs[i].id || inputs[i].name;
      if (key) payload.fields[key] = fieldValue(inputs[i]);
    }
    if (window.formscanCapture) window.formscanCapture(payload);
  });

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', runAll);
  } else {
    runAll();
  }
})();
"#;
