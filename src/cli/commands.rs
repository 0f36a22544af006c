use crate::crawl::crawler::{scan_site, CrawlConfig};
use crate::crawl::error::ScanError;
use crate::crawl::fetcher::HttpFetcher;
use crate::crawl::inventory::HttpInventoryProvider;
use crate::matcher::match_model::FieldIdentity;
use crate::matcher::matcher::{reconcile_all, MatchOptions};
use crate::report::console::{format_reconcile_report, format_scan_report};
use crate::rules::generator::generate;
use crate::rules::rule_model::{Rule, RuleSet};
use crate::trace::logger::TraceLogger;

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    site: &str,
    config: &CrawlConfig,
    inventory_endpoint: &str,
    api_token: Option<&str>,
    json: bool,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = HttpInventoryProvider::new(inventory_endpoint, api_token);
    let fetcher = HttpFetcher::new();
    let tracer = build_tracer(trace_path);

    if verbose > 0 {
        eprintln!(
            "Scanning site '{}' (max_pages={}, host={})...",
            site, config.max_pages, config.publish_host
        );
    }

    let result = scan_site(&provider, &fetcher, site, config, &tracer)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_scan_report(site, &result));
    }

    Ok(())
}

// ============================================================================
// reconcile subcommand
// ============================================================================

/// Scan the site, then match the stored field identities against it.
/// Returns whether every field resolved.
pub fn cmd_reconcile(
    site: &str,
    fields_path: &str,
    form_id: Option<&str>,
    cross_form: bool,
    config: &CrawlConfig,
    inventory_endpoint: &str,
    api_token: Option<&str>,
    trace_path: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(fields_path)?;
    let mut identities: Vec<FieldIdentity> = serde_yaml::from_str(&content)
        .map_err(|e| ScanError::Config(format!("invalid fields file '{}': {}", fields_path, e)))?;

    if identities.is_empty() {
        eprintln!("No field identities found in: {}", fields_path);
        return Ok(true);
    }

    let provider = HttpInventoryProvider::new(inventory_endpoint, api_token);
    let fetcher = HttpFetcher::new();
    let tracer = build_tracer(trace_path);

    if verbose > 0 {
        eprintln!(
            "Reconciling {} fields against site '{}'...",
            identities.len(),
            site
        );
    }

    let result = scan_site(&provider, &fetcher, site, config, &tracer)?;

    let opts = MatchOptions {
        form_id: form_id.map(|s| s.to_string()),
        allow_cross_form: cross_form,
    };
    let outcomes = reconcile_all(&mut identities, &result.elements, &opts, &tracer);

    print!("{}", format_reconcile_report(&outcomes));

    let all_resolved = outcomes.iter().all(|o| {
        matches!(
            o,
            crate::matcher::match_model::ReconcileOutcome::Matched { .. }
        )
    });
    Ok(all_resolved)
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(
    rules_path: &str,
    site: &str,
    output: Option<&str>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(rules_path)?;
    let rules = load_rules(&content)
        .map_err(|e| ScanError::Config(format!("invalid rules file '{}': {}", rules_path, e)))?;

    if verbose > 0 {
        eprintln!(
            "Generating script for site '{}' ({} rules)...",
            site,
            rules.len()
        );
    }

    let script = generate(&rules, site);

    match output {
        Some(path) => {
            std::fs::write(path, &script)?;
            if verbose > 0 {
                eprintln!("Wrote: {}", path);
            }
        }
        None => print!("{}", script),
    }

    Ok(())
}

/// Accept either a bare rule array or the rule store's `{ "rules": [...] }`
/// envelope.
pub fn load_rules(content: &str) -> Result<Vec<Rule>, serde_json::Error> {
    if let Ok(set) = serde_json::from_str::<RuleSet>(content) {
        return Ok(set.rules);
    }
    serde_json::from_str::<Vec<Rule>>(content)
}

// ============================================================================
// Helpers
// ============================================================================

fn build_tracer(trace_path: Option<&str>) -> TraceLogger {
    match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    }
}
