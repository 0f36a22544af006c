use serde::Serialize;

use crate::crawl::error::ScanError;
use crate::crawl::fetcher::PageFetcher;
use crate::crawl::inventory::{published_pages, InventoryProvider};
use crate::extract::element_model::{Page, RawElement};
use crate::extract::extractor::extract_page;
use crate::extract::scan_context::ScanContext;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{now_ms, ScanEvent};

/// Knobs for one site scan.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_pages: usize,
    pub publish_host: String,
    /// Fallback when the page inventory is unavailable. Without it, an
    /// inventory failure is terminal.
    pub homepage_url: Option<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            publish_host: "webflow.io".to_string(),
            homepage_url: None,
        }
    }
}

/// Forms detected on one page, for the scan summary.
#[derive(Debug, Clone, Serialize)]
pub struct PageFormCount {
    pub url: String,
    pub forms: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanDiagnostics {
    pub duplicates_suppressed: usize,
    pub forms_skipped_no_id: usize,
    pub unreferenceable_dropped: usize,
    pub pages_failed: usize,
}

/// The whole-site scan output: the deduplicated flat element list plus
/// observability data for the dashboard and the console report.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub elements: Vec<RawElement>,
    #[serde(rename = "pagesScanned")]
    pub pages_scanned: usize,
    #[serde(rename = "formsPerPage")]
    pub forms_per_page: Vec<PageFormCount>,
    pub fingerprint: String,
    pub diagnostics: ScanDiagnostics,
}

/// Decide which pages to scan: the authoritative inventory when available,
/// otherwise homepage-only with a warning.
pub fn plan_pages(
    provider: &dyn InventoryProvider,
    site_id: &str,
    config: &CrawlConfig,
) -> Result<Vec<Page>, ScanError> {
    let planned = provider
        .fetch(site_id)
        .and_then(|structure| published_pages(&structure, site_id, &config.publish_host));

    match planned {
        Ok(pages) => Ok(pages),
        Err(e) => match &config.homepage_url {
            Some(url) => {
                eprintln!(
                    "Warning: page inventory unavailable for '{}' ({}); falling back to homepage-only scan",
                    site_id, e
                );
                Ok(vec![homepage(url)])
            }
            // Without a homepage URL there is nothing left to scan. A
            // missing short name keeps its own, more specific error.
            None => match e {
                ScanError::MissingShortName { .. } => Err(e),
                _ => Err(ScanError::NoHomepage {
                    site_id: site_id.to_string(),
                }),
            },
        },
    }
}

fn homepage(url: &str) -> Page {
    Page {
        url: url.to_string(),
        slug: String::new(),
        title: "Home".to_string(),
    }
}

/// Scan every page of a site and fold the results into one flat element
/// list. A single page's fetch failure contributes zero elements and the
/// scan continues; exceeding the page budget aborts with a typed error.
pub fn scan_site(
    provider: &dyn InventoryProvider,
    fetcher: &dyn PageFetcher,
    site_id: &str,
    config: &CrawlConfig,
    tracer: &TraceLogger,
) -> Result<ScanResult, ScanError> {
    let pages = plan_pages(provider, site_id, config)?;

    if pages.len() > config.max_pages {
        return Err(ScanError::PageBudgetExceeded {
            planned: pages.len(),
            budget: config.max_pages,
        });
    }

    let mut ctx = ScanContext::new();
    let mut elements: Vec<RawElement> = Vec::new();
    let mut forms_per_page: Vec<PageFormCount> = Vec::new();
    let mut pages_failed = 0usize;

    for page in &pages {
        let markup = match fetcher.fetch(&page.url) {
            Ok(m) => m,
            Err(e) => {
                pages_failed += 1;
                eprintln!("Warning: skipping page '{}': {}", page.url, e);
                tracer.log(&ScanEvent::PageFailed {
                    timestamp_ms: now_ms(),
                    url: page.url.clone(),
                    error: e.to_string(),
                });
                forms_per_page.push(PageFormCount {
                    url: page.url.clone(),
                    forms: 0,
                });
                continue;
            }
        };

        let extraction = extract_page(&markup, page, &mut ctx, tracer);

        tracer.log(&ScanEvent::PageFetched {
            timestamp_ms: now_ms(),
            url: page.url.clone(),
            elements: extraction.elements.len(),
            forms: extraction.forms.len(),
        });

        forms_per_page.push(PageFormCount {
            url: page.url.clone(),
            forms: extraction.forms.len(),
        });
        elements.extend(extraction.elements);
    }

    let fingerprint = scan_fingerprint(&elements);

    Ok(ScanResult {
        elements,
        pages_scanned: pages.len(),
        forms_per_page,
        fingerprint,
        diagnostics: ScanDiagnostics {
            duplicates_suppressed: ctx.duplicates_suppressed,
            forms_skipped_no_id: ctx.forms_skipped_no_id,
            unreferenceable_dropped: ctx.unreferenceable_dropped,
            pages_failed,
        },
    })
}

/// Stable digest of the ordered element list. Two scans of an unchanged site
/// produce the same fingerprint, which is the cheap idempotence check the
/// dashboard shows.
pub fn scan_fingerprint(elements: &[RawElement]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for el in elements {
        hasher.update(el.id.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(el.tag_name.as_bytes());
        hasher.update(b"\x1e");
    }
    format!("{:x}", hasher.finalize())
}
